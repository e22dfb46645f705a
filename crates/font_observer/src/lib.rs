//! Web font load detection by width polling.
//!
//! A [`FontFaceObserver`] renders a probe string with the observed family in front of
//! each generic family and waits until the widths stop matching the generic fallbacks.
//! Rendering is delegated to a [`TextMeasurer`] host.

mod baseline;
mod config;
mod defect;
mod error;
mod generic;
mod measure;
mod observer;

pub use baseline::{FamilyWidths, measure_fallbacks};
pub use config::{DEFAULT_POLL_INTERVAL_MS, DEFAULT_TIMEOUT_MS, ObserverConfig};
pub use defect::{DefectFlag, DefectState, has_webkit_fallback_bug};
pub use error::ObserveError;
pub use generic::GenericFamily;
pub use measure::{Ruler, TextMeasurer};
pub use observer::{FontFaceObserver, ObservationResult, ObserverState};
