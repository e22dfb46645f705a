//! Widths of a probe string per generic family.

use crate::generic::GenericFamily;
use crate::measure::{Ruler, TextMeasurer};
use anyhow::{Context as _, Result};
use log::debug;

/// One width per generic family. Zero means "not yet measured".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FamilyWidths {
    /// Width under `sans-serif`, or under `<font>, sans-serif` while polling
    pub sans_serif: u32,
    /// Width under `serif`, or under `<font>, serif` while polling
    pub serif: u32,
    /// Width under `monospace`, or under `<font>, monospace` while polling
    pub monospace: u32,
}

impl FamilyWidths {
    /// Build from the three widths.
    pub const fn new(sans_serif: u32, serif: u32, monospace: u32) -> Self {
        Self {
            sans_serif,
            serif,
            monospace,
        }
    }

    /// Width recorded for `family`.
    pub const fn get(&self, family: GenericFamily) -> u32 {
        match family {
            GenericFamily::SansSerif => self.sans_serif,
            GenericFamily::Serif => self.serif,
            GenericFamily::Monospace => self.monospace,
        }
    }

    /// Whether every family has a non-zero width.
    pub const fn is_measured(&self) -> bool {
        self.sans_serif != 0 && self.serif != 0 && self.monospace != 0
    }

    /// Whether the three widths are the same.
    pub const fn all_equal(&self) -> bool {
        self.sans_serif == self.serif && self.serif == self.monospace
    }

    /// Whether `width` matches any of the three.
    pub const fn contains(&self, width: u32) -> bool {
        self.sans_serif == width || self.serif == width || self.monospace == width
    }
}

/// Measure `text` once under each bare generic family.
///
/// Each ruler is released before returning, on success and on failure.
///
/// # Errors
/// Fails if any of the three measurements fails.
pub fn measure_fallbacks<M: TextMeasurer + ?Sized>(measurer: &M, text: &str) -> Result<FamilyWidths> {
    let mut widths = FamilyWidths::default();
    for family in GenericFamily::ALL {
        let ruler = Ruler::with_font_stack(measurer, text, &[family.name()])
            .with_context(|| format!("cannot create {family} ruler"))?;
        let width = ruler
            .width()
            .with_context(|| format!("cannot measure {family} fallback"))?;
        match family {
            GenericFamily::SansSerif => widths.sans_serif = width,
            GenericFamily::Serif => widths.serif = width,
            GenericFamily::Monospace => widths.monospace = width,
        }
    }
    debug!("fallback widths for {text:?}: {widths:?}");
    Ok(widths)
}
