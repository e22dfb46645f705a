//! Width-polling observer that detects when a web font replaces its fallback.
//!
//! The observer renders a probe string with `<font>, <generic>` for each generic family
//! and compares the widths against the bare generic baselines. While the font is
//! loading the renderer draws the fallback, so the widths match the baselines; once
//! they stop matching the font has swapped in.

use crate::baseline::{FamilyWidths, measure_fallbacks};
use crate::config::ObserverConfig;
use crate::defect::DefectFlag;
use crate::error::ObserveError;
use crate::generic::GenericFamily;
use crate::measure::{Ruler, TextMeasurer};
use anyhow::Result;
use core::time::Duration;
use css_fonts::{FontFace, UnicodeRange, UnicodeRangeError};
use log::{debug, info, warn};
use std::sync::Arc;
use tokio::time::{Instant, MissedTickBehavior, interval, sleep};

/// Progress of a [`FontFaceObserver`]. `Resolved` and `TimedOut` are final.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObserverState {
    /// Not started.
    Initial,
    /// Measuring the generic family baselines.
    MeasuringFallbacks,
    /// Ticking until the font swaps in or the deadline passes.
    Polling,
    /// The font was detected.
    Resolved,
    /// The deadline passed first.
    TimedOut,
}

/// Final outcome of an observation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObservationResult {
    /// The font is rendering.
    Loaded,
    /// The font did not render before the deadline.
    TimedOut,
}

/// One ruler per generic family, each with the observed family in front.
struct FamilyRulers<'host, M: TextMeasurer + ?Sized> {
    sans_serif: Ruler<'host, M>,
    serif: Ruler<'host, M>,
    monospace: Ruler<'host, M>,
}

impl<'host, M: TextMeasurer + ?Sized> FamilyRulers<'host, M> {
    fn new(measurer: &'host M, family: &str, text: &str) -> Result<Self> {
        let ruler = |generic: GenericFamily| {
            Ruler::with_font_stack(measurer, text, &[family, generic.name()])
        };
        Ok(Self {
            sans_serif: ruler(GenericFamily::SansSerif)?,
            serif: ruler(GenericFamily::Serif)?,
            monospace: ruler(GenericFamily::Monospace)?,
        })
    }

    fn widths(&self) -> Result<FamilyWidths> {
        Ok(FamilyWidths::new(
            self.sans_serif.width()?,
            self.serif.width()?,
            self.monospace.width()?,
        ))
    }
}

/// Watches a single font family until it renders or a deadline passes.
pub struct FontFaceObserver<M: TextMeasurer> {
    family: String,
    test_string: String,
    measurer: Arc<M>,
    config: ObserverConfig,
    defect_flag: &'static DefectFlag,
    baseline: FamilyWidths,
    state: ObserverState,
    /// Time spent polling, recorded on reaching a final state.
    elapsed: Duration,
}

impl<M: TextMeasurer> FontFaceObserver<M> {
    /// Observe `family` with an explicit probe string, or the full-range default.
    pub fn new(family: &str, test_string: Option<&str>, measurer: Arc<M>, config: ObserverConfig) -> Self {
        let test_string = test_string.map_or_else(|| UnicodeRange::full().test_string(), str::to_owned);
        Self {
            family: family.to_owned(),
            test_string,
            measurer,
            config,
            defect_flag: DefectFlag::process(),
            baseline: FamilyWidths::default(),
            state: ObserverState::Initial,
            elapsed: Duration::ZERO,
        }
    }

    /// Observe a font face, probing with code points from its `unicode-range`.
    ///
    /// # Errors
    /// Returns [`UnicodeRangeError`] if the face declares a malformed `unicode-range`.
    pub fn for_font_face(face: &FontFace, measurer: Arc<M>, config: ObserverConfig) -> Result<Self, UnicodeRangeError> {
        let test_string = face.unicode_range()?.test_string();
        Ok(Self::new(face.family(), Some(&test_string), measurer, config))
    }

    /// Use `flag` instead of the process-wide defect flag.
    #[must_use]
    pub fn with_defect_flag(mut self, flag: &'static DefectFlag) -> Self {
        self.defect_flag = flag;
        self
    }

    /// Use known fallback widths instead of measuring them on start.
    #[must_use]
    pub fn with_baseline(mut self, baseline: FamilyWidths) -> Self {
        self.baseline = baseline;
        self
    }

    /// The observed family.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// The probe string rendered by every ruler.
    pub fn test_string(&self) -> &str {
        &self.test_string
    }

    /// Fallback widths; zero until measured.
    pub const fn baseline(&self) -> FamilyWidths {
        self.baseline
    }

    /// Current state.
    pub const fn state(&self) -> ObserverState {
        self.state
    }

    /// Final outcome, once reached.
    pub const fn result(&self) -> Option<ObservationResult> {
        match self.state {
            ObserverState::Resolved => Some(ObservationResult::Loaded),
            ObserverState::TimedOut => Some(ObservationResult::TimedOut),
            ObserverState::Initial | ObserverState::MeasuringFallbacks | ObserverState::Polling => None,
        }
    }

    /// Whether the sans-serif and serif widths both match their fallbacks.
    ///
    /// Monospace is left out: its fallback width is unreliable across engines.
    pub const fn is_fallback_font(&self, sans_serif: u32, serif: u32) -> bool {
        sans_serif == self.baseline.sans_serif && serif == self.baseline.serif
    }

    /// Whether the widths look like a single last-resort font standing in for every family.
    ///
    /// Only meaningful on engines with the fallback defect; always `false` elsewhere.
    pub fn is_last_resort_font(&self, widths: FamilyWidths) -> bool {
        self.defect_flag.is_present()
            && widths.all_equal()
            && self.baseline.contains(widths.sans_serif)
    }

    /// Whether a tick's widths show the font rendering.
    fn is_loaded(&self, widths: FamilyWidths) -> bool {
        !self.is_fallback_font(widths.sans_serif, widths.serif) && !self.is_last_resort_font(widths)
    }

    /// Run the observation to completion.
    ///
    /// Calling this again after a final state returns the same outcome without
    /// measuring anything. Dropping the future releases every ruler.
    ///
    /// # Errors
    /// Returns [`ObserveError::Timeout`] if the font does not render in time, or
    /// [`ObserveError::Measurement`] if the baselines cannot be measured. Failures while
    /// polling only cost the tick they happen in.
    pub async fn start(&mut self) -> Result<(), ObserveError> {
        match self.state {
            ObserverState::Resolved => return Ok(()),
            ObserverState::TimedOut => return Err(self.timeout_error()),
            ObserverState::Initial | ObserverState::MeasuringFallbacks | ObserverState::Polling => {}
        }

        let measurer = Arc::clone(&self.measurer);
        let agent = self.config.user_agent.clone().unwrap_or_default();
        self.defect_flag.get_or_detect(|| agent);

        if !self.baseline.is_measured() {
            self.state = ObserverState::MeasuringFallbacks;
            debug!("{}: measuring fallbacks", self.family);
            match measure_fallbacks(&*measurer, &self.test_string) {
                Ok(widths) => self.baseline = widths,
                Err(source) => {
                    self.state = ObserverState::Initial;
                    return Err(self.measurement_error(source));
                }
            }
        }
        self.state = ObserverState::Polling;
        debug!("{}: polling every {:?}", self.family, self.config.poll_interval());
        let started = Instant::now();
        let deadline = sleep(self.config.timeout());
        tokio::pin!(deadline);
        let mut ticker = interval(self.config.poll_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // Built on the first tick that can acquire all three samples.
        let mut rulers = Option::<FamilyRulers<'_, M>>::None;
        let result = loop {
            tokio::select! {
                biased;
                () = &mut deadline => break ObservationResult::TimedOut,
                _ = ticker.tick() => {
                    if rulers.is_none() {
                        match FamilyRulers::new(&*measurer, &self.family, &self.test_string) {
                            Ok(built) => rulers = Some(built),
                            Err(err) => warn!("{}: cannot create rulers: {err:#}", self.family),
                        }
                    }
                    if let Some(live) = &rulers
                        && self.tick(live)
                    {
                        break ObservationResult::Loaded;
                    }
                }
            }
        };
        drop(rulers);
        self.elapsed = started.elapsed();

        match result {
            ObservationResult::Loaded => {
                self.state = ObserverState::Resolved;
                info!("{}: loaded after {:?}", self.family, self.elapsed);
                Ok(())
            }
            ObservationResult::TimedOut => {
                self.state = ObserverState::TimedOut;
                warn!("{}: timed out after {:?}", self.family, self.elapsed);
                Err(self.timeout_error())
            }
        }
    }

    /// Measure once and classify. A failed measurement counts as "not loaded yet".
    fn tick(&self, rulers: &FamilyRulers<'_, M>) -> bool {
        match rulers.widths() {
            Ok(widths) => {
                debug!("{}: tick {widths:?} against {:?}", self.family, self.baseline);
                self.is_loaded(widths)
            }
            Err(err) => {
                warn!("{}: measurement failed: {err:#}", self.family);
                false
            }
        }
    }

    fn timeout_error(&self) -> ObserveError {
        ObserveError::Timeout {
            family: self.family.clone(),
            elapsed: self.elapsed,
        }
    }

    fn measurement_error(&self, source: anyhow::Error) -> ObserveError {
        ObserveError::Measurement {
            family: self.family.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;

    /// A measurer that is never used by the classification tests.
    struct Unused;

    impl TextMeasurer for Unused {
        type Handle = ();

        fn acquire(&self, _text: &str) -> Result<()> {
            bail!("not available")
        }
        fn set_font_stack(&self, _handle: &(), _families: &[&str]) -> Result<()> {
            Ok(())
        }
        fn measure_width(&self, _handle: &()) -> Result<u32> {
            Ok(0)
        }
        fn release(&self, _handle: &()) {}
    }

    static WITH_DEFECT: DefectFlag = DefectFlag::new();
    static WITHOUT_DEFECT: DefectFlag = DefectFlag::new();

    fn observer(flag: &'static DefectFlag) -> FontFaceObserver<Unused> {
        FontFaceObserver::new("Test", None, Arc::new(Unused), ObserverConfig::default())
            .with_defect_flag(flag)
            .with_baseline(FamilyWidths::new(10, 12, 15))
    }

    /// Test the two-of-three fallback match.
    ///
    /// # Panics
    /// Panics if monospace influences the fallback check.
    #[test]
    fn test_is_fallback_font() {
        let observer = observer(&WITHOUT_DEFECT);
        assert!(observer.is_fallback_font(10, 12));
        assert!(!observer.is_fallback_font(10, 13));
        assert!(!observer.is_fallback_font(11, 13));
    }

    /// Test that last-resort matching depends on the defect flag.
    ///
    /// # Panics
    /// Panics if a last-resort width is misclassified.
    #[test]
    fn test_is_last_resort_font() {
        WITHOUT_DEFECT.get_or_detect(|| "Gecko/15.0 Firefox/14.0".to_owned());
        let healthy = observer(&WITHOUT_DEFECT);
        assert!(!healthy.is_last_resort_font(FamilyWidths::new(10, 10, 10)));
        assert!(!healthy.is_last_resort_font(FamilyWidths::new(15, 15, 15)));

        WITH_DEFECT.get_or_detect(|| "AppleWebKit/536.11 (KHTML, like Gecko)".to_owned());
        let affected = observer(&WITH_DEFECT);
        assert!(affected.is_last_resort_font(FamilyWidths::new(10, 10, 10)));
        assert!(affected.is_last_resort_font(FamilyWidths::new(12, 12, 12)));
        assert!(affected.is_last_resort_font(FamilyWidths::new(15, 15, 15)));
        assert!(!affected.is_last_resort_font(FamilyWidths::new(10, 11, 10)));
        assert!(!affected.is_last_resort_font(FamilyWidths::new(13, 13, 13)));

        // Same collapsed width: inconclusive under the defect, loaded otherwise.
        assert!(!affected.is_loaded(FamilyWidths::new(15, 15, 15)));
        assert!(healthy.is_loaded(FamilyWidths::new(15, 15, 15)));
    }

    /// Test the default probe string.
    ///
    /// # Panics
    /// Panics if the full-range probe is not used.
    #[test]
    fn test_default_test_string() {
        let observer = observer(&WITHOUT_DEFECT);
        assert_eq!(observer.test_string(), "BESbswy");
        assert_eq!(observer.state(), ObserverState::Initial);
        assert_eq!(observer.result(), None);
    }
}
