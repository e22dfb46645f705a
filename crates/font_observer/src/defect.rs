//! Detection of the WebKit fallback-width defect.
//!
//! Affected WebKit builds report the same width for every generic family while a web
//! font is loading, because all of them fall back to one last-resort font. The check
//! runs once per process and is memoized.

use log::{debug, warn};
use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;

/// First WebKit build without the defect is 536.12.
const FIXED_MAJOR: u32 = 536;
const LAST_AFFECTED_MINOR: u32 = 11;

static WEBKIT_VERSION: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"AppleWeb[kK]it/([0-9]+)(?:\.([0-9]+))").ok());

/// Whether the engine identified by `user_agent` has the fallback-width defect.
///
/// Builds below 536 and 536.0 through 536.11 are affected; non-WebKit engines are not.
pub fn has_webkit_fallback_bug(user_agent: &str) -> bool {
    let Some(regex) = WEBKIT_VERSION.as_ref() else {
        warn!("WebKit version pattern failed to compile");
        return false;
    };
    let Some(captures) = regex.captures(user_agent) else {
        return false;
    };
    let version = |group: usize| {
        captures
            .get(group)
            .and_then(|part| part.as_str().parse::<u32>().ok())
    };
    match (version(1), version(2)) {
        (Some(major), _) if major < FIXED_MAJOR => true,
        (Some(FIXED_MAJOR), Some(minor)) => minor <= LAST_AFFECTED_MINOR,
        _ => false,
    }
}

/// Whether the defect is known to be present.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DefectState {
    /// Not computed yet.
    Unknown,
    /// The engine has the defect.
    Present,
    /// The engine does not have the defect.
    Absent,
}

/// A write-once memo of the defect check.
///
/// The first caller computes the value; concurrent callers block until it is set and
/// all observe the same result.
#[derive(Debug, Default)]
pub struct DefectFlag {
    cell: OnceCell<bool>,
}

impl DefectFlag {
    /// An empty flag.
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// The flag shared by every observer in the process.
    pub fn process() -> &'static Self {
        static PROCESS: DefectFlag = DefectFlag::new();
        &PROCESS
    }

    /// Return the memoized value, computing it from `user_agent` on first use.
    ///
    /// `user_agent` is only called when the value is unknown.
    pub fn get_or_detect<F: FnOnce() -> String>(&self, user_agent: F) -> bool {
        *self.cell.get_or_init(|| {
            let agent = user_agent();
            let present = has_webkit_fallback_bug(&agent);
            debug!("fallback defect {present} for {agent:?}");
            present
        })
    }

    /// Tri-state view of the flag.
    pub fn state(&self) -> DefectState {
        match self.cell.get() {
            None => DefectState::Unknown,
            Some(true) => DefectState::Present,
            Some(false) => DefectState::Absent,
        }
    }

    /// Whether the defect is known to be present.
    pub fn is_present(&self) -> bool {
        self.state() == DefectState::Present
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIREFOX: &str = "Mozilla/5.0 (Android; Mobile; rv:13.0) Gecko/15.0 Firefox/14.0";
    const WEBKIT_536_12: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/536.12 (KHTML, like Gecko) Chrome/20.0.814.2 Safari/536.12";
    const WEBKIT_536_11: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/536.11 (KHTML, like Gecko) Chrome/20.0.814.2 Safari/536.11";
    const WEBKIT_535_19: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/535.19 (KHTML, like Gecko) Chrome/20.0.814.2 Safari/535.19";

    /// Test the version table.
    ///
    /// # Panics
    /// Panics if an engine is misclassified.
    #[test]
    fn test_version_table() {
        assert!(!has_webkit_fallback_bug(FIREFOX));
        assert!(!has_webkit_fallback_bug(WEBKIT_536_12));
        assert!(has_webkit_fallback_bug(WEBKIT_536_11));
        assert!(has_webkit_fallback_bug(WEBKIT_535_19));
        assert!(has_webkit_fallback_bug("AppleWebkit/534.30"));
        assert!(!has_webkit_fallback_bug("AppleWebKit/605.1.15"));
        assert!(!has_webkit_fallback_bug(""));
    }

    /// Test that the first detection is memoized.
    ///
    /// # Panics
    /// Panics if a later user agent changes the cached result.
    #[test]
    fn test_memoized() {
        let flag = DefectFlag::new();
        assert_eq!(flag.state(), DefectState::Unknown);
        assert!(flag.get_or_detect(|| WEBKIT_536_11.to_owned()));
        assert!(flag.get_or_detect(|| FIREFOX.to_owned()));
        assert_eq!(flag.state(), DefectState::Present);

        let other = DefectFlag::new();
        assert!(!other.get_or_detect(|| FIREFOX.to_owned()));
        assert!(!other.get_or_detect(|| WEBKIT_535_19.to_owned()));
        assert_eq!(other.state(), DefectState::Absent);
    }
}
