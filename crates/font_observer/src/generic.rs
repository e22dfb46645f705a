//! Generic fallback families used as measurement baselines.

use core::fmt;

/// A generic font family the renderer falls back to while a web font is loading.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GenericFamily {
    /// `sans-serif`
    SansSerif,
    /// `serif`
    Serif,
    /// `monospace`
    Monospace,
}

impl GenericFamily {
    /// Every generic family, in measurement order.
    pub const ALL: [Self; 3] = [Self::SansSerif, Self::Serif, Self::Monospace];

    /// CSS keyword of the family.
    pub const fn name(self) -> &'static str {
        match self {
            Self::SansSerif => "sans-serif",
            Self::Serif => "serif",
            Self::Monospace => "monospace",
        }
    }
}

impl fmt::Display for GenericFamily {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}
