//! Error types for descriptor parsing and rule editing.

use thiserror::Error;

/// A `unicode-range` descriptor that violates the grammar or the code point bounds.
///
/// Parsing is all-or-nothing: any error discards the whole descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum UnicodeRangeError {
    /// The descriptor text was empty or only whitespace.
    #[error("unicode-range descriptor is empty")]
    Empty,
    /// A token did not match `u+<hex>[?...]` or `u+<hex>-<hex>`.
    #[error("malformed unicode-range token `{token}`")]
    Syntax {
        /// The offending comma-separated token.
        token: String,
    },
    /// A numeric token exceeds `U+10FFFF`.
    #[error("code point `{token}` exceeds U+10FFFF")]
    OutOfRange {
        /// The offending numeric token.
        token: String,
    },
    /// A wildcard token expands past `U+10FFFF`.
    #[error("wildcard `{token}` expands beyond U+10FFFF")]
    WildcardOutOfRange {
        /// The offending wildcard token.
        token: String,
    },
    /// A range has a `-` separator but no end bound.
    #[error("range `{token}` is missing its end bound")]
    MissingEnd {
        /// The offending range token.
        token: String,
    },
    /// A range whose end bound is below its start bound.
    #[error("range end {end:#x} precedes start {start:#x}")]
    Inverted {
        /// Parsed start bound.
        start: u32,
        /// Parsed end bound.
        end: u32,
    },
}

/// Failure to read or edit a `@font-face` rule.
#[derive(Debug, Error)]
pub enum RuleError {
    /// The text is not a single block at-rule.
    #[error("`{text}` is not a single at-rule")]
    Malformed {
        /// The rejected rule text.
        text: String,
    },
    /// The text parsed, but as some other at-rule.
    #[error("expected @font-face, found @{name}")]
    NotFontFace {
        /// Name of the at-rule that was found.
        name: String,
    },
    /// A descriptor required to build a font face is absent.
    #[error("@font-face rule has no `{descriptor}` descriptor")]
    MissingDescriptor {
        /// The missing descriptor name.
        descriptor: &'static str,
    },
    /// The rule was deleted and can no longer be accessed.
    #[error("rule has been removed from its sheet")]
    Detached,
    /// The host sheet rejected the operation.
    #[error(transparent)]
    Host(#[from] anyhow::Error),
}
