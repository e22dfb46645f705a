//! Spec: <https://www.w3.org/TR/css-fonts-4/#font-face-rule>
//!
//! A `@font-face` rule is reached through [`FontFaceRule`], whether it lives in memory
//! ([`ParsedRule`]) or inside a sheet owned by a host ([`SheetRule`]).

mod parsed;
mod sheet;

use crate::error::RuleError;
use css_syntax::{AtRule, parse_at_rule};

pub use parsed::ParsedRule;
pub use sheet::{MemorySheet, RuleHost, RuleId, SheetRule};

/// Name of the at-rule handled here, without the `@`.
const FONT_FACE: &str = "font-face";

/// Read and write access to a single `@font-face` rule.
pub trait FontFaceRule {
    /// Current value of a descriptor, `None` if it is not declared.
    ///
    /// # Errors
    /// Returns [`RuleError`] if the rule was deleted or its host cannot be read.
    fn property_value(&self, property: &str) -> Result<Option<String>, RuleError>;

    /// Set a descriptor, replacing any previous declaration of it.
    ///
    /// # Errors
    /// Returns [`RuleError`] if the rule was deleted or its host rejects the edit.
    fn set_property(&mut self, property: &str, value: &str) -> Result<(), RuleError>;

    /// Serialized text of the whole rule.
    ///
    /// # Errors
    /// Returns [`RuleError`] if the rule was deleted or its host cannot be read.
    fn css_text(&self) -> Result<String, RuleError>;

    /// Replace the whole rule with new `@font-face` text, keeping its position.
    ///
    /// # Errors
    /// Returns [`RuleError`] if `css_text` is not a single `@font-face` rule.
    fn update(&mut self, css_text: &str) -> Result<(), RuleError>;

    /// Remove the rule. Later accesses fail with [`RuleError::Detached`].
    ///
    /// # Errors
    /// Returns [`RuleError`] if the rule was already deleted or the host refuses.
    fn delete(&mut self) -> Result<(), RuleError>;

    /// Position of the rule within its sheet, `None` once detached.
    fn index(&self) -> Option<usize>;
}

/// Parse `css_text` and require it to be a `@font-face` rule.
fn parse_font_face(css_text: &str) -> Result<AtRule, RuleError> {
    let rule = parse_at_rule(css_text).ok_or_else(|| RuleError::Malformed {
        text: css_text.to_owned(),
    })?;
    if rule.name == FONT_FACE {
        Ok(rule)
    } else {
        Err(RuleError::NotFontFace { name: rule.name })
    }
}
