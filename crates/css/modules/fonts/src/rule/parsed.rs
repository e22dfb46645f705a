//! In-memory `@font-face` rule.

use super::{FontFaceRule, parse_font_face};
use crate::error::RuleError;
use css_syntax::AtRule;

/// A `@font-face` rule parsed from text and edited in memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedRule {
    /// `None` once the rule has been deleted.
    rule: Option<AtRule>,
}

impl ParsedRule {
    /// Parse a rule such as `@font-face{font-family:test;}`.
    ///
    /// # Errors
    /// Returns [`RuleError`] if the text is not a single `@font-face` rule.
    pub fn parse(css_text: &str) -> Result<Self, RuleError> {
        Ok(Self {
            rule: Some(parse_font_face(css_text)?),
        })
    }

    fn live(&self) -> Result<&AtRule, RuleError> {
        self.rule.as_ref().ok_or(RuleError::Detached)
    }
}

impl FontFaceRule for ParsedRule {
    fn property_value(&self, property: &str) -> Result<Option<String>, RuleError> {
        Ok(self.live()?.declaration(property).map(str::to_owned))
    }

    fn set_property(&mut self, property: &str, value: &str) -> Result<(), RuleError> {
        let rule = self.rule.as_mut().ok_or(RuleError::Detached)?;
        rule.set_declaration(property, value);
        Ok(())
    }

    fn css_text(&self) -> Result<String, RuleError> {
        Ok(self.live()?.to_string())
    }

    fn update(&mut self, css_text: &str) -> Result<(), RuleError> {
        self.live()?;
        self.rule = Some(parse_font_face(css_text)?);
        Ok(())
    }

    fn delete(&mut self) -> Result<(), RuleError> {
        self.rule.take().map(|_| ()).ok_or(RuleError::Detached)
    }

    fn index(&self) -> Option<usize> {
        self.rule.as_ref().map(|_| 0)
    }
}
