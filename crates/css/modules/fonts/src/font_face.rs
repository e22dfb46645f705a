//! The `@font-face` descriptor set of a single web font.

use crate::error::{RuleError, UnicodeRangeError};
use crate::rule::FontFaceRule;
use crate::unicode_range::UnicodeRange;
use css_syntax::AtRule;
use cssparser::{BasicParseError, Parser, ParserInput, serialize_string};

/// Optional `@font-face` descriptors besides family and source.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FontFaceDescriptors {
    /// `font-style`
    pub style: Option<String>,
    /// `font-weight`
    pub weight: Option<String>,
    /// `font-stretch`
    pub stretch: Option<String>,
    /// `font-variant`
    pub variant: Option<String>,
    /// `font-feature-settings`
    pub feature_settings: Option<String>,
    /// `unicode-range`, as written
    pub unicode_range: Option<String>,
}

impl FontFaceDescriptors {
    /// Descriptor names paired with their values, in serialization order.
    fn entries(&self) -> [(&'static str, Option<&str>); 6] {
        [
            ("font-style", self.style.as_deref()),
            ("font-weight", self.weight.as_deref()),
            ("font-stretch", self.stretch.as_deref()),
            ("font-variant", self.variant.as_deref()),
            ("font-feature-settings", self.feature_settings.as_deref()),
            ("unicode-range", self.unicode_range.as_deref()),
        ]
    }
}

/// A web font: its family name, its `src`, and its other descriptors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontFace {
    family: String,
    source: String,
    descriptors: FontFaceDescriptors,
}

impl FontFace {
    /// Create a font face. Quotes around `family` are stripped.
    pub fn new(family: &str, source: &str, descriptors: FontFaceDescriptors) -> Self {
        Self {
            family: unquote(family),
            source: source.trim().to_owned(),
            descriptors,
        }
    }

    /// Read a font face back from a `@font-face` rule.
    ///
    /// # Errors
    /// Returns [`RuleError`] if the rule cannot be read or lacks `font-family`.
    pub fn from_rule<R: FontFaceRule + ?Sized>(rule: &R) -> Result<Self, RuleError> {
        let family = rule
            .property_value("font-family")?
            .ok_or(RuleError::MissingDescriptor {
                descriptor: "font-family",
            })?;
        let source = rule.property_value("src")?.unwrap_or_default();
        let descriptors = FontFaceDescriptors {
            style: rule.property_value("font-style")?,
            weight: rule.property_value("font-weight")?,
            stretch: rule.property_value("font-stretch")?,
            variant: rule.property_value("font-variant")?,
            feature_settings: rule.property_value("font-feature-settings")?,
            unicode_range: rule.property_value("unicode-range")?,
        };
        Ok(Self::new(&family, &source, descriptors))
    }

    /// The unquoted family name.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// The `src` descriptor text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The remaining descriptors.
    pub const fn descriptors(&self) -> &FontFaceDescriptors {
        &self.descriptors
    }

    /// The parsed `unicode-range`, or the full range when the descriptor is absent.
    ///
    /// # Errors
    /// Returns [`UnicodeRangeError`] if the declared descriptor is malformed.
    pub fn unicode_range(&self) -> Result<UnicodeRange, UnicodeRangeError> {
        self.descriptors
            .unicode_range
            .as_deref()
            .map_or_else(|| Ok(UnicodeRange::full()), UnicodeRange::parse)
    }

    /// Build the equivalent `@font-face` at-rule.
    pub fn to_at_rule(&self) -> AtRule {
        let mut rule = AtRule::new("font-face");
        rule.set_declaration("font-family", &quote_family(&self.family));
        if !self.source.is_empty() {
            rule.set_declaration("src", &self.source);
        }
        for (name, value) in self.descriptors.entries() {
            if let Some(value) = value {
                rule.set_declaration(name, value);
            }
        }
        rule
    }

    /// Serialize as `@font-face { ... }` text.
    pub fn to_css_text(&self) -> String {
        self.to_at_rule().to_string()
    }
}

/// Read a family name that may be a CSS string, resolving its escapes.
///
/// Anything that is not a single string token is taken as written.
fn unquote(family: &str) -> String {
    let mut input = ParserInput::new(family);
    let mut parser = Parser::new(&mut input);
    parser
        .try_parse(|tokens| {
            let name = tokens.expect_string_cloned()?;
            tokens.expect_exhausted()?;
            Ok::<String, BasicParseError<'_>>((*name).to_owned())
        })
        .unwrap_or_else(|_| family.trim().to_owned())
}

/// Whether `family` reads back as exactly one identifier.
fn is_identifier(family: &str) -> bool {
    let mut input = ParserInput::new(family);
    let mut parser = Parser::new(&mut input);
    let same = parser
        .expect_ident_cloned()
        .is_ok_and(|ident| *ident == *family);
    same && parser.is_exhausted()
}

/// Quote a family name unless it is a single identifier.
fn quote_family(family: &str) -> String {
    if is_identifier(family) {
        return family.to_owned();
    }
    let mut quoted = String::with_capacity(family.len() + 2);
    serialize_string(family, &mut quoted)
        .map(|()| quoted)
        .unwrap_or_default()
}
