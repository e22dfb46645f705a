//! CSS Syntax Module Level 3 — Parsing of at-rules and declaration blocks.
//! Spec: <https://www.w3.org/TR/css-syntax-3/>
//!
//! Only block at-rules (such as `@font-face`) and plain declaration lists are
//! modeled here; qualified style rules are skipped.
use cssparser::AtRuleParser as CssAtRuleParser;
use cssparser::CowRcStr;
use cssparser::DeclarationParser as CssDeclarationParser;
use cssparser::ParseError;
use cssparser::Parser;
use cssparser::ParserInput;
use cssparser::ParserState;
use cssparser::QualifiedRuleParser as CssQualifiedRuleParser;
use cssparser::RuleBodyItemParser as CssRuleBodyItemParser;
use cssparser::RuleBodyParser as CssRuleBodyParser;
use cssparser::StyleSheetParser;
use core::fmt::{self, Write as _};
use log::trace;

/// A single CSS declaration (property: value [!important]).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    /// Lowercased property name.
    pub name: String,
    /// Raw value text (without trailing !important).
    pub value: String,
    /// Whether the declaration was marked as `!important`.
    pub important: bool,
}

impl Declaration {
    /// Create a normal (non-important) declaration.
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_ascii_lowercase(),
            value: value.trim().to_owned(),
            important: false,
        }
    }
}

/// A block at-rule with its lowercased name, raw prelude and declarations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AtRule {
    /// Lowercased at-keyword without the leading `@` (e.g. `font-face`).
    pub name: String,
    /// Raw prelude text between the keyword and the block.
    pub prelude: String,
    /// Declarations within the rule block, in source order.
    pub declarations: Vec<Declaration>,
}

impl AtRule {
    /// Create an empty at-rule with the given name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_ascii_lowercase(),
            prelude: String::new(),
            declarations: Vec::new(),
        }
    }

    /// Value of the last declaration for `name`, following cascade order within a block.
    pub fn declaration(&self, name: &str) -> Option<&str> {
        self.declarations
            .iter()
            .rev()
            .find(|decl| decl.name.eq_ignore_ascii_case(name))
            .map(|decl| decl.value.as_str())
    }

    /// Replace every declaration of `name` with a single one holding `value`.
    ///
    /// The replacement keeps the position of the first existing declaration, or is
    /// appended when the property was not present.
    pub fn set_declaration(&mut self, name: &str, value: &str) {
        let replacement = Declaration::new(name, value);
        let first = self
            .declarations
            .iter()
            .position(|decl| decl.name == replacement.name);
        match first {
            Some(index) => {
                self.declarations
                    .retain(|decl| decl.name != replacement.name);
                let insert_at = index.min(self.declarations.len());
                self.declarations.insert(insert_at, replacement);
            }
            None => self.declarations.push(replacement),
        }
    }
}

impl fmt::Display for AtRule {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_char('@')?;
        formatter.write_str(&self.name)?;
        if !self.prelude.is_empty() {
            formatter.write_char(' ')?;
            formatter.write_str(&self.prelude)?;
        }
        formatter.write_str(" {")?;
        for decl in &self.declarations {
            write!(formatter, " {}: {}", decl.name, decl.value)?;
            if decl.important {
                formatter.write_str(" !important")?;
            }
            formatter.write_char(';')?;
        }
        formatter.write_str(" }")
    }
}

/// Parse `!important` at the end of a value, returning (`value_without_important`, `important_flag`).
fn split_important_tail(value: &str) -> (String, bool) {
    let trimmed = value.trim();
    if let Some(pos) = trimmed.rfind("!important")
        && let Some(prefix) = trimmed.get(..pos)
    {
        let head = prefix.trim_end();
        return (head.to_owned(), true);
    }
    (trimmed.to_owned(), false)
}

/// A declaration parser that records property name and its raw value.
struct BodyDeclParser;

impl<'i> CssDeclarationParser<'i> for BodyDeclParser {
    type Declaration = Declaration;
    type Error = ();

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
        _decl_start: &ParserState,
    ) -> Result<Self::Declaration, ParseError<'i, Self::Error>> {
        let start = input.position();
        // Consume until end of the declaration item.
        while input.next_including_whitespace_and_comments().is_ok() {}
        let raw = input.slice_from(start);
        let (value, important) = split_important_tail(raw);
        Ok(Declaration {
            name: name.to_ascii_lowercase(),
            value,
            important,
        })
    }
}

// Nested rules inside a descriptor block are dropped.
impl CssAtRuleParser<'_> for BodyDeclParser {
    type Prelude = ();
    type AtRule = Declaration;
    type Error = ();
}

impl CssQualifiedRuleParser<'_> for BodyDeclParser {
    type Prelude = ();
    type QualifiedRule = Declaration;
    type Error = ();
}

impl CssRuleBodyItemParser<'_, Declaration, ()> for BodyDeclParser {
    fn parse_declarations(&self) -> bool {
        true
    }
    fn parse_qualified(&self) -> bool {
        false
    }
}

/// Top-level parser that builds `AtRule` items for block at-rules.
struct TopLevelParser;

impl<'i> CssAtRuleParser<'i> for TopLevelParser {
    /// Lowercased name and raw prelude.
    type Prelude = (String, String);
    type AtRule = AtRule;
    type Error = ();

    #[inline]
    fn parse_prelude<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        let start = input.position();
        while input.next_including_whitespace_and_comments().is_ok() {}
        let prelude = input.slice_from(start).trim().to_owned();
        Ok((name.to_ascii_lowercase(), prelude))
    }

    #[inline]
    fn parse_block<'t>(
        &mut self,
        prelude: Self::Prelude,
        _state: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::AtRule, ParseError<'i, Self::Error>> {
        let (name, prelude) = prelude;
        let declarations = parse_declarations_from_block(input);
        trace!("parsed @{name} with {} declarations", declarations.len());
        Ok(AtRule {
            name,
            prelude,
            declarations,
        })
    }
}

// Qualified (selector) rules are not modeled; the default impl rejects them.
impl CssQualifiedRuleParser<'_> for TopLevelParser {
    type Prelude = ();
    type QualifiedRule = AtRule;
    type Error = ();
}

/// Parse declarations from a rule block using `cssparser` body parser.
fn parse_declarations_from_block(block: &mut Parser<'_, '_>) -> Vec<Declaration> {
    let mut out: Vec<Declaration> = Vec::new();
    let mut body = BodyDeclParser;
    for decl in CssRuleBodyParser::new(block, &mut body).flatten() {
        out.push(decl);
    }
    out
}

/// Parse every top-level block at-rule in `css`, in source order.
pub fn parse_at_rules(css: &str) -> Vec<AtRule> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut top = TopLevelParser;
    StyleSheetParser::new(&mut parser, &mut top)
        .flatten()
        .collect()
}

/// Parse a single block at-rule, such as `@font-face{font-family:test;}`.
///
/// Returns `None` when `css` does not contain exactly one block at-rule.
pub fn parse_at_rule(css: &str) -> Option<AtRule> {
    let mut rules = parse_at_rules(css);
    if rules.len() == 1 { rules.pop() } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test that `!important` is split from the value.
    ///
    /// # Panics
    /// Panics if the flag or the remaining value is wrong.
    #[test]
    fn test_split_important_tail() {
        assert_eq!(split_important_tail(" 500 !important "), ("500".to_owned(), true));
        assert_eq!(split_important_tail("italic"), ("italic".to_owned(), false));
    }

    /// Test parsing a compact `@font-face` rule.
    ///
    /// # Panics
    /// Panics if the rule or its declarations are not recovered.
    #[test]
    fn test_parse_font_face_rule() {
        let rule = parse_at_rule("@font-face{font-family:test;font-weight:500;}")
            .unwrap_or_else(|| AtRule::new("missing"));
        assert_eq!(rule.name, "font-face");
        assert_eq!(rule.declaration("font-family"), Some("test"));
        assert_eq!(rule.declaration("FONT-WEIGHT"), Some("500"));
        assert_eq!(
            rule.to_string(),
            "@font-face { font-family: test; font-weight: 500; }"
        );
    }

    /// Test that qualified rules are ignored and multiple rules are rejected by `parse_at_rule`.
    ///
    /// # Panics
    /// Panics if style rules leak into the result.
    #[test]
    fn test_qualified_rules_skipped() {
        let rules = parse_at_rules("div { color: red } @font-face { src: url(a.woff) }");
        assert_eq!(rules.len(), 1);
        assert!(parse_at_rule("@font-face{} @font-face{}").is_none());
        assert!(parse_at_rule("div { color: red }").is_none());
    }

    /// Test replacing declarations in place.
    ///
    /// # Panics
    /// Panics if declaration order or values are wrong after editing.
    #[test]
    fn test_set_declaration() {
        let mut rule = parse_at_rule("@font-face { font-family: a; font-weight: 400; font-weight: 500; font-style: italic }")
            .unwrap_or_else(|| AtRule::new("missing"));
        rule.set_declaration("font-weight", "700");
        rule.set_declaration("font-display", "swap");
        let names: Vec<&str> = rule.declarations.iter().map(|decl| decl.name.as_str()).collect();
        assert_eq!(names, ["font-family", "font-weight", "font-style", "font-display"]);
        assert_eq!(rule.declaration("font-weight"), Some("700"));
        assert_eq!(rule.declaration("font-style"), Some("italic"));
    }
}
