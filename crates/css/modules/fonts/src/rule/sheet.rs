//! `@font-face` rules owned by a host style sheet.

use super::{FontFaceRule, parse_font_face};
use crate::error::RuleError;
use anyhow::{Context as _, Result, anyhow};
use core::cell::{Cell, RefCell};
use log::debug;

/// Stable identity of a rule inside a host sheet, independent of its position.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RuleId(pub u64);

/// A style sheet that owns rules, such as a document's `CSSStyleSheet`.
///
/// Methods take `&self`; hosts are expected to use interior mutability like a DOM does.
pub trait RuleHost {
    /// Serialized text of the rule.
    ///
    /// # Errors
    /// Fails if `id` is not in the sheet.
    fn rule_text(&self, id: RuleId) -> Result<String>;

    /// Replace the rule text in place, keeping its id and position.
    ///
    /// # Errors
    /// Fails if `id` is not in the sheet or the text is rejected.
    fn replace_rule(&self, id: RuleId, css_text: &str) -> Result<()>;

    /// Remove the rule from the sheet.
    ///
    /// # Errors
    /// Fails if `id` is not in the sheet.
    fn delete_rule(&self, id: RuleId) -> Result<()>;

    /// Current position of the rule, `None` if it is not in the sheet.
    fn index_of(&self, id: RuleId) -> Option<usize>;
}

/// A live `@font-face` rule read from and written back to its host on every access.
#[derive(Debug)]
pub struct SheetRule<'host, H: RuleHost> {
    host: &'host H,
    id: RuleId,
}

impl<'host, H: RuleHost> SheetRule<'host, H> {
    /// Wrap the rule `id` of `host`.
    ///
    /// # Errors
    /// Returns [`RuleError`] if the rule is missing or is not `@font-face`.
    pub fn new(host: &'host H, id: RuleId) -> Result<Self, RuleError> {
        let text = host.rule_text(id)?;
        parse_font_face(&text)?;
        Ok(Self { host, id })
    }

    /// Identity of the wrapped rule.
    pub const fn id(&self) -> RuleId {
        self.id
    }

    fn read(&self) -> Result<css_syntax::AtRule, RuleError> {
        if self.host.index_of(self.id).is_none() {
            return Err(RuleError::Detached);
        }
        parse_font_face(&self.host.rule_text(self.id)?)
    }
}

impl<H: RuleHost> FontFaceRule for SheetRule<'_, H> {
    fn property_value(&self, property: &str) -> Result<Option<String>, RuleError> {
        Ok(self.read()?.declaration(property).map(str::to_owned))
    }

    fn set_property(&mut self, property: &str, value: &str) -> Result<(), RuleError> {
        let mut rule = self.read()?;
        rule.set_declaration(property, value);
        self.host.replace_rule(self.id, &rule.to_string())?;
        Ok(())
    }

    fn css_text(&self) -> Result<String, RuleError> {
        self.read().map(|rule| rule.to_string())
    }

    fn update(&mut self, css_text: &str) -> Result<(), RuleError> {
        if self.host.index_of(self.id).is_none() {
            return Err(RuleError::Detached);
        }
        let rule = parse_font_face(css_text)?;
        self.host.replace_rule(self.id, &rule.to_string())?;
        Ok(())
    }

    fn delete(&mut self) -> Result<(), RuleError> {
        if self.host.index_of(self.id).is_none() {
            return Err(RuleError::Detached);
        }
        self.host.delete_rule(self.id)?;
        Ok(())
    }

    fn index(&self) -> Option<usize> {
        self.host.index_of(self.id)
    }
}

/// An in-process rule host holding rule text in sheet order.
#[derive(Debug, Default)]
pub struct MemorySheet {
    rules: RefCell<Vec<(RuleId, String)>>,
    next_id: Cell<u64>,
}

impl MemorySheet {
    /// Create an empty sheet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert rule text at `index` (clamped to the end) and return its id.
    pub fn insert_rule(&self, css_text: &str, index: usize) -> RuleId {
        let id = RuleId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        let mut rules = self.rules.borrow_mut();
        let at = index.min(rules.len());
        rules.insert(at, (id, css_text.to_owned()));
        debug!("inserted rule {id:?} at {at}");
        id
    }

    /// Number of rules in the sheet.
    pub fn len(&self) -> usize {
        self.rules.borrow().len()
    }

    /// Whether the sheet has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.borrow().is_empty()
    }

    /// Snapshot of all rule texts in sheet order.
    pub fn css_rules(&self) -> Vec<String> {
        self.rules
            .borrow()
            .iter()
            .map(|(_, text)| text.clone())
            .collect()
    }
}

impl RuleHost for MemorySheet {
    fn rule_text(&self, id: RuleId) -> Result<String> {
        self.rules
            .borrow()
            .iter()
            .find(|(rule_id, _)| *rule_id == id)
            .map(|(_, text)| text.clone())
            .ok_or_else(|| anyhow!("rule {id:?} is not in the sheet"))
    }

    fn replace_rule(&self, id: RuleId, css_text: &str) -> Result<()> {
        let mut rules = self.rules.borrow_mut();
        let slot = rules
            .iter_mut()
            .find(|(rule_id, _)| *rule_id == id)
            .with_context(|| format!("cannot replace rule {id:?}"))?;
        css_text.clone_into(&mut slot.1);
        Ok(())
    }

    fn delete_rule(&self, id: RuleId) -> Result<()> {
        let index = self
            .index_of(id)
            .with_context(|| format!("cannot delete rule {id:?}"))?;
        self.rules.borrow_mut().remove(index);
        debug!("deleted rule {id:?} from {index}");
        Ok(())
    }

    fn index_of(&self, id: RuleId) -> Option<usize> {
        self.rules
            .borrow()
            .iter()
            .position(|(rule_id, _)| *rule_id == id)
    }
}
