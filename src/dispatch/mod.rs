//! Value → renderer dispatch
//!
//! Every value shown on the error page is matched against an ordered list
//! of [`MatchRule`]s. Rules are evaluated newest first, so the generic
//! built-ins registered at construction act as fallbacks and anything an
//! extension registers later overrides them without explicit priorities.

mod builtins;
mod rule;

pub use builtins::{HANDLER_INTERFACE, default_rules};
pub use rule::{MatchRule, Matcher, PredicateFn};

use crate::core::{PageError, Renderer, Result, Value};
use tracing::{debug, warn};

/// Ordered registry of match rules
#[derive(Debug, Clone)]
pub struct DispatchRegistry {
    rules: Vec<MatchRule>,
}

impl DispatchRegistry {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Registry pre-loaded with the generic, array, object and handler rules
    pub fn with_default_rules() -> Self {
        let mut registry = Self::new();
        registry.rules.extend(default_rules());
        registry
    }

    /// Append rules after the existing ones.
    ///
    /// A rule whose label is already registered replaces that rule in place,
    /// keeping its precedence. The whole batch is validated first; a
    /// malformed rule leaves the registry untouched.
    pub fn add_rules(&mut self, rules: impl IntoIterator<Item = MatchRule>) -> Result<()> {
        let rules: Vec<MatchRule> = rules.into_iter().collect();

        for (i, rule) in rules.iter().enumerate() {
            if rule.label.trim().is_empty() {
                return Err(PageError::Configuration(
                    "Match rule is missing a label".into(),
                ));
            }
            if rule.renderer.as_str().trim().is_empty() {
                return Err(PageError::Configuration(format!(
                    "Match rule '{}' is missing a renderer",
                    rule.label
                )));
            }
            if rules[..i].iter().any(|r| r.label == rule.label) {
                return Err(PageError::Configuration(format!(
                    "Match rule '{}' appears twice in one batch",
                    rule.label
                )));
            }
        }

        for rule in rules {
            match self.rules.iter_mut().find(|r| r.label == rule.label) {
                Some(slot) => {
                    debug!(label = %rule.label, renderer = %rule.renderer, "replaced match rule");
                    *slot = rule;
                }
                None => {
                    debug!(label = %rule.label, renderer = %rule.renderer, "registered match rule");
                    self.rules.push(rule);
                }
            }
        }
        Ok(())
    }

    pub fn add_rule(&mut self, rule: MatchRule) -> Result<()> {
        self.add_rules([rule])
    }

    /// Find the renderer for a value, checking the most recently registered
    /// rule first.
    pub fn resolve(&self, value: &Value) -> Option<&Renderer> {
        self.find_rule(value).map(|rule| &rule.renderer)
    }

    /// Same as [`resolve`](Self::resolve) but returns the whole rule
    pub fn find_rule(&self, value: &Value) -> Option<&MatchRule> {
        self.rules.iter().rev().find(|rule| match rule.test(value) {
            Ok(matched) => matched,
            Err(err) => {
                warn!(label = %rule.label, error = %err, "match predicate failed, skipping rule");
                false
            }
        })
    }

    pub fn contains(&self, label: &str) -> bool {
        self.rules.iter().any(|r| r.label == label)
    }

    /// Rule labels in registration order
    pub fn labels(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.label.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for DispatchRegistry {
    fn default() -> Self {
        Self::with_default_rules()
    }
}
