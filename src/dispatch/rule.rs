use std::fmt;
use std::sync::Arc;

use crate::core::{Renderer, TypeTag, Value};

/// User supplied test of a value. An `Err` counts as "does not match".
pub type PredicateFn = Arc<dyn Fn(&Value) -> anyhow::Result<bool> + Send + Sync>;

/// How a rule decides whether it applies to a value
#[derive(Clone)]
pub enum Matcher {
    /// Matches every value
    All,
    /// Matches values whose runtime type tag equals this one
    Equal(TypeTag),
    /// Matches values for which the function returns `Ok(true)`
    Predicate(PredicateFn),
}

impl Matcher {
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&Value) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(f))
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "All"),
            Self::Equal(tag) => write!(f, "Equal({})", tag),
            Self::Predicate(_) => write!(f, "Predicate(<fn>)"),
        }
    }
}

/// A single predicate/renderer pairing
#[derive(Debug, Clone)]
pub struct MatchRule {
    pub label: String,
    pub renderer: Renderer,
    pub matcher: Matcher,
}

impl MatchRule {
    pub fn new(label: impl Into<String>, renderer: impl Into<Renderer>, matcher: Matcher) -> Self {
        Self {
            label: label.into(),
            renderer: renderer.into(),
            matcher,
        }
    }

    pub fn all(label: impl Into<String>, renderer: impl Into<Renderer>) -> Self {
        Self::new(label, renderer, Matcher::All)
    }

    pub fn equal(label: impl Into<String>, renderer: impl Into<Renderer>, tag: TypeTag) -> Self {
        Self::new(label, renderer, Matcher::Equal(tag))
    }

    pub fn predicate<F>(label: impl Into<String>, renderer: impl Into<Renderer>, f: F) -> Self
    where
        F: Fn(&Value) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        Self::new(label, renderer, Matcher::predicate(f))
    }

    /// Test the rule against a value. Predicate failures are returned as
    /// `Err` so the caller decides how to absorb them.
    pub fn test(&self, value: &Value) -> anyhow::Result<bool> {
        match &self.matcher {
            Matcher::All => Ok(true),
            Matcher::Equal(tag) => Ok(value.type_tag() == *tag),
            Matcher::Predicate(f) => f(value),
        }
    }
}
