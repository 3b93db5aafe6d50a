//! "Open in editor" links
//!
//! An editor is identified by name and resolves a `(file, line)` pair either
//! through a URL template containing `%file` / `%line`, or through a
//! function. One editor (or a bare function) may be active at a time.

mod builtins;

pub use builtins::{builtin_editors, xdebug_resolver};

use std::fmt;
use std::sync::Arc;

use crate::core::{PageError, Result};
use tracing::debug;

/// Custom resolver. Returning `None` is a contract violation reported by
/// [`EditorResolverRegistry::resolve`].
pub type ResolverFn = Arc<dyn Fn(&str, u32) -> Option<String> + Send + Sync>;

#[derive(Clone)]
pub enum EditorResolver {
    /// URL template with `%file` and `%line` placeholders
    Template(String),
    Callable(ResolverFn),
}

impl EditorResolver {
    pub fn callable<F>(f: F) -> Self
    where
        F: Fn(&str, u32) -> Option<String> + Send + Sync + 'static,
    {
        Self::Callable(Arc::new(f))
    }
}

impl From<&str> for EditorResolver {
    fn from(s: &str) -> Self {
        Self::Template(s.to_string())
    }
}

impl From<String> for EditorResolver {
    fn from(s: String) -> Self {
        Self::Template(s)
    }
}

impl fmt::Debug for EditorResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Template(t) => f.debug_tuple("Template").field(t).finish(),
            Self::Callable(_) => write!(f, "Callable(<fn>)"),
        }
    }
}

/// Which editor produces links
#[derive(Clone)]
pub enum EditorSelector {
    /// A registered identifier
    Named(String),
    /// A resolver used directly, without registering it
    Callable(ResolverFn),
}

impl EditorSelector {
    pub fn callable<F>(f: F) -> Self
    where
        F: Fn(&str, u32) -> Option<String> + Send + Sync + 'static,
    {
        Self::Callable(Arc::new(f))
    }
}

impl From<&str> for EditorSelector {
    fn from(s: &str) -> Self {
        Self::Named(s.to_string())
    }
}

impl From<String> for EditorSelector {
    fn from(s: String) -> Self {
        Self::Named(s)
    }
}

impl fmt::Debug for EditorSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(id) => f.debug_tuple("Named").field(id).finish(),
            Self::Callable(_) => write!(f, "Callable(<fn>)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EditorResolverRegistry {
    editors: Vec<(String, EditorResolver)>,
    active: Option<EditorSelector>,
}

impl EditorResolverRegistry {
    /// Empty registry, no built-in editors
    pub fn new() -> Self {
        Self {
            editors: Vec::new(),
            active: None,
        }
    }

    /// Registry with the well-known editors. `file_link_format` is the
    /// debugger's file link setting when that extension is loaded; it adds
    /// the `xdebug` editor.
    pub fn with_builtin_editors(file_link_format: Option<String>) -> Self {
        let mut registry = Self::new();
        for (id, template) in builtin_editors() {
            registry.add_editor(*id, *template);
        }
        if let Some(format) = file_link_format {
            registry.add_editor("xdebug", xdebug_resolver(format));
        }
        registry
    }

    /// Register or replace an editor.
    pub fn add_editor(&mut self, identifier: impl Into<String>, resolver: impl Into<EditorResolver>) {
        let identifier = identifier.into();
        let resolver = resolver.into();
        debug!(editor = %identifier, "registered editor");
        match self.editors.iter_mut().find(|(id, _)| *id == identifier) {
            Some(slot) => slot.1 = resolver,
            None => self.editors.push((identifier, resolver)),
        }
    }

    /// Choose the editor used by [`resolve`](Self::resolve).
    pub fn set_active(&mut self, selector: impl Into<EditorSelector>) -> Result<()> {
        let selector = selector.into();
        if let EditorSelector::Named(id) = &selector {
            if !self.contains(id) {
                return Err(PageError::InvalidArgument(format!(
                    "Unknown editor identifier: {}. Known editors: {}",
                    id,
                    self.identifiers().join(", ")
                )));
            }
        }
        self.active = Some(selector);
        Ok(())
    }

    pub fn clear_active(&mut self) {
        self.active = None;
    }

    pub fn active(&self) -> Option<&EditorSelector> {
        self.active.as_ref()
    }

    /// Link for `path` at `line`, or `None` when no editor is active.
    pub fn resolve(&self, path: &str, line: u32) -> Result<Option<String>> {
        let Some(active) = &self.active else {
            return Ok(None);
        };

        let resolver = match active {
            EditorSelector::Named(id) => self.get(id).ok_or_else(|| {
                PageError::InvalidArgument(format!("Editor '{}' is no longer registered", id))
            })?,
            EditorSelector::Callable(f) => return Self::call(f, path, line).map(Some),
        };

        match resolver {
            EditorResolver::Template(template) => Ok(Some(substitute(template, path, line))),
            EditorResolver::Callable(f) => Self::call(f, path, line).map(Some),
        }
    }

    fn call(f: &ResolverFn, path: &str, line: u32) -> Result<String> {
        let href = f(path, line).ok_or_else(|| {
            PageError::InvalidArgument(
                "EditorResolverRegistry::resolve should always resolve to a string; got something else instead"
                    .into(),
            )
        })?;
        Ok(substitute(&href, path, line))
    }

    pub fn get(&self, identifier: &str) -> Option<&EditorResolver> {
        self.editors
            .iter()
            .find(|(id, _)| id == identifier)
            .map(|(_, r)| r)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.get(identifier).is_some()
    }

    /// Known identifiers in registration order
    pub fn identifiers(&self) -> Vec<&str> {
        self.editors.iter().map(|(id, _)| id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.editors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.editors.is_empty()
    }
}

impl Default for EditorResolverRegistry {
    fn default() -> Self {
        Self::with_builtin_editors(None)
    }
}

/// Replace `%line` and `%file` with their raw-url-encoded values.
fn substitute(template: &str, path: &str, line: u32) -> String {
    template
        .replace("%line", &urlencoding::encode(&line.to_string()))
        .replace("%file", &urlencoding::encode(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitute_encodes_path() {
        assert_eq!(
            substitute("x://%file:%line", "/tmp/a b.rs", 7),
            "x://%2Ftmp%2Fa%20b.rs:7"
        );
    }

    #[test]
    fn test_substitute_leaves_unreserved_chars() {
        assert_eq!(substitute("%file", "a-b_c.d~e", 1), "a-b_c.d~e");
    }

    #[test]
    fn test_template_without_placeholders() {
        assert_eq!(substitute("http://example.com", "/x", 1), "http://example.com");
    }
}
