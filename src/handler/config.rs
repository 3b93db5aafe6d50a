use std::env;
use std::path::PathBuf;

use crate::core::{PageError, Result};

pub const DEFAULT_PAGE_TITLE: &str = "Whoops! There was an error.";
pub const DEFAULT_TEMPLATE: &str = "views/error.html.php";

/// Error page handler configuration
#[derive(Debug, Clone)]
pub struct HandlerConfig {
    /// Title shown at the top of the page
    pub page_title: String,

    /// Directory holding templates and assets; the template executor falls
    /// back to its relative `resources` search path when unset
    pub resources_path: Option<PathBuf>,

    /// Editor identifier activated when the handler is built
    pub editor: Option<String>,

    /// Render even when the request context reports a CLI run
    pub render_in_cli: bool,

    /// Entry template handed to the template executor
    pub template: String,
}

impl HandlerConfig {
    pub fn new() -> Self {
        Self {
            page_title: DEFAULT_PAGE_TITLE.to_string(),
            resources_path: None,
            editor: None,
            render_in_cli: false,
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }

    /// Set the page title
    pub fn page_title(mut self, title: &str) -> Self {
        self.page_title = title.to_string();
        self
    }

    /// Set the resources directory
    pub fn resources_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.resources_path = Some(path.into());
        self
    }

    /// Set the active editor
    pub fn editor(mut self, identifier: &str) -> Self {
        self.editor = Some(identifier.to_string());
        self
    }

    pub fn render_in_cli(mut self, enabled: bool) -> Self {
        self.render_in_cli = enabled;
        self
    }

    /// Set the entry template
    pub fn template(mut self, template: &str) -> Self {
        self.template = template.to_string();
        self
    }

    /// Read overrides from the environment
    ///
    /// - `PRETTYPAGE_TITLE`
    /// - `PRETTYPAGE_EDITOR`
    /// - `PRETTYPAGE_RESOURCES`
    /// - `PRETTYPAGE_RENDER_CLI` (`1`, `true`, `yes` or `on`)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with variables read through
    /// `lookup`. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let mut config = Self::new();
        if let Some(title) = var("PRETTYPAGE_TITLE") {
            config.page_title = title;
        }
        if let Some(editor) = var("PRETTYPAGE_EDITOR") {
            config.editor = Some(editor);
        }
        if let Some(path) = var("PRETTYPAGE_RESOURCES") {
            config.resources_path = Some(PathBuf::from(path));
        }
        if let Some(flag) = var("PRETTYPAGE_RENDER_CLI") {
            config.render_in_cli = matches!(
                flag.to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }
        config
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.template.trim().is_empty() {
            return Err(PageError::Configuration("Template cannot be empty".into()));
        }
        if let Some(path) = &self.resources_path {
            if !path.is_dir() {
                return Err(PageError::InvalidArgument(format!(
                    "{} is not a valid directory",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self::new()
    }
}
