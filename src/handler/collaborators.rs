//! Traits for the services the handler relies on but does not implement:
//! failure inspection, template execution, request data and runtime
//! capability detection.

use std::env;

use crate::core::{Result, Table};

use super::{Frame, RenderContext};

/// Executes the page template with the assembled context
pub trait TemplateExecutor {
    fn execute_template(&mut self, template: &str, context: &RenderContext<'_>) -> Result<()>;
}

/// Describes the failure being rendered
pub trait FailureInspector {
    /// Exception class or error kind
    fn exception_name(&self) -> &str;

    fn message(&self) -> &str;

    /// Stack frames, innermost first
    fn frames(&self) -> &[Frame];

    /// Names of the handlers registered on the surrounding run
    fn handlers(&self) -> &[String] {
        &[]
    }
}

/// Supplies the built-in request tables
pub trait RequestContext {
    /// Labeled tables in display order
    fn builtin_tables(&self) -> Vec<(String, Table)>;

    /// Whether the failure happened outside of a web request
    fn is_cli(&self) -> bool {
        false
    }
}

/// Detects optional runtime capabilities
pub trait CapabilityProbe {
    /// The debugger's file link format (`%f` / `%l` placeholders) when the
    /// file-link extension is active
    fn file_link_format(&self) -> Option<String>;
}

/// Probe that reports no capabilities
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCapabilities;

impl CapabilityProbe for NoCapabilities {
    fn file_link_format(&self) -> Option<String> {
        None
    }
}

/// Reads the file link format from an environment variable
#[derive(Debug, Clone)]
pub struct EnvCapabilityProbe {
    var: String,
}

impl EnvCapabilityProbe {
    pub const DEFAULT_VAR: &'static str = "XDEBUG_FILE_LINK_FORMAT";

    pub fn new(var: &str) -> Self {
        Self {
            var: var.to_string(),
        }
    }

    /// Read the configured variable through `lookup`; an empty value means
    /// the extension is not active
    pub fn read_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
        lookup(&self.var).filter(|format| !format.is_empty())
    }
}

impl Default for EnvCapabilityProbe {
    fn default() -> Self {
        Self::new(Self::DEFAULT_VAR)
    }
}

impl CapabilityProbe for EnvCapabilityProbe {
    fn file_link_format(&self) -> Option<String> {
        self.read_with(|key| env::var(key).ok())
    }
}

/// Request data captured up front
#[derive(Debug, Clone, Default)]
pub struct StaticRequestContext {
    pub server: Table,
    pub get: Table,
    pub post: Table,
    pub files: Table,
    pub cookies: Table,
    /// `None` when no session was started
    pub session: Option<Table>,
    pub env: Table,
    pub cli: bool,
}

impl StaticRequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context for a command-line run with the process environment filled in
    pub fn from_process() -> Self {
        Self {
            env: env::vars().collect(),
            server: env::args()
                .enumerate()
                .map(|(i, arg)| (format!("argv[{}]", i), arg))
                .collect(),
            cli: true,
            ..Self::default()
        }
    }
}

impl RequestContext for StaticRequestContext {
    fn builtin_tables(&self) -> Vec<(String, Table)> {
        vec![
            ("Server/Request Data".to_string(), self.server.clone()),
            ("GET Data".to_string(), self.get.clone()),
            ("POST Data".to_string(), self.post.clone()),
            ("Files".to_string(), self.files.clone()),
            ("Cookies".to_string(), self.cookies.clone()),
            ("Session".to_string(), self.session.clone().unwrap_or_default()),
            ("Environment Variables".to_string(), self.env.clone()),
        ]
    }

    fn is_cli(&self) -> bool {
        self.cli
    }
}
