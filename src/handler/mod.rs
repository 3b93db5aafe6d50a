//! Pretty error page handler
//!
//! Owns the dump rules, data tables and editor registry, and wires them into
//! a [`RenderContext`] when a failure has to be displayed.

mod collaborators;
mod config;
mod context;

pub use collaborators::{
    CapabilityProbe, EnvCapabilityProbe, FailureInspector, NoCapabilities, RequestContext,
    StaticRequestContext, TemplateExecutor,
};
pub use config::{DEFAULT_PAGE_TITLE, DEFAULT_TEMPLATE, HandlerConfig};
pub use context::{Frame, Inspection, RenderContext};

use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use tracing::{debug, info_span};

use crate::core::{PageError, Renderer, Result, Table, Value};
use crate::dispatch::{DispatchRegistry, MatchRule};
use crate::editor::{EditorResolver, EditorResolverRegistry, EditorSelector};
use crate::tables::{DataTableRegistry, TableEntry};

lazy_static! {
    /// Search path handed to the template executor when no resources
    /// directory is configured. It is relative, resolved by the executor
    /// against its own template root, and need not exist on disk.
    static ref DEFAULT_RESOURCES: PathBuf = PathBuf::from("resources");
}

/// What the surrounding run should do after the handler returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleOutcome {
    /// Nothing was rendered; let other handlers run
    Done,
    /// The page was rendered; stop handling
    Quit,
}

#[derive(Debug, Clone)]
pub struct PageHandler {
    config: HandlerConfig,
    dumpers: DispatchRegistry,
    tables: DataTableRegistry,
    editors: EditorResolverRegistry,
}

impl PageHandler {
    /// Handler with default configuration and no optional capabilities
    pub fn new() -> Self {
        Self::with_probe(&NoCapabilities)
    }

    /// Handler with default configuration, registering the debugger's editor
    /// when the probe reports it
    pub fn with_probe(probe: &dyn CapabilityProbe) -> Self {
        Self {
            config: HandlerConfig::new(),
            dumpers: DispatchRegistry::with_default_rules(),
            tables: DataTableRegistry::new(),
            editors: EditorResolverRegistry::with_builtin_editors(probe.file_link_format()),
        }
    }

    /// Build a handler from configuration. Fails when the resources path is
    /// not a directory or the configured editor is unknown.
    pub fn from_config(config: HandlerConfig, probe: &dyn CapabilityProbe) -> Result<Self> {
        config.validate()?;
        let mut handler = Self::with_probe(probe);
        if let Some(editor) = &config.editor {
            handler.set_editor(editor.as_str())?;
        }
        handler.config = config;
        Ok(handler)
    }

    // ========================================================================
    // Dump rules
    // ========================================================================

    /// Register extra dump rules; they take precedence over existing ones.
    pub fn add_rules(&mut self, rules: impl IntoIterator<Item = MatchRule>) -> Result<()> {
        self.dumpers.add_rules(rules)
    }

    /// Renderer for a displayed value
    pub fn resolve_renderer(&self, value: &Value) -> Option<&Renderer> {
        self.dumpers.resolve(value)
    }

    pub fn dumpers(&self) -> &DispatchRegistry {
        &self.dumpers
    }

    // ========================================================================
    // Data tables
    // ========================================================================

    pub fn add_table(&mut self, label: &str, table: Table) -> Result<()> {
        self.tables.add_table(label, table)
    }

    pub fn add_table_producer<F>(&mut self, label: &str, producer: F) -> Result<()>
    where
        F: Fn() -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.tables.add_table_producer(label, producer)
    }

    /// Entry registered under `label`, producers unforced
    pub fn get_tables(&self, label: &str) -> Option<&TableEntry> {
        self.tables.get_tables(label)
    }

    pub fn tables(&self) -> &DataTableRegistry {
        &self.tables
    }

    // ========================================================================
    // Editors
    // ========================================================================

    pub fn add_editor(&mut self, identifier: &str, resolver: impl Into<EditorResolver>) {
        self.editors.add_editor(identifier, resolver);
    }

    pub fn set_editor(&mut self, selector: impl Into<EditorSelector>) -> Result<()> {
        self.editors.set_active(selector)
    }

    /// Link for a file position, or `None` when no editor is active
    pub fn editor_href(&self, path: &str, line: u32) -> Result<Option<String>> {
        self.editors.resolve(path, line)
    }

    pub fn editors(&self) -> &EditorResolverRegistry {
        &self.editors
    }

    // ========================================================================
    // Page settings
    // ========================================================================

    pub fn page_title(&self) -> &str {
        &self.config.page_title
    }

    pub fn set_page_title(&mut self, title: &str) {
        self.config.page_title = title.to_string();
    }

    /// Configured resources directory, if any
    pub fn resources_path(&self) -> Option<&Path> {
        self.config.resources_path.as_deref()
    }

    pub fn set_resources_path(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        if !path.is_dir() {
            return Err(PageError::InvalidArgument(format!(
                "{} is not a valid directory",
                path.display()
            )));
        }
        self.config.resources_path = Some(path);
        Ok(())
    }

    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Assemble the page context for the inspected failure and run the
    /// template.
    ///
    /// Producers registered as data tables run here, once per call. A broken
    /// producer shows up as an empty table; template errors propagate.
    pub fn handle(
        &self,
        inspector: &dyn FailureInspector,
        request: &dyn RequestContext,
        executor: &mut dyn TemplateExecutor,
    ) -> Result<HandleOutcome> {
        if request.is_cli() && !self.config.render_in_cli {
            debug!("command-line run, skipping error page");
            return Ok(HandleOutcome::Done);
        }

        let span = info_span!("render_error_page", name = %inspector.exception_name());
        let _guard = span.enter();

        let context = self.render_context(inspector, request);
        executor.execute_template(&self.config.template, &context)?;
        Ok(HandleOutcome::Quit)
    }

    /// The context [`handle`](Self::handle) passes to the template
    pub fn render_context<'a>(
        &'a self,
        inspector: &'a dyn FailureInspector,
        request: &dyn RequestContext,
    ) -> RenderContext<'a> {
        let frames = inspector.frames();
        RenderContext {
            title: &self.config.page_title,
            name: inspector.exception_name(),
            message: inspector.message(),
            frames,
            has_frames: !frames.is_empty(),
            handlers: inspector.handlers(),
            tables: self.tables.merged_with(request.builtin_tables()),
            resources: self.resources_path().unwrap_or(DEFAULT_RESOURCES.as_path()),
            handler: self,
        }
    }
}

impl Default for PageHandler {
    fn default() -> Self {
        Self::new()
    }
}
