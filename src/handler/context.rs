use std::path::Path;

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use crate::core::{Renderer, Result, Table, Value};

use super::{FailureInspector, PageHandler};

/// One stack frame of the failure
#[derive(Debug, Clone, Default, Serialize)]
pub struct Frame {
    pub file: Option<String>,
    pub line: Option<u32>,
    pub class: Option<String>,
    pub function: Option<String>,
    pub args: Vec<Value>,
}

impl Frame {
    pub fn new(file: &str, line: u32) -> Self {
        Self {
            file: Some(file.to_string()),
            line: Some(line),
            ..Self::default()
        }
    }

    pub fn function(mut self, function: &str) -> Self {
        self.function = Some(function.to_string());
        self
    }

    pub fn class(mut self, class: &str) -> Self {
        self.class = Some(class.to_string());
        self
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }
}

/// Everything known about the failure being rendered
#[derive(Debug, Clone, Default, Serialize)]
pub struct Inspection {
    /// Exception class or error kind
    pub name: String,
    pub message: String,
    pub frames: Vec<Frame>,
    /// Names of the handlers registered on the surrounding run
    pub handlers: Vec<String>,
}

impl Inspection {
    pub fn new(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            message: message.to_string(),
            ..Self::default()
        }
    }

    pub fn frame(mut self, frame: Frame) -> Self {
        self.frames.push(frame);
        self
    }

    pub fn handler(mut self, name: &str) -> Self {
        self.handlers.push(name.to_string());
        self
    }
}

impl FailureInspector for Inspection {
    fn exception_name(&self) -> &str {
        &self.name
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn frames(&self) -> &[Frame] {
        &self.frames
    }

    fn handlers(&self) -> &[String] {
        &self.handlers
    }
}

/// Variables handed to the page template.
///
/// Templates reach back into the handler through [`renderer_for`] and
/// [`editor_href`]; the serialized form carries only the data.
///
/// [`renderer_for`]: RenderContext::renderer_for
/// [`editor_href`]: RenderContext::editor_href
#[derive(Serialize)]
pub struct RenderContext<'a> {
    pub title: &'a str,
    pub name: &'a str,
    pub message: &'a str,
    pub frames: &'a [Frame],
    pub has_frames: bool,
    pub handlers: &'a [String],
    #[serde(serialize_with = "serialize_tables")]
    pub tables: Vec<(String, Table)>,
    /// Configured resources directory, or the relative `resources` search
    /// path when none is set
    pub resources: &'a Path,
    #[serde(skip)]
    pub handler: &'a PageHandler,
}

impl<'a> RenderContext<'a> {
    /// Renderer chosen by the handler's dump rules for `value`
    pub fn renderer_for(&self, value: &Value) -> Option<&'a Renderer> {
        self.handler.resolve_renderer(value)
    }

    /// Editor link for a file position; `None` when linking is disabled
    pub fn editor_href(&self, path: &str, line: u32) -> Result<Option<String>> {
        self.handler.editor_href(path, line)
    }

    /// Editor link for a frame, if it has a position
    pub fn frame_href(&self, frame: &Frame) -> Result<Option<String>> {
        match (&frame.file, frame.line) {
            (Some(file), Some(line)) => self.editor_href(file, line),
            _ => Ok(None),
        }
    }

    pub fn table(&self, label: &str) -> Option<&Table> {
        self.tables.iter().find(|(l, _)| l == label).map(|(_, t)| t)
    }
}

#[allow(clippy::ptr_arg)]
fn serialize_tables<S: Serializer>(
    tables: &Vec<(String, Table)>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(tables.len()))?;
    for (label, table) in tables {
        map.serialize_entry(label, table)?;
    }
    map.end()
}
