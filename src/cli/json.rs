use std::io::Write;

use prettypage::{PageError, RenderContext, Result, TemplateExecutor};
use serde_json::{Map, Value as Json, json};

/// Writes the render context as JSON instead of running a real template.
///
/// Each frame gains its editor `href` and the renderer picked for every
/// argument, which is what an HTML template would ask the handler for.
pub struct JsonTemplateExecutor<W: Write> {
    out: W,
    pretty: bool,
}

impl<W: Write> JsonTemplateExecutor<W> {
    pub fn new(out: W, pretty: bool) -> Self {
        Self { out, pretty }
    }
}

impl<W: Write> TemplateExecutor for JsonTemplateExecutor<W> {
    fn execute_template(&mut self, template: &str, context: &RenderContext<'_>) -> Result<()> {
        let mut frames = Vec::with_capacity(context.frames.len());
        for frame in context.frames {
            let mut entry = serde_json::to_value(frame)?;
            let renderers: Vec<Json> = frame
                .args
                .iter()
                .map(|arg| match context.renderer_for(arg) {
                    Some(renderer) => json!(renderer.as_str()),
                    None => Json::Null,
                })
                .collect();
            if let Json::Object(map) = &mut entry {
                map.insert("href".into(), json!(context.frame_href(frame)?));
                map.insert("arg_renderers".into(), Json::Array(renderers));
            }
            frames.push(entry);
        }

        let mut document = Map::new();
        document.insert("template".into(), json!(template));
        document.insert("context".into(), serde_json::to_value(context)?);
        document.insert("frames".into(), Json::Array(frames));
        let document = Json::Object(document);

        let text = if self.pretty {
            serde_json::to_string_pretty(&document)?
        } else {
            serde_json::to_string(&document)?
        };
        writeln!(self.out, "{}", text).map_err(|e| PageError::Template(e.to_string()))
    }
}
