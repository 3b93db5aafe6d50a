mod json;

use std::io;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use prettypage::handler::{EnvCapabilityProbe, NoCapabilities};
use prettypage::{
    CapabilityProbe, Frame, HandleOutcome, HandlerConfig, Inspection, Object, PageHandler,
    StaticRequestContext, Table, Value,
};

use json::JsonTemplateExecutor;

#[derive(Parser)]
#[command(name = "prettypage")]
#[command(about = "Render a sample error page context and inspect editor links")]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a synthetic failure and print the page context as JSON
    Render {
        #[arg(long)]
        editor: Option<String>,
        #[arg(long)]
        title: Option<String>,
        /// Extra table entry as LABEL=KEY:VALUE, may be repeated
        #[arg(long = "table")]
        tables: Vec<String>,
        /// Debugger file link format using %f and %l; read from
        /// XDEBUG_FILE_LINK_FORMAT when omitted
        #[arg(long)]
        file_link_format: Option<String>,
        #[arg(long)]
        pretty: bool,
    },
    /// List the known editor identifiers
    Editors {
        #[arg(long)]
        file_link_format: Option<String>,
    },
    /// Print the link an editor produces for a file position
    Href {
        #[arg(long)]
        editor: String,
        #[arg(long)]
        file: String,
        #[arg(long)]
        line: u32,
    },
}

/// Probe backed by a command-line value
struct FixedProbe(String);

impl CapabilityProbe for FixedProbe {
    fn file_link_format(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

fn probe_for(file_link_format: Option<String>) -> Box<dyn CapabilityProbe> {
    match file_link_format {
        Some(format) => Box::new(FixedProbe(format)),
        None => Box::new(EnvCapabilityProbe::default()),
    }
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Command::Render {
                editor,
                title,
                tables,
                file_link_format,
                pretty,
            } => render(editor, title, &tables, file_link_format, pretty),
            Command::Editors { file_link_format } => {
                let handler = PageHandler::with_probe(probe_for(file_link_format).as_ref());
                for id in handler.editors().identifiers() {
                    println!("{}", id);
                }
                Ok(())
            }
            Command::Href { editor, file, line } => {
                let mut handler = PageHandler::with_probe(&NoCapabilities);
                handler.set_editor(editor.as_str())?;
                match handler.editor_href(&file, line)? {
                    Some(href) => println!("{}", href),
                    None => bail!("editor '{}' produced no link", editor),
                }
                Ok(())
            }
        }
    }
}

fn render(
    editor: Option<String>,
    title: Option<String>,
    tables: &[String],
    file_link_format: Option<String>,
    pretty: bool,
) -> Result<()> {
    let mut config = HandlerConfig::from_env().render_in_cli(true);
    if let Some(editor) = editor {
        config = config.editor(&editor);
    }
    if let Some(title) = title {
        config = config.page_title(&title);
    }

    let probe = probe_for(file_link_format);
    let mut handler = PageHandler::from_config(config, probe.as_ref())?;

    for (label, table) in parse_tables(tables)? {
        handler.add_table(&label, table)?;
    }
    handler.add_table_producer("Process", || {
        Ok(Value::map([
            ("pid", Value::from(i64::from(std::process::id()))),
            ("cwd", Value::from(std::env::current_dir()?.display().to_string())),
        ]))
    })?;

    let inspection = sample_inspection();
    let request = StaticRequestContext::from_process();
    let mut executor = JsonTemplateExecutor::new(io::stdout().lock(), pretty);

    match handler.handle(&inspection, &request, &mut executor)? {
        HandleOutcome::Quit => Ok(()),
        HandleOutcome::Done => Err(anyhow!("error page was not rendered")),
    }
}

/// Group `LABEL=KEY:VALUE` arguments into tables, keeping first-seen order.
fn parse_tables(args: &[String]) -> Result<Vec<(String, Table)>> {
    let mut tables: Vec<(String, Table)> = Vec::new();
    for arg in args {
        let (label, entry) = arg
            .split_once('=')
            .with_context(|| format!("Table entry '{}' must look like LABEL=KEY:VALUE", arg))?;
        let (key, value) = entry
            .split_once(':')
            .with_context(|| format!("Table entry '{}' is missing ':' between key and value", arg))?;

        match tables.iter_mut().find(|(l, _)| l == label) {
            Some((_, table)) => table.insert(key, value),
            None => tables.push((label.to_string(), Table::new().with(key, value))),
        }
    }
    Ok(tables)
}

fn sample_inspection() -> Inspection {
    let handler = Object::new("Whoops\\Handler\\PrettyPageHandler")
        .implementing(prettypage::dispatch::HANDLER_INTERFACE)
        .with_property("pageTitle", "Whoops! There was an error.");

    Inspection::new("RuntimeException", "Something broke while handling the request")
        .frame(
            Frame::new("/srv/app/src/Controller/UserController.php", 42)
                .class("App\\Controller\\UserController")
                .function("show")
                .arg(7i64)
                .arg(Value::map([("include", "profile")])),
        )
        .frame(
            Frame::new("/srv/app/vendor/framework/Kernel.php", 118)
                .class("Framework\\Kernel")
                .function("handle")
                .arg(Object::new("Framework\\Request").with_property("path", "/users/7"))
                .arg(handler),
        )
        .handler("Whoops\\Handler\\PrettyPageHandler")
}
