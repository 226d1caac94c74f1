//! `financier render` command implementation.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use financier_config::{CliSettings, Config};
use financier_document::Document;
use financier_renderer::{Highlighter, NoHighlight, SyntectHighlighter, escape_html};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Document (`.json`) or plain markdown file.
    file: PathBuf,

    /// Output file (default: stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover financier.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write only the rendered body, without the page wrapper.
    #[arg(long)]
    fragment: bool,

    /// Disable syntax highlighting.
    #[arg(long)]
    no_highlight: bool,

    /// Disable GitHub Flavored Markdown extensions.
    #[arg(long)]
    no_gfm: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if the config or input cannot be loaded, or the
    /// output cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            gfm: self.no_gfm.then_some(false),
            highlight: self.no_highlight.then_some(false),
            standalone: self.fragment.then_some(false),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        if let Some(path) = &config.config_path {
            tracing::info!(path = %path.display(), "Loaded configuration");
        }

        let document = load_input(&self.file)?;

        let syntect;
        let highlighter: &dyn Highlighter = if config.render.highlight {
            syntect = SyntectHighlighter::new();
            &syntect
        } else {
            &NoHighlight
        };

        let body = document
            .parser()
            .with_gfm(config.render.gfm)
            .with_highlighter(highlighter)
            .parse(&document.markdown);

        let html = if config.output.standalone {
            standalone_page(&document, &config.output.class, &body)
        } else {
            body
        };

        match &self.output {
            Some(path) => {
                std::fs::write(path, html)?;
                output.success(&format!("Rendered {}", path.display()));
            }
            None => std::io::stdout().lock().write_all(html.as_bytes())?,
        }
        Ok(())
    }
}

/// Load a document file, or wrap a plain markdown file in a document.
fn load_input(path: &Path) -> Result<Document, CliError> {
    let is_document = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_document {
        return Ok(Document::load(path)?);
    }

    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut document = Document::new(name);
    document.markdown = std::fs::read_to_string(path)?;
    Ok(document)
}

/// Wrap a rendered body in a full HTML page.
fn standalone_page(document: &Document, class: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{title}</title>\n\
         <style>\n{css}\n</style>\n\
         </head>\n\
         <body>\n\
         <div class=\"{class}\">{body}</div>\n\
         </body>\n\
         </html>\n",
        title = escape_html(&document.name),
        css = document.css,
    )
}
