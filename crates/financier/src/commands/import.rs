//! `financier import` command implementation.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use financier_document::{Document, Resource, image_reference, mime_for_path};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the import command.
#[derive(Args)]
pub(crate) struct ImportArgs {
    /// Path to the document file.
    file: PathBuf,

    /// Images to embed (PNG or JPEG).
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// Append the image snippets to the document's markdown.
    #[arg(short, long)]
    append: bool,
}

impl ImportArgs {
    /// Execute the import command.
    ///
    /// # Errors
    ///
    /// Returns an error if an image has an unsupported type or any file
    /// cannot be read or written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let mut document = Document::load(&self.file)?;

        let snippets = import_images(&mut document, &self.images)?;
        if self.append {
            document.append_markdown(&snippets.join("\n"));
        }
        document.save(&self.file)?;

        let mut stdout = std::io::stdout().lock();
        for snippet in &snippets {
            writeln!(stdout, "{snippet}")?;
        }
        output.success(&format!(
            "Imported {} image(s) into {}",
            snippets.len(),
            self.file.display()
        ));
        Ok(())
    }
}

/// Add each image as a resource and return its markdown snippet.
///
/// All types are checked before anything is added.
fn import_images(document: &mut Document, images: &[PathBuf]) -> Result<Vec<String>, CliError> {
    let typed = images
        .iter()
        .map(|path| Ok((path.as_path(), mime_for_path(path)?)))
        .collect::<Result<Vec<(&Path, &str)>, CliError>>()?;

    let mut snippets = Vec::with_capacity(typed.len());
    for (path, mime) in typed {
        let bytes = std::fs::read(path)?;
        let id = document.resources.add(Resource::from_bytes(bytes, mime));
        tracing::info!(path = %path.display(), id = %id, "Imported resource");
        snippets.push(image_reference(&id));
    }
    Ok(snippets)
}
