//! `financier new` command implementation.

use std::path::PathBuf;

use clap::Args;
use financier_document::Document;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the new command.
#[derive(Args)]
pub(crate) struct NewArgs {
    /// Path of the document file to create.
    file: PathBuf,

    /// Document name (default: file stem).
    #[arg(short, long)]
    name: Option<String>,

    /// Overwrite an existing file.
    #[arg(short, long)]
    force: bool,
}

impl NewArgs {
    /// Execute the new command.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists (without `--force`) or cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        if self.file.exists() && !self.force {
            return Err(CliError::Validation(format!(
                "{} already exists (use --force to overwrite)",
                self.file.display()
            )));
        }

        let name = self.name.unwrap_or_else(|| {
            self.file
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default()
        });
        Document::new(name).save(&self.file)?;

        output.success(&format!("Created {}", self.file.display()));
        Ok(())
    }
}
