//! `financier resources` subcommand group.

use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use financier_document::{Document, DocumentError};

use crate::error::CliError;
use crate::output::Output;

/// Resource commands.
#[derive(Subcommand)]
pub(crate) enum ResourcesCommand {
    /// List embedded resources.
    List(ListArgs),
    /// Remove an embedded resource.
    Remove(RemoveArgs),
}

impl ResourcesCommand {
    /// Execute the resources subcommand.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        match self {
            Self::List(args) => args.execute(),
            Self::Remove(args) => args.execute(),
        }
    }
}

/// Arguments for the resources list command.
#[derive(Args)]
pub(crate) struct ListArgs {
    /// Path to the document file.
    file: PathBuf,
}

impl ListArgs {
    fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let document = Document::load(&self.file)?;

        if document.resources.is_empty() {
            output.info("No resources.");
            return Ok(());
        }

        let mut stdout = std::io::stdout().lock();
        for (id, resource) in document.resources.iter() {
            writeln!(
                stdout,
                "{id}\t{}\t{} bytes",
                resource.mime(),
                resource.bytes().len()
            )?;
        }
        Ok(())
    }
}

/// Arguments for the resources remove command.
#[derive(Args)]
pub(crate) struct RemoveArgs {
    /// Path to the document file.
    file: PathBuf,

    /// Identifier of the resource to remove.
    id: String,
}

impl RemoveArgs {
    fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let mut document = Document::load(&self.file)?;

        if !document.resources.remove(&self.id) {
            return Err(DocumentError::ResourceNotFound(self.id).into());
        }
        document.save(&self.file)?;

        output.success(&format!("Removed {}", self.id));
        Ok(())
    }
}
