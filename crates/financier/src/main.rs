//! Financier CLI - markdown document editor.
//!
//! Provides commands for:
//! - `new`: Create an empty document
//! - `import`: Embed images as document resources
//! - `resources list|remove`: Manage embedded resources
//! - `render`: Render a document to numbered HTML

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ImportArgs, NewArgs, RenderArgs, ResourcesCommand};
use output::Output;

/// Financier - markdown documents with numbered figures and cross-references.
#[derive(Parser)]
#[command(name = "financier", version, about)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty document.
    New(NewArgs),
    /// Embed images in a document.
    Import(ImportArgs),
    /// Document resource commands.
    #[command(subcommand)]
    Resources(ResourcesCommand),
    /// Render a document to HTML.
    Render(RenderArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::New(args) => args.execute(),
        Commands::Import(args) => args.execute(),
        Commands::Resources(cmd) => cmd.execute(),
        Commands::Render(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
