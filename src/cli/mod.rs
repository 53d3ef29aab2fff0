//! Command-line interface.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "retrace", version, about = "Memorize web pages and chat over them")]
pub struct Cli {
    /// Output machine-readable JSON instead of tables.
    #[arg(long, global = true)]
    pub json: bool,

    /// Load configuration from a specific file instead of .retrace/.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server for the extension and desktop shell.
    Serve(commands::ServeArgs),
    /// Ingest a text file as a page.
    Memorize(commands::MemorizeArgs),
    /// List stored pages.
    Pages(commands::PagesArgs),
    /// Ask a question over the stored pages.
    Chat(commands::ChatArgs),
    /// Delete a stored page and its index entries.
    Forget(commands::ForgetArgs),
}

/// Print an error in the requested output format and exit non-zero.
pub fn handle_error(err: anyhow::Error, json: bool) -> ! {
    if json {
        eprintln!("{}", serde_json::json!({ "status": "error", "error": err.to_string() }));
    } else {
        eprintln!("error: {err:#}");
    }
    std::process::exit(1);
}
