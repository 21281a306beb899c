pub mod completions;
pub mod export;
pub mod init;
pub mod validate;

use clap::{Parser, Subcommand};

/// guiport - Design-tool to game GUI scene exporter
#[derive(Parser, Debug)]
#[command(name = "guiport")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export design documents as .gui scenes
    Export(export::ExportArgs),

    /// Initialize a guiport project (generates guiport.yaml)
    Init(init::InitArgs),

    /// Export in memory and report problems without writing files
    Validate(validate::ValidateArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}
