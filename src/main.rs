use clap::Parser;
use guiport::cli::{Cli, Commands};
use guiport::output::Printer;
use miette::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let printer = Printer::new();

    match cli.command {
        Commands::Export(args) => guiport::cli::export::run(args, &printer)?,
        Commands::Init(args) => guiport::cli::init::run(args, &printer)?,
        Commands::Validate(args) => guiport::cli::validate::run(args, &printer)?,
        Commands::Completions(args) => guiport::cli::completions::run(args)?,
    }

    Ok(())
}
