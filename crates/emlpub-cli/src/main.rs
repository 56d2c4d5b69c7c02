//! emlpub CLI
//!
//! Command-line interface for publishing EML data packages

use clap::{Parser, Subcommand};
use emlpub_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "emlpub")]
#[command(about = "emlpub - publish data tables and their EML metadata", long_about = None)]
struct Cli {
    /// Log pipeline events to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Export data and republish the latest metadata document of a package
    Publish(commands::publish::PublishArgs),
    /// Package identifier revisions
    Revision(commands::revision::RevisionArgs),
    /// Edit a local EML file
    Eml(commands::eml::EmlArgs),
    /// Talk to the data repository
    Repo(commands::repo::RepoArgs),
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        init(Profile::Development);
    }

    let result = match cli.command {
        Commands::Publish(args) => commands::publish::execute(args),
        Commands::Revision(args) => commands::revision::execute(args),
        Commands::Eml(args) => commands::eml::execute(args),
        Commands::Repo(args) => commands::repo::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
