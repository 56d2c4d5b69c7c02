//! Revision command
//!
//! Usage: emlpub revision next <PACKAGE_ID>

use clap::{Args, Subcommand};
use emlpub_core::eml::increment_revision;

#[derive(Debug, Args)]
pub struct RevisionArgs {
    #[command(subcommand)]
    pub command: RevisionCommand,
}

#[derive(Debug, Subcommand)]
pub enum RevisionCommand {
    /// Print the identifier with its revision incremented
    Next {
        /// Package identifier, e.g. edi.1047.5
        package_id: String,
    },
}

pub fn execute(args: RevisionArgs) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        RevisionCommand::Next { package_id } => {
            println!("{}", increment_revision(&package_id)?);
            Ok(())
        }
    }
}
