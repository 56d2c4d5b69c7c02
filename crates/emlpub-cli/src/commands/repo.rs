//! Repository commands
//!
//! Usage: emlpub repo --package-number <N> <evaluate|report|upload|update|revisions> ...
//!
//! Credentials come from `--username`/`--password` or
//! `EMLPUB_REPO_USERNAME`/`EMLPUB_REPO_PASSWORD`.

use clap::{Args, Subcommand};
use emlpub_repository::{
    Credentials, Environment, EvaluationTicket, PackageRef, RepositoryClient,
};

#[derive(Debug, Args)]
pub struct RepoArgs {
    /// staging, development or production
    #[arg(long, env = "EMLPUB_REPO_ENVIRONMENT", default_value = "production")]
    pub environment: Environment,

    /// Override the API root (takes precedence over --environment)
    #[arg(long, env = "EMLPUB_REPO_BASE_URL")]
    pub base_url: Option<String>,

    #[arg(long, env = "EMLPUB_REPO_USERNAME")]
    pub username: String,

    #[arg(long, env = "EMLPUB_REPO_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Package scope
    #[arg(long, default_value = "edi")]
    pub scope: String,

    /// Package identifier within the scope
    #[arg(long, env = "EMLPUB_PACKAGE_NUMBER")]
    pub package_number: String,

    #[command(subcommand)]
    pub command: RepoCommand,
}

#[derive(Debug, Subcommand)]
pub enum RepoCommand {
    /// Submit a document for evaluation and print the transaction id
    Evaluate {
        /// URL the EML document can be downloaded from
        xml_url: String,
    },
    /// Print the report of an evaluation
    Report { transaction_id: String },
    /// Create the package from a document
    Upload { xml_url: String },
    /// Publish a document as a new revision of the package
    Update { xml_url: String },
    /// Print the newest revision of the package
    Revisions,
}

pub fn execute(args: RepoArgs) -> Result<(), Box<dyn std::error::Error>> {
    let credentials = Credentials::new(args.username, args.password);
    let package = PackageRef::new(args.scope, args.package_number);
    let client = match args.base_url.as_deref() {
        Some(base_url) => RepositoryClient::with_base_url(base_url, credentials, package)?,
        None => RepositoryClient::new(args.environment, credentials, package)?,
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let output = runtime.block_on(async {
        match args.command {
            RepoCommand::Evaluate { xml_url } => client
                .evaluate_package(&xml_url)
                .await
                .map(|ticket| ticket.transaction_id().to_string()),
            RepoCommand::Report { transaction_id } => {
                client
                    .evaluation_report(&EvaluationTicket::new(transaction_id))
                    .await
            }
            RepoCommand::Upload { xml_url } => client.upload_package(&xml_url).await,
            RepoCommand::Update { xml_url } => client.update_package(&xml_url).await,
            RepoCommand::Revisions => client.list_revisions().await,
        }
    })?;

    println!("{}", output);
    Ok(())
}
