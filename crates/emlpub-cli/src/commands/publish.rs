//! Publish command
//!
//! Usage: emlpub publish --package-number <N> --sql <FILE> [--bump-revision]

use clap::Args;
use emlpub_engine::commands::publish::DEFAULT_CSV_NAME;
use emlpub_engine::{initialize_pipe, publish_package, PipeSettings, PublishRequest};
use emlpub_store::sql::read_sql_from_file;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct PublishArgs {
    /// Package number; also the name of the package's blob container
    #[arg(long, env = "EMLPUB_PACKAGE_NUMBER")]
    pub package_number: String,

    /// File holding the export query
    #[arg(long, env = "EMLPUB__PIPELINE__QUERY_PATH")]
    pub sql: Option<PathBuf>,

    /// Blob storage root directory
    #[arg(long, env = "EMLPUB__STORAGE__ROOT", default_value = "./blobs")]
    pub storage_root: PathBuf,

    /// Public URL prefix of the blob storage
    #[arg(
        long,
        env = "EMLPUB__STORAGE__PUBLIC_BASE_URL",
        default_value = "http://localhost:7071/blobs"
    )]
    pub base_url: String,

    /// SQLite database the data is exported from
    #[arg(long, env = "EMLPUB__DATABASE__PATH", default_value = "./emlpub.db")]
    pub db: PathBuf,

    /// Stem of the exported CSV blob (data/<NAME>.csv)
    #[arg(long, default_value = DEFAULT_CSV_NAME)]
    pub csv_name: String,

    /// Increment the package identifier revision before writing
    #[arg(long)]
    pub bump_revision: bool,

    /// Print the outcome as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: PublishArgs) -> Result<(), Box<dyn std::error::Error>> {
    let sql_path = args
        .sql
        .ok_or("no query file given (use --sql or EMLPUB__PIPELINE__QUERY_PATH)")?;
    let query = read_sql_from_file(&sql_path)?;

    let pipe = initialize_pipe(&PipeSettings {
        package_number: args.package_number,
        storage_root: args.storage_root,
        public_base_url: args.base_url,
        database_path: args.db,
    })?;

    let request = PublishRequest::new(query)
        .with_csv_name(args.csv_name)
        .with_bump_revision(args.bump_revision);
    let outcome = publish_package(&pipe, &request)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    println!("✓ Published {}", outcome.package_id);
    println!("  data:     {} ({} rows, {} bytes)", outcome.data_url, outcome.row_count, outcome.csv_size);
    println!("  source:   {}", outcome.source_xml_url);
    println!("  metadata: {}", outcome.published_xml_url);
    for path in &outcome.replacements.skipped {
        eprintln!("warning: {} not found in document, left unchanged", path);
    }
    Ok(())
}
