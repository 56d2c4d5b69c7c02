//! EML file commands
//!
//! Usage:
//!   emlpub eml set --file <F> --path <P> --value <V> [--path <P> --value <V>]... [--out <O>]
//!   emlpub eml package-id --file <F> [--set <ID> | --bump | --revision] [--out <O>]
//!
//! `--path` accepts a dotted path or a short name such as `csv_url`.
//! Without `--out` the edited document goes to stdout.

use clap::{Args, Subcommand};
use emlpub_core::eml::{
    apply_replacements, increment_revision, known_paths, package_id, revision_of, set_package_id,
    Document, ReplacementSet,
};
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct EmlArgs {
    #[command(subcommand)]
    pub command: EmlCommand,
}

#[derive(Debug, Subcommand)]
pub enum EmlCommand {
    /// Replace the text of elements addressed by dotted paths
    Set(EmlSetArgs),
    /// Read or change the packageId of the eml:eml element
    PackageId(EmlPackageIdArgs),
}

#[derive(Debug, Args)]
pub struct EmlSetArgs {
    /// EML file to edit
    #[arg(short, long)]
    pub file: PathBuf,

    /// Dotted path (repeatable, paired with --value in order)
    #[arg(short, long = "path", required = true)]
    pub paths: Vec<String>,

    /// Replacement text (repeatable)
    #[arg(long = "value", required = true)]
    pub values: Vec<String>,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct EmlPackageIdArgs {
    /// EML file to read or edit
    #[arg(short, long)]
    pub file: PathBuf,

    /// New package identifier
    #[arg(long, conflicts_with = "bump")]
    pub set: Option<String>,

    /// Increment the current revision
    #[arg(long)]
    pub bump: bool,

    /// Print only the revision number of the current identifier
    #[arg(long, conflicts_with_all = ["set", "bump"])]
    pub revision: bool,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

pub fn execute(args: EmlArgs) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        EmlCommand::Set(set_args) => execute_set(set_args),
        EmlCommand::PackageId(id_args) => execute_package_id(id_args),
    }
}

fn load(path: &Path) -> Result<Document, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)?;
    Ok(Document::parse(&text)?)
}

fn emit(doc: &Document, out: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let xml = doc.to_xml_string()?;
    match out {
        Some(path) => {
            std::fs::write(path, xml)?;
            eprintln!("✓ Wrote {}", path.display());
        }
        None => print!("{}", xml),
    }
    Ok(())
}

fn execute_set(args: EmlSetArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.paths.len() != args.values.len() {
        return Err(format!(
            "{} --path arguments but {} --value arguments",
            args.paths.len(),
            args.values.len()
        )
        .into());
    }

    let mut replacements = ReplacementSet::new();
    for (path, value) in args.paths.iter().zip(args.values) {
        replacements.insert(known_paths::expand(path)?, value);
    }

    let mut doc = load(&args.file)?;
    let report = apply_replacements(&mut doc, &replacements);
    for err in report.skip_errors() {
        eprintln!("warning: {}, left unchanged", err);
    }

    emit(&doc, args.out.as_deref())
}

fn execute_package_id(args: EmlPackageIdArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut doc = load(&args.file)?;

    let new_id = match (args.set, args.bump) {
        (Some(id), _) => id,
        (None, true) => increment_revision(package_id(&doc)?)?,
        (None, false) => {
            let id = package_id(&doc)?;
            if args.revision {
                println!("{}", revision_of(id)?);
            } else {
                println!("{}", id);
            }
            return Ok(());
        }
    };

    set_package_id(&mut doc, &new_id)?;
    emit(&doc, args.out.as_deref())
}
