use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tether",
    about = "Hook store and missing-reference scanner",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Project root containing tether.toml and the hooks directory
    #[arg(long, global = true, default_value = ".")]
    pub project_root: PathBuf,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create the hooks directory and its fixed categories
    Init,
    /// Store a JSON value under a category
    Put(PutArgs),
    /// Print a stored record
    Get(KeyArgs),
    /// Check whether a record exists
    Exists(KeyArgs),
    /// Delete a record
    Rm(KeyArgs),
    /// List records in a category
    Ls(LsArgs),
    /// Remove temp files left by interrupted writes
    Sweep,
    /// Scan a scene description for missing references
    Scan(ScanArgs),
    /// Scan an asset outside the active scene
    ScanAsset(ScanAssetArgs),
    /// Show a saved scan report
    Report(ReportArgs),
}

#[derive(Args)]
pub struct KeyArgs {
    pub category: String,
    pub filename: String,
}

#[derive(Args)]
pub struct PutArgs {
    pub category: String,
    pub filename: String,
    /// JSON value to store
    pub value: String,
}

#[derive(Args)]
pub struct LsArgs {
    pub category: String,
}

#[derive(Args)]
pub struct ScanArgs {
    /// Scene description file (JSON)
    pub scene: PathBuf,
    /// Scan only this object path, e.g. "Level/Enemies"
    #[arg(long)]
    pub object: Option<String>,
    /// Do not descend into children of --object
    #[arg(long, requires = "object")]
    pub no_children: bool,
    /// Save the report as validation/<NAME>.json
    #[arg(long)]
    pub save: Option<String>,
    /// Exit with an error if any error-severity finding is reported
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args)]
pub struct ScanAssetArgs {
    pub identifier: String,
    #[arg(long)]
    pub save: Option<String>,
}

#[derive(Args)]
pub struct ReportArgs {
    pub name: String,
}
