//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// omt - Extract and replace image references in operator CSV bundles
#[derive(Parser, Debug)]
#[command(name = "omt")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Identify all image references in the CSVs found in a manifest directory
    Extract(ExtractArgs),

    /// Rewrite image references in the CSVs based on a replacements file
    Replace(ReplaceArgs),
}

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Directory containing the operator bundle manifests
    pub manifest_dir: Utf8PathBuf,

    /// Where to write the extracted references as JSON (- for stdout)
    #[arg(short, long, default_value = "-")]
    pub output: String,

    /// Only report container image fields, ignoring env-var heuristics
    #[arg(long)]
    pub direct_only: bool,

    /// Regex for env-var names to treat as image references, replacing
    /// the default RELATED_IMAGE_*/*_IMAGE convention
    #[arg(long, conflicts_with = "direct_only")]
    pub env_pattern: Option<String>,
}

#[derive(Args, Debug)]
pub struct ReplaceArgs {
    /// Directory containing the operator bundle manifests
    pub manifest_dir: Utf8PathBuf,

    /// JSON object mapping old image references to new ones (- for stdin)
    pub replacements_file: String,

    /// Run replacement and reconciliation in memory without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Only rewrite container image fields, ignoring env-var heuristics
    #[arg(long)]
    pub direct_only: bool,

    /// Regex for env-var names to treat as image references, replacing
    /// the default RELATED_IMAGE_*/*_IMAGE convention
    #[arg(long, conflicts_with = "direct_only")]
    pub env_pattern: Option<String>,
}
