//! Replace command

use crate::cli::ReplaceArgs;
use anyhow::{ensure, Context, Result};
use omt_pullspec::replace_pull_specs;
use std::collections::HashMap;
use std::io::Read;
use tracing::info;

/// Rewrite image references in the CSVs under the manifest directory
/// according to the replacements file, then rebuild each CSV's
/// relatedImages list.
pub fn run(args: ReplaceArgs) -> Result<()> {
    ensure!(
        args.manifest_dir.is_dir(),
        "manifest directory not found: {}",
        args.manifest_dir
    );

    let raw = read_replacements(&args.replacements_file)?;
    let replacements: HashMap<String, String> = serde_json::from_str(&raw)
        .context("replacements file is not a JSON object of image-reference strings")?;

    let heuristic = super::select_heuristic(args.direct_only, args.env_pattern.as_deref())?;

    let summary = replace_pull_specs(
        &args.manifest_dir,
        &replacements,
        heuristic.as_ref(),
        args.dry_run,
    )?;

    if args.dry_run {
        info!("dry run enabled, no manifests were written");
    }
    info!(
        "replaced {} pull specs across {} manifests in {}",
        summary.replaced, summary.manifests, args.manifest_dir
    );
    Ok(())
}

fn read_replacements(source: &str) -> Result<String> {
    if source == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read replacements from stdin")?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(source).with_context(|| format!("failed to read {source}"))
    }
}
