//! Extract command

use crate::cli::ExtractArgs;
use anyhow::{Context, Result};
use omt_pullspec::extract_pull_specs;
use std::io::Write;
use tracing::info;

/// Extract image references from the CSVs under the manifest directory
/// and emit them as a JSON array.
pub fn run(args: ExtractArgs) -> Result<()> {
    let heuristic = super::select_heuristic(args.direct_only, args.env_pattern.as_deref())?;

    let references = extract_pull_specs(&args.manifest_dir, heuristic.as_ref())
        .with_context(|| format!("failed to extract image references from {}", args.manifest_dir))?;
    info!(
        "found {} image references in {}",
        references.len(),
        args.manifest_dir
    );

    let json = serde_json::to_string(&references)?;
    if args.output == "-" {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{json}")?;
    } else {
        std::fs::write(&args.output, json)
            .with_context(|| format!("failed to write {}", args.output))?;
    }

    Ok(())
}
