//! High-level extract / replace operations over a manifest directory

use crate::error::Result;
use crate::heuristic::ImageHeuristic;
use crate::locate::locate;
use crate::manifest::load_directory;
use crate::related::reconcile_related_images;
use crate::replace::{parse_replacements, replace_everywhere};
use camino::Utf8Path;
use std::collections::HashMap;
use tracing::{debug, info};

/// Outcome of a replacement pass over a directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplaceSummary {
    /// CSV manifests processed
    pub manifests: usize,
    /// Total pull-spec locations rewritten
    pub replaced: usize,
}

/// Render every pull spec found in the CSVs under `dir`, in deterministic
/// order (manifests lexicographic by path, locations direct-then-heuristic
/// in tree order).
pub fn extract_pull_specs(dir: &Utf8Path, heuristic: &dyn ImageHeuristic) -> Result<Vec<String>> {
    info!("extracting image references from {}", dir);
    let manifests = load_directory(dir)?;

    let mut references = Vec::new();
    for manifest in &manifests {
        for spec in locate(manifest, heuristic) {
            references.push(spec.image.to_string());
        }
    }
    Ok(references)
}

/// Rewrite pull specs in every CSV under `dir` per the old→new `replacements`
/// strings, then rebuild each CSV's related-images list.
///
/// The raw mapping is parsed before anything is loaded, so an unparsable
/// entry fails the whole call with no file touched. With `dry_run` the full
/// pipeline runs in memory and the writer step is skipped.
pub fn replace_pull_specs(
    dir: &Utf8Path,
    replacements: &HashMap<String, String>,
    heuristic: &dyn ImageHeuristic,
    dry_run: bool,
) -> Result<ReplaceSummary> {
    let mapping = parse_replacements(replacements)?;
    let mut manifests = load_directory(dir)?;

    let mut summary = ReplaceSummary {
        manifests: 0,
        replaced: 0,
    };
    for manifest in &mut manifests {
        if !manifest.is_csv() {
            continue;
        }
        let replaced = replace_everywhere(manifest, &mapping, heuristic)?;
        reconcile_related_images(manifest, heuristic)?;
        summary.manifests += 1;
        summary.replaced += replaced;

        if dry_run {
            debug!("dry run enabled, not writing {}", manifest.path);
            continue;
        }
        manifest.dump(None)?;
    }

    info!(
        "replaced {} pull specs across {} manifests in {}",
        summary.replaced, summary.manifests, dir
    );
    Ok(summary)
}
