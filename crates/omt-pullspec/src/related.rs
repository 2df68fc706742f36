//! Related-images reconciliation
//!
//! Rebuilds a CSV's `spec.relatedImages` summary list from the pull specs
//! currently present in the document. Must run strictly after replacement:
//! reconciling first would capture stale references.

use crate::error::{Error, Result};
use crate::heuristic::ImageHeuristic;
use crate::locate::{locate, LocationKind};
use crate::manifest::OperatorManifest;
use serde_yaml_ng::{Mapping, Value};
use tracing::debug;

/// Replace `spec.relatedImages` wholesale with the current unique pull specs.
///
/// Entry names come from the container name (direct locations) or the
/// env-var name with the heuristic marker stripped (heuristic locations).
/// Distinct references competing for one name get `-2`, `-3`, ... suffixes
/// in first-seen order. References are deduplicated by literal rendered
/// string; a tag form and an equivalent digest form stay separate entries.
pub fn reconcile_related_images(
    manifest: &mut OperatorManifest,
    heuristic: &dyn ImageHeuristic,
) -> Result<()> {
    if !manifest.is_csv() {
        return Ok(());
    }

    let mut entries: Vec<(String, String)> = Vec::new();
    // Ordered seen-lists keep disambiguation reproducible; a hash set alone
    // would tie naming to iteration order.
    let mut seen_images: Vec<String> = Vec::new();
    let mut taken_names: Vec<String> = Vec::new();

    for spec in locate(manifest, heuristic) {
        let image = spec.image.to_string();
        if seen_images.iter().any(|seen| *seen == image) {
            continue;
        }
        seen_images.push(image.clone());

        let candidate = match spec.kind {
            LocationKind::Direct => spec.source_name.clone(),
            LocationKind::Heuristic => heuristic.related_name(&spec.source_name),
        };
        if candidate.is_empty() {
            return Err(Error::name_collision(spec.source_name, image));
        }

        let name = disambiguate(&candidate, &taken_names);
        taken_names.push(name.clone());
        entries.push((name, image));
    }

    entries.sort_by(|a, b| a.0.cmp(&b.0));
    debug!(
        "{}: reconciled {} related images",
        manifest.path,
        entries.len()
    );

    let related = Value::Sequence(
        entries
            .into_iter()
            .map(|(name, image)| {
                let mut entry = Mapping::new();
                entry.insert(Value::from("name"), Value::from(name));
                entry.insert(Value::from("image"), Value::from(image));
                Value::Mapping(entry)
            })
            .collect(),
    );

    let path = manifest.path.clone();
    let spec_node = manifest
        .data
        .get_mut("spec")
        .and_then(Value::as_mapping_mut)
        .ok_or_else(|| Error::missing_spec(path))?;
    spec_node.insert(Value::from("relatedImages"), related);
    Ok(())
}

fn disambiguate(candidate: &str, taken: &[String]) -> String {
    if !taken.iter().any(|name| name == candidate) {
        return candidate.to_string();
    }
    let mut suffix = 2;
    loop {
        let name = format!("{candidate}-{suffix}");
        if !taken.iter().any(|taken_name| *taken_name == name) {
            return name;
        }
        suffix += 1;
    }
}
