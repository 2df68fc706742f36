//! In-place pull-spec replacement

use crate::error::{Error, Result};
use crate::heuristic::ImageHeuristic;
use crate::locate::locate;
use crate::manifest::OperatorManifest;
use omt_image::ImageReference;
use serde_yaml_ng::Value;
use std::collections::HashMap;
use tracing::debug;

/// Parse a raw old→new replacement mapping up front.
///
/// A key or value that fails to parse is an [`Error::Replacement`], raised
/// before any manifest is mutated.
pub fn parse_replacements(
    raw: &HashMap<String, String>,
) -> Result<HashMap<ImageReference, ImageReference>> {
    let mut mapping = HashMap::with_capacity(raw.len());
    for (old, new) in raw {
        let old_ref =
            ImageReference::parse(old).map_err(|e| Error::replacement(old, e.reason))?;
        let new_ref =
            ImageReference::parse(new).map_err(|e| Error::replacement(new, e.reason))?;
        mapping.insert(old_ref, new_ref);
    }
    Ok(mapping)
}

/// Rewrite every located pull spec whose reference is a key in `mapping`.
///
/// Runs the locator fresh, so all occurrences of one old reference are
/// rewritten identically in a single call. Unmatched locations are left
/// untouched; partial mappings are legal. Returns the number of rewritten
/// locations.
pub fn replace_everywhere(
    manifest: &mut OperatorManifest,
    mapping: &HashMap<ImageReference, ImageReference>,
    heuristic: &dyn ImageHeuristic,
) -> Result<usize> {
    let mut replaced = 0;
    for spec in locate(manifest, heuristic) {
        let Some(new_image) = mapping.get(&spec.image) else {
            continue;
        };
        let expected = spec.image.to_string();

        // Re-read the tree position instead of trusting the located value.
        let Some(node) = spec.path.resolve_mut(&mut manifest.data) else {
            return Err(Error::stale_location(
                spec.path.to_string(),
                manifest.path.clone(),
                expected,
                "<missing>",
            ));
        };
        match node.as_str() {
            Some(current) if current == expected => {}
            other => {
                let found = other.unwrap_or("<not a string>").to_string();
                return Err(Error::stale_location(
                    spec.path.to_string(),
                    manifest.path.clone(),
                    expected,
                    found,
                ));
            }
        }

        let rendered = new_image.to_string();
        debug!("{}: {} -> {}", spec.path, expected, rendered);
        *node = Value::String(rendered);
        replaced += 1;
    }
    Ok(replaced)
}
