//! Pull-spec location inside ClusterServiceVersion documents

use crate::heuristic::ImageHeuristic;
use crate::manifest::OperatorManifest;
use crate::path::TreePath;
use omt_image::ImageReference;
use serde_yaml_ng::Value;
use tracing::{debug, warn};

/// Whether a location is a schema-defined image field or a convention match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationKind {
    /// A container or init-container `image` field
    Direct,
    /// An environment-variable value matched by the installed heuristic
    Heuristic,
}

/// A position in a manifest's document tree holding an image reference.
///
/// Recomputed fresh on every locate pass; the path, not the cached
/// reference, is authoritative when mutating.
#[derive(Debug, Clone)]
pub struct LocatedPullSpec {
    /// Path to the scalar holding the rendered reference
    pub path: TreePath,
    /// The reference parsed from that scalar
    pub image: ImageReference,
    /// Direct field or heuristic match
    pub kind: LocationKind,
    /// Container name (direct) or env-var name (heuristic), for
    /// related-images name derivation
    pub source_name: String,
}

/// Pod-template container list keys searched for pull specs, in the order
/// their locations are reported.
const CONTAINER_KEYS: &[&str] = &["containers", "initContainers"];

/// Locate every pull spec in a manifest.
///
/// Deterministic and idempotent. Direct locations precede heuristic ones;
/// within each category, document tree order is preserved. Non-CSV
/// documents yield no locations.
pub fn locate(manifest: &OperatorManifest, heuristic: &dyn ImageHeuristic) -> Vec<LocatedPullSpec> {
    if !manifest.is_csv() {
        return Vec::new();
    }

    let deployments_path = TreePath::root()
        .key("spec")
        .key("install")
        .key("spec")
        .key("deployments");
    let Some(deployments) = deployments_path
        .resolve(&manifest.data)
        .and_then(Value::as_sequence)
    else {
        debug!("{} has no deployments", manifest.path);
        return Vec::new();
    };

    let mut direct = Vec::new();
    let mut heuristic_specs = Vec::new();

    for (di, deployment) in deployments.iter().enumerate() {
        for key in CONTAINER_KEYS {
            let containers_path = deployments_path
                .clone()
                .index(di)
                .key("spec")
                .key("template")
                .key("spec")
                .key(*key);
            let Some(containers) = deployment
                .get("spec")
                .and_then(|v| v.get("template"))
                .and_then(|v| v.get("spec"))
                .and_then(|v| v.get(*key))
                .and_then(Value::as_sequence)
            else {
                continue;
            };

            for (ci, container) in containers.iter().enumerate() {
                let container_path = containers_path.clone().index(ci);
                let container_name = container
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or_default();

                if let Some(image) = container.get("image").and_then(Value::as_str) {
                    match ImageReference::parse(image) {
                        Ok(reference) => direct.push(LocatedPullSpec {
                            path: container_path.clone().key("image"),
                            image: reference,
                            kind: LocationKind::Direct,
                            source_name: container_name.to_string(),
                        }),
                        Err(e) => {
                            warn!("{}: skipping unparsable image field: {}", manifest.path, e)
                        }
                    }
                }

                let Some(env) = container.get("env").and_then(Value::as_sequence) else {
                    continue;
                };
                for (ei, var) in env.iter().enumerate() {
                    let Some(name) = var.get("name").and_then(Value::as_str) else {
                        continue;
                    };
                    if !heuristic.matches_name(name) {
                        continue;
                    }
                    // valueFrom and friends have no literal value to rewrite
                    let Some(value) = var.get("value").and_then(Value::as_str) else {
                        continue;
                    };
                    match ImageReference::parse(value) {
                        Ok(reference) => heuristic_specs.push(LocatedPullSpec {
                            path: container_path.clone().key("env").index(ei).key("value"),
                            image: reference,
                            kind: LocationKind::Heuristic,
                            source_name: name.to_string(),
                        }),
                        Err(e) => {
                            debug!("{}: env var {} is not an image reference: {}", manifest.path, name, e)
                        }
                    }
                }
            }
        }
    }

    direct.extend(heuristic_specs);
    direct
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristic::{DefaultHeuristic, NoHeuristic};

    const CSV: &str = r#"
apiVersion: operators.coreos.com/v1alpha1
kind: ClusterServiceVersion
metadata:
  name: demo-operator.v1.0.0
spec:
  install:
    spec:
      deployments:
        - name: demo-operator
          spec:
            template:
              spec:
                containers:
                  - name: operator
                    image: registry.io/foo:1.0
                    env:
                      - name: RELATED_IMAGE_BAR
                        value: registry.io/bar:2.0
                      - name: WATCH_NAMESPACE
                        value: default
                      - name: BROKEN_IMAGE
                        value: "Not An Image"
                      - name: SECRET_IMAGE
                        valueFrom:
                          secretKeyRef:
                            name: images
                            key: secret
                initContainers:
                  - name: setup
                    image: registry.io/setup:0.1
"#;

    fn manifest() -> OperatorManifest {
        OperatorManifest::from_yaml("csv.yaml", CSV).unwrap()
    }

    #[test]
    fn test_direct_locations_precede_heuristic() {
        let specs = locate(&manifest(), &DefaultHeuristic);
        let rendered: Vec<String> = specs.iter().map(|s| s.image.to_string()).collect();
        assert_eq!(
            rendered,
            vec![
                "registry.io/foo:1.0",
                "registry.io/setup:0.1",
                "registry.io/bar:2.0",
            ]
        );
        assert_eq!(specs[0].kind, LocationKind::Direct);
        assert_eq!(specs[1].kind, LocationKind::Direct);
        assert_eq!(specs[2].kind, LocationKind::Heuristic);
        assert_eq!(specs[0].source_name, "operator");
        assert_eq!(specs[2].source_name, "RELATED_IMAGE_BAR");
    }

    #[test]
    fn test_paths_resolve_to_rendered_reference() {
        let m = manifest();
        for spec in locate(&m, &DefaultHeuristic) {
            let value = spec.path.resolve(&m.data).and_then(Value::as_str);
            assert_eq!(value, Some(spec.image.to_string().as_str()));
        }
    }

    #[test]
    fn test_unparsable_and_indirect_env_values_skipped() {
        let specs = locate(&manifest(), &DefaultHeuristic);
        assert!(specs.iter().all(|s| s.source_name != "BROKEN_IMAGE"));
        assert!(specs.iter().all(|s| s.source_name != "SECRET_IMAGE"));
    }

    #[test]
    fn test_no_heuristic_reports_direct_only() {
        let specs = locate(&manifest(), &NoHeuristic);
        assert_eq!(specs.len(), 2);
        assert!(specs.iter().all(|s| s.kind == LocationKind::Direct));
    }

    #[test]
    fn test_idempotent() {
        let m = manifest();
        let first: Vec<String> = locate(&m, &DefaultHeuristic)
            .iter()
            .map(|s| format!("{}={}", s.path, s.image))
            .collect();
        let second: Vec<String> = locate(&m, &DefaultHeuristic)
            .iter()
            .map(|s| format!("{}={}", s.path, s.image))
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_non_csv_yields_nothing() {
        let sa = OperatorManifest::from_yaml("sa.yaml", "kind: ServiceAccount\n").unwrap();
        assert!(locate(&sa, &DefaultHeuristic).is_empty());
    }
}
