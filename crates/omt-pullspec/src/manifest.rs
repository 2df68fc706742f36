//! Operator manifest loading, classification, and writing

use crate::error::{Error, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde_yaml_ng::Value;
use std::fs;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Kubernetes kind identifying an operator ClusterServiceVersion document
pub const CSV_KIND: &str = "ClusterServiceVersion";

/// File extensions recognized as manifest documents
const MANIFEST_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// One parsed manifest document plus its source path and detected kind.
///
/// Non-CSV documents are loaded so callers can account for them, but only
/// CSV documents are ever scanned or mutated.
#[derive(Debug, Clone)]
pub struct OperatorManifest {
    /// Path the document was read from (and is written back to by default)
    pub path: Utf8PathBuf,
    /// Value of the document's `kind` field, when present
    pub kind: Option<String>,
    /// The parsed document tree
    pub data: Value,
}

impl OperatorManifest {
    /// Parse a manifest from YAML content.
    pub fn from_yaml(path: impl Into<Utf8PathBuf>, content: &str) -> Result<Self> {
        let data: Value = serde_yaml_ng::from_str(content)?;
        let kind = data
            .get("kind")
            .and_then(Value::as_str)
            .map(str::to_string);
        Ok(Self {
            path: path.into(),
            kind,
            data,
        })
    }

    /// Whether this document is an operator ClusterServiceVersion.
    pub fn is_csv(&self) -> bool {
        self.kind.as_deref() == Some(CSV_KIND)
    }

    /// Serialize the document back to disk, preserving mapping key order.
    ///
    /// Writes to `destination` when given, otherwise overwrites the source
    /// path. Makes no changed/unchanged judgement: callers that need to
    /// detect "nothing changed" must diff before and after.
    pub fn dump(&self, destination: Option<&Utf8Path>) -> Result<()> {
        let target = destination.unwrap_or_else(|| self.path.as_path());
        let content = serde_yaml_ng::to_string(&self.data)?;
        fs::write(target, content)?;
        debug!("wrote manifest {}", target);
        Ok(())
    }
}

/// Recursively load every manifest document under `dir`.
///
/// Files that fail to read or parse are skipped with a warning; the call
/// fails with [`Error::NoManifestsFound`] only when nothing parses at all.
/// Results are ordered lexicographically by path so extraction and
/// replacement output is reproducible across runs.
pub fn load_directory(dir: &Utf8Path) -> Result<Vec<OperatorManifest>> {
    if !dir.is_dir() {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("manifest directory not found: {dir}"),
        )));
    }

    let mut paths: Vec<Utf8PathBuf> = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("skipping unreadable entry under {}: {}", dir, e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(path) = Utf8PathBuf::try_from(entry.into_path()) else {
            warn!("skipping non-UTF-8 path under {}", dir);
            continue;
        };
        let recognized = path
            .extension()
            .is_some_and(|ext| MANIFEST_EXTENSIONS.contains(&ext));
        if recognized {
            paths.push(path);
        }
    }
    paths.sort();

    let mut manifests = Vec::new();
    for path in paths {
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!("skipping {}: {}", path, e);
                continue;
            }
        };
        match OperatorManifest::from_yaml(path.clone(), &content) {
            Ok(manifest) => {
                debug!(
                    "loaded {} (kind: {})",
                    manifest.path,
                    manifest.kind.as_deref().unwrap_or("unknown")
                );
                manifests.push(manifest);
            }
            Err(e) => warn!("skipping {}: {}", path, e),
        }
    }

    if manifests.is_empty() {
        return Err(Error::no_manifests_found(dir));
    }
    Ok(manifests)
}
