//! Error types for omt-pullspec

use camino::Utf8PathBuf;
use thiserror::Error;

/// Result type alias using omt-pullspec's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the pull-spec pipeline
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// Image reference string failed to parse
    #[error(transparent)]
    MalformedReference(#[from] omt_image::MalformedReference),

    /// Directory scan yielded zero usable manifests
    #[error("no operator manifests found in {dir}")]
    NoManifestsFound { dir: Utf8PathBuf },

    /// A replacement mapping entry failed to parse before any mutation
    #[error("invalid replacement entry {value:?}: {message}")]
    Replacement { value: String, message: String },

    /// Related-image name derivation produced no usable name
    #[error("cannot derive a related-image name from {source_name:?} for {image}")]
    NameCollision { source_name: String, image: String },

    /// A located pull-spec path no longer holds the expected value
    #[error("stale pull-spec location {path} in {file}: expected {expected:?}, found {found:?}")]
    StaleLocation {
        path: String,
        file: Utf8PathBuf,
        expected: String,
        found: String,
    },

    /// CSV document is missing its spec section
    #[error("manifest {file} has no spec section")]
    MissingSpec { file: Utf8PathBuf },
}

impl Error {
    /// Create a no-manifests-found error
    pub fn no_manifests_found(dir: impl Into<Utf8PathBuf>) -> Self {
        Self::NoManifestsFound { dir: dir.into() }
    }

    /// Create a replacement error for an unparsable mapping entry
    pub fn replacement(value: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Replacement {
            value: value.into(),
            message: message.into(),
        }
    }

    /// Create a name collision error
    pub fn name_collision(source: impl Into<String>, image: impl Into<String>) -> Self {
        Self::NameCollision {
            source_name: source.into(),
            image: image.into(),
        }
    }

    /// Create a stale location error
    pub fn stale_location(
        path: impl Into<String>,
        file: impl Into<Utf8PathBuf>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::StaleLocation {
            path: path.into(),
            file: file.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create a missing spec error
    pub fn missing_spec(file: impl Into<Utf8PathBuf>) -> Self {
        Self::MissingSpec { file: file.into() }
    }
}
