//! Environment-variable heuristics for detecting image references
//!
//! Operator manifests conventionally pass images to the operator binary via
//! environment variables. Which variable names count as image references is
//! a policy decision, so the detection rule is a trait the locator consumes
//! rather than an inline branch.

use regex::Regex;

/// Env-var name prefix conventionally marking a related image
pub const RELATED_IMAGE_PREFIX: &str = "RELATED_IMAGE_";

/// Env-var name suffix conventionally marking an image
pub const IMAGE_SUFFIX: &str = "_IMAGE";

/// Policy deciding which environment-variable names designate an image.
///
/// Implementations must be pure functions of the name: the locator calls
/// them on every locate pass and relies on their determinism.
pub trait ImageHeuristic: Send + Sync {
    /// Whether an env var with this name is expected to hold an image reference.
    fn matches_name(&self, name: &str) -> bool;

    /// Derive the related-images display name for a matched env var.
    ///
    /// May return an empty string when the name carries nothing beyond the
    /// convention marker; the reconciler treats that as a fatal error.
    fn related_name(&self, name: &str) -> String;
}

/// Default convention: names starting with `RELATED_IMAGE_` or ending with
/// `_IMAGE`, case-insensitive.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHeuristic;

impl ImageHeuristic for DefaultHeuristic {
    fn matches_name(&self, name: &str) -> bool {
        let upper = name.to_ascii_uppercase();
        upper.starts_with(RELATED_IMAGE_PREFIX) || upper.ends_with(IMAGE_SUFFIX)
    }

    fn related_name(&self, name: &str) -> String {
        let upper = name.to_ascii_uppercase();
        let stripped = if upper.starts_with(RELATED_IMAGE_PREFIX) {
            &name[RELATED_IMAGE_PREFIX.len()..]
        } else if upper.ends_with(IMAGE_SUFFIX) {
            &name[..name.len() - IMAGE_SUFFIX.len()]
        } else {
            name
        };
        stripped.to_ascii_lowercase()
    }
}

/// Direct container-image fields only; every env var is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHeuristic;

impl ImageHeuristic for NoHeuristic {
    fn matches_name(&self, _name: &str) -> bool {
        false
    }

    fn related_name(&self, name: &str) -> String {
        name.to_ascii_lowercase()
    }
}

/// Matches env-var names against a caller-supplied regular expression.
#[derive(Debug, Clone)]
pub struct PatternHeuristic {
    pattern: Regex,
}

impl PatternHeuristic {
    /// Compile a pattern heuristic from a regex string.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }
}

impl ImageHeuristic for PatternHeuristic {
    fn matches_name(&self, name: &str) -> bool {
        self.pattern.is_match(name)
    }

    fn related_name(&self, name: &str) -> String {
        name.to_ascii_lowercase()
    }
}
