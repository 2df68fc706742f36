use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A pull spec string could not be parsed into an [`ImageReference`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed image reference {reference:?}: {reason}")]
pub struct MalformedReference {
    /// The string that failed to parse
    pub reference: String,
    /// Why it was rejected
    pub reason: String,
}

impl MalformedReference {
    fn new(reference: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            reason: reason.into(),
        }
    }
}

/// Container image reference with registry, repository, and tag/digest.
///
/// Equality is structural: `busybox` and `docker.io/library/busybox` are
/// distinct values. No registry defaulting or digest resolution happens here;
/// the reference renders back exactly as it was parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageReference {
    /// Registry host, with optional port (e.g., "ghcr.io", "localhost:5000")
    pub registry: Option<String>,
    /// Repository path, never empty (e.g., "library/busybox")
    pub repository: String,
    /// Tag (e.g., "v1.2.3")
    pub tag: Option<String>,
    /// Digest (e.g., "sha256:abc123..."); may coexist with a tag
    pub digest: Option<String>,
}

impl ImageReference {
    /// Parse an image reference string like "registry.io/ns/app:1.0".
    ///
    /// The digest is split off at the last `@`, the tag at the last `:`
    /// after the last `/`, and the leading path component is the registry
    /// host iff it contains a `.` or `:`.
    pub fn parse(s: &str) -> Result<Self, MalformedReference> {
        let (rest, digest) = match s.rsplit_once('@') {
            Some((_, after)) if after.is_empty() => {
                return Err(MalformedReference::new(s, "empty digest"));
            }
            Some((before, after)) => (before, Some(after.to_string())),
            None => (s, None),
        };

        let (registry, remainder) = match rest.split_once('/') {
            Some((host, path)) if host.contains('.') || host.contains(':') => {
                (Some(host.to_string()), path)
            }
            _ => (None, rest),
        };

        // A `:` after the last `/` separates the tag. A `:` anywhere else
        // falls through to the repository charset check below and fails.
        let (repository, tag) = match remainder.rsplit_once(':') {
            Some((before, after)) if !after.contains('/') => {
                if after.is_empty() {
                    return Err(MalformedReference::new(s, "empty tag"));
                }
                (before, Some(after.to_string()))
            }
            _ => (remainder, None),
        };

        if repository.is_empty() {
            return Err(MalformedReference::new(s, "empty repository"));
        }
        if !repository
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '-' | '/'))
        {
            return Err(MalformedReference::new(
                s,
                "repository may only contain lowercase alphanumerics, '.', '_', '-', and '/'",
            ));
        }

        Ok(Self {
            registry,
            repository: repository.to_string(),
            tag,
            digest,
        })
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(registry) = &self.registry {
            write!(f, "{}/", registry)?;
        }
        write!(f, "{}", self.repository)?;
        if let Some(tag) = &self.tag {
            write!(f, ":{}", tag)?;
        }
        if let Some(digest) = &self.digest {
            write!(f, "@{}", digest)?;
        }
        Ok(())
    }
}

impl FromStr for ImageReference {
    type Err = MalformedReference;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tagged_reference() {
        let img = ImageReference::parse("registry.io/ns/app:1.0").unwrap();
        assert_eq!(img.registry.as_deref(), Some("registry.io"));
        assert_eq!(img.repository, "ns/app");
        assert_eq!(img.tag.as_deref(), Some("1.0"));
        assert_eq!(img.digest, None);
    }

    #[test]
    fn test_parse_digest_reference() {
        let img = ImageReference::parse("registry.io/ns/app@sha256:abc123").unwrap();
        assert_eq!(img.tag, None);
        assert_eq!(img.digest.as_deref(), Some("sha256:abc123"));
    }

    #[test]
    fn test_parse_tag_and_digest() {
        let img = ImageReference::parse("registry.io/app:1.0@sha256:abc123").unwrap();
        assert_eq!(img.repository, "app");
        assert_eq!(img.tag.as_deref(), Some("1.0"));
        assert_eq!(img.digest.as_deref(), Some("sha256:abc123"));
    }

    #[test]
    fn test_parse_registry_with_port() {
        let img = ImageReference::parse("localhost:5000/foo").unwrap();
        assert_eq!(img.registry.as_deref(), Some("localhost:5000"));
        assert_eq!(img.repository, "foo");
        assert_eq!(img.tag, None);
    }

    #[test]
    fn test_parse_no_registry() {
        let img = ImageReference::parse("busybox").unwrap();
        assert_eq!(img.registry, None);
        assert_eq!(img.repository, "busybox");

        // A path component without '.' or ':' is not a registry host.
        let img = ImageReference::parse("library/busybox:latest").unwrap();
        assert_eq!(img.registry, None);
        assert_eq!(img.repository, "library/busybox");
        assert_eq!(img.tag.as_deref(), Some("latest"));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(ImageReference::parse("").is_err());
        assert!(ImageReference::parse("registry.io/").is_err());
        assert!(ImageReference::parse("registry.io/App:1.0").is_err());
        assert!(ImageReference::parse("registry.io/app:").is_err());
        assert!(ImageReference::parse("registry.io/app@").is_err());
        assert!(ImageReference::parse("registry.io/app$bad").is_err());
    }

    #[test]
    fn test_render_round_trip() {
        let cases = [
            "busybox",
            "library/busybox",
            "busybox:1.36",
            "registry.io/ns/app:1.0",
            "registry.io/ns/app@sha256:abc123",
            "registry.io/ns/app:1.0@sha256:abc123",
            "localhost:5000/foo:latest",
        ];
        for s in cases {
            let img = ImageReference::parse(s).unwrap();
            assert_eq!(img.to_string(), s, "render mismatch for {}", s);
            assert_eq!(ImageReference::parse(&img.to_string()).unwrap(), img);
        }
    }

    #[test]
    fn test_structural_equality() {
        let short = ImageReference::parse("busybox").unwrap();
        let long = ImageReference::parse("docker.io/library/busybox").unwrap();
        assert_ne!(short, long);
    }
}
