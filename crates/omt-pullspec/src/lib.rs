//! # omt-pullspec
//!
//! Pull-spec extraction, replacement, and related-image reconciliation for
//! Kubernetes Operator bundle manifests (ClusterServiceVersion documents):
//! - Directory loading and kind classification of YAML manifests
//! - Locating image references in container fields and, by naming
//!   convention, in environment variables (pluggable heuristic policy)
//! - Atomic old→new reference rewriting across a whole document
//! - Rebuilding the `spec.relatedImages` summary list with stable,
//!   collision-free names
//!
//! # Example
//!
//! ```no_run
//! use camino::Utf8Path;
//! use omt_pullspec::{extract_pull_specs, DefaultHeuristic};
//!
//! fn main() -> omt_pullspec::Result<()> {
//!     let refs = extract_pull_specs(Utf8Path::new("manifests/"), &DefaultHeuristic)?;
//!     for image in refs {
//!         println!("{image}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod heuristic;
pub mod locate;
pub mod manifest;
pub mod path;
pub mod pipeline;
pub mod related;
pub mod replace;

pub use error::{Error, Result};
pub use heuristic::{DefaultHeuristic, ImageHeuristic, NoHeuristic, PatternHeuristic};
pub use locate::{locate, LocatedPullSpec, LocationKind};
pub use manifest::{load_directory, OperatorManifest, CSV_KIND};
pub use path::{PathSegment, TreePath};
pub use pipeline::{extract_pull_specs, replace_pull_specs, ReplaceSummary};
pub use related::reconcile_related_images;
pub use replace::{parse_replacements, replace_everywhere};
