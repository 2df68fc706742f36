//! Container image reference model
//!
//! This crate provides the `ImageReference` value type used throughout the
//! operator manifest tooling:
//! - Parsing pull specs like `registry.io/ns/app:1.0` or digest forms
//! - Canonical rendering that round-trips parsing exactly
//! - Structural equality (no default-registry normalization)

pub mod reference;

pub use reference::{ImageReference, MalformedReference};
