//! Command implementations

pub mod extract;
pub mod replace;

use anyhow::{Context, Result};
use omt_pullspec::{DefaultHeuristic, ImageHeuristic, NoHeuristic, PatternHeuristic};

/// Build the env-var heuristic selected on the command line.
pub(crate) fn select_heuristic(
    direct_only: bool,
    env_pattern: Option<&str>,
) -> Result<Box<dyn ImageHeuristic>> {
    if direct_only {
        return Ok(Box::new(NoHeuristic));
    }
    match env_pattern {
        Some(pattern) => {
            let heuristic = PatternHeuristic::new(pattern)
                .with_context(|| format!("invalid env-var pattern {pattern:?}"))?;
            Ok(Box::new(heuristic))
        }
        None => Ok(Box::new(DefaultHeuristic)),
    }
}
