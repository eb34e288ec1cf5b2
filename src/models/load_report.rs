//! Load report
//!
//! Data files are loaded best-effort; this records what was skipped.

use serde::Serialize;

/// Outcome of parsing one data file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Records accepted
    pub loaded: usize,
    /// 1-based line numbers that were malformed and skipped
    pub skipped_lines: Vec<usize>,
    /// Ingredient names that could not be resolved while loading composites
    pub dropped_ingredients: Vec<String>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.skipped_lines.is_empty() && self.dropped_ingredients.is_empty()
    }
}
