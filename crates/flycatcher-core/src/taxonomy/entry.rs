//! Taxonomy entry and lookup result types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Reference metadata for one species
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyEntry {
    /// eBird species code (e.g. "amerob")
    pub code: String,
    pub common_name: String,
    pub order: String,
    pub family: String,
}

/// Parsed taxonomy keyed by species code
pub type TaxonomyTable = HashMap<String, TaxonomyEntry>;

/// Outcome of a successful lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupResult {
    Found(TaxonomyEntry),
    NotFound { code: String, note: String },
}

impl LookupResult {
    pub(crate) fn not_found(code: &str) -> Self {
        LookupResult::NotFound {
            code: code.to_string(),
            note: format!(
                "Species code '{}' was not found in eBird's taxonomy database.",
                code
            ),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, LookupResult::Found(_))
    }

    /// The matched entry, if any
    pub fn entry(&self) -> Option<&TaxonomyEntry> {
        match self {
            LookupResult::Found(entry) => Some(entry),
            LookupResult::NotFound { .. } => None,
        }
    }
}
