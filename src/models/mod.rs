//! Combination dataset models
//!
//! Mirrors the JSON published by the Emoji Kitchen dataset: an object keyed by
//! one emoji's hex code point whose values list every pair that emoji takes
//! part in.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One composable pair and the image batch it was rendered in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinationRecord {
    /// Hex code point, possibly `-fe0f` suffixed
    pub left_emoji: String,
    /// Hex code point, possibly `-fe0f` suffixed
    pub right_emoji: String,
    /// Batch folder on the image host, e.g. `20201001`
    pub date: String,
}

/// Hex key -> records in upstream order
///
/// Order within a list matters: lookups take the first match.
pub type CombinationDataset = HashMap<String, Vec<CombinationRecord>>;
