//! Combination lookup over the dataset
//!
//! Both routes index the dataset by a single hex key, trying the bare code
//! point first and the `-fe0f` form second. Candidate lists are scanned in
//! upstream order and the first match wins.

use crate::models::{CombinationDataset, CombinationRecord};

use super::codepoint::{format_image_path_segment, hex_to_display_char, to_hex, with_fe0f};

/// Records stored under `hex`, falling back to its `-fe0f` form
pub fn candidates<'a>(dataset: &'a CombinationDataset, hex: &str) -> Option<&'a [CombinationRecord]> {
    dataset
        .get(hex)
        .or_else(|| dataset.get(&with_fe0f(hex)))
        .map(Vec::as_slice)
}

fn matches_hex(hex: &str, value: &str) -> bool {
    value == hex || value == with_fe0f(hex)
}

/// First record pairing `left_hex` with `right_hex` in either stored order
pub fn find_pair<'a>(
    records: &'a [CombinationRecord],
    left_hex: &str,
    right_hex: &str,
) -> Option<&'a CombinationRecord> {
    records.iter().find(|record| {
        (matches_hex(left_hex, &record.left_emoji) && matches_hex(right_hex, &record.right_emoji))
            || (matches_hex(left_hex, &record.right_emoji)
                && matches_hex(right_hex, &record.left_emoji))
    })
}

/// Left/right display characters for an index page
///
/// Keyed by the left character: a later record with the same left character
/// replaces the earlier right character but keeps the earlier position.
/// Records whose hex does not decode are skipped.
pub fn index_entries(records: &[CombinationRecord]) -> Vec<(char, char)> {
    let mut entries: Vec<(char, char)> = Vec::new();

    for record in records {
        let (Some(left), Some(right)) = (
            hex_to_display_char(&record.left_emoji),
            hex_to_display_char(&record.right_emoji),
        ) else {
            continue;
        };

        match entries.iter_mut().find(|(existing, _)| *existing == left) {
            Some(entry) => entry.1 = right,
            None => entries.push((left, right)),
        }
    }

    entries
}

/// One anchor per entry, newline separated
pub fn render_index_html(entries: &[(char, char)]) -> String {
    entries
        .iter()
        .map(|(left, right)| format!("<a href=\"/{left}/{right}\">{left} + {right}</a><br />"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Builds image URLs for resolved pairs
#[derive(Debug, Clone)]
pub struct CombinationResolver {
    image_base_url: String,
}

impl CombinationResolver {
    pub fn new(image_base_url: impl Into<String>) -> Self {
        let image_base_url: String = image_base_url.into();
        Self {
            image_base_url: image_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `<base>/<date>/<left>/<left>_<right>.png`
    ///
    /// The left segment appears twice, matching how the image host lays out
    /// each batch.
    pub fn image_url(&self, record: &CombinationRecord) -> String {
        let left = format_image_path_segment(&record.left_emoji);
        let right = format_image_path_segment(&record.right_emoji);
        format!(
            "{}/{}/{}/{}_{}.png",
            self.image_base_url, record.date, left, left, right
        )
    }

    /// Image URL for the pair named by two path parameters
    ///
    /// Candidates come from the right-hand emoji's key. `None` for empty
    /// parameters or when no record pairs the two.
    pub fn resolve_pair_url(
        &self,
        dataset: &CombinationDataset,
        left_param: &str,
        right_param: &str,
    ) -> Option<String> {
        let left_hex = to_hex(left_param)?;
        let right_hex = to_hex(right_param)?;

        let records = candidates(dataset, &right_hex)?;
        let record = find_pair(records, &left_hex, &right_hex)?;
        Some(self.image_url(record))
    }

    /// HTML index of the combinations listed under one emoji
    pub fn resolve_index(&self, dataset: &CombinationDataset, param: &str) -> Option<String> {
        let hex = to_hex(param)?;
        let records = candidates(dataset, &hex)?;
        Some(render_index_html(&index_entries(records)))
    }
}
