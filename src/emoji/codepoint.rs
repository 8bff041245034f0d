//! Hex code point normalization
//!
//! Dataset keys and records name emoji by their first code point in lowercase
//! hex, sometimes followed by `-fe0f` when the emoji presentation selector is
//! part of the canonical sequence.

use tracing::debug;

/// Suffix marking the emoji variation selector
pub const FE0F_SUFFIX: &str = "-fe0f";

/// Lowercase hex of the first code point in `param`
///
/// Any further code points (ZWJ sequences, skin tones, selectors) are
/// dropped. Returns `None` for an empty parameter.
pub fn to_hex(param: &str) -> Option<String> {
    let mut chars = param.chars();
    let first = chars.next()?;

    if chars.next().is_some() {
        debug!(
            "Emoji parameter '{}' has {} code points, using only U+{:04X}",
            param,
            param.chars().count(),
            u32::from(first)
        );
    }

    Some(format!("{:x}", u32::from(first)))
}

pub fn with_fe0f(hex: &str) -> String {
    format!("{hex}{FE0F_SUFFIX}")
}

/// Strip everything from the first hyphen onwards
///
/// A trailing bare hyphen is left in place, so `"1f600-"` is returned as is.
pub fn without_fe0f(hex: &str) -> &str {
    match hex.split_once('-') {
        Some((base, rest)) if !rest.is_empty() => base,
        _ => hex,
    }
}

/// Render a dataset hex string back into its emoji character
///
/// `None` when the hex does not parse or is not a Unicode scalar value.
pub fn hex_to_display_char(hex: &str) -> Option<char> {
    u32::from_str_radix(without_fe0f(hex), 16)
        .ok()
        .and_then(char::from_u32)
}

/// `1f600-1f601` -> `u1f600-u1f601`, the image host's path convention
pub fn format_image_path_segment(hex: &str) -> String {
    hex.split('-')
        .map(|code| format!("u{code}"))
        .collect::<Vec<_>>()
        .join("-")
}
