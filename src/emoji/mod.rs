//! Emoji code point handling and combination lookup

pub mod codepoint;
pub mod resolver;

pub use codepoint::{
    FE0F_SUFFIX, format_image_path_segment, hex_to_display_char, to_hex, with_fe0f, without_fe0f,
};
pub use resolver::CombinationResolver;
