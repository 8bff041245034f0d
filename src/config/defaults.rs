/// Configuration default values
///
/// This module contains all the default values for configuration options,
/// making them easily changeable in one central location.
// Web server defaults
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_REQUEST_TIMEOUT: &str = "30s";

// Upstream defaults
pub const DEFAULT_DATASET_URL: &str =
    "https://raw.githubusercontent.com/xsalazar/emoji-kitchen/main/src/Components/emojiData.json";
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://www.gstatic.com/android/keyboard/emojikitchen";
pub const DEFAULT_CONNECT_TIMEOUT: &str = "10s";

// Cache defaults
pub const DEFAULT_CACHE_PATH: &str = "./data/cache";
pub const DEFAULT_CACHE_KEY: &str = "emoji-data";
pub const DEFAULT_SINGLE_FLIGHT: bool = true;

// Environment overrides
pub const ENV_PREFIX: &str = "EMOJI_KITCHEN_";
