//! constants.rs
//! Reserved field names, separators and defaults shared across the engine.

/// Reserved field that identifies each element of a key-tagged list.
pub const TAG_FIELD: &str = "key";

/// Separator for map traversal (`base/field`).
pub const MAP_SEPARATOR: char = '/';

/// Separator for list field traversal (`base_field`).
pub const LIST_SEPARATOR: char = '_';

/// Durable image defaults.
pub const DEFAULT_STATE_PATH: &str = "./data/state.json";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variables read by [`crate::config::StoreConfig::from_env`].
pub mod env_vars {
    pub const STATE_PATH: &str = "STATE_PATH";
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
}

/// Suffix appended to the state path while a rewrite is in flight.
pub const TMP_SUFFIX: &str = ".tmp";

/// Suffix of an unreadable image moved out of the way at load.
pub const CORRUPT_SUFFIX: &str = ".corrupt";

/// Section names of the state image.
pub mod image_keys {
    pub const COUNTERS: &str = "counters";
    pub const TIMESTAMPS: &str = "timestamps";
    pub const CACHE: &str = "cache";
}

/// Timestamp layout used by crawl cursors (UTC, second precision).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
