//! Crate-wide constants

/// Number of slots in a table when nothing else is configured.
pub const DEFAULT_CAPACITY: usize = 64;

/// Upper bound accepted for `--capacity` / `capacity =`.
pub const MAX_CAPACITY: usize = 1 << 16;

pub const CAPACITY_ENV: &str = "PROCTABLE_CAPACITY";
pub const LOG_ENV: &str = "PROCTABLE_LOG";

// Persistent config lives in ~/.proctable/, runtime data (logs) under the temp dir
pub const CONFIG_DIRECTORY: &str = ".proctable";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const LOG_FILE_NAME: &str = "proctable.log";

/// Default tracing filter; keeps the interactive session quiet.
pub const DEFAULT_LOG_FILTER: &str = "warn";
