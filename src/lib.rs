//! Proctable Library
//!
//! A fixed-capacity process control block table: parent/child bookkeeping for
//! simulated `fork`/`exit`, with lowest-free-first id reuse and post-order
//! subtree teardown.

pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod render;
pub mod settings;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::DEFAULT_CAPACITY;
pub use crate::core::models::*;
pub use crate::core::process_table::ProcessTable;
pub use crate::core::shared_table::SharedProcessTable;
pub use error::{ErrorCategory, PcbError, PcbResult};
pub use render::OutputFormat;
pub use settings::Settings;
