//! Unified error handling for the process table
//!
//! Every failure the table can observe is classified here. The menu loop
//! swallows the recoverable ones (the reference behavior is a silent
//! no-op); the fatal ones terminate the program.

use std::collections::TryReserveError;
use std::fmt;
use std::io;
use thiserror::Error;

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum PcbError {
    /// Target id is out of range or names a free slot
    #[error("Invalid process reference: {pid} (capacity {capacity})")]
    InvalidReference { pid: i64, capacity: usize },

    /// No free slot left for a new process
    #[error("Process table is full (capacity {capacity})")]
    CapacityExhausted { capacity: usize },

    /// Storage for a record or child link could not be obtained
    #[error("Allocation failure: {0}")]
    Allocation(#[from] TryReserveError),

    /// A structural invariant does not hold
    #[error("Process table invariant violated: {message}")]
    Corrupted { message: String },

    #[error("Configuration error: {message}")]
    Config {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Error categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Reference,
    Capacity,
    Resource,
    Integrity,
    Config,
    Io,
}

impl ErrorCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            ErrorCategory::Reference => "Reference",
            ErrorCategory::Capacity => "Capacity",
            ErrorCategory::Resource => "Resource",
            ErrorCategory::Integrity => "Integrity",
            ErrorCategory::Config => "Configuration",
            ErrorCategory::Io => "I/O",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl PcbError {
    /// Get error category
    pub fn category(&self) -> ErrorCategory {
        match self {
            PcbError::InvalidReference { .. } => ErrorCategory::Reference,
            PcbError::CapacityExhausted { .. } => ErrorCategory::Capacity,
            PcbError::Allocation(_) => ErrorCategory::Resource,
            PcbError::Corrupted { .. } => ErrorCategory::Integrity,
            PcbError::Config { .. } => ErrorCategory::Config,
            PcbError::Io(_) => ErrorCategory::Io,
        }
    }

    /// Fatal errors end the session; the rest are ignored commands.
    pub fn is_fatal(&self) -> bool {
        match self {
            PcbError::InvalidReference { .. } | PcbError::CapacityExhausted { .. } => false,
            PcbError::Allocation(_)
            | PcbError::Corrupted { .. }
            | PcbError::Config { .. }
            | PcbError::Io(_) => true,
        }
    }

    /// Get user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            PcbError::InvalidReference { pid, capacity } => {
                if *pid < 0 || *pid as u64 >= *capacity as u64 {
                    format!("process id {} is outside 0..{}", pid, capacity)
                } else {
                    format!("process id {} does not exist", pid)
                }
            }
            PcbError::CapacityExhausted { capacity } => {
                format!("all {} process slots are in use", capacity)
            }
            PcbError::Allocation(err) => format!("out of memory: {}", err),
            PcbError::Corrupted { message } => format!("process table corrupted: {}", message),
            PcbError::Config { message, .. } => format!("Configuration problem: {}", message),
            PcbError::Io(err) => format!("Input/output failed: {}", err),
        }
    }
}

/// Result type alias for convenience
pub type PcbResult<T> = Result<T, PcbError>;

/// Turn recoverable refusals into `Ok(None)`, keeping fatal errors.
///
/// An invalid target or a full table is a silent no-op for the caller; it is
/// still logged so `RUST_LOG=debug` shows why nothing happened.
pub fn ignore_recoverable<T>(result: PcbResult<T>) -> PcbResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if !err.is_fatal() => {
            tracing::warn!(category = %err.category(), "ignored: {}", err);
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// Convenience functions for creating common errors
pub mod errors {
    use super::*;

    pub fn config_error(message: impl Into<String>) -> PcbError {
        PcbError::Config {
            message: message.into(),
            source: None,
        }
    }

    pub fn config_error_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> PcbError {
        PcbError::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn corrupted(message: impl Into<String>) -> PcbError {
        PcbError::Corrupted {
            message: message.into(),
        }
    }
}
