//! # Error Types
//!
//! Structured error handling for bulk status derivation using thiserror
//! for typed variants instead of `Box<dyn Error>` patterns.

use thiserror::Error;

/// Errors surfaced by the bulk status core.
///
/// `BulkNotFound` is the only domain-level error: it is raised by the
/// detailed/short status lookups when no `Bulk` row exists for the requested
/// uuid, and it always carries the uuid for diagnostic display. Storage
/// failures propagate unchanged as [`BulkStatusError::Database`]; this crate
/// never reinterprets them. Count and list paths degrade to zero/empty
/// instead of erroring, since "no operations yet" is a valid state for a
/// freshly created bulk.
#[derive(Error, Debug)]
pub enum BulkStatusError {
    #[error("Bulk uuid {bulk_uuid} not exist")]
    BulkNotFound { bulk_uuid: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl BulkStatusError {
    pub fn bulk_not_found(bulk_uuid: impl Into<String>) -> Self {
        Self::BulkNotFound {
            bulk_uuid: bulk_uuid.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BulkStatusError>;
