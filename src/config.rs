//! # Configuration
//!
//! Environment-driven configuration with sensible development defaults.

use crate::error::{BulkStatusError, Result};
use crate::status::{BulkStatus, StatusPriority};

/// Runtime configuration for the bulk status core.
///
/// Every field has a development default; `from_env()` overlays environment
/// variables on top, failing with a configuration error on unparseable
/// values rather than silently keeping the default.
#[derive(Debug, Clone)]
pub struct BulkStatusConfig {
    /// Postgres connection string for the status store
    pub database_url: String,
    /// Maximum connections in the sqlx pool
    pub max_connections: u32,
    /// Status ordering applied by user-level bulk listings
    pub status_priority: StatusPriority,
}

impl Default for BulkStatusConfig {
    fn default() -> Self {
        Self {
            database_url: "postgresql://localhost/bulk_status_development".to_string(),
            max_connections: 10,
            status_priority: StatusPriority::default(),
        }
    }
}

impl BulkStatusConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(db_url) = std::env::var("DATABASE_URL") {
            config.database_url = db_url;
        }

        if let Ok(max_connections) = std::env::var("BULK_STATUS_MAX_CONNECTIONS") {
            config.max_connections = max_connections.parse().map_err(|e| {
                BulkStatusError::Configuration(format!("Invalid max_connections: {e}"))
            })?;
        }

        if let Ok(ranking) = std::env::var("BULK_STATUS_PRIORITY") {
            config.status_priority = parse_status_priority(&ranking)?;
        }

        Ok(config)
    }
}

/// Parse a comma-separated ranking such as
/// `finished_with_failure,not_started,in_progress,finished_successfully`.
fn parse_status_priority(raw: &str) -> Result<StatusPriority> {
    let ranking = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<BulkStatus>()
                .map_err(BulkStatusError::Configuration)
        })
        .collect::<Result<Vec<_>>>()?;

    if ranking.is_empty() {
        return Err(BulkStatusError::Configuration(
            "Empty status priority ranking".to_string(),
        ));
    }

    Ok(StatusPriority::new(ranking))
}
