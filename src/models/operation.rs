//! # Operation Model
//!
//! One unit of work scheduled within a bulk.
//!
//! ## Overview
//!
//! Operation rows are created by the scheduling pipeline (outside this core)
//! already in the `open` state and transition to exactly one terminal status
//! when an external worker processes them. This core only reads them:
//! filtered counts feed the status calculator, filtered lists back the
//! detailed and failed-operation views.
//!
//! ## Database Schema
//!
//! Maps to the `bulk_operations` table:
//! ```sql
//! CREATE TABLE bulk_operations (
//!   id BIGSERIAL PRIMARY KEY,
//!   bulk_uuid VARCHAR(39) NOT NULL,
//!   status VARCHAR(32) NOT NULL DEFAULT 'open',
//!   error_code INTEGER,
//!   error_message VARCHAR,
//!   serialized_data JSONB
//! );
//! CREATE INDEX bulk_operations_bulk_uuid_idx ON bulk_operations (bulk_uuid);
//! CREATE INDEX bulk_operations_bulk_uuid_status_idx ON bulk_operations (bulk_uuid, status);
//! ```
//!
//! The composite index is a requirement, not an optimization: every status
//! derivation issues counts filtered by `bulk_uuid` and `status`.

use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgArgumentBuffer, PgTypeInfo, PgValueRef};
use sqlx::{Decode, Encode, FromRow, PgPool, Postgres, Type};
use std::fmt;

/// Processing status of a single operation. Exhaustive and mutually
/// exclusive: a row carries exactly one of these at any instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationStatus {
    /// Not yet processed by a worker
    Open,
    /// Processed successfully
    Complete,
    /// Failed, eligible for retry by the execution pipeline
    RetriablyFailed,
    /// Failed permanently
    NotRetriablyFailed,
}

impl OperationStatus {
    /// Check if this is a failure status (either retriable or permanent)
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::RetriablyFailed | Self::NotRetriablyFailed)
    }

    /// Check if this is a terminal status (the row will not be written again)
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Open)
    }

    /// The two failure statuses, in ranking order.
    pub fn failure_statuses() -> [OperationStatus; 2] {
        [Self::RetriablyFailed, Self::NotRetriablyFailed]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Complete => "complete",
            Self::RetriablyFailed => "retriably_failed",
            Self::NotRetriablyFailed => "not_retriably_failed",
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OperationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "complete" => Ok(Self::Complete),
            "retriably_failed" => Ok(Self::RetriablyFailed),
            "not_retriably_failed" => Ok(Self::NotRetriablyFailed),
            _ => Err(format!("Invalid operation status: {s}")),
        }
    }
}

// Stored as TEXT rather than a Postgres enum type so that status values can
// be added without a migration. Unknown text in a row is a decode error, not
// an implicitly-null field.
impl Type<Postgres> for OperationStatus {
    fn type_info() -> PgTypeInfo {
        <&str as Type<Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <&str as Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for OperationStatus {
    fn decode(value: PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let raw = <&str as Decode<Postgres>>::decode(value)?;
        raw.parse::<Self>().map_err(Into::into)
    }
}

impl<'q> Encode<'q, Postgres> for OperationStatus {
    fn encode_by_ref(
        &self,
        buf: &mut PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as Encode<Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

/// Represents one unit of work within a bulk.
///
/// `error_code` and `error_message` are populated only for failure statuses.
/// `serialized_data` is the opaque work payload; this core never interprets
/// it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Operation {
    pub id: i64,
    pub bulk_uuid: String,
    pub status: OperationStatus,
    pub error_code: Option<i32>,
    pub error_message: Option<String>,
    pub serialized_data: Option<serde_json::Value>,
}

/// New Operation for insertion (without the generated id)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOperation {
    pub bulk_uuid: String,
    pub status: OperationStatus,
    pub error_code: Option<i32>,
    pub error_message: Option<String>,
    pub serialized_data: Option<serde_json::Value>,
}

impl Operation {
    const COLUMNS: &'static str = "id, bulk_uuid, status, error_code, error_message, serialized_data";

    /// Insert an operation row. Scheduling is outside this core's scope, but
    /// the store must be able to contain rows; fixtures and embedding
    /// applications create them through this method.
    pub async fn create(pool: &PgPool, new_operation: NewOperation) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO bulk_operations (bulk_uuid, status, error_code, error_message, serialized_data)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, bulk_uuid, status, error_code, error_message, serialized_data
            "#,
        )
        .bind(&new_operation.bulk_uuid)
        .bind(new_operation.status)
        .bind(new_operation.error_code)
        .bind(&new_operation.error_message)
        .bind(&new_operation.serialized_data)
        .fetch_one(pool)
        .await
    }

    /// Count operations for a bulk, optionally filtered by status.
    ///
    /// Returns zero for an unknown bulk; absence is not an error on count
    /// paths.
    pub async fn count_for_bulk(
        pool: &PgPool,
        bulk_uuid: &str,
        status: Option<OperationStatus>,
    ) -> Result<i64, sqlx::Error> {
        let count: (i64,) = match status {
            Some(status) => {
                sqlx::query_as(
                    "SELECT COUNT(*) FROM bulk_operations WHERE bulk_uuid = $1 AND status = $2",
                )
                .bind(bulk_uuid)
                .bind(status)
                .fetch_one(pool)
                .await?
            }
            None => sqlx::query_as("SELECT COUNT(*) FROM bulk_operations WHERE bulk_uuid = $1")
                .bind(bulk_uuid)
                .fetch_one(pool)
                .await?,
        };

        Ok(count.0)
    }

    /// List operations for a bulk, optionally restricted to a status set.
    ///
    /// Ordered by `id` ascending for deterministic results. An empty Vec for
    /// an unknown bulk, never an error.
    pub async fn list_for_bulk(
        pool: &PgPool,
        bulk_uuid: &str,
        statuses: Option<&[OperationStatus]>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        match statuses {
            Some(statuses) => {
                let status_values: Vec<String> =
                    statuses.iter().map(|s| s.as_str().to_string()).collect();
                let query = format!(
                    r#"
                    SELECT {columns}
                    FROM bulk_operations
                    WHERE bulk_uuid = $1 AND status = ANY($2)
                    ORDER BY id
                    "#,
                    columns = Self::COLUMNS,
                );
                sqlx::query_as::<_, Self>(&query)
                    .bind(bulk_uuid)
                    .bind(&status_values)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!(
                    r#"
                    SELECT {columns}
                    FROM bulk_operations
                    WHERE bulk_uuid = $1
                    ORDER BY id
                    "#,
                    columns = Self::COLUMNS,
                );
                sqlx::query_as::<_, Self>(&query)
                    .bind(bulk_uuid)
                    .fetch_all(pool)
                    .await
            }
        }
    }
}
