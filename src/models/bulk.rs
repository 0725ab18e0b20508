//! # Bulk Model
//!
//! One logical batch of asynchronous work.
//!
//! ## Overview
//!
//! A `Bulk` row is created once by the scheduling pipeline with a declared
//! `operation_count` and is immutable afterwards. Operation rows referencing
//! it may be materialized after the bulk row itself, so the declared count is
//! always >= the number of operation rows currently present; transient
//! under-counts during creation are expected and handled by the status
//! calculator.
//!
//! ## Database Schema
//!
//! Maps to the `bulk_summaries` table:
//! ```sql
//! CREATE TABLE bulk_summaries (
//!   uuid VARCHAR(39) PRIMARY KEY,
//!   user_id BIGINT NOT NULL,
//!   description VARCHAR NOT NULL,
//!   operation_count BIGINT NOT NULL,
//!   start_time TIMESTAMP NOT NULL DEFAULT NOW()
//! );
//! CREATE INDEX bulk_summaries_user_id_idx ON bulk_summaries (user_id);
//! ```

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

/// Represents one bulk unit of work.
///
/// All fields are immutable after creation; aggregate status is never stored
/// here, it is derived on demand from operation counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Bulk {
    /// Opaque unique identifier, assigned at creation
    pub uuid: String,
    /// Owner reference
    pub user_id: i64,
    /// Human-readable label
    pub description: String,
    /// Total number of operations scheduled under this bulk, set once and
    /// never decremented
    pub operation_count: i64,
    /// Ordering key for per-user listings
    pub start_time: NaiveDateTime,
}

/// New Bulk for insertion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBulk {
    pub uuid: String,
    pub user_id: i64,
    pub description: String,
    pub operation_count: i64,
    pub start_time: Option<NaiveDateTime>,
}

impl Bulk {
    const COLUMNS: &'static str = "uuid, user_id, description, operation_count, start_time";

    /// Insert a bulk row. Creation is driven by the scheduling pipeline;
    /// this exists for fixtures and embedding applications.
    pub async fn create(pool: &PgPool, new_bulk: NewBulk) -> Result<Self, sqlx::Error> {
        let start_time = new_bulk
            .start_time
            .unwrap_or_else(|| chrono::Utc::now().naive_utc());

        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO bulk_summaries (uuid, user_id, description, operation_count, start_time)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING uuid, user_id, description, operation_count, start_time
            "#,
        )
        .bind(&new_bulk.uuid)
        .bind(new_bulk.user_id)
        .bind(&new_bulk.description)
        .bind(new_bulk.operation_count)
        .bind(start_time)
        .fetch_one(pool)
        .await
    }

    /// Find a bulk by uuid
    pub async fn find_by_uuid(pool: &PgPool, bulk_uuid: &str) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {columns} FROM bulk_summaries WHERE uuid = $1",
            columns = Self::COLUMNS,
        );

        sqlx::query_as::<_, Self>(&query)
            .bind(bulk_uuid)
            .fetch_optional(pool)
            .await
    }

    /// Read the declared `operation_count` for a bulk.
    ///
    /// Returns zero when no bulk row exists: the summary-free status path
    /// deliberately proceeds with zero counts instead of failing (see the
    /// service layer).
    pub async fn operation_count_for(pool: &PgPool, bulk_uuid: &str) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COALESCE(MAX(operation_count), 0) FROM bulk_summaries WHERE uuid = $1",
        )
        .bind(bulk_uuid)
        .fetch_one(pool)
        .await?;

        Ok(count.0)
    }

    /// List all bulks owned by a user, ordered by `start_time` ascending.
    ///
    /// Status-priority ordering is applied by the service after statuses are
    /// derived; storage only provides the stable time ordering.
    pub async fn list_by_user(pool: &PgPool, user_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT {columns}
            FROM bulk_summaries
            WHERE user_id = $1
            ORDER BY start_time, uuid
            "#,
            columns = Self::COLUMNS,
        );

        sqlx::query_as::<_, Self>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
