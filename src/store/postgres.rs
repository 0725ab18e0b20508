//! # Postgres Status Store
//!
//! [`BulkStatusStore`] backed by a sqlx connection pool, delegating to the
//! model-level query methods.
//!
//! Required indexes (`bulk_uuid`, and `(bulk_uuid, status)` on the operation
//! table) are part of the schema documented on the model modules; every read
//! here has the latency profile of one aggregate query against those
//! indexes.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::BulkStatusConfig;
use crate::error::Result;
use crate::models::{Bulk, Operation, OperationStatus};
use crate::store::BulkStatusStore;

/// Postgres-backed status store.
#[derive(Debug, Clone)]
pub struct PgBulkStatusStore {
    pool: PgPool,
}

impl PgBulkStatusStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect a new pool from configuration.
    pub async fn connect(config: &BulkStatusConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await?;

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl BulkStatusStore for PgBulkStatusStore {
    async fn get_bulk(&self, bulk_uuid: &str) -> Result<Option<Bulk>> {
        Ok(Bulk::find_by_uuid(&self.pool, bulk_uuid).await?)
    }

    async fn get_operation_count(&self, bulk_uuid: &str) -> Result<i64> {
        Ok(Bulk::operation_count_for(&self.pool, bulk_uuid).await?)
    }

    async fn count_operations(
        &self,
        bulk_uuid: &str,
        status: Option<OperationStatus>,
    ) -> Result<i64> {
        Ok(Operation::count_for_bulk(&self.pool, bulk_uuid, status).await?)
    }

    async fn list_operations(
        &self,
        bulk_uuid: &str,
        statuses: Option<&[OperationStatus]>,
    ) -> Result<Vec<Operation>> {
        Ok(Operation::list_for_bulk(&self.pool, bulk_uuid, statuses).await?)
    }

    async fn list_bulks_by_user(&self, user_id: i64) -> Result<Vec<Bulk>> {
        Ok(Bulk::list_by_user(&self.pool, user_id).await?)
    }
}
