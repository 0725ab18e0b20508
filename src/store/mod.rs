//! # Status Store
//!
//! The durable-storage seam the bulk status service reads through.
//!
//! The store is an external collaborator: bulk and operation rows are written
//! by the scheduling/execution pipeline, and independent workers transition
//! operation statuses concurrently with these reads. No method here takes a
//! lock or provides snapshot isolation across calls; a status derived from
//! counts taken at slightly different instants is accepted, documented
//! staleness.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Bulk, Operation, OperationStatus};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryBulkStatusStore;
pub use postgres::PgBulkStatusStore;

/// Read-only query primitives over bulk and operation records.
///
/// All methods degrade on absence: an unknown bulk yields `None`, zero, or an
/// empty list rather than an error. Storage-layer failures propagate
/// unchanged.
#[async_trait]
pub trait BulkStatusStore: Send + Sync {
    /// Load a bulk record by uuid.
    async fn get_bulk(&self, bulk_uuid: &str) -> Result<Option<Bulk>>;

    /// Read the declared `operation_count` of a bulk; zero when the bulk row
    /// is absent.
    async fn get_operation_count(&self, bulk_uuid: &str) -> Result<i64>;

    /// Count operation rows for a bulk, optionally filtered by status.
    async fn count_operations(
        &self,
        bulk_uuid: &str,
        status: Option<OperationStatus>,
    ) -> Result<i64>;

    /// List operation rows for a bulk in stable (insertion) order, optionally
    /// restricted to a status set.
    async fn list_operations(
        &self,
        bulk_uuid: &str,
        statuses: Option<&[OperationStatus]>,
    ) -> Result<Vec<Operation>>;

    /// List all bulks owned by a user, ordered by `start_time` ascending.
    async fn list_bulks_by_user(&self, user_id: i64) -> Result<Vec<Bulk>>;
}

// Shared handles are stores too, so a caller can keep seeding/observing the
// same store it handed to a service.
#[async_trait]
impl<T: BulkStatusStore + ?Sized> BulkStatusStore for std::sync::Arc<T> {
    async fn get_bulk(&self, bulk_uuid: &str) -> Result<Option<Bulk>> {
        (**self).get_bulk(bulk_uuid).await
    }

    async fn get_operation_count(&self, bulk_uuid: &str) -> Result<i64> {
        (**self).get_operation_count(bulk_uuid).await
    }

    async fn count_operations(
        &self,
        bulk_uuid: &str,
        status: Option<OperationStatus>,
    ) -> Result<i64> {
        (**self).count_operations(bulk_uuid, status).await
    }

    async fn list_operations(
        &self,
        bulk_uuid: &str,
        statuses: Option<&[OperationStatus]>,
    ) -> Result<Vec<Operation>> {
        (**self).list_operations(bulk_uuid, statuses).await
    }

    async fn list_bulks_by_user(&self, user_id: i64) -> Result<Vec<Bulk>> {
        (**self).list_bulks_by_user(user_id).await
    }
}
