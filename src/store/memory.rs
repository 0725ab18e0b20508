//! # In-Memory Status Store
//!
//! [`BulkStatusStore`] over process-local state, for tests and embedded use.
//!
//! The mutation helpers (`insert_*`, `set_operation_status`) model the
//! external scheduling/execution pipeline that owns writes in production:
//! tests seed bulks, materialize operation rows, and transition their
//! statuses to drive the derivation paths.

use async_trait::async_trait;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use crate::error::Result;
use crate::models::{Bulk, NewBulk, NewOperation, Operation, OperationStatus};
use crate::store::BulkStatusStore;

#[derive(Debug, Default)]
struct Inner {
    bulks: Vec<Bulk>,
    operations: Vec<Operation>,
}

/// Process-local status store.
#[derive(Debug)]
pub struct InMemoryBulkStatusStore {
    inner: Mutex<Inner>,
    next_operation_id: AtomicI64,
}

impl Default for InMemoryBulkStatusStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBulkStatusStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            next_operation_id: AtomicI64::new(1),
        }
    }

    /// Insert a bulk row, as the scheduling pipeline would.
    pub fn insert_bulk(&self, new_bulk: NewBulk) -> Bulk {
        let bulk = Bulk {
            uuid: new_bulk.uuid,
            user_id: new_bulk.user_id,
            description: new_bulk.description,
            operation_count: new_bulk.operation_count,
            start_time: new_bulk
                .start_time
                .unwrap_or_else(|| chrono::Utc::now().naive_utc()),
        };

        let mut inner = self.inner.lock().expect("store mutex poisoned");
        inner.bulks.push(bulk.clone());
        bulk
    }

    /// Materialize an operation row, as the scheduling pipeline would.
    pub fn insert_operation(&self, new_operation: NewOperation) -> Operation {
        let operation = Operation {
            id: self.next_operation_id.fetch_add(1, Ordering::Relaxed),
            bulk_uuid: new_operation.bulk_uuid,
            status: new_operation.status,
            error_code: new_operation.error_code,
            error_message: new_operation.error_message,
            serialized_data: new_operation.serialized_data,
        };

        let mut inner = self.inner.lock().expect("store mutex poisoned");
        inner.operations.push(operation.clone());
        operation
    }

    /// Transition an operation to a terminal status, as a worker would.
    /// Returns false when no such operation exists.
    pub fn set_operation_status(
        &self,
        operation_id: i64,
        status: OperationStatus,
        error_code: Option<i32>,
        error_message: Option<String>,
    ) -> bool {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        match inner.operations.iter_mut().find(|op| op.id == operation_id) {
            Some(operation) => {
                operation.status = status;
                operation.error_code = error_code;
                operation.error_message = error_message;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl BulkStatusStore for InMemoryBulkStatusStore {
    async fn get_bulk(&self, bulk_uuid: &str) -> Result<Option<Bulk>> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner.bulks.iter().find(|b| b.uuid == bulk_uuid).cloned())
    }

    async fn get_operation_count(&self, bulk_uuid: &str) -> Result<i64> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner
            .bulks
            .iter()
            .find(|b| b.uuid == bulk_uuid)
            .map(|b| b.operation_count)
            .unwrap_or(0))
    }

    async fn count_operations(
        &self,
        bulk_uuid: &str,
        status: Option<OperationStatus>,
    ) -> Result<i64> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        let count = inner
            .operations
            .iter()
            .filter(|op| op.bulk_uuid == bulk_uuid)
            .filter(|op| status.map_or(true, |s| op.status == s))
            .count();
        Ok(count as i64)
    }

    async fn list_operations(
        &self,
        bulk_uuid: &str,
        statuses: Option<&[OperationStatus]>,
    ) -> Result<Vec<Operation>> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        let mut operations: Vec<Operation> = inner
            .operations
            .iter()
            .filter(|op| op.bulk_uuid == bulk_uuid)
            .filter(|op| statuses.map_or(true, |set| set.contains(&op.status)))
            .cloned()
            .collect();
        operations.sort_by_key(|op| op.id);
        Ok(operations)
    }

    async fn list_bulks_by_user(&self, user_id: i64) -> Result<Vec<Bulk>> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        let mut bulks: Vec<Bulk> = inner
            .bulks
            .iter()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        bulks.sort_by(|a, b| {
            a.start_time
                .cmp(&b.start_time)
                .then_with(|| a.uuid.cmp(&b.uuid))
        });
        Ok(bulks)
    }
}
