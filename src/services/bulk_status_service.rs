//! # Bulk Status Service
//!
//! Public-facing operations answering "how is this bulk doing?" from counts
//! of its operation rows.
//!
//! ## Overview
//!
//! The service is stateless and request-scoped: each operation is a short,
//! synchronous read sequence against the injected [`BulkStatusStore`], with
//! the aggregate status derived by the canonical calculator in
//! [`crate::status`]. Operation rows are mutated concurrently by external
//! workers and no snapshot isolation spans the multi-query reads here, so a
//! derived status is a point-in-time view that may change between two
//! consecutive calls.
//!
//! ## Processed-Row Semantics
//!
//! The "processed" input to the calculator is the count of **all** operation
//! rows for the bulk: a row is materialized by the scheduling pipeline, so
//! row existence is the "has anything started" signal. This conflates row
//! creation with status progression (a bulk whose rows are all still `open`
//! is not reported as in-progress by the three-count path) and is preserved
//! deliberately for compatibility with the upstream behavior.

use tracing::debug;

use crate::error::{BulkStatusError, Result};
use crate::models::{Bulk, BulkStatusSummary, DetailedBulkStatus, Operation, OperationStatus};
use crate::status::{compute_bulk_status, BulkStatus, StatusPriority};
use crate::store::BulkStatusStore;

/// Derives and reports aggregate bulk status from persisted operation state.
#[derive(Debug, Clone)]
pub struct BulkStatusService<S> {
    store: S,
    status_priority: StatusPriority,
}

impl<S: BulkStatusStore> BulkStatusService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            status_priority: StatusPriority::default(),
        }
    }

    /// Override the status ranking applied by [`Self::get_bulks_by_user`].
    pub fn with_status_priority(store: S, status_priority: StatusPriority) -> Self {
        Self {
            store,
            status_priority,
        }
    }

    /// Derive the aggregate status of a bulk from three store reads.
    ///
    /// Does not check bulk existence: when the bulk row is absent the
    /// declared operation count reads as zero and the derivation proceeds.
    /// With no operation rows either, that yields `NotStarted`; known edge
    /// case: orphaned operation rows without a bulk row derive against a
    /// zero total.
    pub async fn get_bulk_status(&self, bulk_uuid: &str) -> Result<BulkStatus> {
        // Row existence stands in for "processed"; see module docs.
        let processed_operations = self.store.count_operations(bulk_uuid, None).await?;
        if processed_operations == 0 {
            debug!(bulk_uuid, "No operation rows materialized yet");
            return Ok(BulkStatus::NotStarted);
        }

        let total_operations = self.store.get_operation_count(bulk_uuid).await?;
        let completed_operations = self
            .store
            .count_operations(bulk_uuid, Some(OperationStatus::Complete))
            .await?;

        let status = compute_bulk_status(
            total_operations,
            processed_operations,
            completed_operations,
        );

        debug!(
            bulk_uuid,
            total_operations,
            processed_operations,
            completed_operations,
            status = %status,
            "Derived bulk status"
        );

        Ok(status)
    }

    /// Load the full detailed view: summary plus the ordered operation list.
    ///
    /// Fails with [`BulkStatusError::BulkNotFound`] when no bulk row exists.
    pub async fn get_bulk_detailed_status(&self, bulk_uuid: &str) -> Result<DetailedBulkStatus> {
        let bulk = self.load_bulk(bulk_uuid).await?;
        let operations = self.store.list_operations(bulk_uuid, None).await?;
        let status = self.derive_status_for(&bulk).await?;

        debug!(
            bulk_uuid,
            operations = operations.len(),
            status = %status,
            "Assembled detailed bulk status"
        );

        Ok(DetailedBulkStatus {
            summary: BulkStatusSummary::from_bulk(bulk, status),
            operations,
        })
    }

    /// Load the summary-only view.
    ///
    /// Same `BulkNotFound` behavior as the detailed variant; the operation
    /// list is never surfaced here, so it is not fetched at all.
    pub async fn get_bulk_short_status(&self, bulk_uuid: &str) -> Result<BulkStatusSummary> {
        let bulk = self.load_bulk(bulk_uuid).await?;
        let status = self.derive_status_for(&bulk).await?;

        Ok(BulkStatusSummary::from_bulk(bulk, status))
    }

    /// List failed operations for a bulk.
    ///
    /// With a `failure_type` the result is restricted to that failure status;
    /// without one it is the union of both failure statuses. Never includes
    /// `open` or `complete` rows: a non-failure `failure_type` is rejected
    /// with a validation error. Empty list for an unknown bulk.
    pub async fn get_failed_operations_by_bulk_id(
        &self,
        bulk_uuid: &str,
        failure_type: Option<OperationStatus>,
    ) -> Result<Vec<Operation>> {
        let failure_statuses: Vec<OperationStatus> = match failure_type {
            Some(status) if status.is_failure() => vec![status],
            Some(status) => {
                return Err(BulkStatusError::Validation(format!(
                    "Not a failure status: {status}"
                )));
            }
            None => OperationStatus::failure_statuses().to_vec(),
        };

        self.store
            .list_operations(bulk_uuid, Some(&failure_statuses))
            .await
    }

    /// Exact count of operations for a bulk with the given status. Zero for
    /// an unknown bulk or no matches.
    pub async fn get_operations_count_by_bulk_id_and_status(
        &self,
        bulk_uuid: &str,
        status: OperationStatus,
    ) -> Result<i64> {
        self.store.count_operations(bulk_uuid, Some(status)).await
    }

    /// List all bulks owned by a user, each annotated with its derived
    /// status.
    ///
    /// Ordered by the configured status-priority ranking (failures surface
    /// first, successes last by default), then by `start_time` ascending.
    /// Statuses come from the same canonical calculator as every other call
    /// path, against freshly fetched counts per bulk.
    pub async fn get_bulks_by_user(&self, user_id: i64) -> Result<Vec<BulkStatusSummary>> {
        let bulks = self.store.list_bulks_by_user(user_id).await?;

        let mut summaries = Vec::with_capacity(bulks.len());
        for bulk in bulks {
            let status = self.derive_status_for(&bulk).await?;
            summaries.push(BulkStatusSummary::from_bulk(bulk, status));
        }

        // The store returns start_time order; the stable sort preserves it
        // within each rank.
        summaries.sort_by_key(|summary| self.status_priority.rank(summary.status));

        debug!(user_id, bulks = summaries.len(), "Listed bulks for user");

        Ok(summaries)
    }

    async fn load_bulk(&self, bulk_uuid: &str) -> Result<Bulk> {
        self.store
            .get_bulk(bulk_uuid)
            .await?
            .ok_or_else(|| BulkStatusError::bulk_not_found(bulk_uuid))
    }

    /// Canonical status derivation for a loaded bulk: the declared count from
    /// the row, processed/completed counts fetched fresh.
    async fn derive_status_for(&self, bulk: &Bulk) -> Result<BulkStatus> {
        let processed_operations = self.store.count_operations(&bulk.uuid, None).await?;
        let completed_operations = self
            .store
            .count_operations(&bulk.uuid, Some(OperationStatus::Complete))
            .await?;

        Ok(compute_bulk_status(
            bulk.operation_count,
            processed_operations,
            completed_operations,
        ))
    }
}
