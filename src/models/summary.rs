//! # Result Shapes
//!
//! Response objects assembled by the bulk status service.
//!
//! The short and detailed variants share an explicit summary substructure by
//! composition, so there is never ambiguity about which fields are populated:
//! a [`BulkStatusSummary`] is always fully populated, and only
//! [`DetailedBulkStatus`] carries the operation list.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::bulk::Bulk;
use crate::models::operation::Operation;
use crate::status::BulkStatus;

/// Summary view of one bulk: the stored record fields plus the derived
/// aggregate status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkStatusSummary {
    pub uuid: String,
    pub user_id: i64,
    pub description: String,
    pub operation_count: i64,
    pub start_time: NaiveDateTime,
    /// Derived via the canonical status calculator at assembly time; this
    /// value is a point-in-time view and may differ between two consecutive
    /// reads while workers are processing
    pub status: BulkStatus,
}

impl BulkStatusSummary {
    pub fn from_bulk(bulk: Bulk, status: BulkStatus) -> Self {
        Self {
            uuid: bulk.uuid,
            user_id: bulk.user_id,
            description: bulk.description,
            operation_count: bulk.operation_count,
            start_time: bulk.start_time,
            status,
        }
    }
}

/// Detailed view: the summary plus the full ordered operation list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedBulkStatus {
    pub summary: BulkStatusSummary,
    pub operations: Vec<Operation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_from_bulk() {
        let bulk = Bulk {
            uuid: "bulk-9".to_string(),
            user_id: 3,
            description: "Import customers".to_string(),
            operation_count: 12,
            start_time: chrono::Utc::now().naive_utc(),
        };

        let summary = BulkStatusSummary::from_bulk(bulk.clone(), BulkStatus::InProgress);
        assert_eq!(summary.uuid, bulk.uuid);
        assert_eq!(summary.operation_count, 12);
        assert_eq!(summary.status, BulkStatus::InProgress);
    }
}
