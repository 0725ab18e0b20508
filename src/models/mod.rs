pub mod bulk;
pub mod operation;
pub mod summary;

// Re-export core models for easy access
pub use bulk::{Bulk, NewBulk};
pub use operation::{NewOperation, Operation, OperationStatus};
pub use summary::{BulkStatusSummary, DetailedBulkStatus};
