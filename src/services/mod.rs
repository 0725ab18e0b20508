pub mod bulk_status_service;

pub use bulk_status_service::BulkStatusService;
