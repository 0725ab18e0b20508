#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Bulk Status Core
//!
//! Derives the aggregate lifecycle status of "bulk" units of asynchronous
//! work from counts of their individually-tracked operation rows.
//!
//! ## Overview
//!
//! A bulk is a batch of many queued operations, each processed independently
//! and concurrently by external workers. This crate answers "is this bulk not
//! yet started, in progress, finished successfully, or finished with
//! failures?" and provides summary and detailed views plus targeted queries
//! for failed or status-filtered operations. It holds no state of its own:
//! every answer is a request-scoped derivation over a durable store that the
//! scheduling/execution pipeline writes to.
//!
//! Scheduling, execution, retry policy, and record creation are all outside
//! this crate; it only reads and derives.
//!
//! ## Module Organization
//!
//! - [`status`] - The canonical status calculator and aggregate status enum
//! - [`models`] - Bulk and operation records plus the assembled result shapes
//! - [`store`] - The storage seam: trait, Postgres and in-memory backends
//! - [`services`] - The public bulk status service
//! - [`config`] - Environment-driven configuration
//! - [`error`] - Structured error handling
//! - [`logging`] - Tracing initialization
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bulk_status_core::config::BulkStatusConfig;
//! use bulk_status_core::services::BulkStatusService;
//! use bulk_status_core::store::PgBulkStatusStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = BulkStatusConfig::from_env()?;
//! let store = PgBulkStatusStore::connect(&config).await?;
//! let service = BulkStatusService::new(store);
//!
//! let status = service.get_bulk_status("bulk-uuid-1").await?;
//! println!("bulk is {status}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency Model
//!
//! All operations are read-only and may be invoked concurrently without
//! coordination. Operation rows are mutated by external workers at any time
//! and no snapshot isolation spans a multi-query derivation, so two
//! consecutive reads can legitimately disagree; that staleness is documented
//! behavior, not a bug.

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod status;
pub mod store;
pub mod test_utils;

pub use config::BulkStatusConfig;
pub use error::{BulkStatusError, Result};
pub use models::{Bulk, BulkStatusSummary, DetailedBulkStatus, Operation, OperationStatus};
pub use services::BulkStatusService;
pub use status::{compute_bulk_status, BulkStatus, StatusPriority};
pub use store::{BulkStatusStore, InMemoryBulkStatusStore, PgBulkStatusStore};
