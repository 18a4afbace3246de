//! Asynchronous implementations of core components
//!
//! This module provides thread-safe, concurrent versions of the group store
//! and ledger using DashMap for locking, plus the batch processor that drives
//! them from tokio tasks.
//!
//! # Architecture
//!
//! - **AsyncGroupStore**: Thread-safe group documents using DashMap
//! - **AsyncGroupLedger**: Applies ledger records with the same rules as
//!   `GroupLedger`
//! - **BatchProcessor**: Partitions batches by group and settles groups
//!   concurrently
//!
//! # Thread Safety
//!
//! - Records for different groups are applied in parallel
//! - Records for the same group are applied in order, under the entry lock
//! - No global locks - fine-grained locking per group

pub mod batch_processor;
pub mod group_store;
pub mod ledger;

pub use batch_processor::{BatchProcessor, ProcessingResult};
pub use group_store::AsyncGroupStore;
pub use ledger::AsyncGroupLedger;
