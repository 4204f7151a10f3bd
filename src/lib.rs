// src/lib.rs

//! Schedule Sync Library
//!
//! Reconciles per-group lesson/exam listings scraped from a university
//! website against a store of record, producing a minimal, idempotent set
//! of create/update/delete operations.

pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod normalize;
pub mod reconcile;
pub mod sync;

pub use config::Config;
pub use error::{AppError, Result};
pub use models::SyncReport;
pub use sync::{DEFAULT_CHUNK_SIZE, SyncOrchestrator, run_sync};
