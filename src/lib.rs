//! Dealtrack - dealership sales-pipeline engine
//!
//! This library provides the workflow core of a vehicle-dealership CRM:
//! - Database operations and migrations
//! - Data models for customers, pipeline stages, checklists, and todos
//! - Repository layer for data access
//! - Checklist edit buffer with explicit save/cancel semantics
//! - Task generation from uncompleted checklist items
//! - Realtime reconciliation of change-feed events into local collections
//! - Retry, timeout, and batch-pacing helpers for remote calls
//!
//! # Example
//!
//! ```no_run
//! use dealtrack::checklist::ChecklistEditor;
//! use dealtrack::db::DbConnection;
//! use dealtrack::models::PipelineStage;
//!
//! fn main() -> anyhow::Result<()> {
//!     let conn = DbConnection::connect()?;
//!     let mut editor = ChecklistEditor::open(&conn, 1)?;
//!     editor.toggle_item(PipelineStage::TestDrive, "conduct_test_drive", true);
//!     editor.save(&conn)?;
//!     Ok(())
//! }
//! ```

pub mod checklist;
pub mod db;
pub mod models;
pub mod repo;
pub mod sync;
pub mod utils;
