//! # Splitbook Events
//!
//! This crate defines the events a dashboard session publishes after each completed
//! task: a record was added or removed, the collections were reloaded, the summary was
//! recomputed, or something went wrong and the user should be told.
//!
//! It depends only on `core-types` for the records and on `analytics` for the
//! `FinancialSummary` snapshot.

// Declare the modules that make up this crate.
pub mod messages;

// Re-export the core types to provide a clean public API.
pub use messages::{DashboardEvent, LogLevel, Notification};
