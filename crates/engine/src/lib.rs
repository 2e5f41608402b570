//! # Splitbook Engine
//!
//! The session orchestrator. A `Dashboard` owns the current snapshot of sales, costs
//! and customers, pushes every change through the configured `FinanceStore`, and
//! publishes a `DashboardEvent` for each completed task so the summary is recomputed
//! deterministically after every successful write.

pub mod dashboard;
pub mod error;
pub mod notifier;

pub use dashboard::{Dashboard, DashboardState};
pub use error::EngineError;
pub use notifier::run_notifier;
