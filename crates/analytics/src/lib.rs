//! # Splitbook Analytics
//!
//! This crate turns the recorded sales and costs into the numbers the partners look
//! at: totals, net profit and the 50/50 split, plus per-customer purchase statistics.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of storage.
//!   It depends only on `core-types` and `configuration` (for the `SummaryPolicy`).
//! - **Stateless Calculation:** Every function takes the collections as arguments and
//!   returns a fresh result. Nothing is cached; callers recompute after each change.
//!
//! ## Public API
//!
//! - `SummaryEngine`: computes a `FinancialSummary` under the configured policy.
//! - `aggregate_customer_stats` / `search_customers`: the CRM view.
//! - `format_brl` / `format_currency`: display formatting for amounts.

// Declare the modules that constitute this crate.
pub mod currency;
pub mod customers;
pub mod engine;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use currency::{format_brl, format_currency};
pub use customers::{aggregate_customer_stats, search_customers, CustomerWithStats};
pub use engine::SummaryEngine;
pub use report::FinancialSummary;
