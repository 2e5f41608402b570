//! # Splitbook Core Types
//!
//! The records every other crate passes around (`Sale`, `Cost`, `Customer`), the
//! raw form inputs that produce them, and the validation error they share.
//! No I/O and no async: this crate sits at the bottom of the dependency graph.

pub mod enums;
pub mod error;
pub mod forms;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::SaleSource;
pub use error::CoreError;
pub use forms::{CostInput, CustomerInput, SaleInput};
pub use structs::{Cost, Customer, Sale};
