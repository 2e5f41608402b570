use analytics::FinancialSummary;
use chrono::{DateTime, Utc};
use core_types::{Cost, Customer, Sale};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Enum representing the severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    /// The task went through, but part of it did not.
    Warn,
    Error,
}

/// A non-blocking message for the user, e.g. "failed to save the sale".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
}

impl Notification {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            message: message.into(),
        }
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Warn, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Error, message)
    }
}

/// The top-level dashboard event enum.
///
/// Every completed write produces its own event, always followed by a
/// `SummaryUpdated` carrying the recomputed figures. Serialized as
/// `{ "type": "...", "payload": { ... } }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum DashboardEvent {
    /// The collections were reloaded from the store.
    Refreshed,
    CostAdded(Cost),
    CostRemoved(Uuid),
    SaleAdded(Sale),
    SaleRemoved(Uuid),
    CustomerAdded(Customer),
    /// The summary recomputed after a successful write or refresh.
    SummaryUpdated(FinancialSummary),
    Notification(Notification),
}
