use crate::enums::SaleSource;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A recorded expense. Immutable once created; it can only be deleted by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cost {
    pub id: Uuid,
    pub name: String,
    pub value: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Cost {
    /// Creates a cost with a fresh id, stamped with the current time.
    ///
    /// No validation happens here; use `CostInput::build` for raw user input.
    pub fn new(name: String, value: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            value,
            created_at: Utc::now(),
        }
    }
}

/// A recorded revenue event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub id: Uuid,
    pub source: SaleSource,
    pub value: Decimal,
    /// Units of credit sold, tracked separately from the monetary value.
    pub credits: u32,
    pub customer_name: String,
    /// Link to a `Customer` record, when the sale was attributed to one.
    #[serde(default)]
    pub customer_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Sale {
    /// Creates a sale with a fresh id, stamped with the current time.
    pub fn new(
        source: SaleSource,
        value: Decimal,
        credits: u32,
        customer_name: String,
        customer_id: Option<Uuid>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            source,
            value,
            credits,
            customer_name,
            customer_id,
            created_at: Utc::now(),
        }
    }
}

/// A customer in the relationship list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    pub fn new(name: String, email: Option<String>, phone: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            phone,
            created_at: Utc::now(),
        }
    }
}
