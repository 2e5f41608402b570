//! Raw user input and the rules for turning it into records.
//!
//! Every `build` either returns a fully-formed record (fresh id, creation timestamp)
//! or a `CoreError::InvalidInput` naming the field that was rejected. Nothing here
//! touches storage; the caller appends the record and persists it.

use crate::enums::SaleSource;
use crate::error::CoreError;
use crate::structs::{Cost, Customer, Sale};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// The cost form as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostInput {
    pub name: String,
    pub value: String,
}

impl CostInput {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn build(&self) -> Result<Cost, CoreError> {
        let name = required_text("name", &self.name)?;
        let value = parse_amount("value", &self.value)?;
        Ok(Cost::new(name, value))
    }
}

/// The sale form as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleInput {
    pub source: String,
    pub value: String,
    pub credits: String,
    pub customer_name: String,
    pub customer_id: Option<Uuid>,
}

impl SaleInput {
    pub fn build(&self) -> Result<Sale, CoreError> {
        let source = SaleSource::from_str(&self.source)?;
        let value = parse_amount("value", &self.value)?;
        let credits = parse_credits(&self.credits)?;
        let customer_name = required_text("customer_name", &self.customer_name)?;
        Ok(Sale::new(
            source,
            value,
            credits,
            customer_name,
            self.customer_id,
        ))
    }
}

/// The new-customer form as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInput {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl CustomerInput {
    pub fn build(&self) -> Result<Customer, CoreError> {
        let name = required_text("name", &self.name)?;
        let email = optional_text(self.email.as_deref());
        if let Some(email) = &email {
            validate_email(email)?;
        }
        let phone = optional_text(self.phone.as_deref());
        Ok(Customer::new(name, email, phone))
    }
}

fn required_text(field: &str, raw: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::invalid(field, "must not be empty"));
    }
    Ok(trimmed.to_string())
}

fn optional_text(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn validate_email(email: &str) -> Result<(), CoreError> {
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(CoreError::invalid("email", format!("'{email}' is not an email address"))),
    }
}

/// The largest amount a form accepts, in whole currency units.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000_000;

/// The largest credit count a form accepts; it must fit a PostgreSQL `INTEGER`.
pub const MAX_CREDITS: u32 = i32::MAX as u32;

/// Parses a non-negative monetary amount with at most two decimal places.
///
/// Accepts a comma as the decimal separator when no dot is present ("12,50").
pub fn parse_amount(field: &str, raw: &str) -> Result<Decimal, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::invalid(field, "must not be empty"));
    }

    let normalized = if trimmed.contains(',') && !trimmed.contains('.') {
        trimmed.replacen(',', ".", 1)
    } else {
        trimmed.to_string()
    };

    let amount = Decimal::from_str(&normalized)
        .map_err(|_| CoreError::invalid(field, format!("'{trimmed}' is not a number")))?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(CoreError::invalid(field, "must not be negative"));
    }
    if amount > Decimal::from(MAX_AMOUNT) {
        return Err(CoreError::invalid(field, "too large"));
    }
    if amount.normalize().scale() > 2 {
        return Err(CoreError::invalid(field, "must have at most two decimal places"));
    }
    // "-0" parses as a negative zero; store it as plain zero.
    Ok(amount.abs())
}

/// Parses a non-negative whole number of credits.
pub fn parse_credits(raw: &str) -> Result<u32, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::invalid("credits", "must not be empty"));
    }
    if trimmed.starts_with('-') {
        return Err(CoreError::invalid("credits", "must not be negative"));
    }
    let credits = trimmed
        .parse::<u32>()
        .map_err(|_| CoreError::invalid("credits", format!("'{trimmed}' is not a whole number")))?;
    if credits > MAX_CREDITS {
        return Err(CoreError::invalid("credits", "too large"));
    }
    Ok(credits)
}
