use chrono::{DateTime, Utc};
use core_types::{Customer, Sale};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// A customer joined with the statistics of their attributed sales.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerWithStats {
    #[serde(flatten)]
    pub customer: Customer,
    pub total_purchases: usize,
    pub total_spent: Decimal,
    /// `None` when the customer has no attributed sales.
    pub last_purchase_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
struct PurchaseStats {
    count: usize,
    spent: Decimal,
    last: Option<DateTime<Utc>>,
}

/// Joins `sales` onto `customers` by `Sale::customer_id`.
///
/// Sales without a customer id are ignored, as are sales pointing at an id that is
/// not in `customers`. The output keeps the order of `customers`.
pub fn aggregate_customer_stats(customers: &[Customer], sales: &[Sale]) -> Vec<CustomerWithStats> {
    let mut stats: HashMap<Uuid, PurchaseStats> = HashMap::new();

    for sale in sales {
        let Some(customer_id) = sale.customer_id else {
            continue;
        };
        let entry = stats.entry(customer_id).or_default();
        entry.count += 1;
        entry.spent = entry.spent.saturating_add(sale.value);
        entry.last = entry.last.max(Some(sale.created_at));
    }

    customers
        .iter()
        .map(|customer| {
            let s = stats.remove(&customer.id).unwrap_or_default();
            CustomerWithStats {
                customer: customer.clone(),
                total_purchases: s.count,
                total_spent: s.spent,
                last_purchase_date: s.last,
            }
        })
        .collect()
}

/// Case-insensitive substring search over name and email.
///
/// A blank term matches everything.
pub fn search_customers(customers: Vec<CustomerWithStats>, term: &str) -> Vec<CustomerWithStats> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return customers;
    }

    customers
        .into_iter()
        .filter(|c| {
            c.customer.name.to_lowercase().contains(&needle)
                || c
                    .customer
                    .email
                    .as_deref()
                    .is_some_and(|e| e.to_lowercase().contains(&needle))
        })
        .collect()
}
