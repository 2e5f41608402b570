use crate::error::DbError;
use async_trait::async_trait;
use core_types::{Cost, Customer, Sale};
use uuid::Uuid;

/// The generic, abstract interface to wherever records are persisted.
///
/// Implemented by `LocalStore` (a JSON file) and `DbRepository` (PostgreSQL) so the
/// dashboard never knows which one it is talking to. Records arrive fully built
/// (id and timestamp already assigned); the store only persists them.
///
/// Listing contract: costs and sales newest first, customers by name.
#[async_trait]
pub trait FinanceStore: Send + Sync {
    async fn list_costs(&self) -> Result<Vec<Cost>, DbError>;

    async fn add_cost(&self, cost: &Cost) -> Result<(), DbError>;

    /// Fails with `DbError::NotFound` when no cost has this id.
    async fn remove_cost(&self, id: Uuid) -> Result<(), DbError>;

    async fn list_sales(&self) -> Result<Vec<Sale>, DbError>;

    /// Fails with `DbError::NotFound` when `sale.customer_id` names an unknown customer.
    async fn add_sale(&self, sale: &Sale) -> Result<(), DbError>;

    /// Fails with `DbError::NotFound` when no sale has this id.
    async fn remove_sale(&self, id: Uuid) -> Result<(), DbError>;

    async fn list_customers(&self) -> Result<Vec<Customer>, DbError>;

    async fn add_customer(&self, customer: &Customer) -> Result<(), DbError>;
}

pub(crate) fn sort_newest_first<T>(records: &mut [T], created_at: impl Fn(&T) -> chrono::DateTime<chrono::Utc>) {
    records.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
}

pub(crate) fn sort_by_name(customers: &mut [Customer]) {
    customers.sort_by_cached_key(|c| c.name.to_lowercase());
}
