use crate::error::DbError;
use crate::store::{sort_by_name, sort_newest_first, FinanceStore};
use async_trait::async_trait;
use core_types::{Cost, Customer, Sale};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use uuid::Uuid;

/// The on-disk document: every collection in one JSON file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LocalData {
    #[serde(default)]
    costs: Vec<Cost>,
    #[serde(default)]
    sales: Vec<Sale>,
    #[serde(default)]
    customers: Vec<Customer>,
}

/// A `FinanceStore` kept in a single JSON file on the local disk.
///
/// Writes go to a copy of the data which is flushed to `<file>.tmp` and renamed
/// over the original; only then does the in-memory copy change. A failed write
/// therefore leaves both the file and the store exactly as they were.
#[derive(Debug)]
pub struct LocalStore {
    path: Option<PathBuf>,
    data: Mutex<LocalData>,
}

impl LocalStore {
    /// Opens the store at `path`, starting empty if the file does not exist yet.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, DbError> {
        let path = path.into();
        let data = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => LocalData::default(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == ErrorKind::NotFound => LocalData::default(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(
            path = %path.display(),
            costs = data.costs.len(),
            sales = data.sales.len(),
            customers = data.customers.len(),
            "Opened local store."
        );

        Ok(Self {
            path: Some(path),
            data: Mutex::new(data),
        })
    }

    /// A store that never touches the disk.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            data: Mutex::new(LocalData::default()),
        }
    }

    async fn write<F>(&self, change: F) -> Result<(), DbError>
    where
        F: FnOnce(&mut LocalData) -> Result<(), DbError> + Send,
    {
        let mut guard = self.data.lock().await;
        let mut next = guard.clone();
        change(&mut next)?;

        if let Some(path) = &self.path {
            persist(path, &next).await?;
        }
        *guard = next;
        Ok(())
    }
}

async fn persist(path: &Path, data: &LocalData) -> Result<(), DbError> {
    let bytes = serde_json::to_vec_pretty(data)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

#[async_trait]
impl FinanceStore for LocalStore {
    async fn list_costs(&self) -> Result<Vec<Cost>, DbError> {
        let mut costs = self.data.lock().await.costs.clone();
        sort_newest_first(&mut costs, |c| c.created_at);
        Ok(costs)
    }

    async fn add_cost(&self, cost: &Cost) -> Result<(), DbError> {
        let cost = cost.clone();
        self.write(move |data| {
            data.costs.push(cost);
            Ok(())
        })
        .await
    }

    async fn remove_cost(&self, id: Uuid) -> Result<(), DbError> {
        self.write(move |data| {
            let before = data.costs.len();
            data.costs.retain(|c| c.id != id);
            if data.costs.len() == before {
                return Err(DbError::NotFound("cost", id));
            }
            Ok(())
        })
        .await
    }

    async fn list_sales(&self) -> Result<Vec<Sale>, DbError> {
        let mut sales = self.data.lock().await.sales.clone();
        sort_newest_first(&mut sales, |s| s.created_at);
        Ok(sales)
    }

    async fn add_sale(&self, sale: &Sale) -> Result<(), DbError> {
        let sale = sale.clone();
        self.write(move |data| {
            if let Some(customer_id) = sale.customer_id {
                if !data.customers.iter().any(|c| c.id == customer_id) {
                    return Err(DbError::NotFound("customer", customer_id));
                }
            }
            data.sales.push(sale);
            Ok(())
        })
        .await
    }

    async fn remove_sale(&self, id: Uuid) -> Result<(), DbError> {
        self.write(move |data| {
            let before = data.sales.len();
            data.sales.retain(|s| s.id != id);
            if data.sales.len() == before {
                return Err(DbError::NotFound("sale", id));
            }
            Ok(())
        })
        .await
    }

    async fn list_customers(&self) -> Result<Vec<Customer>, DbError> {
        let mut customers = self.data.lock().await.customers.clone();
        sort_by_name(&mut customers);
        Ok(customers)
    }

    async fn add_customer(&self, customer: &Customer) -> Result<(), DbError> {
        let customer = customer.clone();
        self.write(move |data| {
            data.customers.push(customer);
            Ok(())
        })
        .await
    }
}
