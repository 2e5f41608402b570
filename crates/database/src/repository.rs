use crate::error::DbError;
use crate::store::FinanceStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use core_types::{Cost, Customer, Sale, SaleSource};
use rust_decimal::Decimal;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;
use uuid::Uuid;

/// The `DbRepository` is the PostgreSQL-backed `FinanceStore`. It encapsulates all
/// SQL queries and the mapping between rows and records.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn cost_from_row(row: &PgRow) -> Result<Cost, DbError> {
    Ok(Cost {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        value: row.try_get("value")?,
        created_at: row.try_get("created_at")?,
    })
}

fn sale_from_row(row: &PgRow) -> Result<Sale, DbError> {
    let source: String = row.try_get("source")?;
    let source: SaleSource = source
        .parse()
        .map_err(|e: core_types::CoreError| DbError::InvalidRecord("sale", e.to_string()))?;

    let credits: i32 = row.try_get("credits")?;
    let credits = u32::try_from(credits)
        .map_err(|_| DbError::InvalidRecord("sale", format!("negative credits ({credits})")))?;

    Ok(Sale {
        id: row.try_get("id")?,
        source,
        value: row.try_get::<Decimal, _>("value")?,
        credits,
        customer_name: row.try_get("customer_name")?,
        customer_id: row.try_get("customer_id")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

fn customer_from_row(row: &PgRow) -> Result<Customer, DbError> {
    Ok(Customer {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl FinanceStore for DbRepository {
    async fn list_costs(&self) -> Result<Vec<Cost>, DbError> {
        let rows = sqlx::query("SELECT id, name, value, created_at FROM costs ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(cost_from_row).collect()
    }

    async fn add_cost(&self, cost: &Cost) -> Result<(), DbError> {
        sqlx::query("INSERT INTO costs (id, name, value, created_at) VALUES ($1, $2, $3, $4)")
            .bind(cost.id)
            .bind(&cost.name)
            .bind(cost.value)
            .bind(cost.created_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn remove_cost(&self, id: Uuid) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM costs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound("cost", id));
        }
        Ok(())
    }

    async fn list_sales(&self) -> Result<Vec<Sale>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, source, value, credits, customer_name, customer_id, created_at
            FROM sales
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(sale_from_row).collect()
    }

    async fn add_sale(&self, sale: &Sale) -> Result<(), DbError> {
        let credits = i32::try_from(sale.credits)
            .map_err(|_| DbError::InvalidRecord("sale", format!("credits too large ({})", sale.credits)))?;

        let result = sqlx::query(
            r#"
            INSERT INTO sales (id, source, value, credits, customer_name, customer_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(sale.id)
        .bind(sale.source.tag())
        .bind(sale.value)
        .bind(credits)
        .bind(&sale.customer_name)
        .bind(sale.customer_id)
        .bind(sale.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            // The customer_id foreign key names an unknown customer.
            Err(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => match sale.customer_id {
                Some(customer_id) => Err(DbError::NotFound("customer", customer_id)),
                None => Err(sqlx::Error::Database(e).into()),
            },
            Err(e) => Err(e.into()),
        }
    }

    async fn remove_sale(&self, id: Uuid) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM sales WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound("sale", id));
        }
        Ok(())
    }

    async fn list_customers(&self) -> Result<Vec<Customer>, DbError> {
        let rows = sqlx::query("SELECT id, name, email, phone, created_at FROM customers ORDER BY lower(name)")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(customer_from_row).collect()
    }

    async fn add_customer(&self, customer: &Customer) -> Result<(), DbError> {
        sqlx::query("INSERT INTO customers (id, name, email, phone, created_at) VALUES ($1, $2, $3, $4, $5)")
            .bind(customer.id)
            .bind(&customer.name)
            .bind(customer.email.as_deref())
            .bind(customer.phone.as_deref())
            .bind(customer.created_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
