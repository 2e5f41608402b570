use crate::error::EngineError;
use analytics::{aggregate_customer_stats, search_customers, CustomerWithStats, FinancialSummary, SummaryEngine};
use configuration::SummaryPolicy;
use core_types::{Cost, CostInput, Customer, CustomerInput, Sale, SaleInput};
use database::{DbError, FinanceStore};
use events::{DashboardEvent, Notification};
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Buffered events per subscriber before the slowest one starts lagging.
const EVENT_CAPACITY: usize = 64;

/// The in-memory snapshot of every collection, as last read from the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub costs: Vec<Cost>,
    pub sales: Vec<Sale>,
    pub customers: Vec<Customer>,
}

/// One user's dashboard session.
///
/// Holds the current snapshot explicitly and drives every change through the same
/// sequence: validate, write to the store, re-read the affected collection, then
/// publish the completion event followed by `SummaryUpdated`. If a write fails the
/// snapshot is left untouched and an error `Notification` is published instead. If
/// only the re-read fails the write still counts: the built record goes into the
/// snapshot and a warning `Notification` precedes the usual events.
pub struct Dashboard {
    store: Arc<dyn FinanceStore>,
    engine: SummaryEngine,
    state: DashboardState,
    events: broadcast::Sender<DashboardEvent>,
}

impl Dashboard {
    /// Creates an empty session. Call `refresh` to load the collections.
    pub fn new(store: Arc<dyn FinanceStore>, policy: SummaryPolicy) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            store,
            engine: SummaryEngine::new(policy),
            state: DashboardState::default(),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.events.subscribe()
    }

    pub fn policy(&self) -> SummaryPolicy {
        self.engine.policy()
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn costs(&self) -> &[Cost] {
        &self.state.costs
    }

    pub fn sales(&self) -> &[Sale] {
        &self.state.sales
    }

    /// Recomputed from the current snapshot on every call.
    pub fn summary(&self) -> FinancialSummary {
        self.engine.calculate(&self.state.sales, &self.state.costs)
    }

    /// The CRM view: customers joined with their sales, optionally filtered.
    pub fn customers_with_stats(&self, search: Option<&str>) -> Vec<CustomerWithStats> {
        let all = aggregate_customer_stats(&self.state.customers, &self.state.sales);
        match search {
            Some(term) => search_customers(all, term),
            None => all,
        }
    }

    /// Reloads every collection from the store concurrently.
    pub async fn refresh(&mut self) -> Result<(), EngineError> {
        let fetched = tokio::try_join!(
            self.store.list_costs(),
            self.store.list_sales(),
            self.store.list_customers(),
        );

        let (costs, sales, customers) = match fetched {
            Ok(collections) => collections,
            Err(e) => return Err(self.report("load the dashboard", e)),
        };

        tracing::debug!(
            costs = costs.len(),
            sales = sales.len(),
            customers = customers.len(),
            "Dashboard refreshed."
        );
        self.state = DashboardState {
            costs,
            sales,
            customers,
        };
        self.publish(DashboardEvent::Refreshed);
        self.publish_summary();
        Ok(())
    }

    pub async fn add_cost(&mut self, input: &CostInput) -> Result<Cost, EngineError> {
        let cost = input.build()?;

        if let Err(e) = self.store.add_cost(&cost).await {
            return Err(self.report("save the cost", e));
        }
        match self.store.list_costs().await {
            Ok(costs) => self.state.costs = costs,
            Err(e) => {
                self.warn_stale("cost", "costs", &e);
                self.state.costs.insert(0, cost.clone());
            }
        }

        tracing::info!(cost_id = %cost.id, value = %cost.value, "Cost added.");
        self.publish(DashboardEvent::CostAdded(cost.clone()));
        self.publish_summary();
        Ok(cost)
    }

    pub async fn remove_cost(&mut self, id: Uuid) -> Result<(), EngineError> {
        if let Err(e) = self.store.remove_cost(id).await {
            return Err(self.report("remove the cost", e));
        }
        self.state.costs.retain(|c| c.id != id);

        tracing::info!(cost_id = %id, "Cost removed.");
        self.publish(DashboardEvent::CostRemoved(id));
        self.publish_summary();
        Ok(())
    }

    pub async fn add_sale(&mut self, input: &SaleInput) -> Result<Sale, EngineError> {
        let sale = input.build()?;

        if let Err(e) = self.store.add_sale(&sale).await {
            return Err(self.report("save the sale", e));
        }
        match self.store.list_sales().await {
            Ok(sales) => self.state.sales = sales,
            Err(e) => {
                self.warn_stale("sale", "sales", &e);
                self.state.sales.insert(0, sale.clone());
            }
        }

        tracing::info!(sale_id = %sale.id, value = %sale.value, credits = sale.credits, "Sale added.");
        self.publish(DashboardEvent::SaleAdded(sale.clone()));
        self.publish_summary();
        Ok(sale)
    }

    pub async fn remove_sale(&mut self, id: Uuid) -> Result<(), EngineError> {
        if let Err(e) = self.store.remove_sale(id).await {
            return Err(self.report("remove the sale", e));
        }
        self.state.sales.retain(|s| s.id != id);

        tracing::info!(sale_id = %id, "Sale removed.");
        self.publish(DashboardEvent::SaleRemoved(id));
        self.publish_summary();
        Ok(())
    }

    pub async fn add_customer(&mut self, input: &CustomerInput) -> Result<Customer, EngineError> {
        let customer = input.build()?;

        if let Err(e) = self.store.add_customer(&customer).await {
            return Err(self.report("save the customer", e));
        }
        match self.store.list_customers().await {
            Ok(customers) => self.state.customers = customers,
            Err(e) => {
                self.warn_stale("customer", "customers", &e);
                let key = customer.name.to_lowercase();
                let at = self
                    .state
                    .customers
                    .partition_point(|c| c.name.to_lowercase() <= key);
                self.state.customers.insert(at, customer.clone());
            }
        }

        tracing::info!(customer_id = %customer.id, "Customer added.");
        self.publish(DashboardEvent::CustomerAdded(customer.clone()));
        self.publish_summary();
        Ok(customer)
    }

    fn publish_summary(&self) {
        self.publish(DashboardEvent::SummaryUpdated(self.summary()));
    }

    fn publish(&self, event: DashboardEvent) {
        // Having no subscribers is fine.
        let _ = self.events.send(event);
    }

    /// The record is stored but the collection could not be re-read, so the snapshot
    /// gets the built record instead. Retrying the add would duplicate it.
    fn warn_stale(&self, record: &str, collection: &str, error: &DbError) {
        tracing::warn!(error = %error, "Saved the {record} but could not reload {collection}.");
        self.publish(DashboardEvent::Notification(Notification::warn(format!(
            "Saved the {record}, but could not reload {collection}: {error}"
        ))));
    }

    /// Logs a storage failure, tells the user, and hands the error back to the caller.
    fn report(&self, action: &str, error: DbError) -> EngineError {
        tracing::error!(error = %error, "Failed to {action}.");
        self.publish(DashboardEvent::Notification(Notification::error(format!(
            "Could not {action}: {error}"
        ))));
        EngineError::Database(error)
    }
}
