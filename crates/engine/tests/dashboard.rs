use async_trait::async_trait;
use configuration::SummaryPolicy;
use core_types::{Cost, CostInput, Customer, CustomerInput, Sale, SaleInput, SaleSource};
use database::{DbError, FinanceStore, LocalStore};
use engine::{run_notifier, Dashboard, EngineError};
use events::{DashboardEvent, LogLevel};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast::error::TryRecvError;
use tokio::sync::broadcast::Receiver;
use uuid::Uuid;

/// Wraps a real store. Every call fails while `down` is set; only the list calls
/// fail while `reads_down` is set.
struct FlakyStore {
    inner: LocalStore,
    down: AtomicBool,
    reads_down: AtomicBool,
}

impl FlakyStore {
    fn new() -> Self {
        Self {
            inner: LocalStore::in_memory(),
            down: AtomicBool::new(false),
            reads_down: AtomicBool::new(false),
        }
    }

    fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    fn set_reads_down(&self, down: bool) {
        self.reads_down.store(down, Ordering::SeqCst);
    }

    fn check_read(&self) -> Result<(), DbError> {
        if self.reads_down.load(Ordering::SeqCst) {
            return Err(DbError::Io(io::Error::other("replica offline")));
        }
        self.check()
    }

    fn check(&self) -> Result<(), DbError> {
        if self.down.load(Ordering::SeqCst) {
            return Err(DbError::Io(io::Error::other("store offline")));
        }
        Ok(())
    }
}

#[async_trait]
impl FinanceStore for FlakyStore {
    async fn list_costs(&self) -> Result<Vec<Cost>, DbError> {
        self.check_read()?;
        self.inner.list_costs().await
    }
    async fn add_cost(&self, cost: &Cost) -> Result<(), DbError> {
        self.check()?;
        self.inner.add_cost(cost).await
    }
    async fn remove_cost(&self, id: Uuid) -> Result<(), DbError> {
        self.check()?;
        self.inner.remove_cost(id).await
    }
    async fn list_sales(&self) -> Result<Vec<Sale>, DbError> {
        self.check_read()?;
        self.inner.list_sales().await
    }
    async fn add_sale(&self, sale: &Sale) -> Result<(), DbError> {
        self.check()?;
        self.inner.add_sale(sale).await
    }
    async fn remove_sale(&self, id: Uuid) -> Result<(), DbError> {
        self.check()?;
        self.inner.remove_sale(id).await
    }
    async fn list_customers(&self) -> Result<Vec<Customer>, DbError> {
        self.check_read()?;
        self.inner.list_customers().await
    }
    async fn add_customer(&self, customer: &Customer) -> Result<(), DbError> {
        self.check()?;
        self.inner.add_customer(customer).await
    }
}

fn sale_input(value: &str, credits: &str) -> SaleInput {
    SaleInput {
        source: "pix".to_string(),
        value: value.to_string(),
        credits: credits.to_string(),
        customer_name: "Rita".to_string(),
        customer_id: None,
    }
}

fn drain(rx: &mut Receiver<DashboardEvent>) -> Vec<DashboardEvent> {
    let mut events = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(event) => events.push(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return events,
            Err(TryRecvError::Lagged(_)) => continue,
        }
    }
}

#[tokio::test]
async fn writes_update_the_summary() {
    let mut dashboard = Dashboard::new(Arc::new(LocalStore::in_memory()), SummaryPolicy::FullDeduction);
    dashboard.refresh().await.unwrap();
    assert!(dashboard.summary().is_zero());

    dashboard.add_sale(&sale_input("100", "5")).await.unwrap();
    dashboard.add_sale(&sale_input("50", "2")).await.unwrap();
    dashboard.add_cost(&CostInput::new("Servidor", "30")).await.unwrap();

    let summary = dashboard.summary();
    assert_eq!(summary.total_sales, dec!(150));
    assert_eq!(summary.total_costs, dec!(30));
    assert_eq!(summary.net_profit, dec!(120));
    assert_eq!(summary.profit_per_partner, dec!(60));
    assert_eq!(summary.cost_per_partner, dec!(15));
    assert_eq!(summary.total_credits, 7);
}

#[tokio::test]
async fn each_write_publishes_its_event_then_the_summary() {
    let mut dashboard = Dashboard::new(Arc::new(LocalStore::in_memory()), SummaryPolicy::FullDeduction);
    let mut rx = dashboard.subscribe();

    let cost = dashboard.add_cost(&CostInput::new("Anúncios", "40")).await.unwrap();
    dashboard.remove_cost(cost.id).await.unwrap();

    let events = drain(&mut rx);
    assert_eq!(events.len(), 4);
    assert!(matches!(&events[0], DashboardEvent::CostAdded(c) if c.id == cost.id));
    assert!(matches!(&events[1], DashboardEvent::SummaryUpdated(s) if s.total_costs == dec!(40)));
    assert!(matches!(&events[2], DashboardEvent::CostRemoved(id) if *id == cost.id));
    assert!(matches!(&events[3], DashboardEvent::SummaryUpdated(s) if s.is_zero()));
}

#[tokio::test]
async fn rejected_input_writes_nothing_and_stays_quiet() {
    let store = Arc::new(LocalStore::in_memory());
    let mut dashboard = Dashboard::new(store.clone(), SummaryPolicy::FullDeduction);
    let mut rx = dashboard.subscribe();

    let err = dashboard.add_sale(&sale_input("10", "1.5")).await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(ref e) if e.field() == "credits"));

    let err = dashboard.add_cost(&CostInput::new("", "10")).await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    assert!(store.list_sales().await.unwrap().is_empty());
    assert!(store.list_costs().await.unwrap().is_empty());
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn storage_failure_keeps_the_snapshot_and_notifies() {
    let store = Arc::new(FlakyStore::new());
    let mut dashboard = Dashboard::new(store.clone(), SummaryPolicy::FullDeduction);
    dashboard.add_cost(&CostInput::new("Aluguel", "500")).await.unwrap();
    let before = dashboard.state().clone();
    let mut rx = dashboard.subscribe();

    store.set_down(true);
    let err = dashboard.add_cost(&CostInput::new("Luz", "80")).await.unwrap_err();
    assert!(matches!(err, EngineError::Database(_)));
    let err = dashboard.refresh().await.unwrap_err();
    assert!(matches!(err, EngineError::Database(_)));

    assert_eq!(dashboard.state(), &before);
    let events = drain(&mut rx);
    assert_eq!(events.len(), 2);
    for event in events {
        match event {
            DashboardEvent::Notification(n) => assert_eq!(n.level, LogLevel::Error),
            other => panic!("unexpected event {other:?}"),
        }
    }

    store.set_down(false);
    dashboard.refresh().await.unwrap();
    assert_eq!(dashboard.summary().total_costs, dec!(500));
}

#[tokio::test]
async fn removing_a_sale_removes_exactly_that_sale() {
    let mut dashboard = Dashboard::new(Arc::new(LocalStore::in_memory()), SummaryPolicy::FullDeduction);
    let a = dashboard.add_sale(&sale_input("10", "1")).await.unwrap();
    let b = dashboard.add_sale(&sale_input("20", "2")).await.unwrap();
    let c = dashboard.add_sale(&sale_input("30", "3")).await.unwrap();

    dashboard.remove_sale(b.id).await.unwrap();

    let remaining: Vec<Uuid> = dashboard.sales().iter().map(|s| s.id).collect();
    assert_eq!(remaining.len(), 2);
    assert!(remaining.contains(&a.id) && remaining.contains(&c.id));
    let summary = dashboard.summary();
    assert_eq!(summary.total_sales, dec!(40));
    assert_eq!(summary.total_credits, 4);
}

#[tokio::test]
async fn removing_an_unknown_sale_is_reported() {
    let mut dashboard = Dashboard::new(Arc::new(LocalStore::in_memory()), SummaryPolicy::FullDeduction);
    dashboard.add_sale(&sale_input("10", "1")).await.unwrap();
    let mut rx = dashboard.subscribe();

    let err = dashboard.remove_sale(Uuid::new_v4()).await.unwrap_err();

    assert!(matches!(err, EngineError::Database(DbError::NotFound("sale", _))));
    assert_eq!(dashboard.sales().len(), 1);
    assert!(matches!(drain(&mut rx).as_slice(), [DashboardEvent::Notification(_)]));
}

#[tokio::test]
async fn policies_diverge_when_costs_exceed_sales() {
    let store: Arc<LocalStore> = Arc::new(LocalStore::in_memory());
    let mut full = Dashboard::new(store.clone(), SummaryPolicy::FullDeduction);
    full.add_sale(&sale_input("20", "0")).await.unwrap();
    full.add_cost(&CostInput::new("Equipamento", "50")).await.unwrap();

    let mut capped = Dashboard::new(store, SummaryPolicy::ProportionalCapping);
    capped.refresh().await.unwrap();

    let a = full.summary();
    assert_eq!(a.net_profit, dec!(-30));
    assert_eq!(a.profit_per_partner, dec!(-15));

    let b = capped.summary();
    assert_eq!(b.net_profit, Decimal::ZERO);
    assert_eq!(b.profit_per_partner, Decimal::ZERO);
    assert_eq!(b.cost_per_partner, dec!(10));
}

#[tokio::test]
async fn customer_statistics_follow_linked_sales() {
    let mut dashboard = Dashboard::new(Arc::new(LocalStore::in_memory()), SummaryPolicy::FullDeduction);
    let lia = dashboard
        .add_customer(&CustomerInput {
            name: "Lia".to_string(),
            email: Some("lia@exemplo.com".to_string()),
            phone: None,
        })
        .await
        .unwrap();
    dashboard
        .add_customer(&CustomerInput {
            name: "Otto".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    let first = dashboard
        .add_sale(&SaleInput { customer_id: Some(lia.id), ..sale_input("10", "1") })
        .await
        .unwrap();
    let second = dashboard
        .add_sale(&SaleInput { customer_id: Some(lia.id), ..sale_input("20", "1") })
        .await
        .unwrap();
    dashboard.add_sale(&sale_input("999", "1")).await.unwrap();

    let stats = dashboard.customers_with_stats(None);
    assert_eq!(stats.len(), 2);
    assert_eq!(stats[0].customer.name, "Lia");
    assert_eq!(stats[0].total_purchases, 2);
    assert_eq!(stats[0].total_spent, dec!(30));
    assert_eq!(stats[0].last_purchase_date, Some(first.created_at.max(second.created_at)));
    assert_eq!(stats[1].total_purchases, 0);
    assert_eq!(stats[1].last_purchase_date, None);

    let found = dashboard.customers_with_stats(Some("EXEMPLO"));
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].customer.id, lia.id);
}

#[tokio::test]
async fn notifier_reports_failures_and_stops_with_the_dashboard() {
    let store = Arc::new(FlakyStore::new());
    let mut dashboard = Dashboard::new(store.clone(), SummaryPolicy::FullDeduction);
    let notifier = tokio::spawn(run_notifier(dashboard.subscribe()));

    dashboard.add_cost(&CostInput::new("Contador", "120")).await.unwrap();
    store.set_down(true);
    let _ = dashboard.refresh().await;
    drop(dashboard);

    assert_eq!(notifier.await.unwrap(), 1);
}

#[tokio::test]
async fn saved_records_survive_a_failed_reload() {
    let store = Arc::new(FlakyStore::new());
    let mut dashboard = Dashboard::new(store.clone(), SummaryPolicy::FullDeduction);
    dashboard
        .add_customer(&CustomerInput { name: "Zeca".to_string(), ..Default::default() })
        .await
        .unwrap();
    let mut rx = dashboard.subscribe();

    store.set_reads_down(true);
    let cost = dashboard.add_cost(&CostInput::new("Internet", "99,90")).await.unwrap();
    let sale = dashboard.add_sale(&sale_input("250", "3")).await.unwrap();
    let bia = dashboard
        .add_customer(&CustomerInput { name: "Bia".to_string(), ..Default::default() })
        .await
        .unwrap();

    assert_eq!(dashboard.costs()[0].id, cost.id);
    assert_eq!(dashboard.sales()[0].id, sale.id);
    assert_eq!(dashboard.state().customers[0].id, bia.id);
    assert_eq!(dashboard.summary().net_profit, dec!(150.10));

    let events = drain(&mut rx);
    assert_eq!(events.len(), 9);
    assert!(matches!(&events[0], DashboardEvent::Notification(n) if n.level == LogLevel::Warn));
    assert!(matches!(&events[1], DashboardEvent::CostAdded(c) if c.id == cost.id));
    assert!(matches!(&events[2], DashboardEvent::SummaryUpdated(_)));

    // Nothing was written twice.
    store.set_reads_down(false);
    dashboard.refresh().await.unwrap();
    assert_eq!(dashboard.costs().len(), 1);
    assert_eq!(dashboard.sales().len(), 1);
    assert_eq!(dashboard.state().customers.len(), 2);
}

#[tokio::test]
async fn oversized_amounts_are_rejected_at_the_form() {
    let store = Arc::new(LocalStore::in_memory());
    let mut dashboard = Dashboard::new(store.clone(), SummaryPolicy::FullDeduction);

    let err = dashboard
        .add_sale(&sale_input("79228162514264337593543950335", "1"))
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::Validation(ref e) if e.field() == "value"));
    assert!(store.list_sales().await.unwrap().is_empty());
}

#[tokio::test]
async fn stored_oversized_amounts_do_not_break_the_session() {
    for policy in [SummaryPolicy::FullDeduction, SummaryPolicy::ProportionalCapping] {
        // Written straight to the store, as an older build would have allowed.
        let store = Arc::new(LocalStore::in_memory());
        for _ in 0..2 {
            let sale = Sale::new(SaleSource::Pix, Decimal::MAX, 1, "Rita".to_string(), None);
            store.add_sale(&sale).await.unwrap();
        }
        store.add_cost(&Cost::new("Aluguel".to_string(), dec!(10))).await.unwrap();

        let mut dashboard = Dashboard::new(store, policy);
        dashboard.refresh().await.unwrap();

        let summary = dashboard.summary();
        assert_eq!(summary.total_sales, Decimal::MAX);
        assert_eq!(summary.net_profit, Decimal::MAX - dec!(10));
        assert_eq!(summary.total_credits, 2);

        dashboard.add_cost(&CostInput::new("Luz", "5")).await.unwrap();
        assert_eq!(dashboard.summary().total_costs, dec!(15));
    }
}
