use analytics::{format_currency, CustomerWithStats, FinancialSummary};
use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use clap::{Parser, Subcommand};
use comfy_table::{Cell, Color, Table};
use configuration::{init_tracing, load_config, StorageBackend, SummaryPolicy};
use core_types::{Cost, CostInput, CustomerInput, Sale, SaleInput};
use engine::{run_notifier, Dashboard, EngineError};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::process::ExitCode;
use uuid::Uuid;

/// The main entry point for the Splitbook dashboard.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // A rejected form is the user's to fix, not an application failure.
            match e.downcast_ref::<EngineError>() {
                Some(EngineError::Validation(reason)) => eprintln!("Rejected: {reason}"),
                _ => eprintln!("Error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Sales, costs and customers for a two-partner business, with the profit split.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file. Defaults to `splitbook.toml` when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Overrides `summary.policy` from the configuration.
    #[arg(long, global = true, value_enum)]
    policy: Option<SummaryPolicy>,

    /// Overrides `storage.backend` from the configuration.
    #[arg(long, global = true, value_enum)]
    backend: Option<StorageBackend>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show totals and the per-partner split.
    Summary {
        /// Print the summary as JSON instead of tables.
        #[arg(long)]
        json: bool,
    },
    /// Record, list or remove costs.
    #[command(subcommand)]
    Cost(CostCommand),
    /// Record, list or remove sales.
    #[command(subcommand)]
    Sale(SaleCommand),
    /// Register or list customers.
    #[command(subcommand)]
    Customer(CustomerCommand),
}

#[derive(Subcommand)]
enum CostCommand {
    Add {
        #[arg(long)]
        name: String,
        /// Amount, e.g. "120.50" or "120,50".
        #[arg(long, allow_hyphen_values = true)]
        value: String,
    },
    List,
    Remove { id: Uuid },
}

#[derive(Subcommand)]
enum SaleCommand {
    Add {
        /// abacate_pay, pix, whatsapp, instagram, indicacao, outros, or any other name.
        #[arg(long)]
        source: String,
        #[arg(long, allow_hyphen_values = true)]
        value: String,
        #[arg(long, allow_hyphen_values = true)]
        credits: String,
        /// Name shown on the sale.
        #[arg(long)]
        customer: String,
        /// Links the sale to a registered customer.
        #[arg(long)]
        customer_id: Option<Uuid>,
    },
    List,
    Remove { id: Uuid },
}

#[derive(Subcommand)]
enum CustomerCommand {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    List {
        /// Only customers whose name or email contains this text.
        #[arg(long)]
        search: Option<String>,
    },
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn run(cli: Cli) -> Result<()> {
    // `.env` may carry DATABASE_URL and SPLITBOOK__* overrides.
    dotenvy::dotenv().ok();

    let mut config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(policy) = cli.policy {
        config.summary.policy = policy;
    }
    if let Some(backend) = cli.backend {
        config.storage.backend = backend;
    }

    let _log_guard = init_tracing(&config.logging).context("Failed to initialize logging")?;
    tracing::debug!(?config, "Configuration loaded.");

    let store = database::open_store(&config.storage)
        .await
        .context("Failed to open the store")?;
    let mut dashboard = Dashboard::new(store, config.summary.policy);
    let notifier = tokio::spawn(run_notifier(dashboard.subscribe()));

    let outcome = execute(&mut dashboard, cli.command, &config.display.currency_symbol).await;

    // Dropping the dashboard closes the event channel and lets the notifier drain.
    drop(dashboard);
    if let Ok(shown) = notifier.await {
        tracing::debug!(shown, "Notifier finished.");
    }

    outcome
}

async fn execute(dashboard: &mut Dashboard, command: Commands, symbol: &str) -> Result<()> {
    dashboard.refresh().await?;

    match command {
        Commands::Summary { json } => {
            let summary = dashboard.summary();
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_summary(&summary, dashboard.policy(), symbol);
            }
        }
        Commands::Cost(CostCommand::Add { name, value }) => {
            let cost = dashboard.add_cost(&CostInput::new(name, value)).await?;
            println!("Added cost '{}' of {} ({}).", cost.name, format_currency(cost.value, symbol), cost.id);
        }
        Commands::Cost(CostCommand::List) => print_costs(dashboard.costs(), symbol),
        Commands::Cost(CostCommand::Remove { id }) => {
            dashboard.remove_cost(id).await?;
            println!("Removed cost {id}.");
        }
        Commands::Sale(SaleCommand::Add {
            source,
            value,
            credits,
            customer,
            customer_id,
        }) => {
            let input = SaleInput {
                source,
                value,
                credits,
                customer_name: customer,
                customer_id,
            };
            let sale = dashboard.add_sale(&input).await?;
            println!(
                "Added sale of {} via {} to {} ({}).",
                format_currency(sale.value, symbol),
                sale.source,
                sale.customer_name,
                sale.id
            );
        }
        Commands::Sale(SaleCommand::List) => print_sales(dashboard.sales(), symbol),
        Commands::Sale(SaleCommand::Remove { id }) => {
            dashboard.remove_sale(id).await?;
            println!("Removed sale {id}.");
        }
        Commands::Customer(CustomerCommand::Add { name, email, phone }) => {
            let customer = dashboard
                .add_customer(&CustomerInput { name, email, phone })
                .await?;
            println!("Registered customer '{}' ({}).", customer.name, customer.id);
        }
        Commands::Customer(CustomerCommand::List { search }) => {
            print_customers(&dashboard.customers_with_stats(search.as_deref()), symbol);
        }
    }

    Ok(())
}

// ==============================================================================
// Rendering
// ==============================================================================

fn print_summary(summary: &FinancialSummary, policy: SummaryPolicy, symbol: &str) {
    let mut totals = Table::new();
    totals.set_header(vec!["", "Amount"]);
    totals.add_row(vec![Cell::new("Total sales"), Cell::new(format_currency(summary.total_sales, symbol))]);
    totals.add_row(vec![Cell::new("Total costs"), Cell::new(format_currency(summary.total_costs, symbol))]);
    totals.add_row(vec![Cell::new("Net profit"), money_cell(summary.net_profit, symbol)]);
    totals.add_row(vec![Cell::new("Credits sold"), Cell::new(summary.total_credits)]);
    println!("{totals}");

    // Both partners always receive the same share.
    let mut split = Table::new();
    split.set_header(vec!["Partner", "Costs", "Profit"]);
    for partner in ["Partner 1", "Partner 2"] {
        split.add_row(vec![
            Cell::new(partner),
            Cell::new(format_currency(summary.cost_per_partner, symbol)),
            money_cell(summary.profit_per_partner, symbol),
        ]);
    }
    println!("{split}");

    let rule = match policy {
        SummaryPolicy::FullDeduction => "all costs deducted from sales",
        SummaryPolicy::ProportionalCapping => "deducted costs capped at sales",
    };
    println!("Policy: {rule}.");
}

fn print_costs(costs: &[Cost], symbol: &str) {
    if costs.is_empty() {
        println!("No costs recorded.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Date", "Name", "Value", "Id"]);
    for cost in costs {
        table.add_row(vec![
            Cell::new(local_date(cost.created_at)),
            Cell::new(&cost.name),
            Cell::new(format_currency(cost.value, symbol)),
            Cell::new(cost.id),
        ]);
    }
    println!("{table}");
}

fn print_sales(sales: &[Sale], symbol: &str) {
    if sales.is_empty() {
        println!("No sales recorded.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Date", "Source", "Customer", "Value", "Credits", "Id"]);
    for sale in sales {
        table.add_row(vec![
            Cell::new(local_date(sale.created_at)),
            Cell::new(sale.source.label()),
            Cell::new(&sale.customer_name),
            Cell::new(format_currency(sale.value, symbol)),
            Cell::new(sale.credits),
            Cell::new(sale.id),
        ]);
    }
    println!("{table}");
}

fn print_customers(customers: &[CustomerWithStats], symbol: &str) {
    if customers.is_empty() {
        println!("No customers found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Name", "Email", "Phone", "Purchases", "Spent", "Last purchase", "Id"]);
    for entry in customers {
        let customer = &entry.customer;
        table.add_row(vec![
            Cell::new(&customer.name),
            Cell::new(customer.email.as_deref().unwrap_or("-")),
            Cell::new(customer.phone.as_deref().unwrap_or("-")),
            Cell::new(entry.total_purchases),
            Cell::new(format_currency(entry.total_spent, symbol)),
            Cell::new(entry.last_purchase_date.map(local_date).unwrap_or_else(|| "-".to_string())),
            Cell::new(customer.id),
        ]);
    }
    println!("{table}");
}

fn money_cell(value: Decimal, symbol: &str) -> Cell {
    let cell = Cell::new(format_currency(value, symbol));
    if value.is_sign_negative() && !value.is_zero() {
        cell.fg(Color::Red)
    } else {
        cell
    }
}

fn local_date(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%d/%m/%Y %H:%M").to_string()
}
