use crate::report::FinancialSummary;
use configuration::SummaryPolicy;
use core_types::{Cost, Sale};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// A stateless calculator that reduces the recorded sales and costs into a
/// `FinancialSummary` and the 50/50 partner split.
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryEngine {
    policy: SummaryPolicy,
}

impl SummaryEngine {
    pub fn new(policy: SummaryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> SummaryPolicy {
        self.policy
    }

    /// The main entry point for calculating the summary.
    ///
    /// Total over its whole domain: empty collections produce an all-zero summary,
    /// and negative values are summed as given (rejecting them is the job of the
    /// form validation in `core_types::forms`).
    ///
    /// # Arguments
    ///
    /// * `sales` - Every recorded sale; order is irrelevant.
    /// * `costs` - Every recorded cost; order is irrelevant.
    pub fn calculate(&self, sales: &[Sale], costs: &[Cost]) -> FinancialSummary {
        let total_sales = saturating_sum(sales.iter().map(|s| s.value));
        let total_costs = saturating_sum(costs.iter().map(|c| c.value));
        let total_credits: u64 = sales.iter().map(|s| u64::from(s.credits)).sum();

        let deducted_costs = self.deducted_costs(total_sales, total_costs);
        let net_profit = total_sales - deducted_costs;

        FinancialSummary {
            total_sales,
            total_costs,
            net_profit,
            profit_per_partner: net_profit / dec!(2),
            cost_per_partner: deducted_costs / dec!(2),
            total_credits,
        }
    }

    /// The part of the total costs that is charged against sales.
    fn deducted_costs(&self, total_sales: Decimal, total_costs: Decimal) -> Decimal {
        match self.policy {
            SummaryPolicy::FullDeduction => total_costs,
            // Costs beyond total sales are dropped from the split.
            SummaryPolicy::ProportionalCapping => {
                if total_sales > Decimal::ZERO {
                    total_costs.min(total_sales)
                } else {
                    Decimal::ZERO
                }
            }
        }
    }
}

/// Sums amounts, pinning the result at `Decimal::MAX`/`MIN` instead of overflowing.
pub(crate) fn saturating_sum(values: impl IntoIterator<Item = Decimal>) -> Decimal {
    values.into_iter().fold(Decimal::ZERO, Decimal::saturating_add)
}
