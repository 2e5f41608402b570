use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The derived financial figures for the current sales and costs.
///
/// Never stored: it is recomputed by the `SummaryEngine` on every read so it can
/// not drift from the collections it was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub total_sales: Decimal,
    pub total_costs: Decimal,
    pub net_profit: Decimal,
    /// Each partner's half of `net_profit`.
    pub profit_per_partner: Decimal,
    /// Each partner's half of the deducted costs.
    pub cost_per_partner: Decimal,
    pub total_credits: u64,
}

impl FinancialSummary {
    /// Creates a new, zeroed-out summary.
    pub fn new() -> Self {
        Self {
            total_sales: Decimal::ZERO,
            total_costs: Decimal::ZERO,
            net_profit: Decimal::ZERO,
            profit_per_partner: Decimal::ZERO,
            cost_per_partner: Decimal::ZERO,
            total_credits: 0,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::new()
    }
}

impl Default for FinancialSummary {
    fn default() -> Self {
        Self::new()
    }
}
