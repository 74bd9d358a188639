use crate::pricing::models::{CostBreakdown, UsdAmount};
use crate::pricing::table::PricingTable;
use std::sync::Arc;
use tracing::warn;

/// Calculator for computing request costs based on token usage
#[derive(Debug, Clone)]
pub struct CostCalculator {
    table: Arc<PricingTable>,
}

impl CostCalculator {
    /// Create a new cost calculator
    pub fn new(table: Arc<PricingTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &PricingTable {
        &self.table
    }

    /// Calculate cost for a request
    /// Returns zero cost if the model has no pricing entry
    pub fn calculate_cost(&self, model: &str, input_tokens: u64, output_tokens: u64) -> CostBreakdown {
        let price = match self.table.get(model) {
            Some(p) => p,
            None => {
                warn!(model = %model, "No pricing data for model, reporting zero cost");
                return CostBreakdown::zero();
            }
        };

        // Prices are per 1K tokens
        let input_cost = (input_tokens as f64 / 1000.0) * price.input_per_1k;
        let output_cost = (output_tokens as f64 / 1000.0) * price.output_per_1k;

        CostBreakdown::new(
            UsdAmount::from_dollars(input_cost),
            UsdAmount::from_dollars(output_cost),
        )
    }
}
