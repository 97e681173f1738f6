//! Running HCU consumption of a transaction.

use log::info;

/// Tracks HCU consumed across the operations of one transaction.
#[derive(Debug, Default)]
pub(crate) struct HcuTracker(u64);

impl HcuTracker {
    /// Create a new tracker with zero initial consumption.
    pub fn new() -> Self {
        info!("Initial HCU consumption set as 0");
        Self(0)
    }

    /// Charge HCU for an operation and log the consumption.
    pub fn charge(&mut self, amount: u64, description: &str) {
        self.0 = self.0.saturating_add(amount);
        info!(
            "{description} consumes {amount} HCU and the accumulated HCU consumption is {}",
            self.0
        );
    }

    pub fn total(&self) -> u64 {
        self.0
    }
}
