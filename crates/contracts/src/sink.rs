//! SummarySink trait - Summary Emitter output interface

use crate::{ContractError, NeighborSummary};

/// Summary output trait
///
/// All sink implementations must implement this trait.
#[trait_variant::make(SummarySink: Send)]
pub trait LocalSummarySink {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Write the summary record
    ///
    /// # Errors
    /// Returns write error (should include context)
    async fn write(&mut self, summary: &NeighborSummary) -> Result<(), ContractError>;

    /// Flush buffer (if any)
    async fn flush(&mut self) -> Result<(), ContractError>;

    /// Close sink
    async fn close(&mut self) -> Result<(), ContractError>;
}
