//! Clearing receipt summarizing one resolution cycle.
//!
//! The receipt carries a SHA-256 state root over the SSZ encoding of the
//! cycle's trade records, in dispatch order. Two runs fed the same
//! sequence of offers and requests produce the same root.

use sha2::{Digest, Sha256};
use ssz_rs::prelude::*;

use crate::error::ClearingError;
use crate::types::TradeRecord;

/// Summary of one `resolve` call.
///
/// ## Example
///
/// ```
/// use commodity_clearing::types::ClearingReceipt;
///
/// let receipt = ClearingReceipt::from_trades(1, 0, 0, &[]).unwrap();
/// assert!(receipt.is_empty());
/// assert_eq!(receipt.state_root_hex().len(), 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct ClearingReceipt {
    /// Resolution cycle number, starting at 1
    pub cycle: u64,

    /// Requests taken out of the request pool this cycle
    pub requests_processed: u64,

    /// Requests fully satisfied and committed
    pub requests_satisfied: u64,

    /// Firm orders sent to suppliers
    pub orders_dispatched: u64,

    /// Total quantity across dispatched orders (fixed-point)
    pub quantity_dispatched: u64,

    /// SHA-256 over the SSZ-encoded trade records
    pub state_root: [u8; 32],
}

impl ClearingReceipt {
    /// Build a receipt, computing the state root from `trades`.
    pub fn from_trades(
        cycle: u64,
        requests_processed: u64,
        requests_satisfied: u64,
        trades: &[TradeRecord],
    ) -> Result<Self, ClearingError> {
        let state_root = Self::compute_state_root(trades)?;

        Ok(Self {
            cycle,
            requests_processed,
            requests_satisfied,
            orders_dispatched: trades.len() as u64,
            quantity_dispatched: Self::total_quantity(trades),
            state_root,
        })
    }

    /// Sum of traded quantities, saturating at `u64::MAX`.
    pub fn total_quantity(trades: &[TradeRecord]) -> u64 {
        trades
            .iter()
            .fold(0u64, |acc, trade| acc.saturating_add(trade.quantity))
    }

    /// Hash the SSZ encoding of each record, in order.
    pub fn compute_state_root(trades: &[TradeRecord]) -> Result<[u8; 32], ClearingError> {
        let mut hasher = Sha256::new();
        for trade in trades {
            let bytes = ssz_rs::serialize(trade)
                .map_err(|err| ClearingError::Serialization(format!("{:?}", err)))?;
            hasher.update(&bytes);
        }

        let mut root = [0u8; 32];
        root.copy_from_slice(&hasher.finalize());
        Ok(root)
    }

    pub fn state_root_hex(&self) -> String {
        hex::encode(self.state_root)
    }

    /// True if no requests were processed this cycle.
    pub fn is_empty(&self) -> bool {
        self.requests_processed == 0
    }

    pub fn requests_rejected(&self) -> u64 {
        self.requests_processed.saturating_sub(self.requests_satisfied)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
