//! # Commodity Clearing
//!
//! Deterministic single-commodity market clearing for discrete-event
//! simulations.
//!
//! ## Architecture
//!
//! - **Types**: resources, transactions, messages, trade records, receipts
//! - **Registry**: slab-backed Messages Set with quantity-ordered offer and
//!   request pools
//! - **Engine**: greedy largest-first matching, two-phase commit/rollback,
//!   dispatch to suppliers
//!
//! ## Design Principles
//!
//! 1. **Determinism**: the same accepted messages always clear the same way
//! 2. **No Floating Point**: quantities are fixed-point (10^8 scaling)
//! 3. **Explicit Two-Phase Matching**: a match is a value that is either
//!    committed or rolled back
//! 4. **Synchronous Execution**: `resolve` runs to completion, no async
//!
//! ## Quick Start
//!
//! ```
//! use commodity_clearing::{ClearingConfig, Market, Message, Resource, Transaction};
//! use commodity_clearing::types::quantity::units;
//!
//! let mut market = Market::new(ClearingConfig::new("uranium"), Vec::<Message>::new()).unwrap();
//!
//! let natu = Resource::new("kg", "natu", units(15));
//! market.accept(Message::new(1, 0, Transaction::offer("uranium", 1, natu)));
//! let want = Resource::new("kg", "natu", units(10));
//! market.accept(Message::new(2, 0, Transaction::request("uranium", 2, want)));
//!
//! let result = market.resolve();
//! assert_eq!(result.receipt.requests_satisfied, 1);
//! assert_eq!(market.registry().offered_quantity(), units(5));
//! ```

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types
pub mod types;

/// Pending messages and the offer/request pools
pub mod registry;

/// Matching, commit/rollback and dispatch
pub mod engine;

pub mod config;
pub mod error;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use config::{ClearingConfig, IncompatibleOfferPolicy};
pub use engine::{ClearingResult, Communicator, Market, MatchingEngine, OrderLedger, TentativeMatch};
pub use error::ClearingError;
pub use registry::TransactionRegistry;
pub use types::{
    ClearingReceipt, Direction, FillKind, Message, MessageId, Resource, TradeRecord, Transaction,
    TransactionKind,
};
