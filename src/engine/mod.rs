//! Clearing engine: matching, two-phase commit and dispatch.
//!
//! ## Components
//!
//! - [`MatchingEngine`]: greedy largest-first matching of one request,
//!   producing a [`TentativeMatch`]
//! - [`OrderLedger`]: commits or rolls back tentative matches and holds
//!   the firm orders of the cycle
//! - [`Communicator`]: capability trait for anything that receives messages
//! - [`Market`]: owns the registry and runs `resolve` once per cycle
//!
//! ## Determinism
//!
//! Requests and offers are both taken largest first, ties to the latest
//! arrival.
//! All quantities are fixed-point integers, so the same sequence of
//! accepted messages always produces the same orders and the same
//! receipt state root.
//!
//! ## Example
//!
//! ```
//! use commodity_clearing::config::ClearingConfig;
//! use commodity_clearing::engine::Market;
//! use commodity_clearing::types::{Message, Resource, Transaction};
//! use commodity_clearing::types::quantity::units;
//!
//! let mut market = Market::new(ClearingConfig::new("uranium"), Vec::<Message>::new()).unwrap();
//! let natu = |q| Resource::new("kg", "natu", q);
//!
//! market.accept(Message::new(1, 0, Transaction::offer("uranium", 1, natu(units(6)))));
//! market.accept(Message::new(2, 0, Transaction::offer("uranium", 2, natu(units(6)))));
//! market.accept(Message::new(3, 0, Transaction::request("uranium", 3, natu(units(10)))));
//!
//! let result = market.resolve();
//! let filled: Vec<_> = result.trades.iter().map(|t| t.quantity).collect();
//! assert_eq!(filled, vec![units(6), units(4)]);
//! assert_eq!(market.registry().offered_quantity(), units(2));
//! ```

pub mod dispatch;
pub mod ledger;
pub mod market;
pub mod matcher;

pub use dispatch::Communicator;
pub use ledger::{FirmOrder, OrderLedger};
pub use market::{ClearingResult, Market};
pub use matcher::{MatchingEngine, TentativeMatch, TentativeOrder};
