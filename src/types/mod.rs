//! Core data types for the clearing engine
//!
//! ## Types
//!
//! - [`Resource`]: quantity plus quality descriptor
//! - [`Transaction`]: an offer or request for the market's commodity
//! - [`Message`]: envelope carrying a transaction and routing info
//! - [`TradeRecord`]: a dispatched firm order
//! - [`ClearingReceipt`]: per-cycle summary with state root
//!
//! ## Fixed-Point Arithmetic
//!
//! Quantities, prices and fractions are `u64` scaled by 10^8.
//! See [`quantity`].

mod message;
mod receipt;
mod resource;
mod trade;
mod transaction;
pub mod quantity;

pub use message::{Direction, Message, MessageId};
pub use receipt::ClearingReceipt;
pub use resource::Resource;
pub use trade::{FillKind, TradeRecord};
pub use transaction::{ParticipantId, Transaction, TransactionKind};
