//! Firm orders and the commit / rollback of tentative matches.
//!
//! ## Two-phase resolution
//!
//! A [`TentativeMatch`] is consumed by exactly one of:
//!
//! - [`OrderLedger::commit`]: its orders become firm and the offers they
//!   were taken from leave the market
//! - [`OrderLedger::rollback`]: its orders are dropped, consumed offers go
//!   back into the pool and any re-offered remainder is withdrawn
//!
//! After a rollback the offer pool is exactly what it was before the
//! match started (with [`IncompatibleOfferPolicy::Requeue`]).

use tracing::{debug, trace};

use crate::config::IncompatibleOfferPolicy;
use crate::engine::TentativeMatch;
use crate::registry::TransactionRegistry;
use crate::types::{Message, MessageId, TradeRecord};

/// An order that survived commit and waits to be dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirmOrder {
    pub record: TradeRecord,
    pub message: Message,
}

/// Collects firm orders for the current cycle.
///
/// Trade ids are assigned at commit and keep increasing across cycles.
#[derive(Debug)]
pub struct OrderLedger {
    firm: Vec<FirmOrder>,
    incompatible: IncompatibleOfferPolicy,
    next_trade_id: u64,
}

impl Default for OrderLedger {
    fn default() -> Self {
        Self::new(IncompatibleOfferPolicy::default())
    }
}

impl OrderLedger {
    pub fn new(incompatible: IncompatibleOfferPolicy) -> Self {
        Self {
            firm: Vec::new(),
            incompatible,
            next_trade_id: 1,
        }
    }

    /// Number of firm orders. Only grows through [`commit`](Self::commit).
    #[inline]
    pub fn firm_len(&self) -> usize {
        self.firm.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.firm.is_empty()
    }

    pub fn firm_orders(&self) -> &[FirmOrder] {
        &self.firm
    }

    #[inline]
    pub fn incompatible_policy(&self) -> IncompatibleOfferPolicy {
        self.incompatible
    }

    /// Make a satisfied match final.
    ///
    /// Consumed offers are removed from the registry. Returns the number of
    /// orders made firm.
    pub fn commit(&mut self, registry: &mut TransactionRegistry, tentative: TentativeMatch) -> usize {
        debug_assert!(tentative.is_satisfied(), "only satisfied matches are committed");

        let TentativeMatch {
            request_id,
            orders,
            consumed,
            skipped,
            ..
        } = tentative;

        for offer_id in consumed {
            registry.remove(offer_id);
        }

        let committed = orders.len();
        for order in orders {
            let id = self.next_trade_id;
            self.next_trade_id += 1;

            let tx = &order.message.transaction;
            let record = TradeRecord::new(
                id,
                order.offer_id,
                request_id,
                tx.supplier.unwrap_or_default(),
                tx.requester.unwrap_or_default(),
                tx.price,
                tx.quantity(),
                order.fill,
            );
            trace!(trade_id = id, offer_id = order.offer_id, request_id, "order firm");

            self.firm.push(FirmOrder {
                record,
                message: order.message,
            });
        }

        self.release_skipped(registry, skipped);
        debug!(request_id, committed, firm = self.firm.len(), "match committed");
        committed
    }

    /// Undo a match.
    ///
    /// Returns the number of consumed offers put back in the pool.
    pub fn rollback(&mut self, registry: &mut TransactionRegistry, tentative: TentativeMatch) -> usize {
        let TentativeMatch {
            request_id,
            consumed,
            remainder,
            skipped,
            ..
        } = tentative;

        if let Some(remainder_id) = remainder {
            registry.remove(remainder_id);
        }

        let restored = consumed
            .into_iter()
            .filter(|&offer_id| registry.restore_offer(offer_id))
            .count();

        self.release_skipped(registry, skipped);
        debug!(request_id, restored, "match rolled back");
        restored
    }

    /// Hand over every firm order, leaving the ledger empty.
    pub fn drain(&mut self) -> Vec<FirmOrder> {
        std::mem::take(&mut self.firm)
    }

    fn release_skipped(&self, registry: &mut TransactionRegistry, skipped: Vec<MessageId>) {
        for offer_id in skipped {
            match self.incompatible {
                IncompatibleOfferPolicy::Requeue => {
                    registry.restore_offer(offer_id);
                }
                IncompatibleOfferPolicy::Discard => {
                    registry.remove(offer_id);
                    debug!(offer_id, "incompatible offer discarded");
                }
            }
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
