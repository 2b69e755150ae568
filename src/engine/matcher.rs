//! Greedy largest-first matching of one request against the offer pool.
//!
//! ## Algorithm
//!
//! For a request of quantity `R`, repeatedly take the largest pooled
//! offer `O`:
//!
//! - incompatible resource: set the offer aside, keep going
//! - `R >= O`: the whole offer becomes an order, `R -= O`
//! - `R < O`: split. An order for `R` is derived from the offer, the
//!   leftover `O - R` is re-offered to the market unless negligible,
//!   and `R = 0`
//!
//! Nothing here is final. Every effect is recorded on the returned
//! [`TentativeMatch`], which the ledger then commits or rolls back.

use tracing::{debug, trace};

use crate::registry::TransactionRegistry;
use crate::types::quantity::{from_fixed_trimmed, is_negligible, DEFAULT_EPSILON};
use crate::types::{FillKind, Message, MessageId, Transaction};

/// An order recorded while matching, not yet firm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TentativeOrder {
    /// Pooled offer this order was taken from
    pub offer_id: MessageId,

    /// Whole offer or part of a split offer
    pub fill: FillKind,

    /// The order as it will be sent to the supplier
    pub message: Message,
}

/// Outcome of matching one request, pending commit or rollback.
///
/// Holds the tentative orders, the offers they consumed (the
/// Matched-Offers Set), the remainder offer re-submitted on a split and
/// the incompatible offers set aside along the way.
#[derive(Debug, Clone)]
#[must_use = "a tentative match must be committed or rolled back"]
pub struct TentativeMatch {
    pub(crate) request_id: MessageId,
    pub(crate) request: Transaction,
    pub(crate) requested: u64,
    pub(crate) remaining: u64,
    pub(crate) orders: Vec<TentativeOrder>,
    pub(crate) consumed: Vec<MessageId>,
    pub(crate) remainder: Option<MessageId>,
    pub(crate) skipped: Vec<MessageId>,
}

impl TentativeMatch {
    fn new(request_id: MessageId, request: Transaction) -> Self {
        let requested = request.quantity();
        Self {
            request_id,
            request,
            requested,
            remaining: requested,
            orders: Vec::new(),
            consumed: Vec::new(),
            remainder: None,
            skipped: Vec::new(),
        }
    }

    #[inline]
    pub fn request_id(&self) -> MessageId {
        self.request_id
    }

    /// Quantity the request asked for.
    #[inline]
    pub fn requested(&self) -> u64 {
        self.requested
    }

    /// Quantity still unfilled.
    #[inline]
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    #[inline]
    pub fn matched_quantity(&self) -> u64 {
        self.requested - self.remaining
    }

    /// Fully satisfied: nothing left to fill and at least one order.
    ///
    /// Starts out false; a request that never met a compatible offer is
    /// never reported as satisfied.
    pub fn is_satisfied(&self) -> bool {
        self.remaining == 0 && !self.orders.is_empty()
    }

    pub fn orders(&self) -> &[TentativeOrder] {
        &self.orders
    }

    /// Offers taken out of the pool to build the orders.
    pub fn consumed(&self) -> &[MessageId] {
        &self.consumed
    }

    /// Offer re-submitted for the leftover of a split, if any.
    pub fn remainder(&self) -> Option<MessageId> {
        self.remainder
    }

    /// Incompatible offers popped during the attempt.
    pub fn skipped(&self) -> &[MessageId] {
        &self.skipped
    }
}

/// Greedy matcher.
///
/// ## Example
///
/// ```
/// use commodity_clearing::engine::MatchingEngine;
/// use commodity_clearing::registry::TransactionRegistry;
/// use commodity_clearing::types::{Message, Resource, Transaction};
/// use commodity_clearing::types::quantity::units;
///
/// let mut registry = TransactionRegistry::new();
/// let natu = |q| Resource::new("kg", "natu", q);
/// registry.accept(Message::new(1, 0, Transaction::offer("uranium", 1, natu(units(15)))));
/// let request = registry.accept(Message::new(2, 0, Transaction::request("uranium", 2, natu(units(10)))));
///
/// let engine = MatchingEngine::new();
/// registry.pop_largest_request();
/// let tentative = engine.match_request(&mut registry, request);
///
/// assert!(tentative.is_satisfied());
/// assert_eq!(tentative.orders()[0].message.quantity(), units(10));
/// assert!(tentative.remainder().is_some());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchingEngine {
    /// Split remainders at or below this are dropped
    epsilon: u64,
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchingEngine {
    pub fn new() -> Self {
        Self::with_epsilon(DEFAULT_EPSILON)
    }

    pub fn with_epsilon(epsilon: u64) -> Self {
        Self { epsilon }
    }

    #[inline]
    pub fn epsilon(&self) -> u64 {
        self.epsilon
    }

    /// Match the registered request `request_id` against pooled offers.
    ///
    /// The request itself is expected to be out of the request pool
    /// already; it is only read here. An unknown id, or an id naming an
    /// offer, yields an unsatisfied match with no effects.
    pub fn match_request(
        &self,
        registry: &mut TransactionRegistry,
        request_id: MessageId,
    ) -> TentativeMatch {
        let request = match registry.get(request_id) {
            Some(message) if !message.is_offer() => message.transaction.clone(),
            _ => {
                debug!(request_id, "no registered request to match");
                return TentativeMatch::new(request_id, Transaction::default());
            }
        };
        let mut tentative = TentativeMatch::new(request_id, request);

        while tentative.remaining > 0 {
            let Some(offer_id) = registry.pop_largest_offer() else {
                break;
            };
            let Some(offer) = registry.get(offer_id) else {
                continue;
            };

            if !tentative.request.resource.is_compatible(&offer.transaction.resource) {
                trace!(request_id, offer_id, "incompatible offer set aside");
                tentative.skipped.push(offer_id);
                continue;
            }

            let offered = offer.quantity();
            debug!(
                request_id,
                offer_id,
                "comparing {} >= {}: {}",
                from_fixed_trimmed(tentative.remaining),
                from_fixed_trimmed(offered),
                tentative.remaining >= offered
            );

            if tentative.remaining >= offered {
                let order = offer.matched_with(&tentative.request);
                debug!(
                    supplier = ?order.transaction.supplier,
                    requester = ?order.transaction.requester,
                    "matched whole offer for {}",
                    from_fixed_trimmed(offered)
                );

                tentative.consumed.push(offer_id);
                tentative.orders.push(TentativeOrder {
                    offer_id,
                    fill: FillKind::Whole,
                    message: order,
                });
                tentative.remaining -= offered;
            } else {
                let filled = tentative.remaining;
                let leftover = offered - filled;
                let order = offer.derive_partial(filled, &tentative.request);
                let remainder = if is_negligible(leftover, self.epsilon) {
                    None
                } else {
                    Some(offer.derive_remainder(leftover))
                };
                debug!(
                    supplier = ?order.transaction.supplier,
                    requester = ?order.transaction.requester,
                    "split offer: {} of {}",
                    from_fixed_trimmed(filled),
                    order.transaction.resource
                );

                tentative.consumed.push(offer_id);
                tentative.orders.push(TentativeOrder {
                    offer_id,
                    fill: FillKind::Split,
                    message: order,
                });

                if let Some(message) = remainder {
                    let remainder_id = registry.accept(message);
                    debug!(
                        offer_id,
                        remainder_id,
                        "re-offered remainder of {}",
                        from_fixed_trimmed(leftover)
                    );
                    tentative.remainder = Some(remainder_id);
                }
                tentative.remaining = 0;
            }
        }

        tentative
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
