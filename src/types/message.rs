//! Message envelopes carried between participants and the market.
//!
//! ## Derivation instead of cloning
//!
//! When an offer is split, the market does not mutate or alias the
//! original message. It builds two new, independently owned envelopes:
//!
//! - [`Message::derive_partial`]: the order sent to the supplier for the
//!   part of the offer that fills the request
//! - [`Message::derive_remainder`]: the leftover offer re-submitted to the
//!   market
//!
//! The original stays untouched so a rollback can put it back as it was.

use crate::types::transaction::ParticipantId;
use crate::types::Transaction;

/// Registry-assigned message identity. Strictly increasing in arrival order.
pub type MessageId = u64;

// ============================================================================
// Direction enum
// ============================================================================

/// Routing direction through the participant hierarchy.
///
/// Offers and requests travel `Up` to the market; matched orders travel
/// `Down` to their supplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    Up,
    Down,
}

// ============================================================================
// Message struct
// ============================================================================

/// An envelope holding one transaction plus routing information.
///
/// ## Example
///
/// ```
/// use commodity_clearing::types::{Direction, Message, Resource, Transaction};
/// use commodity_clearing::types::quantity::units;
///
/// let offer = Transaction::offer("uranium", 1, Resource::new("kg", "natu", units(15)));
/// let request = Transaction::request("uranium", 2, Resource::new("kg", "natu", units(10)));
///
/// let msg = Message::new(1, 100, offer);
/// assert_eq!(msg.direction, Direction::Up);
///
/// let order = msg.derive_partial(units(10), &request);
/// assert_eq!(order.quantity(), units(10));
/// assert_eq!(order.transaction.requester, Some(2));
/// assert_eq!(msg.quantity(), units(15)); // original untouched
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Message {
    /// The offer or request
    pub transaction: Transaction,

    /// Routing direction
    pub direction: Direction,

    /// Participant that sent this envelope
    pub sender: ParticipantId,

    /// Participant this envelope is addressed to
    pub recipient: ParticipantId,
}

impl Message {
    /// A new upward-bound message.
    pub fn new(sender: ParticipantId, recipient: ParticipantId, transaction: Transaction) -> Self {
        Self {
            transaction,
            direction: Direction::Up,
            sender,
            recipient,
        }
    }

    #[inline]
    pub fn is_offer(&self) -> bool {
        self.transaction.is_offer()
    }

    #[inline]
    pub fn quantity(&self) -> u64 {
        self.transaction.quantity()
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Whole-offer order: a copy of this offer matched against `request`.
    pub fn matched_with(&self, request: &Transaction) -> Message {
        let mut order = self.clone();
        order.transaction.match_with(request);
        order
    }

    /// Order for part of this offer, `quantity` of it, matched against
    /// `request`.
    ///
    /// Only the accounting fields are carried over: commodity, price,
    /// supplier, resource quality and the new quantity.
    pub fn derive_partial(&self, quantity: u64, request: &Transaction) -> Message {
        let source = &self.transaction;
        let mut transaction = Transaction {
            kind: source.kind,
            commodity: source.commodity.clone(),
            price: source.price,
            min_frac: source.min_frac,
            resource: source.resource.with_quantity(quantity),
            supplier: source.supplier,
            requester: None,
        };
        transaction.match_with(request);

        Message::new(self.sender, self.recipient, transaction)
    }

    /// Fresh, unmatched offer for what is left of this one.
    pub fn derive_remainder(&self, quantity: u64) -> Message {
        let source = &self.transaction;
        let transaction = Transaction {
            kind: source.kind,
            commodity: source.commodity.clone(),
            price: source.price,
            min_frac: source.min_frac,
            resource: source.resource.with_quantity(quantity),
            supplier: source.supplier,
            requester: None,
        };

        Message::new(self.sender, self.recipient, transaction)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::quantity::units;
    use crate::types::Resource;

    fn offer_msg(quantity: u64) -> Message {
        let offer = Transaction::offer("uranium", 1, Resource::new("kg", "natu", quantity))
            .with_price(units(3));
        Message::new(1, 100, offer)
    }

    fn request_tx(quantity: u64) -> Transaction {
        Transaction::request("uranium", 2, Resource::new("kg", "natu", quantity))
    }

    #[test]
    fn test_set_direction() {
        let mut msg = offer_msg(units(1));
        msg.set_direction(Direction::Down);
        assert_eq!(msg.direction, Direction::Down);
    }

    #[test]
    fn test_matched_with_keeps_quantity() {
        let msg = offer_msg(units(10));
        let order = msg.matched_with(&request_tx(units(12)));

        assert_eq!(order.quantity(), units(10));
        assert_eq!(order.transaction.requester, Some(2));
        assert_eq!(msg.transaction.requester, None);
    }

    #[test]
    fn test_derive_partial_is_independent() {
        let msg = offer_msg(units(15));
        let mut order = msg.derive_partial(units(10), &request_tx(units(10)));

        assert_eq!(order.quantity(), units(10));
        assert_eq!(order.transaction.price, units(3));
        assert_eq!(order.transaction.supplier, Some(1));
        assert!(order.transaction.resource.is_compatible(&msg.transaction.resource));

        order.transaction.set_quantity(units(1));
        assert_eq!(msg.quantity(), units(15));
    }

    #[test]
    fn test_derive_remainder_is_unmatched_offer() {
        let msg = offer_msg(units(15)).matched_with(&request_tx(units(10)));
        let remainder = msg.derive_remainder(units(5));

        assert!(remainder.is_offer());
        assert_eq!(remainder.quantity(), units(5));
        assert_eq!(remainder.transaction.requester, None);
        assert_eq!(remainder.direction, Direction::Up);
    }
}
