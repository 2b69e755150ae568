//! Offers and requests for a commodity.
//!
//! A [`Transaction`] is the payload of every message the market handles.
//! Its [`TransactionKind`] decides which pool it lands in; the rest of the
//! fields travel with the order back to the supplier once it is matched.

use crate::types::quantity::{checked_mul, FULL_FRACTION};
use crate::types::Resource;

/// Identity of a simulation participant (facility, institution, region).
pub type ParticipantId = u64;

// ============================================================================
// TransactionKind enum
// ============================================================================

/// Offer or request. Decides which pool a message lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransactionKind {
    /// Quantity a supplier is willing to provide
    #[default]
    Offer,
    /// Quantity a requester wishes to acquire
    Request,
}

// ============================================================================
// Transaction struct
// ============================================================================

/// An offer or request naming a commodity, a resource and the parties.
///
/// Offers must carry a supplier and requests a requester; the requester of
/// an offer is filled in when it is matched.
///
/// ## Example
///
/// ```
/// use commodity_clearing::types::{Resource, Transaction};
/// use commodity_clearing::types::quantity::units;
///
/// let offer = Transaction::offer("uranium", 7, Resource::new("kg", "natu", units(20)));
/// assert!(offer.is_offer());
/// assert_eq!(offer.quantity(), units(20));
/// assert_eq!(offer.supplier, Some(7));
/// assert_eq!(offer.requester, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Transaction {
    /// Offer or request
    pub kind: TransactionKind,

    /// Commodity traded, must equal the market's commodity
    pub commodity: String,

    /// Unit price in fixed-point (scaled by 10^8)
    pub price: u64,

    /// Minimum acceptable fraction of the quantity, fixed-point (1.0 = SCALE)
    pub min_frac: u64,

    /// Material being offered or requested
    pub resource: Resource,

    /// Supplying participant
    pub supplier: Option<ParticipantId>,

    /// Requesting participant
    pub requester: Option<ParticipantId>,
}

impl Transaction {
    /// Create an offer from `supplier`.
    pub fn offer(commodity: impl Into<String>, supplier: ParticipantId, resource: Resource) -> Self {
        Self {
            kind: TransactionKind::Offer,
            commodity: commodity.into(),
            price: 0,
            min_frac: 0,
            resource,
            supplier: Some(supplier),
            requester: None,
        }
    }

    /// Create a request from `requester`.
    pub fn request(
        commodity: impl Into<String>,
        requester: ParticipantId,
        resource: Resource,
    ) -> Self {
        Self {
            kind: TransactionKind::Request,
            commodity: commodity.into(),
            price: 0,
            min_frac: 0,
            resource,
            supplier: None,
            requester: Some(requester),
        }
    }

    pub fn with_price(mut self, price: u64) -> Self {
        self.price = price;
        self
    }

    pub fn with_min_frac(mut self, min_frac: u64) -> Self {
        self.min_frac = min_frac;
        self
    }

    #[inline]
    pub fn is_offer(&self) -> bool {
        self.kind == TransactionKind::Offer
    }

    #[inline]
    pub fn is_request(&self) -> bool {
        self.kind == TransactionKind::Request
    }

    /// Quantity of the underlying resource.
    #[inline]
    pub fn quantity(&self) -> u64 {
        self.resource.quantity
    }

    pub fn set_quantity(&mut self, quantity: u64) {
        self.resource.quantity = quantity;
    }

    /// Smallest quantity the owner would accept, `quantity * min_frac`.
    ///
    /// Returns `None` if `min_frac` is above 1.0.
    pub fn min_quantity(&self) -> Option<u64> {
        if self.min_frac > FULL_FRACTION {
            return None;
        }
        checked_mul(self.quantity(), self.min_frac)
    }

    /// Record the request this offer is matched against.
    pub fn match_with(&mut self, request: &Transaction) {
        self.requester = request.requester;
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
