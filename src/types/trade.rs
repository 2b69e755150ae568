//! Trade records for orders dispatched by the market.
//!
//! ## SSZ Serialization
//!
//! Records are serialized with SSZ so the clearing state root is identical
//! across runs and platforms.

use ssz_rs::prelude::*;

use crate::types::quantity::checked_mul;

/// How much of the originating offer an order consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FillKind {
    /// The whole offer went to one request
    #[default]
    Whole,
    /// The offer was split; this order covers part of it
    Split,
}

impl FillKind {
    pub fn to_u8(self) -> u8 {
        match self {
            FillKind::Whole => 0,
            FillKind::Split => 1,
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(FillKind::Whole),
            1 => Some(FillKind::Split),
            _ => None,
        }
    }
}

/// One firm order: a quantity flowing from a supplier to a requester.
///
/// `offer_id` names the pooled offer the quantity came from. An offer id
/// appears in at most one record per cycle; a split offer's leftover is
/// re-offered under a new id.
///
/// ## Example
///
/// ```
/// use commodity_clearing::types::{FillKind, TradeRecord};
/// use commodity_clearing::types::quantity::units;
///
/// let trade = TradeRecord::new(1, 10, 11, 1, 2, units(3), units(4), FillKind::Split);
/// assert_eq!(trade.fill_kind(), FillKind::Split);
/// assert_eq!(trade.notional(), Some(units(12)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct TradeRecord {
    /// Dispatch sequence number within the market
    pub id: u64,

    /// Offer message the quantity was taken from
    pub offer_id: u64,

    /// Request message it satisfies
    pub request_id: u64,

    /// Supplying participant
    pub supplier: u64,

    /// Requesting participant
    pub requester: u64,

    /// Offer price in fixed-point
    pub price: u64,

    /// Quantity in fixed-point
    pub quantity: u64,

    /// Fill kind as u8 (0=Whole, 1=Split)
    pub fill_raw: u8,
}

impl TradeRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: u64,
        offer_id: u64,
        request_id: u64,
        supplier: u64,
        requester: u64,
        price: u64,
        quantity: u64,
        fill: FillKind,
    ) -> Self {
        Self {
            id,
            offer_id,
            request_id,
            supplier,
            requester,
            price,
            quantity,
            fill_raw: fill.to_u8(),
        }
    }

    pub fn fill_kind(&self) -> FillKind {
        FillKind::from_u8(self.fill_raw).unwrap_or_default()
    }

    /// Price x quantity, fixed-point. `None` on overflow.
    pub fn notional(&self) -> Option<u64> {
        checked_mul(self.price, self.quantity)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
