//! Market configuration.

use crate::error::ClearingError;
use crate::types::quantity::DEFAULT_EPSILON;
use crate::types::ParticipantId;

/// Default number of pending messages to pre-allocate.
pub const DEFAULT_CAPACITY: usize = 1024;

/// What happens to an offer whose resource is incompatible with the
/// request being matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IncompatibleOfferPolicy {
    /// Set aside during the attempt, then returned to the offer pool so
    /// later requests in the same cycle can still use it.
    #[default]
    Requeue,
    /// Dropped from the pool and from the market for good.
    Discard,
}

/// Configuration for a [`Market`](crate::engine::Market).
///
/// ```
/// use commodity_clearing::config::{ClearingConfig, IncompatibleOfferPolicy};
///
/// let config = ClearingConfig::new("uranium")
///     .with_market_id(42)
///     .with_epsilon(0)
///     .with_incompatible_offers(IncompatibleOfferPolicy::Discard);
///
/// assert!(config.validate().is_ok());
/// assert!(ClearingConfig::new("").validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearingConfig {
    /// The single commodity this market clears
    pub commodity: String,

    /// Identity used as sender on dispatched orders
    pub market_id: ParticipantId,

    /// Split remainders at or below this are not re-offered (fixed-point)
    pub epsilon: u64,

    /// Handling of incompatible offers met while matching
    pub incompatible_offers: IncompatibleOfferPolicy,

    /// Pre-allocated pending message slots
    pub capacity: usize,
}

impl ClearingConfig {
    pub fn new(commodity: impl Into<String>) -> Self {
        Self {
            commodity: commodity.into(),
            market_id: 0,
            epsilon: DEFAULT_EPSILON,
            incompatible_offers: IncompatibleOfferPolicy::default(),
            capacity: DEFAULT_CAPACITY,
        }
    }

    pub fn with_market_id(mut self, market_id: ParticipantId) -> Self {
        self.market_id = market_id;
        self
    }

    pub fn with_epsilon(mut self, epsilon: u64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_incompatible_offers(mut self, policy: IncompatibleOfferPolicy) -> Self {
        self.incompatible_offers = policy;
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn validate(&self) -> Result<(), ClearingError> {
        if self.commodity.trim().is_empty() {
            return Err(ClearingError::InvalidConfig(
                "market commodity must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
