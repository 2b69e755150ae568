//! Single-commodity market: accepts offers and requests, clears them once
//! per cycle and dispatches the resulting orders.
//!
//! ## Cycle
//!
//! ```text
//! accept* ──► resolve()
//!               ├─ pop largest request
//!               ├─ match_request ──► TentativeMatch
//!               ├─ commit (satisfied) | rollback (unsatisfied)
//!               ├─ drop the request
//!               └─ dispatch firm orders Down to their suppliers
//! ```
//!
//! Offers that were not consumed stay pooled for the next cycle. Requests
//! never outlive the cycle they were resolved in.

use std::fmt;

use tracing::{debug, error, warn};

use crate::config::ClearingConfig;
use crate::engine::{Communicator, FirmOrder, MatchingEngine, OrderLedger};
use crate::error::ClearingError;
use crate::registry::TransactionRegistry;
use crate::types::quantity::from_fixed_trimmed;
use crate::types::{ClearingReceipt, Direction, Message, MessageId, TradeRecord, TransactionKind};

/// Outcome of one [`Market::resolve`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearingResult {
    pub receipt: ClearingReceipt,

    /// One record per dispatched order, in dispatch order
    pub trades: Vec<TradeRecord>,
}

/// Market clearing engine for one commodity.
///
/// `C` is the participant that receives dispatched orders, fixed at
/// construction.
///
/// ## Example
///
/// ```
/// use commodity_clearing::config::ClearingConfig;
/// use commodity_clearing::engine::Market;
/// use commodity_clearing::types::{Direction, Message, Resource, Transaction};
/// use commodity_clearing::types::quantity::units;
///
/// let config = ClearingConfig::new("uranium").with_market_id(100);
/// let mut market = Market::new(config, Vec::<Message>::new()).unwrap();
///
/// let natu = |q| Resource::new("kg", "natu", q);
/// market.try_accept(Message::new(1, 100, Transaction::offer("uranium", 1, natu(units(20))))).unwrap();
/// market.try_accept(Message::new(2, 100, Transaction::request("uranium", 2, natu(units(15))))).unwrap();
/// market.try_accept(Message::new(3, 100, Transaction::request("uranium", 3, natu(units(5))))).unwrap();
///
/// let result = market.resolve();
/// assert_eq!(result.receipt.requests_satisfied, 2);
///
/// let sent = market.downstream();
/// assert_eq!(sent.len(), 2);
/// assert!(sent.iter().all(|m| m.direction == Direction::Down && m.recipient == 1));
/// assert_eq!(market.registry().offer_count(), 0);
/// ```
#[derive(Debug)]
pub struct Market<C: Communicator> {
    config: ClearingConfig,
    registry: TransactionRegistry,
    engine: MatchingEngine,
    ledger: OrderLedger,
    downstream: C,
    cycle: u64,
}

impl<C: Communicator> Market<C> {
    /// Build a market dispatching to `downstream`.
    pub fn new(config: ClearingConfig, downstream: C) -> Result<Self, ClearingError> {
        config.validate()?;

        Ok(Self {
            registry: TransactionRegistry::with_capacity(config.capacity),
            engine: MatchingEngine::with_epsilon(config.epsilon),
            ledger: OrderLedger::new(config.incompatible_offers),
            downstream,
            cycle: 0,
            config,
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn config(&self) -> &ClearingConfig {
        &self.config
    }

    #[inline]
    pub fn commodity(&self) -> &str {
        &self.config.commodity
    }

    #[inline]
    pub fn registry(&self) -> &TransactionRegistry {
        &self.registry
    }

    #[inline]
    pub fn downstream(&self) -> &C {
        &self.downstream
    }

    #[inline]
    pub fn downstream_mut(&mut self) -> &mut C {
        &mut self.downstream
    }

    pub fn into_downstream(self) -> C {
        self.downstream
    }

    /// Number of completed `resolve` calls.
    #[inline]
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    // ========================================================================
    // Inbound
    // ========================================================================

    /// Check that a message can be cleared by this market.
    pub fn validate(&self, message: &Message) -> Result<(), ClearingError> {
        let tx = &message.transaction;

        if tx.commodity.trim().is_empty() {
            return Err(ClearingError::EmptyCommodity);
        }
        if tx.commodity != self.config.commodity {
            return Err(ClearingError::CommodityMismatch {
                expected: self.config.commodity.clone(),
                found: tx.commodity.clone(),
            });
        }
        if tx.quantity() == 0 {
            return Err(ClearingError::NonPositiveQuantity {
                commodity: tx.commodity.clone(),
            });
        }
        if tx.min_quantity().is_none() {
            return Err(ClearingError::FractionAboveOne {
                min_frac: tx.min_frac,
            });
        }

        match tx.kind {
            TransactionKind::Offer if tx.supplier.is_none() => Err(ClearingError::MissingSupplier),
            TransactionKind::Request if tx.requester.is_none() => {
                Err(ClearingError::MissingRequester)
            }
            _ => Ok(()),
        }
    }

    /// Validate and register a message.
    pub fn try_accept(&mut self, message: Message) -> Result<MessageId, ClearingError> {
        self.validate(&message)?;
        Ok(self.registry.accept(message))
    }

    /// Register a message, dropping it with a warning if it is malformed.
    pub fn accept(&mut self, message: Message) -> Option<MessageId> {
        let sender = message.sender;
        match self.try_accept(message) {
            Ok(id) => Some(id),
            Err(err) => {
                warn!(sender, %err, "dropping malformed message");
                None
            }
        }
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    /// Clear every pending request against the pooled offers, largest
    /// request first, then dispatch the firm orders.
    ///
    /// Never fails. A request that cannot be fully satisfied is rolled back
    /// and dropped for this cycle.
    pub fn resolve(&mut self) -> ClearingResult {
        self.cycle += 1;
        let cycle = self.cycle;

        let mut processed = 0u64;
        let mut satisfied = 0u64;

        while let Some(request_id) = self.registry.pop_largest_request() {
            processed += 1;

            let tentative = self.engine.match_request(&mut self.registry, request_id);
            if tentative.is_satisfied() {
                satisfied += 1;
                self.ledger.commit(&mut self.registry, tentative);
            } else {
                debug!(
                    cycle,
                    request_id,
                    "rejected request for {}, matched {}",
                    from_fixed_trimmed(tentative.requested()),
                    from_fixed_trimmed(tentative.matched_quantity())
                );
                self.ledger.rollback(&mut self.registry, tentative);
            }

            self.registry.remove(request_id);
        }

        let trades = self.dispatch();

        let receipt = ClearingReceipt::from_trades(cycle, processed, satisfied, &trades)
            .unwrap_or_else(|err| {
                error!(cycle, %err, "could not compute state root");
                ClearingReceipt {
                    cycle,
                    requests_processed: processed,
                    requests_satisfied: satisfied,
                    orders_dispatched: trades.len() as u64,
                    quantity_dispatched: ClearingReceipt::total_quantity(&trades),
                    state_root: [0u8; 32],
                }
            });

        debug!(
            cycle,
            processed,
            satisfied,
            dispatched = receipt.orders_dispatched,
            offers_left = self.registry.offer_count(),
            "cycle resolved"
        );

        ClearingResult { receipt, trades }
    }

    /// Send every firm order Down to its supplier.
    fn dispatch(&mut self) -> Vec<TradeRecord> {
        let firm = self.ledger.drain();
        let mut trades = Vec::with_capacity(firm.len());

        for FirmOrder { record, mut message } in firm {
            message.set_direction(Direction::Down);
            message.sender = self.config.market_id;
            message.recipient = record.supplier;

            let worth = record
                .notional()
                .map(from_fixed_trimmed)
                .unwrap_or_else(|| "overflow".to_string());
            debug!(
                supplier = record.supplier,
                requester = record.requester,
                "sending order for {} worth {}",
                message.transaction.resource,
                worth
            );
            self.downstream.receive_message(message);
            trades.push(record);
        }

        trades
    }
}

impl<C: Communicator> Communicator for Market<C> {
    fn receive_message(&mut self, message: Message) {
        self.accept(message);
    }
}

impl<C: Communicator> fmt::Display for Market<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Market({}, offers={}, requests={}, cycle={})",
            self.config.commodity,
            self.registry.offer_count(),
            self.registry.request_count(),
            self.cycle
        )
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
