//! Transaction registry: the set of messages the market is responsible for,
//! plus the offer and request pools.
//!
//! ## Architecture
//!
//! - **Slab**: storage for every pending message (the Messages Set)
//! - **HashMap**: message id to slab key
//! - **MessagePool** x2: offers and requests, largest quantity first
//!
//! A message can be in the slab without being in a pool: offers popped
//! during a match stay registered until the match is committed or rolled
//! back.

use std::collections::HashMap;

use slab::Slab;
use tracing::trace;

use crate::registry::MessagePool;
use crate::types::{Message, MessageId};

/// A registered message and its identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEntry {
    pub id: MessageId,
    pub message: Message,
}

/// Owns every pending message and the two quantity-ordered pools.
///
/// ## Example
///
/// ```
/// use commodity_clearing::registry::TransactionRegistry;
/// use commodity_clearing::types::{Message, Resource, Transaction};
/// use commodity_clearing::types::quantity::units;
///
/// let mut registry = TransactionRegistry::with_capacity(16);
/// let offer = Transaction::offer("uranium", 1, Resource::new("kg", "natu", units(10)));
/// let id = registry.accept(Message::new(1, 0, offer));
///
/// assert_eq!(registry.offer_count(), 1);
/// assert_eq!(registry.request_count(), 0);
/// assert!(registry.contains(id));
/// ```
#[derive(Debug)]
pub struct TransactionRegistry {
    messages: Slab<MessageEntry>,
    index: HashMap<MessageId, usize>,
    offers: MessagePool,
    requests: MessagePool,
    next_message_id: MessageId,
}

impl Default for TransactionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionRegistry {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a registry with `capacity` pre-allocated message slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            messages: Slab::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            offers: MessagePool::new(),
            requests: MessagePool::new(),
            next_message_id: 1,
        }
    }

    // ========================================================================
    // Size
    // ========================================================================

    /// Messages the market currently holds, pooled or not.
    #[inline]
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    #[inline]
    pub fn offer_count(&self) -> usize {
        self.offers.len()
    }

    #[inline]
    pub fn request_count(&self) -> usize {
        self.requests.len()
    }

    /// Total quantity across pooled offers.
    #[inline]
    pub fn offered_quantity(&self) -> u64 {
        self.offers.total_quantity()
    }

    /// Total quantity across pooled requests.
    #[inline]
    pub fn requested_quantity(&self) -> u64 {
        self.requests.total_quantity()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    // ========================================================================
    // Accept / Remove
    // ========================================================================

    /// Register a message and pool it by kind and quantity.
    ///
    /// Returns the id assigned to it. No validation happens here; the
    /// market checks commodity and quantity before calling this.
    pub fn accept(&mut self, message: Message) -> MessageId {
        let id = self.next_message_id;
        self.next_message_id += 1;

        let quantity = message.quantity();
        let is_offer = message.is_offer();

        let key = self.messages.insert(MessageEntry { id, message });
        self.index.insert(id, key);

        if is_offer {
            self.offers.insert(quantity, id);
        } else {
            self.requests.insert(quantity, id);
        }

        trace!(id, quantity, is_offer, "message registered");
        id
    }

    /// Drop a message from the registry and whichever pool holds it.
    pub fn remove(&mut self, id: MessageId) -> Option<Message> {
        let key = self.index.remove(&id)?;
        let entry = self.messages.remove(key);
        let quantity = entry.message.quantity();

        if entry.message.is_offer() {
            self.offers.remove(quantity, id);
        } else {
            self.requests.remove(quantity, id);
        }

        trace!(id, quantity, "message removed");
        Some(entry.message)
    }

    // ========================================================================
    // Pool access
    // ========================================================================

    /// Take the largest offer out of the pool. It stays registered.
    pub fn pop_largest_offer(&mut self) -> Option<MessageId> {
        self.offers.pop_largest().map(|(_, id)| id)
    }

    /// Take the largest request out of the pool. It stays registered.
    pub fn pop_largest_request(&mut self) -> Option<MessageId> {
        self.requests.pop_largest().map(|(_, id)| id)
    }

    /// Put a registered offer back in the pool at its stored quantity.
    ///
    /// Returns false if the id is unknown, not an offer, or already pooled.
    pub fn restore_offer(&mut self, id: MessageId) -> bool {
        let Some(message) = self.get(id) else {
            return false;
        };
        if !message.is_offer() {
            return false;
        }
        let quantity = message.quantity();
        self.offers.insert(quantity, id)
    }

    pub fn get(&self, id: MessageId) -> Option<&Message> {
        let key = *self.index.get(&id)?;
        self.messages.get(key).map(|entry| &entry.message)
    }

    #[inline]
    pub fn contains(&self, id: MessageId) -> bool {
        self.index.contains_key(&id)
    }

    /// True if the offer is in the pool (not just registered).
    pub fn is_offer_pooled(&self, id: MessageId) -> bool {
        self.get(id)
            .map(|message| message.is_offer() && self.offers.contains(message.quantity(), id))
            .unwrap_or(false)
    }

    /// Pooled offers as `(quantity, id)`, largest first.
    pub fn offer_snapshot(&self) -> Vec<(u64, MessageId)> {
        self.offers.iter().collect()
    }

    /// Pooled requests as `(quantity, id)`, largest first.
    pub fn request_snapshot(&self) -> Vec<(u64, MessageId)> {
        self.requests.iter().collect()
    }

    /// Id the next accepted message will get.
    #[inline]
    pub fn peek_next_message_id(&self) -> MessageId {
        self.next_message_id
    }

    /// Forget every message. Ids keep increasing.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.index.clear();
        self.offers.clear();
        self.requests.clear();
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
