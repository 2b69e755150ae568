//! Quantity-ordered pool of pending messages.
//!
//! ## Ordering
//!
//! Entries are keyed by `(Reverse(quantity), Reverse(id))`:
//!
//! - Larger quantities come first
//! - Equal quantities come out latest arrival first (higher id first), so a
//!   freshly re-offered remainder is tried before older offers of the same
//!   size
//!
//! The pool only holds ids; the messages themselves live in the registry
//! slab.

use std::cmp::Reverse;
use std::collections::BTreeSet;

use crate::types::MessageId;

/// Pool key: largest quantity first, then latest arrival.
type PoolKey = (Reverse<u64>, Reverse<MessageId>);

/// Ordered container for either the offer or the request side.
///
/// ## Example
///
/// ```
/// use commodity_clearing::registry::MessagePool;
///
/// let mut pool = MessagePool::new();
/// pool.insert(5, 1);
/// pool.insert(9, 2);
/// pool.insert(9, 3);
///
/// assert_eq!(pool.pop_largest(), Some((9, 3)));
/// assert_eq!(pool.pop_largest(), Some((9, 2)));
/// assert_eq!(pool.pop_largest(), Some((5, 1)));
/// assert!(pool.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessagePool {
    entries: BTreeSet<PoolKey>,

    /// Sum of quantities currently pooled (fixed-point)
    total_quantity: u64,
}

impl MessagePool {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn total_quantity(&self) -> u64 {
        self.total_quantity
    }

    /// Add `id` with its quantity. Returns false if it was already pooled.
    pub fn insert(&mut self, quantity: u64, id: MessageId) -> bool {
        let fresh = self.entries.insert((Reverse(quantity), Reverse(id)));
        if fresh {
            self.total_quantity = self.total_quantity.saturating_add(quantity);
        }
        fresh
    }

    /// Remove a specific entry.
    pub fn remove(&mut self, quantity: u64, id: MessageId) -> bool {
        let removed = self.entries.remove(&(Reverse(quantity), Reverse(id)));
        if removed {
            self.total_quantity = self.total_quantity.saturating_sub(quantity);
        }
        removed
    }

    pub fn contains(&self, quantity: u64, id: MessageId) -> bool {
        self.entries.contains(&(Reverse(quantity), Reverse(id)))
    }

    /// Remove and return the largest pending entry.
    pub fn pop_largest(&mut self) -> Option<(u64, MessageId)> {
        let (Reverse(quantity), Reverse(id)) = self.entries.pop_first()?;
        self.total_quantity = self.total_quantity.saturating_sub(quantity);
        Some((quantity, id))
    }

    /// All entries, largest first.
    pub fn iter(&self) -> impl Iterator<Item = (u64, MessageId)> + '_ {
        self.entries
            .iter()
            .map(|(Reverse(quantity), Reverse(id))| (*quantity, *id))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.total_quantity = 0;
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_new() {
        let pool = MessagePool::new();

        assert!(pool.is_empty());
        assert_eq!(pool.len(), 0);
        assert_eq!(pool.total_quantity(), 0);
        assert!(pool.iter().next().is_none());
    }

    #[test]
    fn test_pool_largest_first() {
        let mut pool = MessagePool::new();
        pool.insert(600, 1);
        pool.insert(1500, 2);
        pool.insert(1000, 3);

        assert_eq!(pool.total_quantity(), 3100);

        let order: Vec<_> = pool.iter().collect();
        assert_eq!(order, vec![(1500, 2), (1000, 3), (600, 1)]);
    }

    #[test]
    fn test_pool_ties_latest_arrival_first() {
        let mut pool = MessagePool::new();
        pool.insert(600, 7);
        pool.insert(600, 2);
        pool.insert(600, 4);
        pool.insert(900, 1);

        assert_eq!(pool.pop_largest(), Some((900, 1)));
        assert_eq!(pool.pop_largest(), Some((600, 7)));
        assert_eq!(pool.pop_largest(), Some((600, 4)));
        assert_eq!(pool.pop_largest(), Some((600, 2)));
        assert_eq!(pool.pop_largest(), None);
    }

    #[test]
    fn test_pool_duplicate_insert() {
        let mut pool = MessagePool::new();

        assert!(pool.insert(100, 1));
        assert!(!pool.insert(100, 1));
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.total_quantity(), 100);
    }

    #[test]
    fn test_pool_remove() {
        let mut pool = MessagePool::new();
        pool.insert(100, 1);
        pool.insert(200, 2);

        assert!(pool.remove(100, 1));
        assert!(!pool.remove(100, 1));
        assert!(!pool.contains(100, 1));
        assert!(pool.contains(200, 2));
        assert_eq!(pool.total_quantity(), 200);
    }

    #[test]
    fn test_pool_reinsert_restores_position() {
        let mut pool = MessagePool::new();
        pool.insert(500, 1);
        pool.insert(500, 2);
        let before: Vec<_> = pool.iter().collect();

        let popped = pool.pop_largest().unwrap();
        pool.insert(popped.0, popped.1);

        let after: Vec<_> = pool.iter().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_pool_clear() {
        let mut pool = MessagePool::new();
        pool.insert(100, 1);
        pool.clear();

        assert!(pool.is_empty());
        assert_eq!(pool.total_quantity(), 0);
    }
}
