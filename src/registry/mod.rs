//! Transaction registry for the clearing engine.
//!
//! ## Components
//!
//! - [`MessagePool`]: ids ordered by quantity (largest first), ties to the
//!   latest arrival
//! - [`TransactionRegistry`]: slab-backed Messages Set owning an offer pool
//!   and a request pool
//!
//! ## Complexity
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | Accept | O(log n) |
//! | Pop largest | O(log n) |
//! | Lookup by id | O(1) |
//! | Remove by id | O(log n) |

pub mod pool;
pub mod transactions;

pub use pool::MessagePool;
pub use transactions::{MessageEntry, TransactionRegistry};
