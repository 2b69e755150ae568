//! Error types for the clearing engine.
//!
//! Only submission and configuration problems are errors. A request that
//! cannot be filled is not an error: it is rolled back and dropped for the
//! cycle.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClearingError {
    #[error("Commodity mismatch: market trades {expected}, message names {found}")]
    CommodityMismatch { expected: String, found: String },

    #[error("Transaction names no commodity")]
    EmptyCommodity,

    #[error("Non-positive quantity for {commodity}")]
    NonPositiveQuantity { commodity: String },

    #[error("Minimum fraction {min_frac} exceeds 1.0")]
    FractionAboveOne { min_frac: u64 },

    #[error("Offer has no supplier")]
    MissingSupplier,

    #[error("Request has no requester")]
    MissingRequester,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),
}
