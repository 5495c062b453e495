//! Error taxonomy for the evaluator, deck sampler, and range parser.

use thiserror::Error;

/// Errors raised by `holdem_core`'s public API.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A two-character card string had an unknown rank or suit symbol, or the
    /// wrong length.
    #[error("invalid card {0:?}")]
    InvalidCard(String),

    /// `evaluate` was called with fewer than 5 cards, duplicate cards, or some
    /// other impossible combination.
    #[error("invalid hand: {0}")]
    InvalidHand(String),

    /// A deck sample was requested for more cards than remain undealt.
    #[error("insufficient cards: requested {requested}, {available} available")]
    InsufficientCards { requested: usize, available: usize },

    /// The range grammar failed to parse, or a semantic rule (suitedness
    /// mismatch, top-card mismatch, pair with suitedness, duplicate card in a
    /// single hand) was violated.
    #[error("range string error: {0}")]
    RangeStringError(String),
}

/// Convenience alias used throughout the crate's public API.
pub type CoreResult<T> = Result<T, CoreError>;
