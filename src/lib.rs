//! Texas Hold'em hand evaluator and range equity engine.
//!
//! Three layers, leaves first: [`card`]/[`deck`] (bit-mask card model),
//! [`evaluator`] (5-7 card -> packed strength value), [`range`] (range
//! string grammar), and [`equity`] (exact + Monte Carlo equity queries
//! tying the rest together). [`prng`] and [`error`] are shared ambient
//! infrastructure.
//!
//! The crate root re-exports the stable external surface so callers can
//! write `holdem_core::evaluate(...)`, `holdem_core::HandRange::parse(...)`,
//! etc., without reaching into submodules.

pub mod card;
pub mod deck;
pub mod equity;
pub mod error;
pub mod evaluator;
pub mod prng;
pub mod range;

pub use card::{parse_board, parse_card, Card, Rank, Suit, ALL_RANKS, ALL_SUITS, RANKS, SUITS};
pub use deck::Deck;
pub use equity::{all_hands_vs_range, hand_vs_range_exact, hand_vs_range_monte_carlo, EquityConfig};
pub use error::{CoreError, CoreResult};
pub use evaluator::{category_from_value, evaluate, hand_type, HandCategory};
pub use prng::Prng;
pub use range::{
    expand_handtype_group, normalize_token, string_to_hands, string_to_tokens, token_suitedness,
    token_to_hands, tokens_to_string, validate_string, HandRange, HandTypeGroup, RangeEntry,
    Suitedness,
};
