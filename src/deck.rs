//! The 52-card deck and its dead-card-aware sampling routine.

use crate::card::Card;
use crate::error::{CoreError, CoreResult};
use crate::prng::Prng;

/// The standard 52-card deck, as a zero-sized handle onto `Card::from_index`.
pub struct Deck;

impl Deck {
    /// All 52 cards, in index order (rank-major: every suit of Two, then
    /// every suit of Three, ...).
    pub fn all() -> [Card; 52] {
        let mut cards = [Card::from_index(0); 52];
        for (i, slot) in cards.iter_mut().enumerate() {
            *slot = Card::from_index(i as u8);
        }
        cards
    }

    /// Draws `k` distinct cards uniformly at random from the cards *not* set
    /// in `dead_mask`, without replacement.
    ///
    /// Implements rejection sampling over a uniform `0..52` draw: repeatedly
    /// draw an index, discard it if its bit is already in the accumulating
    /// `dead_mask ∪ drawn` set (spec.md §4.B). Simpler than a full
    /// Fisher-Yates shuffle when `k` is small relative to 52, which is always
    /// the case here (at most 5 board cards plus a couple of hole cards).
    ///
    /// Fails with `InsufficientCards` if fewer than `k` cards remain undealt.
    pub fn sample(k: usize, dead_mask: u64, rng: &mut Prng) -> CoreResult<Vec<Card>> {
        let available = (52 - dead_mask.count_ones() as usize).min(52);
        if available < k {
            return Err(CoreError::InsufficientCards {
                requested: k,
                available,
            });
        }

        let mut drawn_mask = dead_mask;
        let mut drawn = Vec::with_capacity(k);
        while drawn.len() < k {
            let idx = rng.randint(52) as u8;
            let bit = 1u64 << idx;
            if drawn_mask & bit != 0 {
                continue;
            }
            drawn_mask |= bit;
            drawn.push(Card::from_index(idx));
        }
        Ok(drawn)
    }
}
