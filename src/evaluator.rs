//! 7-card hand evaluator.
//!
//! `evaluate` maps any 5-, 6-, or 7-card hand to a `u32` score: higher is
//! stronger, and scores compare directly with `>`/`<`/`==`, no unpacking
//! required. Packing (see DESIGN.md for the literal derivation):
//!
//!   bits 31-24: category (0 = High Card .. 8 = Straight Flush)
//!   bits 19-16: primary rank index
//!   bits 15-12: secondary rank index
//!   bits 11-8:  kicker 1
//!   bits  7-4:  kicker 2
//!   bits  3-0:  kicker 3
//!
//! Rank indices are 0..12 (`Two`..`Ace`), matching `card::Rank::index()`.

use once_cell::sync::Lazy;

use crate::card::Card;
use crate::error::{CoreError, CoreResult};

/// The nine standard poker hand categories, in strength order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HandCategory {
    HighCard,
    Pair,
    TwoPair,
    Trips,
    Straight,
    Flush,
    FullHouse,
    Quads,
    StraightFlush,
}

impl HandCategory {
    pub fn label(self) -> &'static str {
        match self {
            HandCategory::HighCard => "High Card",
            HandCategory::Pair => "Pair",
            HandCategory::TwoPair => "Two Pair",
            HandCategory::Trips => "Trips",
            HandCategory::Straight => "Straight",
            HandCategory::Flush => "Flush",
            HandCategory::FullHouse => "Full House",
            HandCategory::Quads => "Quads",
            HandCategory::StraightFlush => "Straight Flush",
        }
    }
}

/// Extracts the category from a packed score.
pub fn category_from_value(value: u32) -> HandCategory {
    match value >> 24 {
        8 => HandCategory::StraightFlush,
        7 => HandCategory::Quads,
        6 => HandCategory::FullHouse,
        5 => HandCategory::Flush,
        4 => HandCategory::Straight,
        3 => HandCategory::Trips,
        2 => HandCategory::TwoPair,
        1 => HandCategory::Pair,
        _ => HandCategory::HighCard,
    }
}

/// Returns the category label for a packed score, per spec.md §4.C.
pub fn hand_type(value: u32) -> &'static str {
    category_from_value(value).label()
}

// -------------------------------------------------------------------------
// Straight detection table: 13-bit rank-presence mask -> high rank index, or
// 0 if the mask contains no 5-card straight. Index 0 ("Two" high) can never
// be a genuine straight top (the lowest is the wheel, index 3), so it
// doubles safely as the "no straight" sentinel.
// -------------------------------------------------------------------------

static STRAIGHT_TABLE: Lazy<[u8; 8192]> = Lazy::new(|| {
    let mut table = [0u8; 8192];
    let wheel: u16 = (1 << 12) | 0b1111;
    for mask in 0u16..8192 {
        let mut best = 0u8;
        for low in 0..=8u8 {
            let pat = 0b11111u16 << low;
            if mask & pat == pat {
                best = low + 4;
            }
        }
        if best == 0 && mask & wheel == wheel {
            best = 3;
        }
        table[mask as usize] = best;
    }
    table
});

#[inline]
fn pack(category: u8, slots: &[u8]) -> u32 {
    let mut s = (category as u32) << 24;
    const SHIFTS: [u32; 5] = [16, 12, 8, 4, 0];
    for (i, &v) in slots.iter().enumerate() {
        if i >= 5 {
            break;
        }
        s |= (v as u32) << SHIFTS[i];
    }
    s
}

/// Extracts the top `n` set bits of a 13-bit rank mask as rank indices,
/// highest first, zero-padded.
fn top_n_from_mask(mask: u16, n: usize) -> [u8; 5] {
    let mut result = [0u8; 5];
    let mut count = 0;
    for bit in (0..13u8).rev() {
        if mask & (1 << bit) != 0 {
            result[count] = bit;
            count += 1;
            if count == n {
                break;
            }
        }
    }
    result
}

/// Evaluates 5-7 distinct cards and returns the packed score of the best
/// 5-card poker hand they contain.
///
/// Fails with `InvalidHand` if `cards` has fewer than 5 entries or contains a
/// duplicate card.
pub fn evaluate(cards: &[Card]) -> CoreResult<u32> {
    if cards.len() < 5 || cards.len() > 7 {
        return Err(CoreError::InvalidHand(format!(
            "expected 5 to 7 cards, got {}",
            cards.len()
        )));
    }
    let mask = crate::card::union_mask(cards);
    if mask.count_ones() as usize != cards.len() {
        return Err(CoreError::InvalidHand("duplicate card in hand".to_string()));
    }
    Ok(evaluate_raw(cards))
}

fn evaluate_raw(cards: &[Card]) -> u32 {
    let mut rank_counts = [0u8; 13];
    let mut suit_masks = [0u16; 4];
    let mut suit_counts = [0u8; 4];

    for c in cards {
        let rank = c.rank.index() as usize;
        let suit = c.suit.index() as usize;
        rank_counts[rank] += 1;
        suit_masks[suit] |= 1 << rank;
        suit_counts[suit] += 1;
    }

    if let Some(suit) = suit_counts.iter().position(|&n| n >= 5) {
        let fmask = suit_masks[suit];
        let sf_high = STRAIGHT_TABLE[fmask as usize];
        if sf_high > 0 {
            return pack(8, &[sf_high]);
        }
        let ranks = top_n_from_mask(fmask, 5);
        return pack(5, &ranks);
    }

    evaluate_non_flush(&rank_counts)
}

fn evaluate_non_flush(rc: &[u8; 13]) -> u32 {
    let mut quad = [0u8; 1];
    let mut nq = 0usize;
    let mut trip = [0u8; 2];
    let mut nt = 0usize;
    let mut pair = [0u8; 3];
    let mut np = 0usize;
    let mut single = [0u8; 7];
    let mut ns = 0usize;

    for idx in (0..13usize).rev() {
        match rc[idx] {
            4 => {
                quad[nq] = idx as u8;
                nq += 1;
            }
            3 => {
                trip[nt] = idx as u8;
                nt += 1;
            }
            2 => {
                pair[np] = idx as u8;
                np += 1;
            }
            1 => {
                single[ns] = idx as u8;
                ns += 1;
            }
            _ => {}
        }
    }

    if nq >= 1 {
        let kicker = if nt > 0 {
            trip[0]
        } else if np > 0 {
            pair[0]
        } else {
            single[0]
        };
        return pack(7, &[quad[0], kicker]);
    }

    if nt >= 1 && (np >= 1 || nt >= 2) {
        let second = if nt >= 2 { trip[1] } else { pair[0] };
        return pack(6, &[trip[0], second]);
    }

    let rank_mask: u16 = (0..13).fold(0u16, |m, i| if rc[i] > 0 { m | (1 << i) } else { m });
    let straight_high = STRAIGHT_TABLE[rank_mask as usize];
    if straight_high > 0 {
        return pack(4, &[straight_high]);
    }

    if nt >= 1 {
        return pack(3, &[trip[0], single[0], single[1]]);
    }

    if np >= 2 {
        let kicker = if np >= 3 && pair[2] > single.first().copied().unwrap_or(0) {
            pair[2]
        } else {
            single.first().copied().unwrap_or(0)
        };
        return pack(2, &[pair[0], pair[1], kicker]);
    }

    if np == 1 {
        return pack(1, &[pair[0], single[0], single[1], single[2]]);
    }

    pack(0, &[single[0], single[1], single[2], single[3], single[4]])
}
