//! Equity engine: exact enumeration and Monte Carlo sampling of a hero hand
//! (or hero range) against a weighted villain range.
//!
//! Grounded in the teacher's `equity.rs` (`equity_vs_hand`/`equity_vs_range`
//! threading an `impl Rng` and returning an `EquityResult`-shaped
//! win/tie/lose split) and `bucketing.rs`'s `exhaustive_river_equity` /
//! `monte_carlo_equity` split between exact and sampled paths.

use std::collections::HashMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::card::{union_mask, Card};
use crate::deck::Deck;
use crate::error::{CoreError, CoreResult};
use crate::evaluator::evaluate;
use crate::prng::Prng;
use crate::range::HandRange;

/// Tunables for the equity engine's weighted villain sampling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityConfig {
    /// How many times a Monte Carlo trial may redraw a villain hand that
    /// conflicts with the dead set before the whole trial is skipped.
    pub max_villain_rejections: u32,
}

impl Default for EquityConfig {
    fn default() -> Self {
        EquityConfig {
            max_villain_rejections: 64,
        }
    }
}

fn hand_mask(hand: (Card, Card)) -> u64 {
    hand.0.mask() | hand.1.mask()
}

fn combine(hand: (Card, Card), board: &[Card]) -> Vec<Card> {
    let mut v = Vec::with_capacity(2 + board.len());
    v.push(hand.0);
    v.push(hand.1);
    v.extend_from_slice(board);
    v
}

fn credit_for(hero_value: u32, villain_value: u32) -> f64 {
    if hero_value > villain_value {
        1.0
    } else if hero_value == villain_value {
        0.5
    } else {
        0.0
    }
}

fn check_board_len(board: &[Card]) -> CoreResult<usize> {
    if board.len() > 5 {
        return Err(CoreError::InvalidHand(format!(
            "board has {} cards, at most 5 allowed",
            board.len()
        )));
    }
    Ok(5 - board.len())
}

/// Precomputes a cumulative-weight array for weighted sampling over a
/// range's entries via binary search (spec.md §4.E).
fn cumulative_weights(range: &HandRange) -> Vec<f64> {
    let mut acc = 0.0;
    range
        .entries()
        .iter()
        .map(|e| {
            acc += e.weight;
            acc
        })
        .collect()
}

fn sample_villain_hand<'a>(
    range: &'a HandRange,
    cumulative: &[f64],
    total_weight: f64,
    dead_mask: u64,
    max_rejections: u32,
    rng: &mut Prng,
) -> Option<&'a (Card, Card)> {
    let entries = range.entries();
    for _ in 0..max_rejections {
        let r = rng.random() * total_weight;
        let idx = cumulative.partition_point(|&c| c <= r).min(entries.len() - 1);
        let candidate = &entries[idx].hand;
        if hand_mask(*candidate) & dead_mask == 0 {
            return Some(candidate);
        }
    }
    None
}

/// Exact weighted win-plus-half-tie probability of `hero` against
/// `villain_range`, enumerating every legal board completion.
///
/// Villain entries that share a card with `hero` or `board` are skipped
/// (card-exclusivity filter). Fails with `InsufficientCards` if no villain
/// entry has any legal completion at all (§7: the engine propagates this
/// rather than silently returning `0.0` — see DESIGN.md's Open Question
/// resolution).
pub fn hand_vs_range_exact(
    hero: (Card, Card),
    villain_range: &HandRange,
    board: &[Card],
) -> CoreResult<f64> {
    let needed = check_board_len(board)?;
    let dead_base = union_mask(board) | hand_mask(hero);

    let all_cards = Deck::all();
    let mut numerator = 0.0f64;
    let mut denominator = 0.0f64;

    for entry in villain_range {
        let vmask = hand_mask(entry.hand);
        if vmask & dead_base != 0 {
            continue;
        }
        let dead = dead_base | vmask;
        let undealt: Vec<Card> = all_cards.iter().copied().filter(|c| dead & c.mask() == 0).collect();
        if undealt.len() < needed {
            continue;
        }

        let mut combo_credit = 0.0f64;
        let mut combo_count = 0u64;
        for combo in undealt.iter().combinations(needed) {
            let mut full_board = board.to_vec();
            full_board.extend(combo.into_iter().copied());
            let hero_value = evaluate(&combine(hero, &full_board))?;
            let villain_value = evaluate(&combine(entry.hand, &full_board))?;
            combo_credit += credit_for(hero_value, villain_value);
            combo_count += 1;
        }
        if combo_count > 0 {
            numerator += entry.weight * (combo_credit / combo_count as f64);
            denominator += entry.weight;
        }
    }

    if denominator == 0.0 {
        return Err(CoreError::InsufficientCards {
            requested: villain_range.len(),
            available: 0,
        });
    }
    Ok(numerator / denominator)
}

/// Monte Carlo estimate of `hand_vs_range_exact`, sampling a villain hand
/// (weighted) and a board completion (uniform) per trial.
pub fn hand_vs_range_monte_carlo(
    hero: (Card, Card),
    villain_range: &HandRange,
    board: &[Card],
    n_trials: u32,
    rng: &mut Prng,
    config: &EquityConfig,
) -> CoreResult<f64> {
    let needed = check_board_len(board)?;
    if villain_range.is_empty() {
        return Err(CoreError::RangeStringError("villain range is empty".to_string()));
    }
    let dead_base = union_mask(board) | hand_mask(hero);
    let cumulative = cumulative_weights(villain_range);
    let total_weight = *cumulative.last().unwrap();

    let mut accepted = 0u32;
    let mut credit_sum = 0.0f64;

    for _ in 0..n_trials {
        let Some(&villain) = sample_villain_hand(
            villain_range,
            &cumulative,
            total_weight,
            dead_base,
            config.max_villain_rejections,
            rng,
        ) else {
            continue;
        };
        let dead = dead_base | hand_mask(villain);
        let Ok(draw) = Deck::sample(needed, dead, rng) else {
            continue;
        };
        let mut full_board = board.to_vec();
        full_board.extend(draw);

        let hero_value = evaluate(&combine(hero, &full_board))?;
        let villain_value = evaluate(&combine(villain, &full_board))?;
        credit_sum += credit_for(hero_value, villain_value);
        accepted += 1;
    }

    if accepted == 0 {
        return Err(CoreError::InsufficientCards {
            requested: n_trials as usize,
            available: 0,
        });
    }
    Ok(credit_sum / accepted as f64)
}

/// Monte Carlo equity of every hero hand in `hero_range` against
/// `villain_range`, sharing trials across hero hands: each trial deals one
/// villain hand and one board completion, then credits every hero hand
/// that doesn't conflict with that trial's villain/board cards.
///
/// Hero hands with zero legal trials are excluded from the result map
/// entirely (spec.md §4.E / §8 scenario 6).
pub fn all_hands_vs_range(
    hero_range: &HandRange,
    villain_range: &HandRange,
    board: &[Card],
    n_trials: u32,
    rng: &mut Prng,
    config: &EquityConfig,
) -> CoreResult<HashMap<(Card, Card), f64>> {
    let needed = check_board_len(board)?;
    if villain_range.is_empty() {
        return Err(CoreError::RangeStringError("villain range is empty".to_string()));
    }
    let board_mask = union_mask(board);
    let cumulative = cumulative_weights(villain_range);
    let total_weight = *cumulative.last().unwrap();

    let mut credit_sum: HashMap<(Card, Card), f64> = HashMap::new();
    let mut trial_count: HashMap<(Card, Card), u32> = HashMap::new();

    for _ in 0..n_trials {
        let Some(&villain) = sample_villain_hand(
            villain_range,
            &cumulative,
            total_weight,
            board_mask,
            config.max_villain_rejections,
            rng,
        ) else {
            continue;
        };
        let vmask = hand_mask(villain);
        let dead = board_mask | vmask;
        let Ok(draw) = Deck::sample(needed, dead, rng) else {
            continue;
        };
        let mut full_board = board.to_vec();
        full_board.extend(draw);
        let completion_mask = union_mask(&full_board);
        let villain_value = evaluate(&combine(villain, &full_board))?;

        for entry in hero_range {
            let hmask = hand_mask(entry.hand);
            if hmask & (completion_mask | vmask) != 0 {
                continue;
            }
            let hero_value = evaluate(&combine(entry.hand, &full_board))?;
            *credit_sum.entry(entry.hand).or_insert(0.0) += credit_for(hero_value, villain_value);
            *trial_count.entry(entry.hand).or_insert(0) += 1;
        }
    }

    let mut result = HashMap::new();
    for (hand, count) in trial_count {
        if count > 0 {
            result.insert(hand, credit_sum[&hand] / count as f64);
        }
    }
    Ok(result)
}
