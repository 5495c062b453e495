//! Black-box evaluator tests exercised only through the crate's public
//! re-exports, in the style of the teacher's `tests/test_lookup_eval.rs`.

use holdem_core::{category_from_value, evaluate, hand_type, parse_board, Card, HandCategory};

fn cards(s: &str) -> Vec<Card> {
    parse_board(s).unwrap()
}

#[test]
fn literal_table_from_spec() {
    let cases: &[(&str, u32, &str)] = &[
        ("2c3d4h5s7s8d9c", 484658, "High Card"),
        ("2c3d4h4s7s8d9c", 16938576, "Pair"),
        ("2c3d4h4s7s7d9c", 33892096, "Two Pair"),
        ("2c3d4h7s7c7d9c", 50688512, "Trips"),
        ("2c3d4h5s7c7d6c", 67436544, "Straight"),
        ("Ac3h4h5s2hJhKd", 67305472, "Straight"),
        ("Ac3hTh5sQhJhKd", 67895296, "Straight"),
        ("2c3h4h5sJh7h6h", 84497441, "Flush"),
        ("Ac3hThTsKsKhKd", 101416960, "Full House"),
        ("Ac3hThKsKhKdKc", 118210560, "Quads"),
        ("3c2c5cAc4cKdKc", 134414336, "Straight Flush"),
    ];
    for (hand, expected_value, expected_label) in cases {
        let value = evaluate(&cards(hand)).unwrap();
        assert_eq!(value, *expected_value, "{} value mismatch", hand);
        assert_eq!(hand_type(value), *expected_label, "{} label mismatch", hand);
    }
}

#[test]
fn category_monotonicity_holds_across_random_sample() {
    use holdem_core::Deck;
    use holdem_core::Prng;

    let mut rng = Prng::from_seed(123);
    let mut best_by_category: Vec<(HandCategory, u32)> = Vec::new();

    for _ in 0..500 {
        let hand = Deck::sample(7, 0, &mut rng).unwrap();
        let value = evaluate(&hand).unwrap();
        let category = category_from_value(value);
        match best_by_category.iter().position(|(c, _)| *c == category) {
            Some(i) => {
                if value < best_by_category[i].1 {
                    best_by_category[i].1 = value;
                }
            }
            None => best_by_category.push((category, value)),
        }
    }

    best_by_category.sort_by_key(|(c, _)| *c);
    for w in best_by_category.windows(2) {
        // The *minimum* observed value of a stronger category must still
        // exceed the minimum of a weaker one, since categories never
        // overlap in the packed value space.
        assert!(
            w[1].1 > w[0].1,
            "{:?} (min {}) should outrank {:?} (min {})",
            w[1].0,
            w[1].1,
            w[0].0,
            w[0].1
        );
    }
}

#[test]
fn evaluate_rejects_short_hands() {
    let hand = cards("AcKh3d2s");
    assert!(evaluate(&hand).is_err());
}
