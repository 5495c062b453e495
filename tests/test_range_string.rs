//! Black-box range-string grammar tests, exercised only through
//! `holdem_core`'s public surface.

use holdem_core::{string_to_hands, string_to_tokens, validate_string, HandRange};

#[test]
fn parses_weighted_mixed_range() {
    let tokens = string_to_tokens("AA, 88+, ATs+, 80%(KQo)").unwrap();
    assert!(tokens.contains(&("AA".to_string(), 1.0)));
    assert!(tokens.iter().any(|(t, w)| t == "KQo" && (*w - 0.8).abs() < 1e-9));
    assert!(tokens.iter().any(|(t, _)| t == "88"));
    assert!(tokens.iter().any(|(t, _)| t == "99"));
}

#[test]
fn hand_range_expands_to_expected_combo_count() {
    // AA: 6 combos, 87o: 12 combos.
    let range = HandRange::parse("AA, 87o").unwrap();
    assert_eq!(range.len(), 18);
    for entry in &range {
        assert!((entry.weight - 1.0).abs() < 1e-9);
    }
}

#[test]
fn single_hand_tokens_normalize_regardless_of_input_order() {
    let a = string_to_hands("AsKs").unwrap();
    let b = string_to_hands("KsAs").unwrap();
    assert_eq!(a, b);
    assert_eq!(a.len(), 1);
}

#[test]
fn tag_tokens_contribute_no_concrete_hands() {
    let hands = string_to_hands("#UTG#").unwrap();
    assert!(hands.is_empty());
    assert!(validate_string("#UTG#"));
}

#[test]
fn invalid_strings_are_rejected() {
    assert!(!validate_string("AX+"));
    assert!(!validate_string("22o"));
    assert!(!validate_string("AsAs"));
}

#[test]
fn unspecified_suitedness_range_splits_into_offsuit_and_suited() {
    let tokens = string_to_tokens("JTn-J8n").unwrap();
    let mut names: Vec<&str> = tokens.iter().map(|(t, _)| t.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["J8o", "J8s", "J9o", "J9s", "JTo", "JTs"]);
}

#[test]
fn single_hand_suit_case_is_accepted_either_way() {
    let lower = string_to_hands("AsKs").unwrap();
    let upper = string_to_hands("AsKS").unwrap();
    assert_eq!(lower, upper);
}

#[test]
fn range_round_trips_through_hand_range_parse() {
    let original = HandRange::parse("TT+, A8o-ATo, 80%(KTs+)").unwrap();
    let rendered = holdem_core::tokens_to_string(original.tokens());
    let reparsed = HandRange::parse(&rendered).unwrap();

    let mut a: Vec<_> = original.entries().iter().map(|e| (e.hand, format!("{:.6}", e.weight))).collect();
    let mut b: Vec<_> = reparsed.entries().iter().map(|e| (e.hand, format!("{:.6}", e.weight))).collect();
    a.sort_by_key(|(h, w)| (h.0, h.1, w.clone()));
    b.sort_by_key(|(h, w)| (h.0, h.1, w.clone()));
    assert_eq!(a, b);
}
