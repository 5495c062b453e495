//! Range string grammar: parsing, token expansion, normalization, and
//! serialization.
//!
//! Grounded in the token semantics of `original_source/eval7/rangestring.py`
//! (`expand_handtype_group`, `normalize_token`, `token_suitedness`,
//! `token_to_hands`, `tokens_to_string`), reimplemented as a hand-rolled
//! recursive-descent parser per spec.md's Design Notes recommendation
//! (the grammar is LL(1) with a short lookahead between a bare handtype and
//! a weight-then-`(` prefix).

use crate::card::{Card, Rank, ALL_SUITS, RANKS};
use crate::error::{CoreError, CoreResult};

/// Suitedness of a handtype token: `s`uited, `o`ffsuit, `p`air, or
/// unspecified (`n`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suitedness {
    Suited,
    Offsuit,
    Pair,
    Unspecified,
}

impl Suitedness {
    fn suffix_char(self) -> char {
        match self {
            Suitedness::Suited => 's',
            Suitedness::Offsuit => 'o',
            Suitedness::Pair => 'p',
            Suitedness::Unspecified => 'n',
        }
    }
}

/// The three shapes a handtype atom can take in the range grammar.
#[derive(Debug, Clone)]
pub enum HandTypeGroup {
    /// A bare handtype or single hand, e.g. `"AKs"`, `"AA"`, `"AsKs"`.
    Single(String),
    /// A `X-Y` kicker/pair range, e.g. `("ATs", "AQs")`.
    Range(String, String),
    /// A `X+` open-ended range, e.g. `"T7o"` for `T7o+`.
    Plus(String),
}

impl HandTypeGroup {
    pub fn single(token: &str) -> Self {
        HandTypeGroup::Single(token.to_string())
    }

    pub fn range(bottom: &str, top: &str) -> Self {
        HandTypeGroup::Range(bottom.to_string(), top.to_string())
    }

    pub fn plus(token: &str) -> Self {
        HandTypeGroup::Plus(token.to_string())
    }
}

fn is_rank_char(c: char) -> bool {
    RANKS.contains(c.to_ascii_uppercase())
}

/// Suit characters in a range-string single-hand token are case-insensitive
/// on parse (spec.md §4.D), unlike `Card`'s own `FromStr` (spec.md §4.B).
fn is_suit_char(c: char) -> bool {
    crate::card::SUITS.contains(c.to_ascii_lowercase())
}

fn rank_index_of(c: char) -> CoreResult<u8> {
    RANKS
        .find(c.to_ascii_uppercase())
        .map(|i| i as u8)
        .ok_or_else(|| CoreError::RangeStringError(format!("unknown rank '{}'", c)))
}

fn rank_char(idx: u8) -> char {
    RANKS.as_bytes()[idx as usize] as char
}

/// The two rank indices of a handtype token's first two characters, sorted
/// `(high, low)`.
fn sorted_rank_indices(token: &str) -> CoreResult<(u8, u8)> {
    let mut chars = token.chars();
    let c0 = chars
        .next()
        .ok_or_else(|| CoreError::RangeStringError("empty handtype token".to_string()))?;
    let c1 = chars
        .next()
        .ok_or_else(|| CoreError::RangeStringError("incomplete handtype token".to_string()))?;
    let r0 = rank_index_of(c0)?;
    let r1 = rank_index_of(c1)?;
    Ok(if r0 >= r1 { (r0, r1) } else { (r1, r0) })
}

/// Determines a handtype token's suitedness. Fails with `RangeStringError`
/// if a pair carries a (meaningless) suitedness suffix.
pub fn token_suitedness(token: &str) -> CoreResult<Suitedness> {
    let chars: Vec<char> = token.chars().collect();
    match chars.len() {
        3 => {
            if chars[0].eq_ignore_ascii_case(&chars[1]) {
                Err(CoreError::RangeStringError(format!(
                    "pairs cannot have suitedness: {}",
                    token
                )))
            } else {
                match chars[2] {
                    's' => Ok(Suitedness::Suited),
                    'o' => Ok(Suitedness::Offsuit),
                    'n' => Ok(Suitedness::Unspecified),
                    _ => Err(CoreError::RangeStringError(format!(
                        "invalid suitedness suffix in {}",
                        token
                    ))),
                }
            }
        }
        2 => {
            if chars[0].eq_ignore_ascii_case(&chars[1]) {
                Ok(Suitedness::Pair)
            } else {
                Ok(Suitedness::Unspecified)
            }
        }
        _ => Err(CoreError::RangeStringError(format!(
            "invalid handtype token: {}",
            token
        ))),
    }
}

/// Canonicalizes a token: higher rank first for non-pairs, a trailing `p`
/// for a suffix-less pair, and (rank, suit)-descending ordering for single
/// hands. Suit characters keep their original case.
pub fn normalize_token(token: &str) -> CoreResult<String> {
    if token.starts_with('#') {
        return Ok(token.to_string());
    }
    if token.chars().count() == 4 {
        let chars: Vec<char> = token.chars().collect();
        let r0 = rank_index_of(chars[0])?;
        let r1 = rank_index_of(chars[2])?;
        // Suit case is accepted either way here but preserved as-is below
        // (spec.md §4.D); only the index is needed for ordering/duplicate
        // checks.
        let s0 = crate::card::SUITS
            .find(chars[1].to_ascii_lowercase())
            .ok_or_else(|| CoreError::RangeStringError(format!("invalid suit in {}", token)))?
            as u8;
        let s1 = crate::card::SUITS
            .find(chars[3].to_ascii_lowercase())
            .ok_or_else(|| CoreError::RangeStringError(format!("invalid suit in {}", token)))?
            as u8;
        if r0 == r1 && s0 == s1 {
            return Err(CoreError::RangeStringError(format!(
                "duplicate card in hand: {}",
                token
            )));
        }
        if r0 < r1 || (r0 == r1 && s0 < s1) {
            Ok(format!("{}{}{}{}", chars[2], chars[3], chars[0], chars[1]))
        } else {
            Ok(token.to_string())
        }
    } else {
        let (hi, lo) = sorted_rank_indices(token)?;
        let suitedness = token_suitedness(token)?;
        Ok(format!(
            "{}{}{}",
            rank_char(hi),
            rank_char(lo),
            suitedness.suffix_char()
        ))
    }
}

/// Strips a normalized handtype token's suffix into its concrete expansion:
/// a bare pair token for `p`, an (offsuit, suited) pair for `n`, or the
/// token itself when it's already suited/offsuit, a single hand, or a tag.
fn finalize_handtype_token(token: &str) -> Vec<String> {
    if token.starts_with('#') || token.chars().count() == 4 {
        return vec![token.to_string()];
    }
    match token.chars().last() {
        Some('n') => {
            let base = &token[..token.len() - 1];
            vec![format!("{}o", base), format!("{}s", base)]
        }
        Some('p') => vec![token[..token.len() - 1].to_string()],
        _ => vec![token.to_string()],
    }
}

fn build_handtype_token(hi: u8, lo: u8, suitedness: Suitedness) -> String {
    format!("{}{}{}", rank_char(hi), rank_char(lo), suitedness.suffix_char())
}

/// Expands a single handtype atom (`X`, `X-Y`, or `X+`) into its normalized
/// leaf handtype tokens. Each leaf is either a bare pair (`"88"`), an
/// explicit suited/offsuit handtype (`"AKs"`), a single hand (`"AsKs"`), or
/// a tag (`"#UTG#"`).
pub fn expand_handtype_group(group: &HandTypeGroup) -> CoreResult<Vec<String>> {
    match group {
        HandTypeGroup::Single(token) => {
            if token.starts_with('#') {
                return Ok(vec![token.clone()]);
            }
            let normalized = normalize_token(token)?;
            Ok(finalize_handtype_token(&normalized))
        }
        HandTypeGroup::Plus(token) => {
            let suitedness = token_suitedness(token)?;
            let normalized = normalize_token(token)?;
            let (hi, lo) = sorted_rank_indices(&normalized)?;
            let (bot_lo, top_lo) = if suitedness == Suitedness::Pair {
                (lo, 12)
            } else {
                let max_kicker = hi.checked_sub(1).ok_or_else(|| {
                    CoreError::RangeStringError(format!("no kicker above top card in {}", token))
                })?;
                (lo, max_kicker)
            };
            let mut raw = Vec::new();
            for i in bot_lo..=top_lo {
                let (a, b) = if suitedness == Suitedness::Pair { (i, i) } else { (hi, i) };
                raw.push(build_handtype_token(a, b, suitedness));
            }
            Ok(raw.iter().flat_map(|t| finalize_handtype_token(t)).collect())
        }
        HandTypeGroup::Range(bottom, top) => {
            let bot_suitedness = token_suitedness(bottom)?;
            let top_suitedness = token_suitedness(top)?;
            if bot_suitedness != top_suitedness {
                return Err(CoreError::RangeStringError(format!(
                    "suitedness mismatch: '{}' '{}'",
                    bottom, top
                )));
            }
            let bot_norm = normalize_token(bottom)?;
            let top_norm = normalize_token(top)?;
            let mut bot_pair = sorted_rank_indices(&bot_norm)?;
            let mut top_pair = sorted_rank_indices(&top_norm)?;
            if top_pair.1 < bot_pair.1 {
                std::mem::swap(&mut bot_pair, &mut top_pair);
            }
            if bot_suitedness != Suitedness::Pair && bot_pair.0 != top_pair.0 {
                return Err(CoreError::RangeStringError(format!(
                    "top card mismatch: '{}' '{}'",
                    bottom, top
                )));
            }
            let mut raw = Vec::new();
            for i in bot_pair.1..=top_pair.1 {
                let (a, b) = if bot_suitedness == Suitedness::Pair {
                    (i, i)
                } else {
                    (top_pair.0, i)
                };
                raw.push(build_handtype_token(a, b, bot_suitedness));
            }
            Ok(raw.iter().flat_map(|t| finalize_handtype_token(t)).collect())
        }
    }
}

/// Expands a normalized handtype token into its concrete `(card, card)`
/// pairs: 6 for a pair, 4 for suited, 12 for offsuit, 16 for unspecified
/// (never emitted by `expand_handtype_group`, but supported here per
/// spec.md §4.D), or 1 for a single hand.
pub fn token_to_hands(token: &str) -> CoreResult<Vec<(Card, Card)>> {
    if token.chars().count() == 4 {
        let c0 = parse_single_hand_card(&token[0..2])?;
        let c1 = parse_single_hand_card(&token[2..4])?;
        if c0 == c1 {
            return Err(CoreError::RangeStringError(format!(
                "duplicate card in hand: {}",
                token
            )));
        }
        return Ok(vec![(c0, c1)]);
    }

    let suitedness = token_suitedness(token)?;
    let (hi, lo) = sorted_rank_indices(token)?;
    let hi_rank = Rank::from_index(hi);
    let lo_rank = Rank::from_index(lo);

    let mut hands = Vec::new();
    for &s1 in ALL_SUITS.iter() {
        match suitedness {
            Suitedness::Suited => hands.push((Card::new(hi_rank, s1), Card::new(lo_rank, s1))),
            Suitedness::Offsuit => {
                for &s2 in ALL_SUITS.iter() {
                    if s2 != s1 {
                        hands.push((Card::new(hi_rank, s1), Card::new(lo_rank, s2)));
                    }
                }
            }
            Suitedness::Pair => {
                for &s2 in ALL_SUITS.iter() {
                    if s2.index() > s1.index() {
                        hands.push((Card::new(hi_rank, s1), Card::new(lo_rank, s2)));
                    }
                }
            }
            Suitedness::Unspecified => {
                for &s2 in ALL_SUITS.iter() {
                    hands.push((Card::new(hi_rank, s1), Card::new(lo_rank, s2)));
                }
            }
        }
    }
    Ok(hands)
}

/// Parses a single-hand token's card with case-insensitive suit matching
/// (spec.md §4.D), unlike `parse_card`/`Suit::from_str`.
fn parse_single_hand_card(s: &str) -> CoreResult<Card> {
    let mut chars = s.chars();
    let rc = chars
        .next()
        .ok_or_else(|| CoreError::RangeStringError(format!("invalid card in hand: {}", s)))?;
    let sc = chars
        .next()
        .ok_or_else(|| CoreError::RangeStringError(format!("invalid card in hand: {}", s)))?;
    if chars.next().is_some() {
        return Err(CoreError::RangeStringError(format!("invalid card in hand: {}", s)));
    }
    let rank = Rank::from_index(rank_index_of(rc)?);
    let suit_idx = crate::card::SUITS
        .find(sc.to_ascii_lowercase())
        .ok_or_else(|| CoreError::RangeStringError(format!("invalid suit in {}", s)))?;
    Ok(Card::new(rank, crate::card::Suit::from_index(suit_idx as u8)))
}

fn canonical_pair(a: Card, b: Card) -> (Card, Card) {
    if a >= b {
        (a, b)
    } else {
        (b, a)
    }
}

// -------------------------------------------------------------------------
// Recursive-descent parser
// -------------------------------------------------------------------------

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(s: &str) -> Self {
        Parser {
            chars: s.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn eof(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn error(&self, msg: &str) -> CoreError {
        CoreError::RangeStringError(format!("{} at position {}", msg, self.pos))
    }

    fn parse_range(&mut self) -> CoreResult<Vec<(String, f64)>> {
        let mut out = Vec::new();
        self.skip_ws();
        if self.eof() {
            return Ok(out);
        }
        loop {
            self.skip_ws();
            if let Some(weighted) = self.try_parse_weighted_paren()? {
                out.extend(weighted);
            } else {
                let tokens = self.parse_handtype_atom()?;
                out.extend(tokens.into_iter().map(|t| (t, 1.0)));
            }
            self.skip_ws();
            if self.peek() == Some(',') {
                self.bump();
                continue;
            }
            break;
        }
        self.skip_ws();
        if !self.eof() {
            return Err(self.error("unexpected trailing input"));
        }
        Ok(out)
    }

    fn parse_group_atoms(&mut self) -> CoreResult<Vec<String>> {
        let mut out = Vec::new();
        loop {
            self.skip_ws();
            out.extend(self.parse_handtype_atom()?);
            self.skip_ws();
            if self.peek() == Some(',') {
                self.bump();
                continue;
            }
            break;
        }
        Ok(out)
    }

    fn try_parse_decimal(&mut self) -> Option<f64> {
        let start = self.pos;
        let mut buf = String::new();
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            buf.push(self.bump().unwrap());
        }
        let had_int = !buf.is_empty();
        let mut had_dot = false;
        if self.peek() == Some('.') {
            had_dot = true;
            buf.push('.');
            self.bump();
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                buf.push(self.bump().unwrap());
            }
        }
        if !had_int && !had_dot {
            self.pos = start;
            return None;
        }
        if buf == "." {
            self.pos = start;
            return None;
        }
        match buf.parse::<f64>() {
            Ok(v) => Some(v),
            Err(_) => {
                self.pos = start;
                None
            }
        }
    }

    /// Tries to parse `weight [%] "(" group ")"`. Rolls back on failure so
    /// the caller can fall through to a bare handtype atom — this is the
    /// grammar's lookahead point between `handtype` and a weight prefix.
    fn try_parse_weighted_paren(&mut self) -> CoreResult<Option<Vec<(String, f64)>>> {
        let start = self.pos;
        let Some(weight_val) = self.try_parse_decimal() else {
            self.pos = start;
            return Ok(None);
        };
        let mut percent = false;
        if self.peek() == Some('%') {
            self.bump();
            percent = true;
        }
        self.skip_ws();
        if self.peek() != Some('(') {
            self.pos = start;
            return Ok(None);
        }
        self.bump();
        self.skip_ws();
        let atoms = self.parse_group_atoms()?;
        self.skip_ws();
        if self.peek() != Some(')') {
            return Err(self.error("expected ')'"));
        }
        self.bump();
        let weight = if percent { weight_val / 100.0 } else { weight_val };
        Ok(Some(atoms.into_iter().map(|t| (t, weight)).collect()))
    }

    fn parse_tag(&mut self) -> CoreResult<Vec<String>> {
        self.bump(); // '#'
        let mut ident = String::new();
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            ident.push(self.bump().unwrap());
        }
        if self.peek() != Some('#') {
            return Err(self.error("unterminated tag"));
        }
        self.bump();
        Ok(vec![format!("#{}#", ident)])
    }

    fn parse_bare_handtype(&mut self) -> CoreResult<String> {
        let c0 = self.peek().ok_or_else(|| self.error("expected handtype"))?;
        if !is_rank_char(c0) {
            return Err(self.error("expected rank"));
        }
        self.bump();
        let c1 = self.peek().ok_or_else(|| self.error("expected second rank"))?;
        if !is_rank_char(c1) {
            return Err(self.error("expected second rank"));
        }
        self.bump();
        let mut s = format!("{}{}", c0, c1);
        if matches!(self.peek(), Some('s') | Some('o')) {
            s.push(self.bump().unwrap());
        }
        Ok(s)
    }

    fn parse_handtype_atom(&mut self) -> CoreResult<Vec<String>> {
        if self.peek() == Some('#') {
            return self.parse_tag();
        }
        let c0 = self.peek().ok_or_else(|| self.error("expected atom"))?;
        if !is_rank_char(c0) {
            return Err(self.error(&format!("unexpected character '{}'", c0)));
        }
        self.bump();
        let c1 = self.peek().ok_or_else(|| self.error("unexpected end of input"))?;
        if is_rank_char(c1) {
            self.bump();
            let mut base = format!("{}{}", c0, c1);
            if matches!(self.peek(), Some('s') | Some('o')) {
                base.push(self.bump().unwrap());
            }
            match self.peek() {
                Some('+') => {
                    self.bump();
                    expand_handtype_group(&HandTypeGroup::Plus(base))
                }
                Some('-') => {
                    self.bump();
                    self.skip_ws();
                    let top = self.parse_bare_handtype()?;
                    expand_handtype_group(&HandTypeGroup::Range(base, top))
                }
                _ => expand_handtype_group(&HandTypeGroup::Single(base)),
            }
        } else if is_suit_char(c1) {
            self.bump();
            let c2 = self.peek().ok_or_else(|| self.error("incomplete single hand"))?;
            if !is_rank_char(c2) {
                return Err(self.error("expected rank in single hand"));
            }
            self.bump();
            let c3 = self.peek().ok_or_else(|| self.error("incomplete single hand"))?;
            if !is_suit_char(c3) {
                return Err(self.error("expected suit in single hand"));
            }
            self.bump();
            let token = format!("{}{}{}{}", c0, c1, c2, c3);
            Ok(vec![normalize_token(&token)?])
        } else {
            Err(self.error(&format!("unexpected character '{}'", c1)))
        }
    }
}

/// Parses a range string into `(token, weight)` pairs, with tags and
/// handtype atoms fully expanded to their leaf tokens.
pub fn string_to_tokens(s: &str) -> CoreResult<Vec<(String, f64)>> {
    Parser::new(s).parse_range()
}

/// Parses a range string directly into concrete `(hand_hi, hand_lo, weight)`
/// triples, skipping tags (which expand to no hands).
pub fn string_to_hands(s: &str) -> CoreResult<Vec<(Card, Card, f64)>> {
    let tokens = string_to_tokens(s)?;
    let mut hands = Vec::new();
    for (token, weight) in tokens {
        if token.starts_with('#') {
            continue;
        }
        for (a, b) in token_to_hands(&token)? {
            let (hi, lo) = canonical_pair(a, b);
            hands.push((hi, lo, weight));
        }
    }
    Ok(hands)
}

/// Returns `true` iff `s` parses without error.
pub fn validate_string(s: &str) -> bool {
    string_to_tokens(s).is_ok()
}

fn collapse_run<F: Fn(u8) -> String>(indices: &[u8], max_index: u8, token_at: F) -> Vec<String> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < indices.len() {
        let mut j = i;
        while j + 1 < indices.len() && indices[j + 1] == indices[j] + 1 {
            j += 1;
        }
        if j == i {
            out.push(token_at(indices[i]));
        } else {
            let bot = indices[i];
            let top = indices[j];
            if top == max_index {
                out.push(format!("{}+", token_at(bot)));
            } else {
                out.push(format!("{}-{}", token_at(top), token_at(bot)));
            }
        }
        i = j + 1;
    }
    out
}

fn render_weight_group(tokens: &[(String, f64)], weight: f64) -> String {
    let normalized: Vec<String> = tokens
        .iter()
        .filter(|(_, w)| (*w - weight).abs() < 1e-9)
        .map(|(t, _)| normalize_token(t).unwrap_or_else(|_| t.clone()))
        .collect();

    let mut pair_indices = Vec::new();
    let mut singles = Vec::new();
    let mut tags = Vec::new();
    let mut others = Vec::new();

    for t in &normalized {
        if t.starts_with('#') {
            tags.push(t.clone());
        } else if t.chars().count() == 4 {
            singles.push(t.clone());
        } else if t.ends_with('p') {
            pair_indices.push(rank_index_of(t.chars().next().unwrap()).unwrap());
        } else {
            others.push(t.clone());
        }
    }

    pair_indices.sort_unstable();
    pair_indices.dedup();
    let mut pair_strings = collapse_run(&pair_indices, 12, |idx| {
        let c = rank_char(idx);
        format!("{}{}", c, c)
    });
    pair_strings.reverse();

    let mut other_strings = Vec::new();
    for top_idx in 0..13u8 {
        for &suffix in &['o', 's'] {
            let mut kickers: Vec<u8> = others
                .iter()
                .filter_map(|t| {
                    let chars: Vec<char> = t.chars().collect();
                    if chars.len() == 3 && chars[0] == rank_char(top_idx) && chars[2] == suffix {
                        rank_index_of(chars[1]).ok().filter(|&k| k < top_idx)
                    } else {
                        None
                    }
                })
                .collect();
            kickers.sort_unstable();
            kickers.dedup();
            if top_idx == 0 {
                continue; // no kicker can be below rank index 0
            }
            let max_kicker = top_idx - 1;
            other_strings.extend(collapse_run(&kickers, max_kicker, |idx| {
                format!("{}{}{}", rank_char(top_idx), rank_char(idx), suffix)
            }));
        }
    }
    other_strings.reverse();

    singles.sort();
    singles.reverse();

    let mut all = Vec::new();
    all.extend(pair_strings);
    all.extend(other_strings);
    all.extend(singles);
    all.extend(tags);
    all.join(", ")
}

/// Serializes `(token, weight)` pairs back into a range string. Inverse of
/// `string_to_tokens` at the multiset-of-weighted-hands level, not
/// necessarily byte-for-byte.
pub fn tokens_to_string(tokens: &[(String, f64)]) -> String {
    let mut weights: Vec<f64> = tokens.iter().map(|(_, w)| *w).collect();
    weights.sort_by(|a, b| b.partial_cmp(a).unwrap());
    weights.dedup_by(|a, b| (*a - *b).abs() < 1e-9);

    let mut parts = Vec::new();
    if let Some(pos) = weights.iter().position(|&w| (w - 1.0).abs() < 1e-9) {
        parts.push(render_weight_group(tokens, 1.0));
        weights.remove(pos);
    }
    for w in weights {
        let body = render_weight_group(tokens, w);
        parts.push(format!("{}%({})", (w * 100.0).round() as i64, body));
    }
    parts.join(", ")
}

/// A single entry in a weighted range: an unordered pair of distinct cards
/// (higher rank first, ties broken by suit index) and its weight in `(0,
/// 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeEntry {
    pub hand: (Card, Card),
    pub weight: f64,
}

/// A weighted range of hands, built once from its source string and
/// read-only thereafter.
#[derive(Debug, Clone)]
pub struct HandRange {
    source: String,
    tokens: Vec<(String, f64)>,
    entries: Vec<RangeEntry>,
}

impl HandRange {
    /// Parses a range string (see module docs for the grammar).
    pub fn parse(s: &str) -> CoreResult<Self> {
        let tokens = string_to_tokens(s)?;
        let entries = string_to_hands(s)?
            .into_iter()
            .map(|(hi, lo, weight)| RangeEntry { hand: (hi, lo), weight })
            .collect();
        Ok(HandRange {
            source: s.to_string(),
            tokens,
            entries,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tokens(&self) -> &[(String, f64)] {
        &self.tokens
    }

    pub fn entries(&self) -> &[RangeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a HandRange {
    type Item = &'a RangeEntry;
    type IntoIter = std::slice::Iter<'a, RangeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_to_tokens_basic() {
        let tokens = string_to_tokens("AA, 0.8(AKs)").unwrap();
        assert_eq!(tokens, vec![("AA".to_string(), 1.0), ("AKs".to_string(), 0.8)]);
    }

    #[test]
    fn expand_range_suited() {
        let result = expand_handtype_group(&HandTypeGroup::range("ATs", "AQs")).unwrap();
        assert_eq!(result, vec!["ATs", "AJs", "AQs"]);
    }

    #[test]
    fn expand_range_unspecified_splits() {
        let result = expand_handtype_group(&HandTypeGroup::range("JTn", "J8n")).unwrap();
        assert_eq!(result, vec!["J8o", "J8s", "J9o", "J9s", "JTo", "JTs"]);
    }

    #[test]
    fn expand_plus_offsuit() {
        let result = expand_handtype_group(&HandTypeGroup::plus("T7o")).unwrap();
        assert_eq!(result, vec!["T7o", "T8o", "T9o"]);
    }

    #[test]
    fn expand_plus_pair() {
        let result = expand_handtype_group(&HandTypeGroup::plus("88")).unwrap();
        assert_eq!(result, vec!["88", "99", "TT", "JJ", "QQ", "KK", "AA"]);
    }

    #[test]
    fn expand_rejects_kicker_top_mismatch() {
        assert!(expand_handtype_group(&HandTypeGroup::range("94o", "97s")).is_err());
    }

    #[test]
    fn expand_rejects_pair_range_against_nonpair() {
        assert!(expand_handtype_group(&HandTypeGroup::range("22", "97s")).is_err());
    }

    #[test]
    fn expand_rejects_suitedness_mismatch() {
        assert!(expand_handtype_group(&HandTypeGroup::range("J3s", "QQ")).is_err());
    }

    #[test]
    fn normalize_examples() {
        assert_eq!(normalize_token("qKs").unwrap(), "KQs");
        assert_eq!(normalize_token("22").unwrap(), "22p");
        assert_eq!(normalize_token("QsAc").unwrap(), "AcQs");
        assert!(normalize_token("77s").is_err());
    }

    #[test]
    fn token_suitedness_examples() {
        assert_eq!(token_suitedness("ATs").unwrap(), Suitedness::Suited);
        assert_eq!(token_suitedness("Q3o").unwrap(), Suitedness::Offsuit);
        assert_eq!(token_suitedness("55").unwrap(), Suitedness::Pair);
        assert_eq!(token_suitedness("J7").unwrap(), Suitedness::Unspecified);
        assert_eq!(token_suitedness("J7n").unwrap(), Suitedness::Unspecified);
        assert!(token_suitedness("22o").is_err());
    }

    #[test]
    fn token_to_hands_counts() {
        assert_eq!(token_to_hands("ATs").unwrap().len(), 4);
        assert_eq!(token_to_hands("74o").unwrap().len(), 12);
        assert_eq!(token_to_hands("55").unwrap().len(), 6);
        assert_eq!(token_to_hands("AsKs").unwrap().len(), 1);
    }

    #[test]
    fn single_hand_suit_is_case_insensitive_on_parse() {
        let lower = token_to_hands("asks").unwrap();
        let upper = token_to_hands("AsKS").unwrap();
        let mixed = token_to_hands("aSKs").unwrap();
        assert_eq!(lower, upper);
        assert_eq!(lower, mixed);
        assert_eq!(lower.len(), 1);
    }

    #[test]
    fn normalize_token_preserves_original_suit_case() {
        // r0 > r1 already, so the token is returned as-is, case untouched.
        assert_eq!(normalize_token("AsKS").unwrap(), "AsKS");
        // r0 < r1, so the halves swap, but each pair's own case is kept.
        assert_eq!(normalize_token("kSAs").unwrap(), "AskS");
    }

    #[test]
    fn validate_string_examples() {
        assert!(validate_string("ATs+, 80%(22-55)"));
        assert!(validate_string("ATs+,KQ, .2(4s9s)"));
        assert!(!validate_string("ATs+, KQ, .2(4s4s)"));
        assert!(!validate_string("AX+"));
    }

    #[test]
    fn weight_percent_and_fraction() {
        let tokens = string_to_tokens("86%(AA)").unwrap();
        assert!((tokens[0].1 - 0.86).abs() < 1e-9);
        let tokens = string_to_tokens(".1%(AA)").unwrap();
        assert!((tokens[0].1 - 0.001).abs() < 1e-9);
        let tokens = string_to_tokens(".1(AA)").unwrap();
        assert!((tokens[0].1 - 0.1).abs() < 1e-9);
    }

    #[test]
    fn hand_range_len_and_iteration() {
        let range = HandRange::parse("AA, 87o").unwrap();
        assert_eq!(range.len(), 6 + 12);
        let total_weight: f64 = (&range).into_iter().map(|e| e.weight).sum();
        assert!((total_weight - 18.0).abs() < 1e-9);
    }

    #[test]
    fn round_trip_preserves_token_multiset() {
        for s in ["AA, 0.8(AKs)", "TT+, A8o-ATo, 80%(KTs+)", "AsKs, 55"] {
            let original = string_to_tokens(s).unwrap();
            let rendered = tokens_to_string(&original);
            let reparsed = string_to_tokens(&rendered).unwrap();

            let mut a: Vec<(String, String)> = original
                .iter()
                .map(|(t, w)| (t.clone(), format!("{:.6}", w)))
                .collect();
            let mut b: Vec<(String, String)> = reparsed
                .iter()
                .map(|(t, w)| (t.clone(), format!("{:.6}", w)))
                .collect();
            a.sort();
            b.sort();
            assert_eq!(a, b, "round-trip mismatch for {}", s);
        }
    }
}
