//! Windowed term co-occurrence.
//!
//! Two terms co-occur when an occurrence of one lies within `window`
//! characters of an occurrence of the other. For every pair of matches
//! `(i, j)` with `i < j`, each position of match `i` that has at least one
//! position of match `j` inside the window adds one to the pair's count.
//!
//! The scan is quadratic in matches and in positions per match. Matches are
//! bounded by vocabulary size and documents by the input limit, which keeps
//! it tractable.

use indexmap::IndexMap;

use crate::reports::{CoOccurrence, TermMatch};

/// Default co-occurrence window, in characters.
pub const DEFAULT_COOCCURRENCE_WINDOW: i64 = 100;

/// Maximum number of pairs returned.
pub const TOP_PAIRS_LIMIT: usize = 20;

/// Count term pairs occurring within `window` characters of each other.
///
/// Returns at most [`TOP_PAIRS_LIMIT`] pairs, highest count first, ties in
/// first-seen order. A non-positive window yields no pairs.
#[tracing::instrument(skip(matches), fields(matches = matches.len()))]
pub fn co_occurrences(matches: &[TermMatch], window: i64) -> Vec<CoOccurrence> {
    if window <= 0 {
        return Vec::new();
    }
    let window = window.unsigned_abs();

    let mut counts: IndexMap<(String, String), usize> = IndexMap::new();
    for (i, first) in matches.iter().enumerate() {
        for second in &matches[i + 1..] {
            for &p1 in &first.positions {
                let near = second
                    .positions
                    .iter()
                    .any(|&p2| (p1.abs_diff(p2) as u64) <= window);
                if near {
                    *counts.entry(sorted_pair(&first.term, &second.term)).or_insert(0) += 1;
                }
            }
        }
    }

    let mut pairs: Vec<CoOccurrence> = counts
        .into_iter()
        .map(|((a, b), count)| CoOccurrence { pair: [a, b], count })
        .collect();
    pairs.sort_by(|a, b| b.count.cmp(&a.count));
    pairs.truncate(TOP_PAIRS_LIMIT);

    tracing::debug!(pairs = pairs.len(), "co-occurrence complete");
    pairs
}

fn sorted_pair(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}
