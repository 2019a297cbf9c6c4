//! Aggregate statistics over term matches.

use indexmap::IndexMap;

use crate::reports::{Statistics, TermMatch};

/// Maximum number of entries in [`Statistics::top_terms`].
pub const TOP_TERMS_LIMIT: usize = 20;

/// Summarize matches against the raw document.
///
/// `category_count` is the number of categories in the vocabulary, used for
/// coverage. Ratios are zero when there are no words (or no categories).
#[tracing::instrument(skip_all, fields(matches = matches.len(), text_len = text.len()))]
pub fn aggregate(matches: &[TermMatch], text: &str, category_count: usize) -> Statistics {
    let total_terms: usize = matches.iter().map(|m| m.frequency).sum();
    let word_count = text.split_whitespace().count();

    let mut category_distribution: IndexMap<String, usize> = IndexMap::new();
    for m in matches {
        *category_distribution.entry(m.category.clone()).or_insert(0) += m.frequency;
    }

    let (density, normalized_per_1000) = if word_count > 0 {
        let ratio = total_terms as f64 / word_count as f64;
        (ratio * 100.0, ratio * 1000.0)
    } else {
        (0.0, 0.0)
    };

    let category_coverage_percent = if category_count > 0 {
        category_distribution.len() as f64 / category_count as f64 * 100.0
    } else {
        0.0
    };

    // Stable sort: equal frequencies keep scan order.
    let mut top_terms = matches.to_vec();
    top_terms.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    top_terms.truncate(TOP_TERMS_LIMIT);

    Statistics {
        total_terms,
        unique_terms: matches.len(),
        word_count,
        density,
        normalized_per_1000,
        category_distribution,
        category_coverage_percent,
        top_terms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tm(term: &str, category: &str, frequency: usize) -> TermMatch {
        TermMatch {
            term: term.to_string(),
            category: category.to_string(),
            frequency,
            positions: (0..frequency).collect(),
            snippets: None,
        }
    }

    #[test]
    fn empty_input_is_all_zero() {
        let stats = aggregate(&[], "", 9);
        assert_eq!(stats.total_terms, 0);
        assert_eq!(stats.unique_terms, 0);
        assert_eq!(stats.word_count, 0);
        assert_eq!(stats.density, 0.0);
        assert_eq!(stats.normalized_per_1000, 0.0);
        assert!(stats.category_distribution.is_empty());
        assert!(stats.top_terms.is_empty());
    }

    #[test]
    fn whitespace_only_has_zero_density() {
        let stats = aggregate(&[], "   \n\t ", 9);
        assert_eq!(stats.word_count, 0);
        assert_eq!(stats.density, 0.0);
    }

    #[test]
    fn totals_and_density() {
        let matches = vec![tm("futures", "Concepts", 3), tm("delphi", "Methods", 1)];
        let stats = aggregate(&matches, "one two three four five six seven eight", 2);
        assert_eq!(stats.total_terms, 4);
        assert_eq!(stats.unique_terms, 2);
        assert_eq!(stats.word_count, 8);
        assert!((stats.density - 50.0).abs() < f64::EPSILON);
        assert!((stats.normalized_per_1000 - 500.0).abs() < 1e-9);
        assert!((stats.category_coverage_percent - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn category_distribution_sums_in_first_seen_order() {
        let matches = vec![
            tm("a", "Methods", 2),
            tm("b", "Concepts", 1),
            tm("c", "Methods", 5),
        ];
        let stats = aggregate(&matches, "x", 9);
        let cats: Vec<(&str, usize)> = stats
            .category_distribution
            .iter()
            .map(|(k, v)| (k.as_str(), *v))
            .collect();
        assert_eq!(cats, vec![("Methods", 7), ("Concepts", 1)]);
    }

    #[test]
    fn top_terms_sorted_and_stable() {
        let matches = vec![tm("a", "X", 1), tm("b", "X", 3), tm("c", "X", 1), tm("d", "X", 3)];
        let stats = aggregate(&matches, "x", 1);
        let order: Vec<&str> = stats.top_terms.iter().map(|m| m.term.as_str()).collect();
        assert_eq!(order, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn top_terms_truncated() {
        let matches: Vec<TermMatch> = (0..30).map(|i| tm(&format!("t{i}"), "X", i + 1)).collect();
        let stats = aggregate(&matches, "x", 1);
        assert_eq!(stats.top_terms.len(), TOP_TERMS_LIMIT);
        assert_eq!(stats.top_terms[0].frequency, 30);
    }

    #[test]
    fn coverage_counts_present_categories() {
        let matches = vec![tm("a", "Methods", 1)];
        let stats = aggregate(&matches, "a", 4);
        assert!((stats.category_coverage_percent - 25.0).abs() < f64::EPSILON);
        assert_eq!(aggregate(&matches, "a", 0).category_coverage_percent, 0.0);
    }
}
