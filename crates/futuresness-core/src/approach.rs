//! Methodological approach detection.
//!
//! A heuristic: each approach owns a list of keywords, and every matched term
//! containing one of them (as a plain substring) adds its frequency to that
//! approach. One term can feed several approaches. New approaches are added
//! by extending [`APPROACH_RULES`].

use indexmap::IndexMap;

use crate::fold::fold_case;
use crate::reports::TermMatch;

/// One approach and the keywords that signal it.
#[derive(Debug, Clone, Copy)]
pub struct ApproachRule {
    /// Approach name as reported.
    pub name: &'static str,
    /// Lower-case keywords, matched as substrings of terms.
    pub keywords: &'static [&'static str],
}

/// The fixed approach table.
pub const APPROACH_RULES: &[ApproachRule] = &[
    ApproachRule {
        name: "Exploratory",
        keywords: &["scenario", "futures cone", "alternative futures", "possible futures"],
    },
    ApproachRule {
        name: "Normative",
        keywords: &["backcasting", "visioning", "preferred futures", "vision building"],
    },
    ApproachRule {
        name: "Predictive",
        keywords: &["forecasting", "trend analysis", "extrapolation", "predictive"],
    },
    ApproachRule {
        name: "Participatory",
        keywords: &["stakeholder", "participatory", "co-creation", "engagement"],
    },
    ApproachRule {
        name: "Strategic",
        keywords: &["strategic", "planning", "decision", "risk management"],
    },
];

/// Score each approach from the matched terms.
///
/// Highest score first; ties keep the order in which approaches first
/// scored. Approaches with no matching terms are left out.
#[tracing::instrument(skip_all, fields(matches = matches.len()))]
pub fn classify(matches: &[TermMatch]) -> IndexMap<String, usize> {
    let mut scores: IndexMap<String, usize> = IndexMap::new();
    for m in matches {
        let term = fold_case(&m.term);
        for rule in APPROACH_RULES {
            if rule.keywords.iter().any(|k| term.contains(k)) {
                *scores.entry(rule.name.to_string()).or_insert(0) += m.frequency;
            }
        }
    }
    scores.sort_by(|_, a, _, b| b.cmp(a));
    scores
}

/// The highest-scoring approach, if any scored.
pub fn dominant(scores: &IndexMap<String, usize>) -> Option<(&str, usize)> {
    scores.first().map(|(name, score)| (name.as_str(), *score))
}

/// An approach's score as a percentage of all term occurrences.
pub fn share_percent(score: usize, total_terms: usize) -> f64 {
    if total_terms == 0 {
        0.0
    } else {
        score as f64 / total_terms as f64 * 100.0
    }
}
