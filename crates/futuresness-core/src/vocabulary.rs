//! The futures-studies vocabulary taxonomy.
//!
//! A [`Vocabulary`] is an ordered list of categories, each holding an ordered
//! list of terms. It is validated once at construction and never mutated
//! afterwards; analyzers hold it by value and share it read-only.
//!
//! [`Vocabulary::flatten`] turns the taxonomy into the term list the matcher
//! scans, longest terms (by word count) first.

use std::collections::HashSet;

use camino::Utf8Path;
use figment::Figment;
use figment::providers::{Format, Json, Toml, Yaml};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{VocabularyError, VocabularyResult};
use crate::fold::fold_case;

/// Built-in taxonomy: category name and its terms, in display order.
const BUILTIN_TAXONOMY: &[(&str, &[&str])] = &[
    (
        "Foresight Methods",
        &[
            "scenario planning",
            "scenarios",
            "scenario analysis",
            "scenario building",
            "delphi method",
            "delphi",
            "expert panel",
            "expert consultation",
            "horizon scanning",
            "environmental scanning",
            "scanning",
            "trend analysis",
            "trend monitoring",
            "megatrends",
            "macro trends",
            "weak signals",
            "weak signal detection",
            "emerging issues",
            "wild cards",
            "black swans",
            "surprises",
            "backcasting",
            "normative scenarios",
            "causal layered analysis",
            "CLA",
            "futures wheel",
            "futures triangle",
            "cross-impact analysis",
            "morphological analysis",
            "roadmapping",
            "technology roadmapping",
            "visioning",
            "vision building",
            "preferred futures",
            "foresight",
            "strategic foresight",
            "corporate foresight",
            "forecasting",
            "predictive analytics",
            "extrapolation",
            "simulation",
            "modeling",
            "system dynamics",
        ],
    ),
    (
        "Futures Concepts",
        &[
            "futures",
            "future studies",
            "futures research",
            "futurism",
            "anticipation",
            "anticipatory systems",
            "anticipatory governance",
            "plausible futures",
            "possible futures",
            "probable futures",
            "preferable futures",
            "alternative futures",
            "multiple futures",
            "futures cone",
            "uncertainty",
            "ambiguity",
            "complexity",
            "volatility",
            "VUCA",
            "emergence",
            "emergent properties",
            "emerging trends",
            "disruption",
            "disruptive innovation",
            "discontinuity",
            "transformation",
            "transformative change",
            "transition",
            "resilience",
            "adaptive capacity",
            "adaptability",
            "long-term thinking",
            "long-term perspective",
            "temporal depth",
            "foresight capacity",
            "futures literacy",
            "futures thinking",
            "futures consciousness",
            "anticipatory awareness",
        ],
    ),
    (
        "Strategic Planning",
        &[
            "strategic planning",
            "strategy",
            "strategic management",
            "strategic analysis",
            "strategic options",
            "strategic choices",
            "strategic intelligence",
            "competitive intelligence",
            "risk management",
            "risk assessment",
            "risk analysis",
            "opportunity identification",
            "opportunity analysis",
            "contingency planning",
            "preparedness",
            "early warning systems",
            "monitoring systems",
            "decision support",
            "decision making",
            "strategic decisions",
            "innovation strategy",
            "innovation management",
            "change management",
            "organizational change",
        ],
    ),
    (
        "Drivers of Change",
        &[
            "drivers",
            "driving forces",
            "change drivers",
            "technological change",
            "technology trends",
            "digital transformation",
            "social change",
            "societal trends",
            "demographic shifts",
            "economic change",
            "economic trends",
            "globalization",
            "environmental change",
            "climate change",
            "sustainability",
            "political change",
            "geopolitical shifts",
            "governance",
            "cultural change",
            "values shift",
            "paradigm shift",
            "disruptors",
            "game changers",
            "tipping points",
        ],
    ),
    (
        "Time Perspectives",
        &[
            "near-term",
            "short-term",
            "medium-term",
            "long-term",
            "very long-term",
            "horizon",
            "time horizon",
            "temporal horizon",
            "2030",
            "2040",
            "2050",
            "next decade",
            "coming years",
            "future generations",
            "intergenerational",
            "nowcasting",
            "present",
            "current state",
        ],
    ),
    (
        "Systems Thinking",
        &[
            "systems thinking",
            "systems approach",
            "holistic approach",
            "interconnections",
            "interdependencies",
            "relationships",
            "feedback loops",
            "positive feedback",
            "negative feedback",
            "leverage points",
            "intervention points",
            "system boundaries",
            "system structure",
            "system behavior",
            "complexity science",
            "complex adaptive systems",
            "emergence",
            "self-organization",
            "nonlinearity",
        ],
    ),
    (
        "Stakeholders & Participation",
        &[
            "stakeholders",
            "stakeholder engagement",
            "stakeholder analysis",
            "participatory",
            "participation",
            "co-creation",
            "citizens",
            "civil society",
            "public engagement",
            "experts",
            "expertise",
            "knowledge integration",
            "multi-stakeholder",
            "collaborative foresight",
            "deliberation",
            "dialogue",
            "consultation",
        ],
    ),
    (
        "Innovation & Technology",
        &[
            "innovation",
            "technological innovation",
            "social innovation",
            "emerging technologies",
            "breakthrough technologies",
            "artificial intelligence",
            "AI",
            "machine learning",
            "biotechnology",
            "nanotechnology",
            "quantum computing",
            "automation",
            "robotics",
            "internet of things",
            "IoT",
            "blockchain",
            "cryptocurrencies",
            "renewable energy",
            "clean tech",
            "green technology",
            "space exploration",
            "synthetic biology",
        ],
    ),
    (
        "Policy & Governance",
        &[
            "policy",
            "public policy",
            "policy making",
            "policy design",
            "governance",
            "anticipatory governance",
            "adaptive governance",
            "regulation",
            "regulatory frameworks",
            "institutions",
            "institutional change",
            "government",
            "public sector",
            "policy makers",
            "legislation",
            "policy instruments",
        ],
    ),
];

/// A named group of related terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Category {
    /// Display name (e.g. "Foresight Methods").
    pub name: String,
    /// Terms in taxonomy order, as written in the source.
    pub terms: Vec<String>,
}

/// On-disk shape of a custom vocabulary file.
#[derive(Debug, Deserialize)]
struct VocabularyFile {
    categories: Vec<Category>,
}

/// A validated, immutable vocabulary taxonomy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    categories: Vec<Category>,
}

impl Vocabulary {
    /// Build a vocabulary from categories, rejecting malformed entries.
    ///
    /// Fails if there are no categories, a category name is blank, or any
    /// term is blank.
    pub fn new(categories: Vec<Category>) -> VocabularyResult<Self> {
        if categories.is_empty() {
            return Err(VocabularyError::NoCategories);
        }
        for (index, category) in categories.iter().enumerate() {
            if category.name.trim().is_empty() {
                return Err(VocabularyError::EmptyCategoryName { index });
            }
            if let Some(index) = category.terms.iter().position(|t| t.trim().is_empty()) {
                return Err(VocabularyError::EmptyTerm {
                    category: category.name.clone(),
                    index,
                });
            }
        }
        let vocabulary = Self { categories };
        for (term, category) in vocabulary.duplicate_terms() {
            tracing::warn!(
                term = %term,
                category = %category,
                "duplicate vocabulary term ignored; the first category keeps it"
            );
        }
        Ok(vocabulary)
    }

    /// The curated futures-studies taxonomy shipped with the crate.
    pub fn builtin() -> Self {
        let categories = BUILTIN_TAXONOMY
            .iter()
            .map(|(name, terms)| Category {
                name: (*name).to_string(),
                terms: terms.iter().map(|t| (*t).to_string()).collect(),
            })
            .collect();
        Self { categories }
    }

    /// Load a vocabulary from a TOML, YAML, or JSON file.
    ///
    /// The file holds a `categories` list of `{ name, terms }` tables; the
    /// format is chosen by extension (TOML when unknown).
    #[tracing::instrument(fields(path = %path))]
    pub fn from_file(path: &Utf8Path) -> VocabularyResult<Self> {
        let figment = match path.extension() {
            Some("yaml" | "yml") => Figment::from(Yaml::file_exact(path.as_str())),
            Some("json") => Figment::from(Json::file_exact(path.as_str())),
            _ => Figment::from(Toml::file_exact(path.as_str())),
        };
        let file: VocabularyFile = figment.extract().map_err(Box::new)?;
        let vocabulary = Self::new(file.categories)?;
        tracing::info!(
            categories = vocabulary.category_count(),
            terms = vocabulary.term_count(),
            "loaded custom vocabulary"
        );
        Ok(vocabulary)
    }

    /// Categories in taxonomy order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Number of categories.
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// Number of term entries across all categories, duplicates included.
    pub fn term_count(&self) -> usize {
        self.categories.iter().map(|c| c.terms.len()).sum()
    }

    /// Terms that repeat an earlier entry, with the category they repeat in.
    ///
    /// Comparison is on the trimmed, case-folded term.
    pub fn duplicate_terms(&self) -> Vec<(String, &str)> {
        let mut seen = HashSet::new();
        self.categories
            .iter()
            .flat_map(|c| c.terms.iter().map(move |t| (fold_case(t.trim()), c.name.as_str())))
            .filter(|(term, _)| !seen.insert(term.clone()))
            .collect()
    }

    /// Flatten into the longest-first term list used by the matcher.
    ///
    /// Terms are case-folded and ordered by word count, descending; ties keep
    /// taxonomy order. A term listed under several categories is kept only
    /// for the first one.
    pub fn flatten(&self) -> FlattenedVocabulary {
        let mut seen = HashSet::new();
        let mut terms = Vec::with_capacity(self.term_count());

        for category in &self.categories {
            for raw in &category.terms {
                let text = fold_case(raw.trim());
                if !seen.insert(text.clone()) {
                    tracing::debug!(
                        term = %text,
                        category = %category.name,
                        "skipping duplicate term"
                    );
                    continue;
                }
                let word_length = text.split_whitespace().count();
                terms.push(VocabularyTerm {
                    text,
                    category: category.name.clone(),
                    word_length,
                });
            }
        }

        // sort_by is stable, so equal lengths keep taxonomy order
        terms.sort_by(|a, b| b.word_length.cmp(&a.word_length));
        FlattenedVocabulary { terms }
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::builtin()
    }
}

/// A single lower-cased vocabulary term with its category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct VocabularyTerm {
    /// Lower-cased term text.
    pub text: String,
    /// Category the term was listed under.
    pub category: String,
    /// Number of whitespace-separated words in the term.
    pub word_length: usize,
}

/// Terms ordered longest-first, each appearing exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattenedVocabulary {
    terms: Vec<VocabularyTerm>,
}

impl FlattenedVocabulary {
    /// Terms in scan order.
    pub fn terms(&self) -> &[VocabularyTerm] {
        &self.terms
    }

    /// Number of terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether there are no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn category(name: &str, terms: &[&str]) -> Category {
        Category {
            name: name.to_string(),
            terms: terms.iter().map(|t| (*t).to_string()).collect(),
        }
    }

    #[test]
    fn builtin_has_nine_categories() {
        let vocab = Vocabulary::builtin();
        assert_eq!(vocab.category_count(), 9);
        assert_eq!(vocab.categories()[0].name, "Foresight Methods");
        assert_eq!(vocab.categories()[8].name, "Policy & Governance");
    }

    #[test]
    fn builtin_passes_validation() {
        let vocab = Vocabulary::builtin();
        assert!(Vocabulary::new(vocab.categories().to_vec()).is_ok());
    }

    #[test]
    fn flatten_sorts_longest_first() {
        let flat = Vocabulary::builtin().flatten();
        let lengths: Vec<usize> = flat.terms().iter().map(|t| t.word_length).collect();
        assert!(lengths.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(flat.terms()[0].word_length, 3);
    }

    #[test]
    fn flatten_is_stable_for_ties() {
        let vocab = Vocabulary::new(vec![
            category("A", &["alpha", "beta gamma", "delta"]),
            category("B", &["epsilon zeta", "eta"]),
        ])
        .unwrap();
        let flat = vocab.flatten();
        let texts: Vec<&str> = flat.terms().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["beta gamma", "epsilon zeta", "alpha", "delta", "eta"]);
    }

    #[test]
    fn flatten_lowercases_terms() {
        let flat = Vocabulary::builtin().flatten();
        assert!(flat.terms().iter().any(|t| t.text == "vuca"));
        assert!(flat.terms().iter().all(|t| t.text == t.text.to_lowercase()));
    }

    #[test]
    fn flatten_keeps_each_term_once() {
        let flat = Vocabulary::builtin().flatten();
        let mut seen = HashSet::new();
        for term in flat.terms() {
            assert!(seen.insert(term.text.clone()), "duplicate {}", term.text);
        }
        let emergence = flat.terms().iter().find(|t| t.text == "emergence").unwrap();
        assert_eq!(emergence.category, "Futures Concepts");
        let governance = flat.terms().iter().find(|t| t.text == "governance").unwrap();
        assert_eq!(governance.category, "Drivers of Change");
    }

    #[test]
    fn builtin_duplicates_are_known() {
        let vocab = Vocabulary::builtin();
        let mut terms: Vec<String> = vocab
            .duplicate_terms()
            .into_iter()
            .map(|(term, _)| term)
            .collect();
        terms.sort();
        assert_eq!(terms, vec!["anticipatory governance", "emergence", "governance"]);
    }

    #[test]
    fn duplicate_terms_name_the_repeating_category() {
        let vocab = Vocabulary::new(vec![
            category("A", &["Delphi", "backcasting"]),
            category("B", &[" delphi "]),
        ])
        .unwrap();
        assert_eq!(vocab.duplicate_terms(), vec![("delphi".to_string(), "B")]);
        assert_eq!(vocab.flatten().len(), 2);
    }

    #[test]
    fn rejects_empty_term() {
        let err = Vocabulary::new(vec![category("A", &["ok", "  "])]).unwrap_err();
        assert!(matches!(err, VocabularyError::EmptyTerm { index: 1, .. }));
    }

    #[test]
    fn rejects_empty_category_name() {
        let err = Vocabulary::new(vec![category(" ", &["ok"])]).unwrap_err();
        assert!(matches!(err, VocabularyError::EmptyCategoryName { index: 0 }));
    }

    #[test]
    fn rejects_no_categories() {
        assert!(matches!(
            Vocabulary::new(Vec::new()),
            Err(VocabularyError::NoCategories)
        ));
    }

    #[test]
    fn loads_toml_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("vocab.toml");
        fs::write(
            &path,
            r#"
[[categories]]
name = "Methods"
terms = ["Scenario Planning", "delphi"]
"#,
        )
        .unwrap();
        let path = camino::Utf8PathBuf::try_from(path).unwrap();
        let vocab = Vocabulary::from_file(&path).unwrap();
        assert_eq!(vocab.category_count(), 1);
        assert_eq!(vocab.term_count(), 2);
        assert_eq!(vocab.flatten().terms()[0].text, "scenario planning");
    }

    #[test]
    fn loads_yaml_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("vocab.yaml");
        fs::write(
            &path,
            "categories:\n  - name: Methods\n    terms: [backcasting]\n",
        )
        .unwrap();
        let path = camino::Utf8PathBuf::try_from(path).unwrap();
        let vocab = Vocabulary::from_file(&path).unwrap();
        assert_eq!(vocab.categories()[0].terms, vec!["backcasting"]);
    }

    #[test]
    fn file_with_empty_term_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("vocab.json");
        fs::write(&path, r#"{"categories":[{"name":"M","terms":[""]}]}"#).unwrap();
        let path = camino::Utf8PathBuf::try_from(path).unwrap();
        assert!(matches!(
            Vocabulary::from_file(&path),
            Err(VocabularyError::EmptyTerm { .. })
        ));
    }

    #[test]
    fn missing_file_is_load_error() {
        let result = Vocabulary::from_file(Utf8Path::new("/nonexistent/vocab.toml"));
        assert!(matches!(result, Err(VocabularyError::Load(_))));
    }
}
