//! Name likeness on a 0-100 scale.
//!
//! [`Similarity`] owns the name rules and one [`NameScorer`], chosen when it is
//! built. With the `fuzzy` feature the edit-distance scorer is used; without it
//! the token overlap scorer takes its place and callers see no difference.

use crate::domain::name::{normalize_name, NameRules};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Scores two already-normalized, non-empty and unequal names.
pub trait NameScorer: fmt::Debug + Send + Sync {
    fn label(&self) -> &'static str;
    fn score(&self, a: &str, b: &str) -> f64;
}

/// Jaccard overlap of whitespace-separated words.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenOverlapScorer;

impl NameScorer for TokenOverlapScorer {
    fn label(&self) -> &'static str {
        "token-overlap"
    }

    fn score(&self, a: &str, b: &str) -> f64 {
        let left: BTreeSet<&str> = a.split_whitespace().collect();
        let right: BTreeSet<&str> = b.split_whitespace().collect();
        if left.is_empty() || right.is_empty() {
            return 0.0;
        }
        let common = left.intersection(&right).count();
        let total = left.union(&right).count();
        common as f64 / total as f64 * 100.0
    }
}

/// Best of full, partial and token-sorted normalized Levenshtein similarity.
#[cfg(feature = "fuzzy")]
#[derive(Debug, Clone, Copy, Default)]
pub struct EditDistanceScorer;

#[cfg(feature = "fuzzy")]
impl EditDistanceScorer {
    fn ratio(a: &str, b: &str) -> f64 {
        strsim::normalized_levenshtein(a, b) * 100.0
    }

    fn partial_ratio(a: &str, b: &str) -> f64 {
        let (short, long) = if a.chars().count() <= b.chars().count() {
            (a, b)
        } else {
            (b, a)
        };
        let short_len = short.chars().count();
        if short_len == 0 {
            return 0.0;
        }
        let long_chars: Vec<char> = long.chars().collect();
        let mut best: f64 = 0.0;
        for window in long_chars.windows(short_len) {
            let candidate: String = window.iter().collect();
            best = best.max(Self::ratio(short, &candidate));
            if best >= 100.0 {
                break;
            }
        }
        best
    }

    fn token_sort_ratio(a: &str, b: &str) -> f64 {
        Self::ratio(&sorted_tokens(a), &sorted_tokens(b))
    }
}

#[cfg(feature = "fuzzy")]
fn sorted_tokens(value: &str) -> String {
    let mut tokens: Vec<&str> = value.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

#[cfg(feature = "fuzzy")]
impl NameScorer for EditDistanceScorer {
    fn label(&self) -> &'static str {
        "edit-distance"
    }

    fn score(&self, a: &str, b: &str) -> f64 {
        Self::ratio(a, b)
            .max(Self::partial_ratio(a, b))
            .max(Self::token_sort_ratio(a, b))
    }
}

#[derive(Debug, Clone)]
pub struct Similarity {
    names: NameRules,
    scorer: Arc<dyn NameScorer>,
}

impl Default for Similarity {
    fn default() -> Self {
        Self::new(NameRules::default())
    }
}

impl Similarity {
    pub fn new(names: NameRules) -> Self {
        Self::with_scorer(names, default_scorer())
    }

    pub fn with_scorer(names: NameRules, scorer: Arc<dyn NameScorer>) -> Self {
        Self { names, scorer }
    }

    pub fn scorer_label(&self) -> &'static str {
        self.scorer.label()
    }

    /// Likeness of two raw names; 0 when either normalizes to empty.
    pub fn score(&self, a: &str, b: &str) -> f64 {
        self.score_normalized(
            &normalize_name(a, &self.names),
            &normalize_name(b, &self.names),
        )
    }

    pub fn score_normalized(&self, a: &str, b: &str) -> f64 {
        if a.is_empty() || b.is_empty() {
            return 0.0;
        }
        if a == b {
            return 100.0;
        }
        self.scorer.score(a, b).clamp(0.0, 100.0)
    }
}

#[cfg(feature = "fuzzy")]
fn default_scorer() -> Arc<dyn NameScorer> {
    Arc::new(EditDistanceScorer)
}

#[cfg(not(feature = "fuzzy"))]
fn default_scorer() -> Arc<dyn NameScorer> {
    Arc::new(TokenOverlapScorer)
}
