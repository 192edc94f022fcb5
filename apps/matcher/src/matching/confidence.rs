//! Confidence and importance weights.
//!
//! Both are pure functions of the term string: no document context, no model.

use std::sync::Arc;

use crate::models::{MatchedTerm, MissingTerm, Term, TermSet};
use crate::vocabulary::Vocabulary;

const CONFIDENCE_BASE: f64 = 0.7;
const CONFIDENCE_LENGTH_BONUS: f64 = 0.1;
const CONFIDENCE_COMMON_BONUS: f64 = 0.1;
const CONFIDENCE_LONG_TERM: usize = 10;

const IMPORTANCE_BASE: f64 = 0.6;
const IMPORTANCE_SKILL_BONUS: f64 = 0.2;
const IMPORTANCE_LENGTH_BONUS: f64 = 0.1;
const IMPORTANCE_LONG_TERM: usize = 8;

#[derive(Clone)]
pub struct ConfidenceScorer {
    vocabulary: Arc<Vocabulary>,
}

impl ConfidenceScorer {
    pub fn new(vocabulary: Arc<Vocabulary>) -> Self {
        Self { vocabulary }
    }

    /// Weight of a matched term, in [0, 1].
    pub fn confidence(&self, term: &str) -> f64 {
        let lower = term.to_lowercase();
        let mut confidence = CONFIDENCE_BASE;

        if lower.chars().count() > CONFIDENCE_LONG_TERM {
            confidence += CONFIDENCE_LENGTH_BONUS;
        }
        if contains_any(&lower, &self.vocabulary.common_skills) {
            confidence += CONFIDENCE_COMMON_BONUS;
        }

        confidence.clamp(0.0, 1.0)
    }

    /// Weight of a missing term, in [0, 1]. The skill bonus applies at most once.
    pub fn importance(&self, term: &str) -> f64 {
        let lower = term.to_lowercase();
        let mut importance = IMPORTANCE_BASE;

        if contains_any(&lower, &self.vocabulary.important_skills) {
            importance += IMPORTANCE_SKILL_BONUS;
        }
        if lower.chars().count() > IMPORTANCE_LONG_TERM {
            importance += IMPORTANCE_LENGTH_BONUS;
        }

        importance.clamp(0.0, 1.0)
    }

    pub fn score_matched(&self, matched: &TermSet) -> Vec<MatchedTerm> {
        matched
            .iter()
            .map(|term| MatchedTerm {
                term: term.clone(),
                confidence: self.confidence(term.as_str()),
                category: self.category(term),
            })
            .collect()
    }

    /// Missing terms ordered by descending importance (stable for ties).
    pub fn score_missing(&self, missing: &TermSet) -> Vec<MissingTerm> {
        let mut scored: Vec<MissingTerm> = missing
            .iter()
            .map(|term| MissingTerm {
                term: term.clone(),
                importance: self.importance(term.as_str()),
                category: self.category(term),
            })
            .collect();
        sort_by_importance(&mut scored);
        scored
    }

    fn category(&self, term: &Term) -> String {
        self.vocabulary.category_for(term.as_str()).to_string()
    }
}

pub fn sort_by_importance(missing: &mut [MissingTerm]) {
    missing.sort_by(|a, b| b.importance.total_cmp(&a.importance));
}

fn contains_any(term: &str, tokens: &[String]) -> bool {
    tokens.iter().any(|t| term.contains(t.as_str()))
}
