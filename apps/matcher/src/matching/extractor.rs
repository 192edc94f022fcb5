//! Term extraction: raw text to a normalized `TermSet`.
//!
//! Two collaborator passes, unioned (key phrases first):
//! 1. key phrases filtered by `is_likely_skill`
//! 2. syntax tokens tagged noun, proper noun or adjective
//!
//! A failing pass contributes nothing; extraction itself never fails.

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use regex::Regex;
use tracing::{debug, warn};

use crate::matching::{bounded, CallTally};
use crate::models::TermSet;
use crate::nlp_client::{KeyPhraseExtractor, SyntaxAnalyzer};
use crate::state::MatchEngine;
use crate::vocabulary::Vocabulary;

static EXPERIENCE_PHRASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\s*(years?|yrs?)").unwrap());
static PROFICIENCY_PHRASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"proficient|experienced|skilled|expert").unwrap());

/// Whether a key phrase plausibly names a skill.
///
/// Accepts a known technology mention, an experience or proficiency phrase, or
/// any phrase strictly between 2 and 50 characters long.
pub fn is_likely_skill(phrase: &str, vocabulary: &Vocabulary) -> bool {
    let lower = phrase.to_lowercase();
    let len = lower.chars().count();

    vocabulary.mentions_technology(&lower)
        || EXPERIENCE_PHRASE.is_match(&lower)
        || PROFICIENCY_PHRASE.is_match(&lower)
        || (len > 2 && len < 50)
}

/// Terms from one document plus a record of how the collaborator calls went.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub terms: TermSet,
    pub calls: CallTally,
}

#[derive(Clone)]
pub struct TermExtractor {
    vocabulary: Arc<Vocabulary>,
    key_phrases: Arc<dyn KeyPhraseExtractor>,
    syntax: Arc<dyn SyntaxAnalyzer>,
    language: String,
    timeout: Duration,
}

impl TermExtractor {
    pub fn new(engine: &MatchEngine) -> Self {
        Self {
            vocabulary: engine.vocabulary.clone(),
            key_phrases: engine.key_phrases.clone(),
            syntax: engine.syntax.clone(),
            language: engine.language.clone(),
            timeout: engine.timeout,
        }
    }

    pub async fn extract(&self, text: &str) -> TermSet {
        self.extract_with_report(text).await.terms
    }

    pub async fn extract_with_report(&self, text: &str) -> Extraction {
        let (phrase_terms, token_terms) =
            tokio::join!(self.key_phrase_pass(text), self.syntax_pass(text));

        let mut calls = CallTally::default();
        let mut terms = TermSet::new();

        for (pass, outcome) in [("key-phrase", phrase_terms), ("syntax", token_terms)] {
            match outcome {
                Some(found) => {
                    calls.record_success();
                    debug!("{} pass produced {} terms", pass, found.len());
                    terms.extend_from(found);
                }
                None => calls.record_failure(),
            }
        }

        Extraction { terms, calls }
    }

    async fn key_phrase_pass(&self, text: &str) -> Option<TermSet> {
        let call = self.key_phrases.detect_key_phrases(text, &self.language);
        match bounded(self.timeout, call).await {
            Ok(phrases) => Some(
                phrases
                    .iter()
                    .map(String::as_str)
                    .filter(|p| is_likely_skill(p, &self.vocabulary))
                    .collect(),
            ),
            Err(e) => {
                warn!("Key-phrase detection failed, continuing without it: {e}");
                None
            }
        }
    }

    async fn syntax_pass(&self, text: &str) -> Option<TermSet> {
        let call = self.syntax.detect_syntax(text, &self.language);
        match bounded(self.timeout, call).await {
            Ok(tokens) => Some(
                tokens
                    .iter()
                    .filter(|t| t.part_of_speech.is_term_bearing())
                    .map(|t| t.text.as_str())
                    .collect(),
            ),
            Err(e) => {
                warn!("Syntax analysis failed, continuing without it: {e}");
                None
            }
        }
    }
}
