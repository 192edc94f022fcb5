//! Heuristic NLP: an offline stand-in for the key-phrase and syntax services.
//!
//! Rule-based tagging:
//! - function words → `Other`, digits → `Numeral`
//! - vocabulary hits → `ProperNoun`
//! - known verbs and `-ing` forms → `Verb`
//! - known adjectives, `-ed` forms and adjective suffixes → `Adjective`
//! - capitalized words that do not start a sentence → `ProperNoun`
//! - anything else → `Noun`
//!
//! Key phrases are runs of 1–3 term-bearing tokens, broken at punctuation,
//! function words and verbs.

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;

use super::{KeyPhraseExtractor, NlpError, PartOfSpeech, SyntaxAnalyzer, SyntaxToken};
use crate::vocabulary::Vocabulary;

/// Words, keeping the punctuation that belongs to tech names (`c++`, `c#`, `node.js`, `ci/cd`).
static WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9][A-Za-z0-9+#./\-]*[A-Za-z0-9+#]|[A-Za-z0-9]").unwrap()
});

const MAX_PHRASE_WORDS: usize = 3;

const FUNCTION_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "nor", "with", "without", "for", "of", "in", "on",
    "at", "to", "from", "by", "as", "into", "onto", "about", "across", "within", "per", "via",
    "is", "are", "was", "were", "be", "been", "being", "am", "do", "does", "did", "have", "has",
    "had", "will", "would", "can", "could", "must", "should", "may", "might", "shall", "we",
    "you", "our", "your", "i", "my", "me", "he", "she", "they", "them", "their", "his", "her",
    "it", "its", "this", "that", "these", "those", "who", "whom", "which", "what", "while",
    "where", "when", "also", "plus", "etc", "not", "no", "all", "any", "some", "such", "than",
    "then", "there", "here", "very", "more", "most", "other", "including", "like",
];

const VERBS: &[&str] = &[
    "develop", "developed", "build", "built", "lead", "led", "manage", "managed", "design",
    "designed", "implement", "implemented", "create", "created", "work", "worked", "use", "used",
    "join", "seek", "want", "need", "needs", "help", "helped", "own", "owned", "drive", "drove",
    "deliver", "delivered", "maintain", "maintained", "write", "wrote", "ship", "shipped",
];

const ADJECTIVES: &[&str] = &[
    "experienced", "proficient", "skilled", "senior", "junior", "strong", "excellent", "solid",
    "good", "great", "deep", "hands-on", "familiar", "required", "preferred", "remote", "full",
    "fast", "new", "modern", "scalable", "distributed",
];

const ADJECTIVE_SUFFIXES: &[&str] = &["ful", "ous", "ive", "able", "ible", "ical"];

/// Word tokens of `text`, in order.
pub fn word_tokens(text: &str) -> impl Iterator<Item = &str> {
    WORD.find_iter(text).map(|m| m.as_str())
}

#[derive(Debug, Clone)]
struct Tagged<'a> {
    text: &'a str,
    tag: PartOfSpeech,
    /// Punctuation or a line break separates this token from the previous one.
    breaks_before: bool,
}

#[derive(Clone)]
pub struct HeuristicNlp {
    vocabulary: Arc<Vocabulary>,
}

impl HeuristicNlp {
    pub fn new(vocabulary: Arc<Vocabulary>) -> Self {
        Self { vocabulary }
    }

    fn is_known_term(&self, lower: &str) -> bool {
        self.vocabulary.technical_skills.iter().any(|t| t == lower)
            || self
                .vocabulary
                .synonym_groups
                .iter()
                .any(|(canonical, members)| canonical == lower || members.contains(lower))
    }

    fn tag_word(&self, word: &str, sentence_initial: bool) -> PartOfSpeech {
        let lower = word.to_lowercase();

        if FUNCTION_WORDS.contains(&lower.as_str()) {
            return PartOfSpeech::Other;
        }
        if lower.chars().all(|c| c.is_ascii_digit()) {
            return PartOfSpeech::Numeral;
        }
        if self.is_known_term(&lower) {
            return PartOfSpeech::ProperNoun;
        }
        // Lone letters ("C", "R") are too short to be terms
        if lower.chars().count() < 2 {
            return PartOfSpeech::Other;
        }
        if VERBS.contains(&lower.as_str()) || (lower.ends_with("ing") && lower.len() > 4) {
            return PartOfSpeech::Verb;
        }
        if ADJECTIVES.contains(&lower.as_str())
            || (lower.ends_with("ed") && lower.len() > 4)
            || ADJECTIVE_SUFFIXES.iter().any(|s| lower.ends_with(s))
        {
            return PartOfSpeech::Adjective;
        }
        if !sentence_initial && word.chars().next().is_some_and(char::is_uppercase) {
            return PartOfSpeech::ProperNoun;
        }
        PartOfSpeech::Noun
    }

    fn tag_text<'a>(&self, text: &'a str) -> Vec<Tagged<'a>> {
        let mut tagged = Vec::new();
        let mut previous_end = 0;
        let mut sentence_initial = true;

        for m in WORD.find_iter(text) {
            let gap = &text[previous_end..m.start()];
            let breaks_before = gap.chars().any(|c| !c.is_whitespace() || c == '\n');
            if gap.contains(['.', '!', '?', '\n']) {
                sentence_initial = true;
            }

            tagged.push(Tagged {
                text: m.as_str(),
                tag: self.tag_word(m.as_str(), sentence_initial),
                breaks_before,
            });

            sentence_initial = false;
            previous_end = m.end();
        }

        tagged
    }

    fn phrases(&self, text: &str) -> Vec<String> {
        let mut phrases = Vec::new();
        let mut current: Vec<&str> = Vec::new();

        let mut flush = |current: &mut Vec<&str>| {
            if !current.is_empty() && current.len() <= MAX_PHRASE_WORDS {
                phrases.push(current.join(" "));
            }
            current.clear();
        };

        for token in self.tag_text(text) {
            if token.breaks_before {
                flush(&mut current);
            }
            if token.tag.is_term_bearing() {
                current.push(token.text);
            } else {
                flush(&mut current);
            }
        }
        flush(&mut current);

        phrases
    }
}

#[async_trait]
impl KeyPhraseExtractor for HeuristicNlp {
    async fn detect_key_phrases(
        &self,
        text: &str,
        _language: &str,
    ) -> Result<Vec<String>, NlpError> {
        Ok(self.phrases(text))
    }
}

#[async_trait]
impl SyntaxAnalyzer for HeuristicNlp {
    async fn detect_syntax(
        &self,
        text: &str,
        _language: &str,
    ) -> Result<Vec<SyntaxToken>, NlpError> {
        Ok(self
            .tag_text(text)
            .into_iter()
            .map(|t| SyntaxToken {
                text: t.text.to_string(),
                part_of_speech: t.tag,
            })
            .collect())
    }
}
