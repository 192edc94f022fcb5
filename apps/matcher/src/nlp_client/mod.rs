//! NLP Client: the seams between the matching engine and its language collaborators.
//!
//! The engine only ever talks to the traits below. Two families of
//! implementations ship with the crate:
//! - `HttpNlpClient`: a remote NLP/embedding service over HTTP.
//! - `HeuristicNlp` + `HashingEmbedder`: offline, deterministic fallbacks.
//!
//! `MatchEngine` holds each collaborator as `Arc<dyn …>`, chosen at startup.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod embedding;
pub mod heuristic;
pub mod http;

pub use embedding::{cosine, EmbeddingSimilarity, HashingEmbedder};
pub use heuristic::HeuristicNlp;
pub use http::HttpNlpClient;

#[derive(Debug, Error)]
pub enum NlpError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("Embedding provider returned an empty vector")]
    EmptyEmbedding,

    #[error("Collaborator call timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },
}

/// Part-of-speech tag of a syntax token. Unknown tags collapse to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PartOfSpeech {
    Noun,
    #[serde(alias = "PROPN")]
    ProperNoun,
    #[serde(alias = "ADJ")]
    Adjective,
    Verb,
    #[serde(alias = "NUM")]
    Numeral,
    #[serde(other)]
    Other,
}

impl PartOfSpeech {
    /// Tags whose tokens are kept as candidate terms.
    pub fn is_term_bearing(self) -> bool {
        matches!(
            self,
            PartOfSpeech::Noun | PartOfSpeech::ProperNoun | PartOfSpeech::Adjective
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntaxToken {
    pub text: String,
    pub part_of_speech: PartOfSpeech,
}

#[async_trait]
pub trait KeyPhraseExtractor: Send + Sync {
    async fn detect_key_phrases(&self, text: &str, language: &str)
        -> Result<Vec<String>, NlpError>;
}

#[async_trait]
pub trait SyntaxAnalyzer: Send + Sync {
    async fn detect_syntax(&self, text: &str, language: &str)
        -> Result<Vec<SyntaxToken>, NlpError>;
}

#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, NlpError>;
}

/// Whole-document semantic similarity in [0, 1].
#[async_trait]
pub trait SimilarityProvider: Send + Sync {
    async fn similarity(&self, left: &str, right: &str) -> Result<f64, NlpError>;
}
