use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::nlp_client::{
    EmbeddingSimilarity, HashingEmbedder, HeuristicNlp, HttpNlpClient, KeyPhraseExtractor,
    SimilarityProvider, SyntaxAnalyzer,
};
use crate::vocabulary::Vocabulary;

pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Everything a matching run needs: vocabulary plus the language collaborators.
/// Cheap to clone; collaborators are shared trait objects.
#[derive(Clone)]
pub struct MatchEngine {
    pub vocabulary: Arc<Vocabulary>,
    pub key_phrases: Arc<dyn KeyPhraseExtractor>,
    pub syntax: Arc<dyn SyntaxAnalyzer>,
    pub similarity: Arc<dyn SimilarityProvider>,
    /// Language code passed to the key-phrase and syntax collaborators.
    pub language: String,
    /// Upper bound for each individual collaborator call.
    pub timeout: Duration,
}

impl MatchEngine {
    pub fn new(
        vocabulary: Arc<Vocabulary>,
        key_phrases: Arc<dyn KeyPhraseExtractor>,
        syntax: Arc<dyn SyntaxAnalyzer>,
        similarity: Arc<dyn SimilarityProvider>,
    ) -> Self {
        Self {
            vocabulary,
            key_phrases,
            syntax,
            similarity,
            language: DEFAULT_LANGUAGE.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Heuristic tagger and hashing embedder; no network involved.
    pub fn offline(vocabulary: Arc<Vocabulary>) -> Self {
        let nlp = Arc::new(HeuristicNlp::new(vocabulary.clone()));
        let similarity = Arc::new(EmbeddingSimilarity::new(Arc::new(HashingEmbedder)));
        Self::new(vocabulary, nlp.clone(), nlp, similarity)
    }

    /// HTTP collaborators when `NLP_SERVICE_URL` is set, offline ones otherwise.
    pub fn from_config(config: &Config, vocabulary: Arc<Vocabulary>) -> Result<Self> {
        let engine = match &config.nlp_service_url {
            Some(url) => {
                let client = Arc::new(
                    HttpNlpClient::new(url.clone()).context("Failed to build NLP HTTP client")?,
                );
                info!("Using NLP service at {url}");
                let similarity = Arc::new(EmbeddingSimilarity::new(client.clone()));
                Self::new(vocabulary, client.clone(), client, similarity)
            }
            None => {
                info!("NLP_SERVICE_URL not set, using offline heuristics");
                Self::offline(vocabulary)
            }
        };

        Ok(engine
            .with_language(config.nlp_language.clone())
            .with_timeout(config.collaborator_timeout))
    }

    pub fn with_key_phrases(mut self, key_phrases: Arc<dyn KeyPhraseExtractor>) -> Self {
        self.key_phrases = key_phrases;
        self
    }

    pub fn with_syntax(mut self, syntax: Arc<dyn SyntaxAnalyzer>) -> Self {
        self.syntax = syntax;
        self
    }

    pub fn with_similarity(mut self, similarity: Arc<dyn SimilarityProvider>) -> Self {
        self.similarity = similarity;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
