//! HTTP adapter for a remote NLP/embedding service.
//!
//! Endpoints (all `POST`, JSON):
//! - `/key-phrases` `{text, language}` → `{key_phrases: [string]}`
//! - `/syntax`      `{text, language}` → `{tokens: [{text, part_of_speech}]}`
//! - `/embed`       `{text}`           → `{embedding: [float]}`
//!
//! Retries on 429 and 5xx with exponential backoff. The engine applies its own
//! per-call timeout on top of this.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use super::{Embedder, KeyPhraseExtractor, NlpError, SyntaxAnalyzer, SyntaxToken};

const MAX_RETRIES: u32 = 3;
const DEFAULT_RETRY_BASE: Duration = Duration::from_millis(500);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct TextRequest<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct KeyPhrasesResponse {
    key_phrases: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SyntaxResponse {
    tokens: Vec<SyntaxToken>,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct ServiceError {
    message: String,
}

#[derive(Clone)]
pub struct HttpNlpClient {
    client: Client,
    base_url: String,
    retry_base: Duration,
}

impl HttpNlpClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, NlpError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retry_base: DEFAULT_RETRY_BASE,
        })
    }

    /// Overrides the first backoff delay (doubles on every further attempt).
    pub fn with_retry_base(mut self, retry_base: Duration) -> Self {
        self.retry_base = retry_base;
        self
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &TextRequest<'_>,
    ) -> Result<T, NlpError> {
        let url = format!("{}{}", self.base_url, path);
        let mut last_error: Option<NlpError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let delay = self.retry_base * (1 << (attempt - 1));
                warn!(
                    "NLP call to {} attempt {} failed, retrying after {}ms...",
                    path,
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self.client.post(&url).json(body).send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(NlpError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("NLP service returned {}: {}", status, body);
                last_error = Some(NlpError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ServiceError>(&body)
                    .map(|e| e.message)
                    .unwrap_or(body);
                return Err(NlpError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let text = response.text().await?;
            debug!("NLP call to {} succeeded ({} bytes)", path, text.len());
            return serde_json::from_str(&text).map_err(NlpError::Parse);
        }

        Err(last_error.unwrap_or(NlpError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl KeyPhraseExtractor for HttpNlpClient {
    async fn detect_key_phrases(
        &self,
        text: &str,
        language: &str,
    ) -> Result<Vec<String>, NlpError> {
        let body = TextRequest {
            text,
            language: Some(language),
        };
        let response: KeyPhrasesResponse = self.post_json("/key-phrases", &body).await?;
        Ok(response.key_phrases)
    }
}

#[async_trait]
impl SyntaxAnalyzer for HttpNlpClient {
    async fn detect_syntax(
        &self,
        text: &str,
        language: &str,
    ) -> Result<Vec<SyntaxToken>, NlpError> {
        let body = TextRequest {
            text,
            language: Some(language),
        };
        let response: SyntaxResponse = self.post_json("/syntax", &body).await?;
        Ok(response.tokens)
    }
}

#[async_trait]
impl Embedder for HttpNlpClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, NlpError> {
        let body = TextRequest {
            text,
            language: None,
        };
        let response: EmbedResponse = self.post_json("/embed", &body).await?;
        if response.embedding.is_empty() {
            return Err(NlpError::EmptyEmbedding);
        }
        Ok(response.embedding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp_client::PartOfSpeech;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(server: &MockServer) -> HttpNlpClient {
        HttpNlpClient::new(server.base_url())
            .unwrap()
            .with_retry_base(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_key_phrases_round_trip() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/key-phrases")
                    .json_body(json!({"text": "Rust and Kafka", "language": "en"}));
                then.status(200)
                    .json_body(json!({"key_phrases": ["Rust", "Kafka"]}));
            })
            .await;

        let phrases = client_for(&server)
            .detect_key_phrases("Rust and Kafka", "en")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(phrases, vec!["Rust", "Kafka"]);
    }

    #[tokio::test]
    async fn test_syntax_tokens_parse_tags() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/syntax");
                then.status(200).json_body(json!({
                    "tokens": [
                        {"text": "Senior", "part_of_speech": "ADJ"},
                        {"text": "Rust", "part_of_speech": "PROPN"},
                        {"text": "with", "part_of_speech": "ADP"}
                    ]
                }));
            })
            .await;

        let tokens = client_for(&server).detect_syntax("x", "en").await.unwrap();
        let tags: Vec<PartOfSpeech> = tokens.iter().map(|t| t.part_of_speech).collect();
        assert_eq!(
            tags,
            vec![
                PartOfSpeech::Adjective,
                PartOfSpeech::ProperNoun,
                PartOfSpeech::Other
            ]
        );
    }

    #[tokio::test]
    async fn test_server_error_is_retried_then_reported() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/embed");
                then.status(503).body("overloaded");
            })
            .await;

        let err = client_for(&server).embed("text").await.unwrap_err();

        mock.assert_hits_async(MAX_RETRIES as usize).await;
        assert!(matches!(err, NlpError::Api { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/embed");
                then.status(400).json_body(json!({"message": "text too long"}));
            })
            .await;

        let err = client_for(&server).embed("text").await.unwrap_err();

        mock.assert_hits_async(1).await;
        match err {
            NlpError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "text too long");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_empty_embedding_is_an_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/embed");
                then.status(200).json_body(json!({"embedding": []}));
            })
            .await;

        let err = client_for(&server).embed("text").await.unwrap_err();
        assert!(matches!(err, NlpError::EmptyEmbedding));
    }
}
