//! Embedding-based document similarity.
//!
//! `EmbeddingSimilarity` turns any `Embedder` into a `SimilarityProvider`:
//! cosine of the two document vectors, negative values treated as unrelated.
//! `HashingEmbedder` is the offline embedder used when no service is configured.

use std::sync::Arc;

use async_trait::async_trait;

use super::heuristic::word_tokens;
use super::{Embedder, NlpError, SimilarityProvider};

/// Dimension of `HashingEmbedder` vectors.
pub const HASHED_DIM: usize = 256;

/// Cosine similarity in [-1, 1]. Returns 0.0 for empty, mismatched or zero-norm vectors.
pub fn cosine(left: &[f32], right: &[f32]) -> f64 {
    if left.is_empty() || left.len() != right.len() {
        return 0.0;
    }

    let mut dot = 0.0_f64;
    let mut norm_left = 0.0_f64;
    let mut norm_right = 0.0_f64;
    for (&a, &b) in left.iter().zip(right) {
        let (a, b) = (a as f64, b as f64);
        dot += a * b;
        norm_left += a * a;
        norm_right += b * b;
    }

    if norm_left == 0.0 || norm_right == 0.0 {
        return 0.0;
    }
    dot / (norm_left.sqrt() * norm_right.sqrt())
}

/// Clamps a raw cosine into a usable similarity; NaN counts as no similarity.
pub fn clamp_similarity(raw: f64) -> f64 {
    if raw.is_nan() {
        0.0
    } else {
        raw.clamp(0.0, 1.0)
    }
}

pub struct EmbeddingSimilarity {
    embedder: Arc<dyn Embedder>,
}

impl EmbeddingSimilarity {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder }
    }
}

#[async_trait]
impl SimilarityProvider for EmbeddingSimilarity {
    /// Fails if either document cannot be embedded; the engine degrades that to 0.0.
    async fn similarity(&self, left: &str, right: &str) -> Result<f64, NlpError> {
        let (left_vec, right_vec) =
            tokio::join!(self.embedder.embed(left), self.embedder.embed(right));
        let (left_vec, right_vec) = (left_vec?, right_vec?);
        Ok(clamp_similarity(cosine(&left_vec, &right_vec)))
    }
}

/// Deterministic bag-of-features embedder: word tokens and their character
/// trigrams hashed into `HASHED_DIM` buckets. No model files, no network.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashingEmbedder;

impl HashingEmbedder {
    pub fn embed_text(text: &str) -> Vec<f32> {
        let mut vector = vec![0.0_f32; HASHED_DIM];

        for word in word_tokens(text) {
            let word = word.to_lowercase();
            // Whole words weigh more than their trigrams
            vector[bucket(word.as_bytes())] += 2.0;

            let padded: Vec<char> = format!(" {word} ").chars().collect();
            for window in padded.windows(3) {
                let trigram: String = window.iter().collect();
                vector[bucket(trigram.as_bytes())] += 1.0;
            }
        }

        vector
    }
}

#[async_trait]
impl Embedder for HashingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, NlpError> {
        Ok(Self::embed_text(text))
    }
}

/// FNV-1a, stable across platforms and releases.
fn bucket(bytes: &[u8]) -> usize {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for &b in bytes {
        hash ^= b as u64;
        hash = hash.wrapping_mul(0x0100_0000_01b3);
    }
    (hash % HASHED_DIM as u64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingEmbedder;

    #[async_trait]
    impl Embedder for FailingEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, NlpError> {
            Err(NlpError::EmptyEmbedding)
        }
    }

    struct FixedEmbedder(Vec<f32>, Vec<f32>);

    #[async_trait]
    impl Embedder for FixedEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>, NlpError> {
            Ok(if text == "left" {
                self.0.clone()
            } else {
                self.1.clone()
            })
        }
    }

    #[test]
    fn test_cosine_identical_vectors() {
        let v = [0.5, 1.0, -2.0];
        assert!((cosine(&v, &v) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_length_mismatch_is_zero() {
        assert_eq!(cosine(&[1.0, 2.0], &[1.0]), 0.0);
        assert_eq!(cosine(&[], &[]), 0.0);
    }

    #[test]
    fn test_cosine_zero_norm_is_zero() {
        assert_eq!(cosine(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_clamp_similarity() {
        assert_eq!(clamp_similarity(-0.4), 0.0);
        assert_eq!(clamp_similarity(1.2), 1.0);
        assert_eq!(clamp_similarity(f64::NAN), 0.0);
        assert_eq!(clamp_similarity(0.3), 0.3);
    }

    #[tokio::test]
    async fn test_negative_cosine_clamped_to_zero() {
        let provider = EmbeddingSimilarity::new(Arc::new(FixedEmbedder(
            vec![1.0, 0.0],
            vec![-1.0, 0.0],
        )));
        let sim = provider.similarity("left", "right").await.unwrap();
        assert_eq!(sim, 0.0);
    }

    #[tokio::test]
    async fn test_embed_failure_propagates() {
        let provider = EmbeddingSimilarity::new(Arc::new(FailingEmbedder));
        assert!(provider.similarity("a", "b").await.is_err());
    }

    #[test]
    fn test_hashing_embedder_is_deterministic() {
        let a = HashingEmbedder::embed_text("Senior Rust engineer");
        let b = HashingEmbedder::embed_text("Senior Rust engineer");
        assert_eq!(a, b);
        assert_eq!(a.len(), HASHED_DIM);
    }

    #[test]
    fn test_hashing_embedder_related_texts_score_higher() {
        let resume = HashingEmbedder::embed_text("Rust engineer building Kafka pipelines");
        let close = HashingEmbedder::embed_text("Hiring a Rust engineer for Kafka pipelines");
        let far = HashingEmbedder::embed_text("Pastry chef for a bakery");
        assert!(cosine(&resume, &close) > cosine(&resume, &far));
    }

    #[test]
    fn test_hashing_embedder_empty_text_has_no_similarity() {
        let empty = HashingEmbedder::embed_text("");
        let other = HashingEmbedder::embed_text("rust");
        assert_eq!(cosine(&empty, &other), 0.0);
    }
}
