//! Matching orchestrator: the single entry point `MatchEngine::perform_match`.
//!
//! Flow: validate → extract (resume ∥ job ∥ similarity) → match → score → analyze.
//!
//! Degrade, don't fail: a failing collaborator call only removes its own
//! contribution. The run is declared unavailable only when every collaborator
//! call of the request failed.

use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::errors::MatchError;
use crate::matching::analysis::analyze;
use crate::matching::confidence::ConfidenceScorer;
use crate::matching::experience::missing_experience;
use crate::matching::extractor::TermExtractor;
use crate::matching::fusion::fuse;
use crate::matching::matcher::match_terms;
use crate::matching::{bounded, CallTally};
use crate::models::MatchResult;
use crate::state::MatchEngine;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchStage {
    Idle,
    Validating,
    Extracting,
    Matching,
    Scoring,
    Done,
    Failed,
}

struct StageTracker {
    stage: MatchStage,
}

impl StageTracker {
    fn new() -> Self {
        Self {
            stage: MatchStage::Idle,
        }
    }

    fn advance(&mut self, next: MatchStage) {
        debug!(from = ?self.stage, to = ?next, "match stage transition");
        self.stage = next;
    }

    fn fail(&mut self, error: &MatchError) -> MatchResult {
        self.advance(MatchStage::Failed);
        MatchResult::failure(error)
    }
}

fn validate(resume_text: &str, job_text: &str) -> Result<(), MatchError> {
    if resume_text.trim().is_empty() {
        return Err(MatchError::MissingResumeText);
    }
    if job_text.trim().is_empty() {
        return Err(MatchError::MissingJobText);
    }
    Ok(())
}

impl MatchEngine {
    /// Scores `resume_text` against `job_text`. Never returns an error: input
    /// problems and total collaborator outages come back as unsuccessful results.
    pub async fn perform_match(&self, resume_text: &str, job_text: &str) -> MatchResult {
        let span = info_span!("perform_match", request_id = %Uuid::new_v4());
        self.run_match(resume_text, job_text).instrument(span).await
    }

    async fn run_match(&self, resume_text: &str, job_text: &str) -> MatchResult {
        let mut tracker = StageTracker::new();

        tracker.advance(MatchStage::Validating);
        if let Err(err) = validate(resume_text, job_text) {
            warn!("Rejected match request: {err}");
            return tracker.fail(&err);
        }

        info!(
            "Starting job match analysis (resume {} chars, job {} chars)",
            resume_text.len(),
            job_text.len()
        );

        tracker.advance(MatchStage::Extracting);
        let extractor = TermExtractor::new(self);
        let (resume, job, (similarity, similarity_calls)) = tokio::join!(
            extractor.extract_with_report(resume_text),
            extractor.extract_with_report(job_text),
            self.semantic_similarity(resume_text, job_text),
        );

        let mut calls = CallTally::default();
        calls.merge(resume.calls);
        calls.merge(job.calls);
        calls.merge(similarity_calls);

        if calls.all_failed() {
            let err = MatchError::CollaboratorUnavailable(format!(
                "all {} NLP collaborator calls failed",
                calls.attempted
            ));
            error!("{err}");
            return tracker.fail(&err);
        }
        if calls.failed > 0 {
            warn!(
                "{} of {} collaborator calls failed; result is degraded",
                calls.failed, calls.attempted
            );
        }

        tracker.advance(MatchStage::Matching);
        let partition = match_terms(&resume.terms, &job.terms, &self.vocabulary);
        debug!(
            resume_terms = resume.terms.len(),
            job_terms = job.terms.len(),
            matched = partition.matched.len(),
            missing = partition.missing.len(),
            "terms partitioned"
        );

        tracker.advance(MatchStage::Scoring);
        let scorer = ConfidenceScorer::new(self.vocabulary.clone());
        let matched = scorer.score_matched(&partition.matched);
        let missing = scorer.score_missing(&partition.missing);
        let score = fuse(&matched, &missing, similarity);

        let mut analysis = analyze(score, &matched, &missing);
        let experience_gaps = missing_experience(resume_text, job_text);
        if !experience_gaps.is_empty() {
            analysis
                .recommendations
                .push(format!("Experience gaps: {}", experience_gaps.join(", ")));
        }

        tracker.advance(MatchStage::Done);
        info!("Job match analysis completed. Score: {score:.2}");

        MatchResult::completed(score, matched, missing, analysis)
    }

    /// Similarity in [0, 1]; 0.0 when the provider fails or times out.
    async fn semantic_similarity(&self, resume_text: &str, job_text: &str) -> (f64, CallTally) {
        let mut calls = CallTally::default();
        let call = self.similarity.similarity(resume_text, job_text);

        let similarity = match bounded(self.timeout, call).await {
            Ok(value) => {
                calls.record_success();
                if value.is_nan() {
                    0.0
                } else {
                    value.clamp(0.0, 1.0)
                }
            }
            Err(e) => {
                warn!("Semantic similarity failed, using 0.0: {e}");
                calls.record_failure();
                0.0
            }
        };

        (similarity, calls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::nlp_client::{
        KeyPhraseExtractor, NlpError, PartOfSpeech, SimilarityProvider, SyntaxAnalyzer,
        SyntaxToken,
    };
    use crate::vocabulary::Vocabulary;

    const RESUME_A: &str = "Experienced Java developer with Spring and AWS";
    const JOB_A: &str = "Looking for Java, Spring, Docker expert";

    struct FixedSimilarity(f64);

    #[async_trait]
    impl SimilarityProvider for FixedSimilarity {
        async fn similarity(&self, _: &str, _: &str) -> Result<f64, NlpError> {
            Ok(self.0)
        }
    }

    /// Fails every call.
    struct Outage;

    #[async_trait]
    impl KeyPhraseExtractor for Outage {
        async fn detect_key_phrases(&self, _: &str, _: &str) -> Result<Vec<String>, NlpError> {
            Err(NlpError::Api {
                status: 503,
                message: "down".to_string(),
            })
        }
    }

    #[async_trait]
    impl SyntaxAnalyzer for Outage {
        async fn detect_syntax(&self, _: &str, _: &str) -> Result<Vec<SyntaxToken>, NlpError> {
            Err(NlpError::Api {
                status: 503,
                message: "down".to_string(),
            })
        }
    }

    #[async_trait]
    impl SimilarityProvider for Outage {
        async fn similarity(&self, _: &str, _: &str) -> Result<f64, NlpError> {
            Err(NlpError::Api {
                status: 503,
                message: "down".to_string(),
            })
        }
    }

    /// Never answers within any sane timeout.
    struct Stalled;

    #[async_trait]
    impl SimilarityProvider for Stalled {
        async fn similarity(&self, _: &str, _: &str) -> Result<f64, NlpError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(1.0)
        }
    }

    /// Key phrases looked up per document text.
    struct ScriptedPhrases(HashMap<&'static str, Vec<&'static str>>);

    #[async_trait]
    impl KeyPhraseExtractor for ScriptedPhrases {
        async fn detect_key_phrases(&self, text: &str, _: &str) -> Result<Vec<String>, NlpError> {
            Ok(self
                .0
                .get(text)
                .map(|p| p.iter().map(|s| s.to_string()).collect())
                .unwrap_or_default())
        }
    }

    struct NoTokens;

    #[async_trait]
    impl SyntaxAnalyzer for NoTokens {
        async fn detect_syntax(&self, _: &str, _: &str) -> Result<Vec<SyntaxToken>, NlpError> {
            Ok(vec![SyntaxToken {
                text: "the".to_string(),
                part_of_speech: PartOfSpeech::Other,
            }])
        }
    }

    fn offline_with_similarity(similarity: f64) -> MatchEngine {
        MatchEngine::offline(Vocabulary::builtin())
            .with_similarity(Arc::new(FixedSimilarity(similarity)))
    }

    fn terms(result: &MatchResult) -> (Vec<&str>, Vec<&str>) {
        (
            result.matched.iter().map(|m| m.term.as_str()).collect(),
            result.missing.iter().map(|m| m.term.as_str()).collect(),
        )
    }

    #[test]
    fn test_validate_blank_inputs() {
        assert_eq!(validate("", "job"), Err(MatchError::MissingResumeText));
        assert_eq!(validate("resume", "  \n"), Err(MatchError::MissingJobText));
        assert!(validate("resume", "job").is_ok());
    }

    #[tokio::test]
    async fn test_java_spring_docker_scenario() {
        let result = offline_with_similarity(0.75)
            .perform_match(RESUME_A, JOB_A)
            .await;

        assert!(result.success, "{}", result.message);
        let (matched, missing) = terms(&result);
        assert!(matched.contains(&"java"), "matched: {matched:?}");
        assert!(matched.contains(&"spring"), "matched: {matched:?}");
        assert!(missing.contains(&"docker"), "missing: {missing:?}");
        assert!(
            result.score > 40.0 && result.score < 100.0,
            "Score was {}",
            result.score
        );
    }

    #[tokio::test]
    async fn test_single_letter_skills_do_not_match_everything() {
        let result = offline_with_similarity(0.5)
            .perform_match(
                "Languages: C and R.",
                "Must know Docker and Kubernetes and Terraform.",
            )
            .await;

        assert!(result.success, "{}", result.message);
        let (matched, missing) = terms(&result);
        for term in ["docker", "kubernetes", "terraform"] {
            assert!(!matched.contains(&term), "matched: {matched:?}");
            assert!(missing.contains(&term), "missing: {missing:?}");
        }
    }

    #[tokio::test]
    async fn test_blank_resume_is_input_error() {
        let result = offline_with_similarity(0.9)
            .perform_match("", "Python required")
            .await;

        assert!(!result.success);
        assert_eq!(result.score, 0.0);
        assert!(result.matched.is_empty());
        assert!(result.missing.is_empty());
        assert!(result.message.to_lowercase().contains("resume"));
    }

    #[tokio::test]
    async fn test_blank_job_is_input_error() {
        let result = offline_with_similarity(0.9)
            .perform_match("Rust engineer", "   ")
            .await;
        assert!(!result.success);
        assert!(result.message.to_lowercase().contains("job description"));
    }

    #[tokio::test]
    async fn test_identical_inputs_give_identical_results() {
        let engine = offline_with_similarity(0.6);
        let first = engine.perform_match(RESUME_A, JOB_A).await;
        let second = engine.perform_match(RESUME_A, JOB_A).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_no_terms_falls_back_to_similarity() {
        let engine = MatchEngine::offline(Vocabulary::builtin())
            .with_key_phrases(Arc::new(ScriptedPhrases(HashMap::new())))
            .with_syntax(Arc::new(NoTokens))
            .with_similarity(Arc::new(FixedSimilarity(0.9)));

        let result = engine.perform_match("resume text", "job text").await;
        assert!(result.success);
        assert_eq!(result.score, 90.0);
        assert!(result.analysis.narrative.starts_with("Excellent match"));
    }

    #[tokio::test]
    async fn test_total_outage_is_unavailable() {
        let engine = MatchEngine::offline(Vocabulary::builtin())
            .with_key_phrases(Arc::new(Outage))
            .with_syntax(Arc::new(Outage))
            .with_similarity(Arc::new(Outage));

        let result = engine.perform_match(RESUME_A, JOB_A).await;
        assert!(!result.success);
        assert_eq!(result.score, 0.0);
        assert!(result.matched.is_empty() && result.missing.is_empty());
        assert!(result.message.contains("unavailable"), "{}", result.message);
    }

    #[tokio::test]
    async fn test_similarity_outage_degrades_to_lexical_score() {
        let engine = MatchEngine::offline(Vocabulary::builtin())
            .with_similarity(Arc::new(Outage));

        let result = engine.perform_match(RESUME_A, JOB_A).await;
        assert!(result.success);
        assert!(!result.matched.is_empty());
        // Same lexical signal with similarity 0.0
        let baseline = offline_with_similarity(0.0)
            .perform_match(RESUME_A, JOB_A)
            .await;
        assert_eq!(result.score, baseline.score);
    }

    #[tokio::test]
    async fn test_extraction_outage_keeps_semantic_signal() {
        let engine = MatchEngine::offline(Vocabulary::builtin())
            .with_key_phrases(Arc::new(Outage))
            .with_syntax(Arc::new(Outage))
            .with_similarity(Arc::new(FixedSimilarity(0.5)));

        let result = engine.perform_match(RESUME_A, JOB_A).await;
        assert!(result.success);
        assert_eq!(result.score, 50.0);
        assert!(result.matched.is_empty() && result.missing.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_similarity_times_out_and_degrades() {
        let engine = MatchEngine::offline(Vocabulary::builtin())
            .with_similarity(Arc::new(Stalled))
            .with_timeout(Duration::from_millis(100));

        let result = engine.perform_match(RESUME_A, JOB_A).await;
        assert!(result.success);
        let baseline = offline_with_similarity(0.0)
            .perform_match(RESUME_A, JOB_A)
            .await;
        assert_eq!(result.score, baseline.score);
    }

    #[tokio::test]
    async fn test_missing_terms_sorted_and_prioritized() {
        let mut phrases = HashMap::new();
        phrases.insert("resume", vec!["gardening"]);
        phrases.insert("job", vec!["expert", "docker expert", "leadership", "docker"]);

        let engine = MatchEngine::offline(Vocabulary::builtin())
            .with_key_phrases(Arc::new(ScriptedPhrases(phrases)))
            .with_syntax(Arc::new(NoTokens))
            .with_similarity(Arc::new(FixedSimilarity(0.2)));

        let result = engine.perform_match("resume", "job").await;
        let importances: Vec<f64> = result.missing.iter().map(|m| m.importance).collect();
        assert!(importances.windows(2).all(|w| w[0] >= w[1]));

        let last = result.analysis.recommendations.last().unwrap();
        assert_eq!(last, "Prioritize learning: docker expert, docker, leadership");
    }

    #[tokio::test]
    async fn test_experience_gap_appended_last() {
        let result = offline_with_similarity(0.5)
            .perform_match(
                "3 years of experience in Rust",
                "5+ years of experience in Rust",
            )
            .await;

        assert!(result.success);
        let last = result.analysis.recommendations.last().unwrap();
        assert_eq!(last, "Experience gaps: 5+ years in rust");
    }
}
