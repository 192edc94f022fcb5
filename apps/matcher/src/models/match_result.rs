use serde::{Deserialize, Serialize};

use crate::errors::MatchError;
use crate::models::term::Term;

/// A job term the resume covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedTerm {
    pub term: Term,
    pub confidence: f64, // 0.0 – 1.0
    pub category: String,
}

/// A job term the resume does not cover.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingTerm {
    pub term: Term,
    pub importance: f64, // 0.0 – 1.0
    pub category: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub narrative: String,
    pub recommendations: Vec<String>,
}

/// The only output of a matching run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub success: bool,
    pub message: String,
    pub score: f64, // 0.0 – 100.0
    pub matched: Vec<MatchedTerm>,
    /// Descending by importance.
    pub missing: Vec<MissingTerm>,
    pub analysis: Analysis,
}

impl MatchResult {
    pub fn completed(
        score: f64,
        matched: Vec<MatchedTerm>,
        missing: Vec<MissingTerm>,
        analysis: Analysis,
    ) -> Self {
        Self {
            success: true,
            message: "Job matching analysis completed successfully".to_string(),
            score,
            matched,
            missing,
            analysis,
        }
    }

    /// Unsuccessful result: score 0, empty lists, the error as message.
    pub fn failure(error: &MatchError) -> Self {
        Self {
            success: false,
            message: error.to_string(),
            score: 0.0,
            matched: vec![],
            missing: vec![],
            analysis: Analysis::default(),
        }
    }
}
