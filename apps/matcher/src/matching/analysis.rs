//! Analysis: turns the fused score into a tier narrative and recommendations.

use serde::{Deserialize, Serialize};

use crate::models::{Analysis, MatchedTerm, MissingTerm};

/// Missing terms named in the "prioritize" recommendation.
const TOP_MISSING: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    Excellent,
    Good,
    Moderate,
    Low,
}

impl MatchTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            MatchTier::Excellent
        } else if score >= 60.0 {
            MatchTier::Good
        } else if score >= 40.0 {
            MatchTier::Moderate
        } else {
            MatchTier::Low
        }
    }

    pub fn narrative(self) -> &'static str {
        match self {
            MatchTier::Excellent => {
                "Excellent match! Your profile strongly aligns with the job requirements."
            }
            MatchTier::Good => {
                "Good match. You have many of the required skills but some gaps exist."
            }
            MatchTier::Moderate => {
                "Moderate match. Consider developing additional skills before applying."
            }
            MatchTier::Low => "Low match. This role may require significant skill development.",
        }
    }

    pub fn baseline_recommendations(self) -> [&'static str; 2] {
        match self {
            MatchTier::Excellent => [
                "Highlight your matched skills prominently in your application",
                "Prepare to discuss your experience with the identified technologies",
            ],
            MatchTier::Good => [
                "Focus on learning the missing skills identified",
                "Emphasize transferable skills and experience",
            ],
            MatchTier::Moderate => [
                "Invest time in learning the missing technical skills",
                "Consider similar roles with fewer requirements",
            ],
            MatchTier::Low => [
                "Focus on building the core missing skills first",
                "Consider entry-level positions or internships",
            ],
        }
    }
}

/// Tier narrative, the tier's two baseline recommendations, then, when
/// anything is missing, one line naming the highest-importance gaps.
pub fn analyze(score: f64, _matched: &[MatchedTerm], missing: &[MissingTerm]) -> Analysis {
    let tier = MatchTier::from_score(score);

    let mut recommendations: Vec<String> = tier
        .baseline_recommendations()
        .iter()
        .map(|r| r.to_string())
        .collect();

    if !missing.is_empty() {
        let mut ranked: Vec<&MissingTerm> = missing.iter().collect();
        ranked.sort_by(|a, b| b.importance.total_cmp(&a.importance));
        let top: Vec<&str> = ranked
            .iter()
            .take(TOP_MISSING)
            .map(|m| m.term.as_str())
            .collect();
        recommendations.push(format!("Prioritize learning: {}", top.join(", ")));
    }

    Analysis {
        narrative: tier.narrative().to_string(),
        recommendations,
    }
}
