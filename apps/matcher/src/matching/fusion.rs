use crate::models::{MatchedTerm, MissingTerm};

#[derive(Debug, Clone)]
pub struct FusionWeights {
    pub semantic: f64,
    pub skill: f64,
    pub matched: f64,
    pub missing: f64,
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self {
            semantic: 0.4,
            skill: 0.6,
            matched: 0.7,
            missing: 0.3,
        }
    }
}

/// Overall fit score in [0, 100] with the default weights.
pub fn fuse(matched: &[MatchedTerm], missing: &[MissingTerm], semantic_similarity: f64) -> f64 {
    fuse_with(matched, missing, semantic_similarity, &FusionWeights::default())
}

/// skill = matched*mean(confidence) - missing*mean(importance)
/// final = semantic*similarity + skill_weight*skill, scaled to 0–100 and clamped.
///
/// The skill component may go negative; only the final clamp floors it.
/// With no terms at all the score is the similarity alone.
pub fn fuse_with(
    matched: &[MatchedTerm],
    missing: &[MissingTerm],
    semantic_similarity: f64,
    weights: &FusionWeights,
) -> f64 {
    let similarity = if semantic_similarity.is_nan() {
        0.0
    } else {
        semantic_similarity.clamp(0.0, 1.0)
    };

    if matched.is_empty() && missing.is_empty() {
        return similarity * 100.0;
    }

    let matched_score = mean(matched.iter().map(|m| m.confidence));
    let missing_penalty = mean(missing.iter().map(|m| m.importance));

    let skill_score = matched_score * weights.matched - missing_penalty * weights.missing;
    let final_score = similarity * weights.semantic + skill_score * weights.skill;

    (final_score * 100.0).clamp(0.0, 100.0)
}

fn mean(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let count = values.len();
    if count == 0 {
        return 0.0;
    }
    values.sum::<f64>() / count as f64
}
