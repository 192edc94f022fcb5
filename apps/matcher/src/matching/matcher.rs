//! Skill matching: partitions job terms into matched and missing.
//!
//! A job term is matched when any resume term is equivalent to it:
//! exact match → substring match (either direction) → synonym group.

use crate::models::{Term, TermSet};
use crate::vocabulary::Vocabulary;

/// Job terms split by whether the resume covers them. The two sets are disjoint
/// and their union is the job term set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillPartition {
    pub matched: TermSet,
    pub missing: TermSet,
}

/// Symmetric, non-transitive term equivalence after case-fold and trim.
pub fn is_equivalent(a: &str, b: &str, vocabulary: &Vocabulary) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();

    if a.is_empty() || b.is_empty() {
        return false;
    }

    a == b || a.contains(&b) || b.contains(&a) || vocabulary.are_synonyms(&a, &b)
}

pub fn match_terms(resume: &TermSet, job: &TermSet, vocabulary: &Vocabulary) -> SkillPartition {
    let mut partition = SkillPartition::default();

    for job_term in job {
        if is_covered(job_term, resume, vocabulary) {
            partition.matched.insert(job_term.clone());
        } else {
            partition.missing.insert(job_term.clone());
        }
    }

    partition
}

fn is_covered(job_term: &Term, resume: &TermSet, vocabulary: &Vocabulary) -> bool {
    // Exact hit is the common case; skip the pairwise scan for it
    resume.contains(job_term)
        || resume
            .iter()
            .any(|r| is_equivalent(r.as_str(), job_term.as_str(), vocabulary))
}
