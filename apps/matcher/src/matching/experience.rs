//! Experience requirements: "5+ years of experience in Rust" style phrases.
//!
//! A job requirement is met when the resume states at least as many years for
//! a skill that contains the required one.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static EXPERIENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(\d+)\+?\s*(?:years?|yrs?)\b\s*(?:of\s+)?(?:experience\s+)?(?:(?:in|with|using)\s+)?([a-z0-9][^,.;:\n()]*)",
    )
    .unwrap()
});

/// Skills longer than this many words are cut down to their first words.
const MAX_SKILL_WORDS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceRequirement {
    pub years: u32,
    pub skill: String,
}

impl ExperienceRequirement {
    pub fn describe(&self) -> String {
        format!("{}+ years in {}", self.years, self.skill)
    }
}

pub fn extract_requirements(text: &str) -> Vec<ExperienceRequirement> {
    let lower = text.to_lowercase();
    let mut requirements: Vec<ExperienceRequirement> = Vec::new();

    for caps in EXPERIENCE.captures_iter(&lower) {
        let Ok(years) = caps[1].parse::<u32>() else {
            continue;
        };
        let skill = caps[2]
            .split_whitespace()
            .take(MAX_SKILL_WORDS)
            .collect::<Vec<_>>()
            .join(" ");
        if skill.is_empty() {
            continue;
        }

        let requirement = ExperienceRequirement { years, skill };
        if !requirements.contains(&requirement) {
            requirements.push(requirement);
        }
    }

    requirements
}

/// Job experience requirements the resume does not satisfy, as display strings.
pub fn missing_experience(resume_text: &str, job_text: &str) -> Vec<String> {
    let held = extract_requirements(resume_text);

    extract_requirements(job_text)
        .into_iter()
        .filter(|required| {
            !held
                .iter()
                .any(|h| h.skill.contains(&required.skill) && h.years >= required.years)
        })
        .map(|required| required.describe())
        .collect()
}
