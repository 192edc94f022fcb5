//! Vocabulary: curated lookup tables driving extraction, matching and weighting.
//!
//! Loaded once at startup (built-in tables or a JSON override) and shared as
//! `Arc<Vocabulary>`. Nothing writes to it after construction.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::{Arc, OnceLock};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const TECHNICAL_SKILLS: &[&str] = &[
    "java", "python", "javascript", "typescript", "c++", "c#", "php", "ruby", "go", "rust",
    "spring", "react", "angular", "vue", "node.js", "express", "django", "flask", "laravel",
    "aws", "azure", "gcp", "docker", "kubernetes", "jenkins", "git", "sql", "mongodb",
    "redis", "elasticsearch", "kafka", "rabbitmq", "microservices", "rest", "graphql",
    "html", "css", "bootstrap", "tailwind", "jquery", "webpack", "babel", "jest", "junit",
];

const SYNONYM_GROUPS: &[(&str, &[&str])] = &[
    ("java", &["j2ee", "jee", "spring", "hibernate", "maven", "gradle"]),
    (
        "javascript",
        &["js", "es6", "node", "react", "angular", "vue", "typescript"],
    ),
    (
        "python",
        &["django", "flask", "fastapi", "pandas", "numpy", "scikit-learn"],
    ),
    (
        "aws",
        &["amazon web services", "ec2", "s3", "lambda", "rds", "dynamodb"],
    ),
    ("docker", &["containerization", "kubernetes", "k8s", "containers"]),
    (
        "sql",
        &["mysql", "postgresql", "oracle", "sql server", "database"],
    ),
    ("git", &["github", "gitlab", "bitbucket", "version control"]),
    (
        "agile",
        &["scrum", "kanban", "sprint", "backlog", "user stories"],
    ),
];

/// Matched terms containing one of these earn the confidence bonus.
const COMMON_SKILLS: &[&str] = &[
    "java", "python", "javascript", "react", "sql", "aws", "docker", "git",
];

/// Missing terms containing one of these earn the importance bonus.
const IMPORTANT_SKILLS: &[&str] = &[
    "java",
    "python",
    "javascript",
    "aws",
    "docker",
    "kubernetes",
    "sql",
    "react",
    "microservices",
];

const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Programming Language",
        &[
            "python", "java", "javascript", "typescript", "c++", "c#", "go", "rust", "swift",
            "kotlin", "scala", "php", "ruby", "bash", "html", "css",
        ],
    ),
    (
        "Framework",
        &[
            "spring", "spring boot", "django", "flask", "fastapi", "express", "react", "angular",
            "vue", "node.js", "jquery", "bootstrap", "tailwind", "tensorflow", "pytorch",
            "pandas", "numpy",
        ],
    ),
    (
        "Cloud",
        &[
            "aws", "amazon web services", "azure", "gcp", "google cloud", "heroku", "ec2", "s3",
            "lambda", "sagemaker",
        ],
    ),
    (
        "Database",
        &[
            "sql", "nosql", "mysql", "postgresql", "mongodb", "redis", "cassandra",
            "elasticsearch", "dynamodb", "oracle", "sqlite",
        ],
    ),
    (
        "Tooling",
        &[
            "docker", "kubernetes", "k8s", "jenkins", "git", "github", "gitlab", "jira",
            "kafka", "rabbitmq", "webpack", "jest", "junit",
        ],
    ),
    (
        "Methodology",
        &[
            "agile", "scrum", "kanban", "devops", "ci/cd", "tdd", "microservices", "rest",
            "graphql",
        ],
    ),
    (
        "Soft Skill",
        &[
            "leadership", "communication", "teamwork", "problem solving", "collaboration",
            "mentoring", "presentation", "negotiation",
        ],
    ),
];

/// Category tag for terms that hit no category rule.
pub const DEFAULT_CATEGORY: &str = "General";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub name: String,
    pub tokens: Vec<String>,
}

/// All curated tables. Fields missing from a JSON override fall back to the built-ins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    pub technical_skills: Vec<String>,
    /// canonical term → related terms
    pub synonym_groups: BTreeMap<String, BTreeSet<String>>,
    pub common_skills: Vec<String>,
    pub important_skills: Vec<String>,
    pub categories: Vec<CategoryRule>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        Self {
            technical_skills: owned(TECHNICAL_SKILLS),
            synonym_groups: SYNONYM_GROUPS
                .iter()
                .map(|(canonical, members)| {
                    (
                        canonical.to_string(),
                        members.iter().map(|m| m.to_string()).collect(),
                    )
                })
                .collect(),
            common_skills: owned(COMMON_SKILLS),
            important_skills: owned(IMPORTANT_SKILLS),
            categories: CATEGORIES
                .iter()
                .map(|(name, tokens)| CategoryRule {
                    name: name.to_string(),
                    tokens: owned(*tokens),
                })
                .collect(),
        }
    }
}

static BUILTIN: OnceLock<Arc<Vocabulary>> = OnceLock::new();

impl Vocabulary {
    /// Shared built-in tables, constructed on first use.
    pub fn builtin() -> Arc<Vocabulary> {
        BUILTIN.get_or_init(|| Arc::new(Vocabulary::default())).clone()
    }

    /// Loads a JSON vocabulary file. Entries are lower-cased and trimmed on load.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read vocabulary file '{}'", path.display()))?;
        let vocabulary: Vocabulary = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid vocabulary JSON in '{}'", path.display()))?;
        Ok(vocabulary.normalized())
    }

    fn normalized(self) -> Self {
        let clean = |items: Vec<String>| {
            items
                .into_iter()
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
        };

        Self {
            technical_skills: clean(self.technical_skills),
            synonym_groups: self
                .synonym_groups
                .into_iter()
                .map(|(canonical, members)| {
                    (
                        canonical.trim().to_lowercase(),
                        members.into_iter().map(|m| m.trim().to_lowercase()).collect(),
                    )
                })
                .collect(),
            common_skills: clean(self.common_skills),
            important_skills: clean(self.important_skills),
            categories: self
                .categories
                .into_iter()
                .map(|rule| CategoryRule {
                    name: rule.name,
                    tokens: clean(rule.tokens),
                })
                .collect(),
        }
    }

    /// True when `phrase` (already lower-cased) contains a known technology token.
    pub fn mentions_technology(&self, phrase: &str) -> bool {
        self.technical_skills.iter().any(|t| phrase.contains(t.as_str()))
    }

    /// True when one of `a`/`b` is a canonical key and the other is in its group.
    pub fn are_synonyms(&self, a: &str, b: &str) -> bool {
        let in_group = |canonical: &str, member: &str| {
            self.synonym_groups
                .get(canonical)
                .is_some_and(|members| members.contains(member))
        };
        in_group(a, b) || in_group(b, a)
    }

    /// First category whose tokens name the term (whole term, a whole word of it,
    /// or a contained multi-word token).
    pub fn category_for(&self, term: &str) -> &str {
        self.categories
            .iter()
            .find(|rule| {
                rule.tokens.iter().any(|token| {
                    term == token
                        || term.split_whitespace().any(|word| word == token)
                        || (token.contains(' ') && term.contains(token.as_str()))
                })
            })
            .map(|rule| rule.name.as_str())
            .unwrap_or(DEFAULT_CATEGORY)
    }
}
