use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Longest term the engine keeps, in characters.
pub const MAX_TERM_LEN: usize = 50;

/// A normalized skill or technology mention.
///
/// Always lower-cased, trimmed, non-empty and at most `MAX_TERM_LEN` characters,
/// so plain string equality is case-insensitive equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Term(String);

impl Term {
    /// Normalizes `raw` into a term. Returns `None` for blank or over-long input.
    pub fn new(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() || normalized.chars().count() > MAX_TERM_LEN {
            return None;
        }
        Some(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.0.contains(needle)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Term {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Deduplicated terms from one document, kept in first-insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TermSet {
    terms: Vec<Term>,
    #[serde(skip)]
    seen: HashSet<Term>,
}

impl TermSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `term`; returns false if an equal term was already present.
    pub fn insert(&mut self, term: Term) -> bool {
        if self.seen.contains(&term) {
            return false;
        }
        self.seen.insert(term.clone());
        self.terms.push(term);
        true
    }

    /// Normalizes and inserts a raw string, skipping anything that is not a valid term.
    pub fn insert_raw(&mut self, raw: &str) -> bool {
        Term::new(raw).map(|t| self.insert(t)).unwrap_or(false)
    }

    /// Adds every term of `other` that is not already present.
    pub fn extend_from(&mut self, other: TermSet) {
        for term in other.terms {
            self.insert(term);
        }
    }

    pub fn contains(&self, term: &Term) -> bool {
        self.seen.contains(term)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Term> {
        self.terms.iter()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl FromIterator<Term> for TermSet {
    fn from_iter<I: IntoIterator<Item = Term>>(iter: I) -> Self {
        let mut set = TermSet::new();
        for term in iter {
            set.insert(term);
        }
        set
    }
}

impl<'a> FromIterator<&'a str> for TermSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = TermSet::new();
        for raw in iter {
            set.insert_raw(raw);
        }
        set
    }
}

impl IntoIterator for TermSet {
    type Item = Term;
    type IntoIter = std::vec::IntoIter<Term>;

    fn into_iter(self) -> Self::IntoIter {
        self.terms.into_iter()
    }
}

impl<'a> IntoIterator for &'a TermSet {
    type Item = &'a Term;
    type IntoIter = std::slice::Iter<'a, Term>;

    fn into_iter(self) -> Self::IntoIter {
        self.terms.iter()
    }
}
