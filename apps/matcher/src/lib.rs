//! Job fit matching engine: scores a resume against a job description and
//! explains the gaps.
//!
//! Entry point: [`MatchEngine::perform_match`].

pub mod config;
pub mod document;
pub mod errors;
pub mod matching;
pub mod models;
pub mod nlp_client;
pub mod state;
pub mod vocabulary;

pub use errors::MatchError;
pub use models::{Analysis, MatchResult, MatchedTerm, MissingTerm, Term, TermSet};
pub use state::MatchEngine;
pub use vocabulary::Vocabulary;
