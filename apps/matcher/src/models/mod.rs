pub mod match_result;
pub mod term;

pub use match_result::{Analysis, MatchResult, MatchedTerm, MissingTerm};
pub use term::{Term, TermSet};
