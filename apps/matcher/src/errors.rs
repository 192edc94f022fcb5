use std::path::PathBuf;

use thiserror::Error;

/// User-visible failures of a matching run.
///
/// `perform_match` never returns these as `Err`; they are rendered into an
/// unsuccessful `MatchResult` via `MatchResult::failure`.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MatchError {
    #[error("No resume text provided")]
    MissingResumeText,

    #[error("No job description provided")]
    MissingJobText,

    #[error("Matching service unavailable: {0}")]
    CollaboratorUnavailable(String),
}

/// Failures while loading a resume or job description from disk.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to extract text from PDF {path}: {message}")]
    Pdf { path: PathBuf, message: String },

    #[error("Document {0} contains no text")]
    Empty(PathBuf),
}
