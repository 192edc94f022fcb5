// Matching engine: term extraction, skill matching, weighting, score fusion,
// analysis and the orchestrator that sequences them.
// All collaborator calls go through `bounded`, so none can hang a request.

use std::future::Future;
use std::time::Duration;

use crate::nlp_client::NlpError;

pub mod analysis;
pub mod confidence;
pub mod experience;
pub mod extractor;
pub mod fusion;
pub mod matcher;
pub mod orchestrator;

/// Counts collaborator calls made for one request and how many failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallTally {
    pub attempted: usize,
    pub failed: usize,
}

impl CallTally {
    pub fn record_success(&mut self) {
        self.attempted += 1;
    }

    pub fn record_failure(&mut self) {
        self.attempted += 1;
        self.failed += 1;
    }

    pub fn merge(&mut self, other: CallTally) {
        self.attempted += other.attempted;
        self.failed += other.failed;
    }

    /// True when at least one call was made and none succeeded.
    pub fn all_failed(&self) -> bool {
        self.attempted > 0 && self.failed == self.attempted
    }
}

/// Runs a collaborator call under `timeout`, mapping expiry to `NlpError::Timeout`.
pub(crate) async fn bounded<T, F>(timeout: Duration, call: F) -> Result<T, NlpError>
where
    F: Future<Output = Result<T, NlpError>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => Err(NlpError::Timeout {
            after_ms: timeout.as_millis() as u64,
        }),
    }
}
