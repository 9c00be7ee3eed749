//! Risk score provider boundary
//!
//! The composite score and classification band come from collaborators
//! outside this workspace (stylometric feature extraction, transformer
//! detectors, local LLM analysts). This trait is the whole contract.

use thiserror::Error;

use narratrace_core::{ContentSubmission, RiskAssessment};

/// Errors from a scoring provider
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Model unavailable: {0}")]
    Unavailable(String),

    #[error("Scoring failed: {0}")]
    Scoring(String),

    #[error("Malformed submission: {0}")]
    Malformed(String),
}

/// External scoring subsystem interface
pub trait RiskScoreProvider: Send + Sync {
    /// Produce a composite score in [0, 1] and a classification band for
    /// one submission
    fn assess(&self, submission: &ContentSubmission) -> Result<RiskAssessment, ProviderError>;
}

#[cfg(test)]
pub mod testutil {
    use super::*;
    use narratrace_core::RiskClass;

    /// Provider returning one fixed assessment, for pipeline tests
    pub struct FixedProvider {
        pub score: f64,
        pub classification: RiskClass,
    }

    impl RiskScoreProvider for FixedProvider {
        fn assess(&self, _: &ContentSubmission) -> Result<RiskAssessment, ProviderError> {
            Ok(RiskAssessment::new(self.score, self.classification))
        }
    }

    /// Provider that always fails, for error-path tests
    pub struct FailingProvider;

    impl RiskScoreProvider for FailingProvider {
        fn assess(&self, _: &ContentSubmission) -> Result<RiskAssessment, ProviderError> {
            Err(ProviderError::Unavailable("detector offline".to_string()))
        }
    }
}
