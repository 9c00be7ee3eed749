//! Triage pipeline - the single-writer intake path
//!
//! One mutex guards the whole engine: the analytics reducers iterate the
//! graph's collections without copy-on-read protection, so mutation and
//! summary computation must never interleave. Every entry point here takes
//! the lock for its full duration.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use narratrace_core::{ContentSubmission, RiskClass};
use narratrace_graph::{GraphIntelEngine, GraphSummary, SiemPayload, ThreatIntelFeed};

use crate::provider::{ProviderError, RiskScoreProvider};

/// Errors from the triage pipeline
#[derive(Debug, Error)]
pub enum TriageError {
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

/// Result of triaging one submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageReport {
    /// Freshly generated intake id, also the content node's local id
    pub intake_id: String,
    pub submitted_at: DateTime<Utc>,
    pub composite_score: f64,
    pub classification: RiskClass,
    /// True when the publishing actor was resolved by source bucketing
    pub actor_anonymous: bool,
    pub graph_summary: GraphSummary,
}

/// Synchronous content-risk triage pipeline
pub struct TriagePipeline<P: RiskScoreProvider> {
    provider: P,
    engine: Mutex<GraphIntelEngine>,
}

impl<P: RiskScoreProvider> TriagePipeline<P> {
    pub fn new(provider: P, engine: GraphIntelEngine) -> Self {
        Self {
            provider,
            engine: Mutex::new(engine),
        }
    }

    /// Score a submission and ingest it into the graph
    pub fn submit(&self, submission: &ContentSubmission) -> Result<TriageReport, TriageError> {
        let intake_id = Uuid::new_v4().to_string();
        let submitted_at = Utc::now();

        let assessment = self.provider.assess(submission)?;
        let outcome = self
            .engine
            .lock()
            .ingest(&intake_id, submission, &assessment);

        info!(
            intake_id,
            score = assessment.composite_score,
            classification = assessment.classification.as_str(),
            "triage completed"
        );

        Ok(TriageReport {
            intake_id,
            submitted_at,
            composite_score: assessment.composite_score,
            classification: assessment.classification,
            actor_anonymous: outcome.actor.anonymous,
            graph_summary: outcome.summary,
        })
    }

    /// Summary of the current graph state
    pub fn summary(&self) -> GraphSummary {
        self.engine.lock().summary()
    }

    /// Threat-intel feed over the current graph state
    pub fn threat_intel_feed(&self) -> ThreatIntelFeed {
        self.engine.lock().threat_intel_feed()
    }

    /// SIEM correlation payload over the current graph state
    pub fn siem_payload(&self) -> SiemPayload {
        self.engine.lock().siem_payload()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::testutil::{FailingProvider, FixedProvider};
    use narratrace_core::SubmissionMetadata;

    fn pipeline(score: f64, class: RiskClass) -> TriagePipeline<FixedProvider> {
        TriagePipeline::new(
            FixedProvider {
                score,
                classification: class,
            },
            GraphIntelEngine::new(),
        )
    }

    #[test]
    fn test_submit_grows_graph() {
        let pipeline = pipeline(0.8, RiskClass::High);
        let submission = ContentSubmission::new("coordinated text", "feed-1")
            .with_metadata(SubmissionMetadata {
                platform: Some("telegram".to_string()),
                region: Some("EE".to_string()),
                actor_id: Some("troll-77".to_string()),
            })
            .with_tags(&["election"]);

        let report = pipeline.submit(&submission).unwrap();
        assert_eq!(report.classification, RiskClass::High);
        assert!(!report.actor_anonymous);
        assert_eq!(report.graph_summary.node_count, 4);

        let second = pipeline.submit(&submission).unwrap();
        // Fresh intake id per call: a new content node, same actor
        assert_ne!(report.intake_id, second.intake_id);
        assert_eq!(second.graph_summary.node_count, 5);
    }

    #[test]
    fn test_provider_failure_leaves_graph_untouched() {
        let pipeline = TriagePipeline::new(FailingProvider, GraphIntelEngine::new());
        let result = pipeline.submit(&ContentSubmission::new("text", "feed-1"));
        assert!(matches!(result, Err(TriageError::Provider(_))));
        assert_eq!(pipeline.summary().node_count, 0);
    }

    #[test]
    fn test_anonymous_attribution_flagged() {
        let pipeline = pipeline(0.4, RiskClass::Medium);
        let report = pipeline
            .submit(&ContentSubmission::new("text", "feed-1"))
            .unwrap();
        assert!(report.actor_anonymous);
    }

    #[test]
    fn test_read_paths_consistent() {
        let pipeline = pipeline(0.9, RiskClass::High);
        pipeline
            .submit(
                &ContentSubmission::new("text", "feed-1")
                    .with_metadata(SubmissionMetadata {
                        platform: None,
                        region: None,
                        actor_id: Some("a1".to_string()),
                    })
                    .with_tags(&["election"]),
            )
            .unwrap();

        let summary = pipeline.summary();
        let feed = pipeline.threat_intel_feed();
        let payload = pipeline.siem_payload();
        assert_eq!(summary.node_count, feed.graph_summary.node_count);
        assert_eq!(summary.node_count, payload.node_count);
    }
}
