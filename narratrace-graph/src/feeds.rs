//! Feed builders - outward-facing report shapes
//!
//! Both feeds recompute nothing themselves; they package a freshly built
//! summary. The threat-intel feed carries a content-addressed fingerprint:
//! a SHA-256 digest over the canonical (sorted-key) JSON serialization of
//! the summary, stable across calls while the graph is unchanged.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::summary::{CoordinationAlert, GraphSummary, PropagationChain};

/// Threat-intelligence feed for downstream sharing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreatIntelFeed {
    pub generated_at: DateTime<Utc>,
    pub graph_summary: GraphSummary,
    /// Sorted, deduplicated node ids referenced by the summary's
    /// high-risk list, clusters and alerts
    pub indicators: Vec<String>,
    /// SHA-256 hex digest of the canonical summary serialization
    pub dataset_fingerprint: String,
}

/// Correlation payload for SIEM integration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiemPayload {
    pub generated_at: DateTime<Utc>,
    pub alerts: Vec<CoordinationAlert>,
    pub propagation_chains: Vec<PropagationChain>,
    /// Sorted cluster ids and alert actor ids
    pub correlation_keys: Vec<String>,
    pub node_count: usize,
}

/// Canonical fingerprint of a summary
///
/// `serde_json`'s default map is a `BTreeMap`, so object keys serialize
/// sorted and the digest is stable for identical summaries.
pub fn dataset_fingerprint(summary: &GraphSummary) -> String {
    let canonical = serde_json::to_value(summary)
        .map(|v| v.to_string())
        .unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Package a summary as a threat-intel feed
pub fn build_threat_intel_feed(summary: GraphSummary) -> ThreatIntelFeed {
    let mut indicators: BTreeSet<String> = BTreeSet::new();

    indicators.extend(summary.high_risk_actors.iter().cloned());
    for cluster in &summary.gnn_clusters {
        indicators.extend(cluster.actors.iter().cloned());
        indicators.extend(cluster.narratives.iter().cloned());
        indicators.extend(cluster.content.iter().cloned());
    }
    for alert in &summary.coordination_alerts {
        indicators.insert(alert.actor_id.clone());
        indicators.extend(alert.peers.iter().cloned());
    }

    let dataset_fingerprint = dataset_fingerprint(&summary);
    ThreatIntelFeed {
        generated_at: Utc::now(),
        graph_summary: summary,
        indicators: indicators.into_iter().collect(),
        dataset_fingerprint,
    }
}

/// Package a summary as a SIEM correlation payload
pub fn build_siem_payload(summary: GraphSummary) -> SiemPayload {
    let mut keys: BTreeSet<String> = BTreeSet::new();
    for cluster in &summary.gnn_clusters {
        keys.insert(cluster.cluster_id.clone());
    }
    for alert in &summary.coordination_alerts {
        keys.insert(alert.actor_id.clone());
    }

    SiemPayload {
        generated_at: Utc::now(),
        alerts: summary.coordination_alerts,
        propagation_chains: summary.propagation_chains,
        correlation_keys: keys.into_iter().collect(),
        node_count: summary.node_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::GraphIntelEngine;
    use narratrace_core::{ContentSubmission, RiskAssessment, RiskClass, SubmissionMetadata};

    fn seeded_engine() -> GraphIntelEngine {
        let mut engine = GraphIntelEngine::new();
        for (intake, actor, tag) in [("c1", "a1", "election"), ("c2", "a2", "election")] {
            engine.ingest(
                intake,
                &ContentSubmission::new("text", "feed-1")
                    .with_metadata(SubmissionMetadata {
                        platform: Some("telegram".to_string()),
                        region: None,
                        actor_id: Some(actor.to_string()),
                    })
                    .with_tags(&[tag]),
                &RiskAssessment::new(0.85, RiskClass::High),
            );
        }
        engine
    }

    #[test]
    fn test_fingerprint_stable_without_ingest() {
        let engine = seeded_engine();
        let first = engine.threat_intel_feed();
        let second = engine.threat_intel_feed();
        assert_eq!(first.dataset_fingerprint, second.dataset_fingerprint);
        assert_eq!(first.dataset_fingerprint.len(), 64);
    }

    #[test]
    fn test_fingerprint_changes_after_ingest() {
        let mut engine = seeded_engine();
        let before = engine.threat_intel_feed().dataset_fingerprint;
        engine.ingest(
            "c3",
            &ContentSubmission::new("new text", "feed-2"),
            &RiskAssessment::new(0.2, RiskClass::Low),
        );
        let after = engine.threat_intel_feed().dataset_fingerprint;
        assert_ne!(before, after);
    }

    #[test]
    fn test_indicators_sorted_and_deduplicated() {
        let engine = seeded_engine();
        let feed = engine.threat_intel_feed();
        assert!(!feed.indicators.is_empty());
        let mut sorted = feed.indicators.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(feed.indicators, sorted);
        assert!(feed.indicators.contains(&"actor::a1".to_string()));
    }

    #[test]
    fn test_siem_correlation_keys() {
        let engine = seeded_engine();
        let payload = engine.siem_payload();
        assert_eq!(payload.node_count, engine.store().node_count());
        assert!(payload
            .correlation_keys
            .contains(&"actor::a1".to_string()));
        assert_eq!(payload.alerts.len(), 2);
        let mut sorted = payload.correlation_keys.clone();
        sorted.sort();
        assert_eq!(payload.correlation_keys, sorted);
    }
}
