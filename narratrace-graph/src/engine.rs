//! Graph intelligence engine facade
//!
//! Owns the graph store and runs the full summarise pass:
//! projection → message-passing scores → analytics views. Ingest mutates
//! the store and returns a fresh summary computed from the updated graph;
//! read-only queries rerun the same pass against current state. Nothing is
//! cached between passes beyond the graph itself.

use chrono::Utc;
use tracing::debug;

use narratrace_core::{
    ActorRef, ActorResolver, BucketResolver, ContentSubmission, EngineConfig, RiskAssessment,
};

use crate::analytics;
use crate::feeds::{self, SiemPayload, ThreatIntelFeed};
use crate::projection::build_projection;
use crate::scorer::{DenseBackend, ScoreBackend};
use crate::store::{ContentAttrs, GraphStore, Relation};
use crate::summary::GraphSummary;

/// Result of one ingest call
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    /// Resolved publishing actor; `anonymous` marks weak attribution
    pub actor: ActorRef,
    /// Summary recomputed from the updated graph
    pub summary: GraphSummary,
}

/// The graph intelligence engine
///
/// Single-writer: callers must serialize `ingest` and the read queries
/// behind one exclusive section (see `narratrace-pipeline`).
pub struct GraphIntelEngine {
    store: GraphStore,
    config: EngineConfig,
    backend: Box<dyn ScoreBackend>,
    resolver: Box<dyn ActorResolver>,
}

impl GraphIntelEngine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            store: GraphStore::with_history_window(config.history_window),
            config,
            backend: Box::new(DenseBackend),
            resolver: Box::new(BucketResolver::default()),
        }
    }

    /// Swap the numeric backend (e.g. `DisabledBackend` where matrix
    /// support is unavailable; every view falls back to raw scores)
    pub fn with_backend(mut self, backend: Box<dyn ScoreBackend>) -> Self {
        self.backend = backend;
        self
    }

    /// Swap the anonymous-actor resolution strategy
    pub fn with_resolver(mut self, resolver: Box<dyn ActorResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    /// Ingest one scored submission into the graph
    ///
    /// Creates the immutable content node, upserts the actor (history,
    /// average, platforms, last-seen), links narrative tags and the origin
    /// region, then returns a full summary of the updated graph. Atomic
    /// with respect to the graph; never removes existing data.
    pub fn ingest(
        &mut self,
        intake_id: &str,
        submission: &ContentSubmission,
        assessment: &RiskAssessment,
    ) -> IngestOutcome {
        let now = Utc::now();

        let actor = match submission.actor_id() {
            Some(actor_id) => ActorRef::attributed(actor_id),
            None => self.resolver.resolve(&submission.source),
        };

        let content = self.store.insert_content(
            intake_id,
            ContentAttrs {
                score: assessment.composite_score,
                classification: assessment.classification,
                observed_at: now,
                platform: submission.platform().map(str::to_string),
                source: submission.source.clone(),
            },
        );

        let actor_handle = self.store.upsert_actor(
            &actor.id,
            assessment.composite_score,
            submission.platform(),
            now,
        );
        self.store.add_edge(actor_handle, content, Relation::Published);

        for tag in &submission.tags {
            let narrative = self.store.upsert_narrative(tag);
            self.store.add_edge(content, narrative, Relation::Targets);
        }

        if let Some(region) = submission.region() {
            let region_handle = self.store.upsert_region(region);
            self.store.add_edge(actor_handle, region_handle, Relation::Origin);
        }

        debug!(
            intake_id,
            actor = %actor.id,
            anonymous = actor.anonymous,
            score = assessment.composite_score,
            nodes = self.store.node_count(),
            "submission ingested"
        );

        IngestOutcome {
            actor,
            summary: self.summarise(),
        }
    }

    /// Summary of the current graph state
    pub fn summary(&self) -> GraphSummary {
        self.summarise()
    }

    /// Threat-intel feed over a fresh summary
    pub fn threat_intel_feed(&self) -> ThreatIntelFeed {
        feeds::build_threat_intel_feed(self.summarise())
    }

    /// SIEM correlation payload over a fresh summary
    pub fn siem_payload(&self) -> SiemPayload {
        feeds::build_siem_payload(self.summarise())
    }

    fn summarise(&self) -> GraphSummary {
        if self.store.node_count() == 0 {
            return GraphSummary::empty();
        }

        let projection = build_projection(&self.store);
        let scores = self.backend.propagate(&projection, &self.config.scorer);
        debug!(
            nodes = self.store.node_count(),
            edges = self.store.edge_count(),
            scored = scores.len(),
            "summarise pass"
        );

        let limits = &self.config.limits;
        GraphSummary {
            node_count: self.store.node_count(),
            edge_count: self.store.edge_count(),
            high_risk_actors: analytics::top_risk_actors(&self.store, &scores, limits.top_actors),
            communities: analytics::community_snapshots(&self.store, &scores),
            gnn_clusters: analytics::gnn_clusters(
                &self.store,
                &scores,
                self.config.cluster_threshold,
                limits,
            ),
            coordination_alerts: analytics::coordination_alerts(&self.store, &scores, limits),
            propagation_chains: analytics::propagation_chains(&self.store, &scores, limits.chains),
        }
    }
}

impl Default for GraphIntelEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorer::DisabledBackend;
    use narratrace_core::{RiskClass, SubmissionMetadata};

    fn submission(source: &str, actor: Option<&str>, tags: &[&str]) -> ContentSubmission {
        ContentSubmission::new("suspicious text", source)
            .with_metadata(SubmissionMetadata {
                platform: Some("telegram".to_string()),
                region: Some("EE".to_string()),
                actor_id: actor.map(str::to_string),
            })
            .with_tags(tags)
    }

    #[test]
    fn test_empty_graph_summary() {
        let engine = GraphIntelEngine::new();
        let summary = engine.summary();
        assert_eq!(summary.node_count, 0);
        assert_eq!(summary.edge_count, 0);
        assert!(summary.high_risk_actors.is_empty());
        assert!(summary.communities.is_empty());
        assert!(summary.gnn_clusters.is_empty());
        assert!(summary.coordination_alerts.is_empty());
        assert!(summary.propagation_chains.is_empty());
    }

    #[test]
    fn test_ingest_builds_expected_topology() {
        let mut engine = GraphIntelEngine::new();
        let outcome = engine.ingest(
            "c1",
            &submission("feed-1", Some("troll-77"), &["election"]),
            &RiskAssessment::new(0.82, RiskClass::High),
        );

        assert_eq!(outcome.actor.id, "actor::troll-77");
        assert!(!outcome.actor.anonymous);
        // content + actor + narrative + region
        assert_eq!(outcome.summary.node_count, 4);
        // published + targets + origin
        assert_eq!(outcome.summary.edge_count, 3);
        assert_eq!(outcome.summary.high_risk_actors, ["actor::troll-77"]);
        assert_eq!(outcome.summary.communities.len(), 1);
        assert_eq!(outcome.summary.communities[0].regions, ["EE"]);
    }

    #[test]
    fn test_unattributed_submission_gets_anonymous_actor() {
        let mut engine = GraphIntelEngine::new();
        let first = engine.ingest(
            "c1",
            &ContentSubmission::new("text", "feed-9"),
            &RiskAssessment::new(0.5, RiskClass::Medium),
        );
        let second = engine.ingest(
            "c2",
            &ContentSubmission::new("more text", "feed-9"),
            &RiskAssessment::new(0.6, RiskClass::Medium),
        );

        assert!(first.actor.anonymous);
        // Same source resolves to the same pseudo-actor
        assert_eq!(first.actor.id, second.actor.id);
        assert_eq!(engine.store().nodes_by_kind(crate::store::NodeKind::Actor).len(), 1);
    }

    #[test]
    fn test_repeat_ingest_same_content_id_does_not_duplicate() {
        let mut engine = GraphIntelEngine::new();
        let sub = submission("feed-1", Some("troll-77"), &[]);
        let assessment = RiskAssessment::new(0.5, RiskClass::Medium);
        let first = engine.ingest("c1", &sub, &assessment);
        let second = engine.ingest("c1", &sub, &assessment);
        assert_eq!(first.summary.node_count, second.summary.node_count);
        assert_eq!(first.summary.edge_count, second.summary.edge_count);
    }

    #[test]
    fn test_disabled_backend_still_summarises() {
        let mut engine = GraphIntelEngine::new().with_backend(Box::new(DisabledBackend));
        let outcome = engine.ingest(
            "c1",
            &submission("feed-1", Some("troll-77"), &["election"]),
            &RiskAssessment::new(0.9, RiskClass::High),
        );
        // Raw-score fallback still surfaces the actor
        assert_eq!(outcome.summary.high_risk_actors, ["actor::troll-77"]);
        assert_eq!(outcome.summary.communities[0].avg_gnn_score, 0.0);
    }

    #[test]
    fn test_gnn_scores_reflected_in_summary() {
        let mut engine = GraphIntelEngine::new();
        let outcome = engine.ingest(
            "c1",
            &submission("feed-1", Some("troll-77"), &["election"]),
            &RiskAssessment::new(0.9, RiskClass::High),
        );
        let community = &outcome.summary.communities[0];
        assert!(community.avg_gnn_score > 0.0 && community.avg_gnn_score < 1.0);
    }
}
