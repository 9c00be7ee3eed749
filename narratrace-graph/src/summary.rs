//! Analyst-facing summary shapes produced by a summarise pass

use serde::{Deserialize, Serialize};

/// One connected component containing at least one actor, content or
/// narrative node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunitySnapshot {
    /// Actor node ids in the component
    pub actors: Vec<String>,
    /// Content node ids in the component
    pub content: Vec<String>,
    /// Narrative tag names, prefix stripped
    pub narratives: Vec<String>,
    /// Region codes, prefix stripped
    pub regions: Vec<String>,
    /// Mean GNN score over the component, 3 decimals, 0 for unscored nodes
    pub avg_gnn_score: f64,
}

/// A score-thresholded community surfaced as a cluster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GnnCluster {
    /// `cluster-<ordinal>` in component discovery order
    pub cluster_id: String,
    /// Mean GNN score of the component, 3 decimals
    pub score: f64,
    pub actors: Vec<String>,
    pub narratives: Vec<String>,
    pub content: Vec<String>,
}

/// An actor whose published content overlaps with another actor's via
/// shared narrative tags
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinationAlert {
    pub actor_id: String,
    /// Max of the actor's own GNN score and its peers' scores
    pub risk: f64,
    /// Other actors sharing at least one content node
    pub peers: Vec<String>,
    /// Narrative tags reached through the shared content, prefix stripped
    pub shared_tags: Vec<String>,
    /// Sorted distinct platforms of the content neighbors
    pub platforms: Vec<String>,
}

/// A hypothesized narrative-spread route: actor → content → narrative → actor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropagationChain {
    /// Tag name of the narrative being spread, prefix stripped
    pub narrative: String,
    /// Four node ids along the route
    pub path: Vec<String>,
    /// Mean GNN score along the path, capped at 0.99
    pub likelihood: f64,
}

/// Full output of one summarise pass over the graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSummary {
    pub node_count: usize,
    pub edge_count: usize,
    pub high_risk_actors: Vec<String>,
    pub communities: Vec<CommunitySnapshot>,
    pub gnn_clusters: Vec<GnnCluster>,
    pub coordination_alerts: Vec<CoordinationAlert>,
    pub propagation_chains: Vec<PropagationChain>,
}

impl GraphSummary {
    /// Summary of an empty graph
    pub fn empty() -> Self {
        Self {
            node_count: 0,
            edge_count: 0,
            high_risk_actors: Vec::new(),
            communities: Vec::new(),
            gnn_clusters: Vec::new(),
            coordination_alerts: Vec::new(),
            propagation_chains: Vec::new(),
        }
    }
}
