//! Engine configuration
//!
//! All scorer weights are fixed, hand-tuned constants; there is no training
//! loop anywhere in the system. Limits mirror what analyst-facing views can
//! usefully display.

use serde::{Deserialize, Serialize};

use crate::HISTORY_WINDOW;

/// Weights for the two-hop message-passing scorer
///
/// Feature dimensions, in order: is-actor, is-content, is-narrative,
/// is-region, blended severity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorerWeights {
    /// Applied to a node's own feature vector
    pub feature: [f64; 5],
    /// Applied to the 1-hop mean neighbor features
    pub neighbor: [f64; 5],
    /// Damping factor for the 2-hop context term
    pub context_damping: f64,
    /// Scalar bias added to the logit
    pub bias: f64,
}

impl Default for ScorerWeights {
    fn default() -> Self {
        Self {
            feature: [0.55, 1.05, 0.35, 0.1, 1.8],
            neighbor: [0.45, 0.9, 0.65, 0.15, 1.4],
            context_damping: 0.5,
            bias: -1.1,
        }
    }
}

/// Truncation limits for the analytics views
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewLimits {
    /// Top-risk actors returned
    pub top_actors: usize,
    /// GNN clusters returned
    pub clusters: usize,
    /// Members retained per cluster list
    pub cluster_members: usize,
    /// Coordination alerts returned
    pub alerts: usize,
    /// Peers and shared tags retained per alert
    pub alert_members: usize,
    /// Propagation chains returned across all narratives
    pub chains: usize,
}

impl Default for ViewLimits {
    fn default() -> Self {
        Self {
            top_actors: 5,
            clusters: 5,
            cluster_members: 10,
            alerts: 10,
            alert_members: 5,
            chains: 5,
        }
    }
}

/// Configuration for the graph intelligence engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Bounded length of each actor's score history
    pub history_window: usize,
    /// Minimum mean GNN score for a component to surface as a cluster
    pub cluster_threshold: f64,
    /// Message-passing weights
    pub scorer: ScorerWeights,
    /// View truncation limits
    pub limits: ViewLimits,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_window: HISTORY_WINDOW,
            cluster_threshold: 0.35,
            scorer: ScorerWeights::default(),
            limits: ViewLimits::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.history_window, 20);
        assert_eq!(config.cluster_threshold, 0.35);
        assert_eq!(config.limits.chains, 5);
        assert_eq!(config.scorer.context_damping, 0.5);
    }
}
