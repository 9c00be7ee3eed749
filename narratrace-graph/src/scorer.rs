//! Message-passing scorer ("GNN projection")
//!
//! Two-hop linear message passing over the projected feature and adjacency
//! matrices. No training anywhere: the weight vectors are fixed, hand-tuned
//! constants. The output is a propagation-aware per-node score in (0, 1)
//! that folds in a node's 1-hop neighborhood and a damped 2-hop context.
//!
//! The numeric backend is pluggable: the dense `ndarray` backend is the
//! default, and a disabled backend yields an empty projection so every
//! downstream view degrades to its raw-score fallback.

use ndarray::{Array1, Array2, Axis};
use narratrace_core::ScorerWeights;

use crate::projection::Projection;

/// Numeric backend for the message-passing scorer
pub trait ScoreBackend: Send + Sync {
    /// Per-node scores aligned with `projection.order`; empty when the
    /// backend cannot score (callers must fall back to raw scores)
    fn propagate(&self, projection: &Projection, weights: &ScorerWeights) -> Vec<f64>;
}

/// Dense matrix backend
#[derive(Debug, Clone, Default)]
pub struct DenseBackend;

/// Backend stand-in for environments without numeric support; always
/// returns an empty score vector
#[derive(Debug, Clone, Default)]
pub struct DisabledBackend;

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Row-wise division by the degree vector (degrees floored to 1)
fn mean_over_neighbors(aggregated: &mut Array2<f64>, degree: &Array1<f64>) {
    for (mut row, &d) in aggregated.axis_iter_mut(Axis(0)).zip(degree.iter()) {
        row.mapv_inplace(|v| v / d);
    }
}

impl ScoreBackend for DenseBackend {
    fn propagate(&self, projection: &Projection, weights: &ScorerWeights) -> Vec<f64> {
        if projection.is_empty() {
            return Vec::new();
        }

        let adjacency = &projection.adjacency;
        let features = &projection.features;
        let degree: Array1<f64> = adjacency.sum_axis(Axis(1)).mapv(|d| d.max(1.0));

        // 1-hop mean neighbor features
        let mut neighbor_feat = adjacency.dot(features);
        mean_over_neighbors(&mut neighbor_feat, &degree);

        // 2-hop mean of the 1-hop means
        let mut context_feat = adjacency.dot(&neighbor_feat);
        mean_over_neighbors(&mut context_feat, &degree);

        let w_feature = Array1::from(weights.feature.to_vec());
        let w_neighbor = Array1::from(weights.neighbor.to_vec());

        let base = features.dot(&w_feature);
        let neighbor_effect = neighbor_feat.dot(&w_neighbor);
        let context_effect = context_feat
            .dot(&w_neighbor)
            .mapv(|v| v * weights.context_damping);

        let logit = &base + &neighbor_effect + &context_effect;
        logit.iter().map(|&x| sigmoid(x + weights.bias)).collect()
    }
}

impl ScoreBackend for DisabledBackend {
    fn propagate(&self, _projection: &Projection, _weights: &ScorerWeights) -> Vec<f64> {
        Vec::new()
    }
}
