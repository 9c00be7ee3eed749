//! Feature projection and adjacency build
//!
//! Projects the current full node set into an N×5 feature matrix and an
//! N×N symmetric 0/1 adjacency matrix. Node ordering is the arena order,
//! stable for the duration of one summarise pass; downstream consumers
//! look scores up by node id once the pass is done, so ordering across
//! passes is free to change as the graph grows.

use ndarray::Array2;
use narratrace_core::{
    RiskClass, SEVERITY_CLASS_WEIGHT, SEVERITY_PLATFORM_WEIGHT, SEVERITY_SCORE_WEIGHT,
};

use crate::store::{GraphStore, NodeAttrs, NodeHandle, NodeKind};

/// Dense projection of the graph for one summarise pass
#[derive(Debug, Clone)]
pub struct Projection {
    /// Node handles in matrix row order
    pub order: Vec<NodeHandle>,
    /// N×5: is-actor, is-content, is-narrative, is-region, severity
    pub features: Array2<f64>,
    /// N×N symmetric 0/1 adjacency, no self-loops
    pub adjacency: Array2<f64>,
}

impl Projection {
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Blended severity of a single node
///
/// `0.7*score + 0.3*class_weight + 0.2*platform_density`, where missing
/// scores are neutral zeros, missing classifications weigh 0.4, and
/// platform density is `min(1, platforms/3)` for actors and zero otherwise.
fn severity(store: &GraphStore, handle: NodeHandle) -> f64 {
    let node = store.node(handle);
    let score = node.risk_score().unwrap_or(0.0);
    let class_weight = RiskClass::weight_or_neutral(node.classification());
    let density = match &node.attrs {
        NodeAttrs::Actor(actor) => (actor.platforms.len() as f64 / 3.0).min(1.0),
        _ => 0.0,
    };
    SEVERITY_SCORE_WEIGHT * score
        + SEVERITY_CLASS_WEIGHT * class_weight
        + SEVERITY_PLATFORM_WEIGHT * density
}

/// Build the projection over the store's current node set
pub fn build_projection(store: &GraphStore) -> Projection {
    let order: Vec<NodeHandle> = store.handles().collect();
    let n = order.len();

    let mut features = Array2::zeros((n, 5));
    for (row, &handle) in order.iter().enumerate() {
        let kind_col = match store.node(handle).kind {
            NodeKind::Actor => 0,
            NodeKind::Content => 1,
            NodeKind::Narrative => 2,
            NodeKind::Region => 3,
        };
        features[[row, kind_col]] = 1.0;
        features[[row, 4]] = severity(store, handle);
    }

    let mut adjacency = Array2::zeros((n, n));
    for (row, &handle) in order.iter().enumerate() {
        for &neighbor in store.neighbors(handle) {
            adjacency[[row, neighbor.index()]] = 1.0;
            adjacency[[neighbor.index(), row]] = 1.0;
        }
    }

    Projection {
        order,
        features,
        adjacency,
    }
}
