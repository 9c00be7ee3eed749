//! Analytics views - pure reducers over the store and the GNN projection
//!
//! Every reducer tolerates an empty graph, nodes missing expected
//! attributes, and an absent score vector (disabled backend). Orderings are
//! deterministic: descending score with ascending id as the tie-break.

use std::collections::BTreeSet;

use crate::store::{GraphStore, NodeAttrs, NodeHandle, NodeKind};
use crate::summary::{CommunitySnapshot, CoordinationAlert, GnnCluster, PropagationChain};
use narratrace_core::ViewLimits;

/// GNN score of a node within the current pass, if the backend produced one
fn gnn(scores: &[f64], handle: NodeHandle) -> Option<f64> {
    scores.get(handle.index()).copied()
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Sort (score, id) pairs descending by score, ascending by id
fn sort_ranked(ranked: &mut [(String, f64)]) {
    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
}

/// Top-risk actors: blend of raw neighbor content scores and the actor's
/// own GNN score, defaulting to the raw mean when the backend is absent
pub fn top_risk_actors(store: &GraphStore, scores: &[f64], limit: usize) -> Vec<String> {
    let mut ranked: Vec<(String, f64)> = Vec::new();

    for actor in store.nodes_by_kind(NodeKind::Actor) {
        let neighbor_scores: Vec<f64> = store
            .neighbors(actor)
            .iter()
            .filter(|&&n| store.node(n).kind == NodeKind::Content)
            .filter_map(|&n| store.node(n).risk_score())
            .collect();
        if neighbor_scores.is_empty() {
            continue;
        }
        let mean = neighbor_scores.iter().sum::<f64>() / neighbor_scores.len() as f64;
        let actor_gnn = gnn(scores, actor).unwrap_or(mean);
        let combined = 0.6 * mean + 0.4 * actor_gnn;
        ranked.push((store.node(actor).id.clone(), combined));
    }

    sort_ranked(&mut ranked);
    ranked.into_iter().take(limit).map(|(id, _)| id).collect()
}

/// Component members partitioned by kind, plus the component's mean score
struct ComponentView {
    actors: Vec<String>,
    content: Vec<String>,
    narratives: Vec<String>,
    regions: Vec<String>,
    mean_score: f64,
}

fn component_view(store: &GraphStore, scores: &[f64], members: &[NodeHandle]) -> ComponentView {
    let mut view = ComponentView {
        actors: Vec::new(),
        content: Vec::new(),
        narratives: Vec::new(),
        regions: Vec::new(),
        mean_score: 0.0,
    };
    let mut total = 0.0;
    for &handle in members {
        let node = store.node(handle);
        // Unscored nodes contribute 0 to the mean
        total += gnn(scores, handle).unwrap_or(0.0);
        match node.kind {
            NodeKind::Actor => view.actors.push(node.id.clone()),
            NodeKind::Content => view.content.push(node.id.clone()),
            NodeKind::Narrative => view.narratives.push(node.local_name().to_string()),
            NodeKind::Region => view.regions.push(node.local_name().to_string()),
        }
    }
    view.mean_score = total / members.len().max(1) as f64;
    view
}

/// Community snapshots: one entry per connected component holding at least
/// one actor, content or narrative node
pub fn community_snapshots(store: &GraphStore, scores: &[f64]) -> Vec<CommunitySnapshot> {
    let mut communities = Vec::new();
    for component in store.connected_components() {
        let view = component_view(store, scores, &component);
        if view.actors.is_empty() && view.content.is_empty() && view.narratives.is_empty() {
            continue;
        }
        communities.push(CommunitySnapshot {
            actors: view.actors,
            content: view.content,
            narratives: view.narratives,
            regions: view.regions,
            avg_gnn_score: round3(view.mean_score),
        });
    }
    communities
}

/// GNN clusters: the same component partition thresholded on mean score,
/// member lists truncated, labeled in discovery order
pub fn gnn_clusters(
    store: &GraphStore,
    scores: &[f64],
    threshold: f64,
    limits: &ViewLimits,
) -> Vec<GnnCluster> {
    let mut clusters = Vec::new();
    let mut ordinal = 0usize;

    for component in store.connected_components() {
        let view = component_view(store, scores, &component);
        if view.actors.is_empty() && view.content.is_empty() && view.narratives.is_empty() {
            continue;
        }
        if view.mean_score < threshold {
            continue;
        }
        ordinal += 1;
        let truncate = |mut list: Vec<String>| {
            list.truncate(limits.cluster_members);
            list
        };
        clusters.push(GnnCluster {
            cluster_id: format!("cluster-{ordinal}"),
            score: round3(view.mean_score),
            actors: truncate(view.actors),
            narratives: truncate(view.narratives.iter().map(|t| format!("narrative::{t}")).collect()),
            content: truncate(view.content),
        });
    }

    clusters.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.cluster_id.cmp(&b.cluster_id))
    });
    clusters.truncate(limits.clusters);
    clusters
}

/// Coordination alerts: actors whose published content overlaps, via
/// shared narrative tags, with at least one other actor's content
pub fn coordination_alerts(
    store: &GraphStore,
    scores: &[f64],
    limits: &ViewLimits,
) -> Vec<CoordinationAlert> {
    let mut alerts = Vec::new();

    for actor in store.nodes_by_kind(NodeKind::Actor) {
        let contents: Vec<NodeHandle> = store
            .neighbors(actor)
            .iter()
            .copied()
            .filter(|&n| store.node(n).kind == NodeKind::Content)
            .collect();
        if contents.is_empty() {
            continue;
        }

        let mut peers: BTreeSet<NodeHandle> = BTreeSet::new();
        let mut tag_handles: BTreeSet<NodeHandle> = BTreeSet::new();
        let mut platforms: BTreeSet<String> = BTreeSet::new();

        for &content in &contents {
            if let NodeAttrs::Content(attrs) = &store.node(content).attrs {
                if let Some(platform) = &attrs.platform {
                    platforms.insert(platform.clone());
                }
            }
            for &other in store.neighbors(content) {
                match store.node(other).kind {
                    // Co-publishers of the same content node
                    NodeKind::Actor if other != actor => {
                        peers.insert(other);
                    }
                    NodeKind::Narrative => {
                        tag_handles.insert(other);
                    }
                    _ => {}
                }
            }
        }

        // Actors reached through the shared narratives are peers too:
        // overlapping tags are the coordination signal
        for &tag in &tag_handles {
            for &shared_content in store.neighbors(tag) {
                if store.node(shared_content).kind != NodeKind::Content {
                    continue;
                }
                for &other in store.neighbors(shared_content) {
                    if store.node(other).kind == NodeKind::Actor && other != actor {
                        peers.insert(other);
                    }
                }
            }
        }

        let tags: BTreeSet<String> = tag_handles
            .iter()
            .map(|&t| store.node(t).local_name().to_string())
            .collect();

        // Both a peer actor and a shared tag are required for an alert
        if peers.is_empty() || tags.is_empty() {
            continue;
        }

        let own = gnn(scores, actor).unwrap_or(0.0);
        let peer_max = peers
            .iter()
            .map(|&p| gnn(scores, p).unwrap_or(0.0))
            .fold(0.0, f64::max);

        let mut peer_ids: Vec<String> =
            peers.iter().map(|&p| store.node(p).id.clone()).collect();
        peer_ids.sort();
        peer_ids.truncate(limits.alert_members);
        let mut tag_names: Vec<String> = tags.into_iter().collect();
        tag_names.truncate(limits.alert_members);

        let platforms = if platforms.is_empty() {
            vec!["unknown".to_string()]
        } else {
            platforms.into_iter().collect()
        };

        alerts.push(CoordinationAlert {
            actor_id: store.node(actor).id.clone(),
            risk: own.max(peer_max),
            peers: peer_ids,
            shared_tags: tag_names,
            platforms,
        });
    }

    alerts.sort_by(|a, b| {
        b.risk
            .partial_cmp(&a.risk)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.actor_id.cmp(&b.actor_id))
    });
    alerts.truncate(limits.alerts);
    alerts
}

/// Propagation chains: 4-hop actor → content → narrative → actor routes
/// for narratives spread by at least two actors
pub fn propagation_chains(store: &GraphStore, scores: &[f64], limit: usize) -> Vec<PropagationChain> {
    let mut chains = Vec::new();

    'narratives: for narrative in store.nodes_by_kind(NodeKind::Narrative) {
        let contents: Vec<NodeHandle> = store
            .neighbors(narrative)
            .iter()
            .copied()
            .filter(|&n| store.node(n).kind == NodeKind::Content)
            .collect();
        if contents.is_empty() {
            continue;
        }

        let mut actor_set: BTreeSet<NodeHandle> = BTreeSet::new();
        for &content in &contents {
            for &other in store.neighbors(content) {
                if store.node(other).kind == NodeKind::Actor {
                    actor_set.insert(other);
                }
            }
        }
        if actor_set.len() < 2 {
            continue;
        }

        let mut ranked: Vec<(NodeHandle, f64)> = actor_set
            .into_iter()
            .map(|a| (a, gnn(scores, a).unwrap_or(0.0)))
            .collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| store.node(a.0).id.cmp(&store.node(b.0).id))
        });

        let top = ranked[0].0;
        let second = ranked.get(1).map(|&(h, _)| h).unwrap_or(top);

        for &content in contents.iter().take(2) {
            let endpoint_scores = [
                gnn(scores, content).unwrap_or(0.0),
                gnn(scores, narrative).unwrap_or(0.0),
                gnn(scores, top).unwrap_or(0.0),
                gnn(scores, second).unwrap_or(0.0),
            ];
            let likelihood =
                (endpoint_scores.iter().sum::<f64>() / endpoint_scores.len() as f64).min(0.99);

            chains.push(PropagationChain {
                narrative: store.node(narrative).local_name().to_string(),
                path: vec![
                    store.node(top).id.clone(),
                    store.node(content).id.clone(),
                    store.node(narrative).id.clone(),
                    store.node(second).id.clone(),
                ],
                likelihood: round3(likelihood),
            });
            if chains.len() >= limit {
                break 'narratives;
            }
        }
    }

    chains
}
