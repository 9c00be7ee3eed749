//! Graph store - arena of typed nodes plus an undirected labeled edge set
//!
//! Nodes live in a flat arena indexed by integer handle; a side map resolves
//! the structured string ids (`kind::localid`) used across the API. The
//! graph grows monotonically: no operation deletes a node or an edge, and
//! re-inserting an existing edge is a no-op.

use std::collections::{BTreeSet, HashMap, VecDeque};

use chrono::{DateTime, Utc};
use narratrace_core::{RiskClass, HISTORY_WINDOW};

/// Integer handle into the node arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeHandle(usize);

impl NodeHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Typed category of a graph vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Actor,
    Content,
    Narrative,
    Region,
}

impl NodeKind {
    /// Id prefix for this kind, without the trailing separator
    pub fn prefix(&self) -> &'static str {
        match self {
            NodeKind::Actor => "actor",
            NodeKind::Content => "content",
            NodeKind::Narrative => "narrative",
            NodeKind::Region => "region",
        }
    }
}

/// Relation label on an undirected edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// actor — content
    Published,
    /// content — narrative
    Targets,
    /// actor — region
    Origin,
}

/// Attributes of an immutable content node
#[derive(Debug, Clone)]
pub struct ContentAttrs {
    /// Externally computed composite risk score in [0, 1]
    pub score: f64,
    /// Classification band from the scoring subsystem
    pub classification: RiskClass,
    /// Observation timestamp
    pub observed_at: DateTime<Utc>,
    /// Platform the content appeared on
    pub platform: Option<String>,
    /// Collecting source identifier
    pub source: String,
}

/// Rolling attributes of an actor node
#[derive(Debug, Clone)]
pub struct ActorAttrs {
    /// Most recent composite scores, oldest first, bounded window
    pub history: VecDeque<f64>,
    /// Running average over the retained window
    pub average: f64,
    /// Distinct platforms observed, sorted for determinism
    pub platforms: BTreeSet<String>,
    /// Last ingest that referenced this actor
    pub last_seen: DateTime<Utc>,
}

/// Kind-specific node attributes
#[derive(Debug, Clone)]
pub enum NodeAttrs {
    Content(ContentAttrs),
    Actor(ActorAttrs),
    Narrative { tag: String },
    Region { code: String },
}

/// A vertex in the intelligence graph
#[derive(Debug, Clone)]
pub struct Node {
    /// Structured id: `kind::localid`
    pub id: String,
    pub kind: NodeKind,
    pub attrs: NodeAttrs,
}

impl Node {
    /// Risk score carried by the node, if its kind has one
    pub fn risk_score(&self) -> Option<f64> {
        match &self.attrs {
            NodeAttrs::Content(c) => Some(c.score),
            NodeAttrs::Actor(a) => Some(a.average),
            _ => None,
        }
    }

    /// Classification band, content nodes only
    pub fn classification(&self) -> Option<RiskClass> {
        match &self.attrs {
            NodeAttrs::Content(c) => Some(c.classification),
            _ => None,
        }
    }

    /// Local part of the id, with the kind prefix stripped
    pub fn local_name(&self) -> &str {
        self.id
            .strip_prefix(self.kind.prefix())
            .and_then(|rest| rest.strip_prefix("::"))
            .unwrap_or(&self.id)
    }
}

/// In-memory graph over actors, content, narratives and regions
///
/// Single-writer: mutation happens only during ingest and must never run
/// concurrently with a read, because the reducers iterate the arena and
/// adjacency lists without copy-on-read protection.
#[derive(Debug, Clone)]
pub struct GraphStore {
    nodes: Vec<Node>,
    index: HashMap<String, NodeHandle>,
    adjacency: Vec<Vec<NodeHandle>>,
    relations: HashMap<(usize, usize), Relation>,
    history_window: usize,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::with_history_window(HISTORY_WINDOW)
    }

    pub fn with_history_window(history_window: usize) -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            adjacency: Vec::new(),
            relations: HashMap::new(),
            history_window: history_window.max(1),
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.relations.len()
    }

    pub fn node(&self, handle: NodeHandle) -> &Node {
        &self.nodes[handle.0]
    }

    /// Resolve a structured id to its handle
    pub fn lookup(&self, id: &str) -> Option<NodeHandle> {
        self.index.get(id).copied()
    }

    /// All handles in arena (insertion) order
    pub fn handles(&self) -> impl Iterator<Item = NodeHandle> + '_ {
        (0..self.nodes.len()).map(NodeHandle)
    }

    /// Handles of all nodes of one kind, in arena order
    pub fn nodes_by_kind(&self, kind: NodeKind) -> Vec<NodeHandle> {
        self.handles()
            .filter(|h| self.node(*h).kind == kind)
            .collect()
    }

    /// Adjacent handles of a node
    pub fn neighbors(&self, handle: NodeHandle) -> &[NodeHandle] {
        &self.adjacency[handle.0]
    }

    fn insert_node(&mut self, id: String, kind: NodeKind, attrs: NodeAttrs) -> NodeHandle {
        let handle = NodeHandle(self.nodes.len());
        self.nodes.push(Node { id: id.clone(), kind, attrs });
        self.adjacency.push(Vec::new());
        self.index.insert(id, handle);
        handle
    }

    /// Insert an immutable content node; an existing id is left untouched
    pub fn insert_content(&mut self, intake_id: &str, attrs: ContentAttrs) -> NodeHandle {
        let id = format!("content::{intake_id}");
        if let Some(handle) = self.lookup(&id) {
            return handle;
        }
        self.insert_node(id, NodeKind::Content, NodeAttrs::Content(attrs))
    }

    /// Create or merge an actor node
    ///
    /// Merge rules: append the score to the bounded history (oldest evicted),
    /// recompute the running average over the retained window, union the
    /// platform into the sorted set, refresh last-seen.
    pub fn upsert_actor(
        &mut self,
        actor_id: &str,
        score: f64,
        platform: Option<&str>,
        seen_at: DateTime<Utc>,
    ) -> NodeHandle {
        let handle = match self.lookup(actor_id) {
            Some(handle) => handle,
            None => self.insert_node(
                actor_id.to_string(),
                NodeKind::Actor,
                NodeAttrs::Actor(ActorAttrs {
                    history: VecDeque::new(),
                    average: 0.0,
                    platforms: BTreeSet::new(),
                    last_seen: seen_at,
                }),
            ),
        };

        if let NodeAttrs::Actor(actor) = &mut self.nodes[handle.0].attrs {
            actor.history.push_back(score);
            while actor.history.len() > self.history_window {
                actor.history.pop_front();
            }
            let window = actor.history.len().max(1) as f64;
            actor.average = actor.history.iter().sum::<f64>() / window;
            if let Some(platform) = platform {
                actor.platforms.insert(platform.to_string());
            }
            actor.last_seen = seen_at;
        }
        handle
    }

    /// Create a narrative node on first reference; never mutated after
    pub fn upsert_narrative(&mut self, tag: &str) -> NodeHandle {
        let id = format!("narrative::{tag}");
        if let Some(handle) = self.lookup(&id) {
            return handle;
        }
        self.insert_node(
            id,
            NodeKind::Narrative,
            NodeAttrs::Narrative { tag: tag.to_string() },
        )
    }

    /// Create a region node on first reference; never mutated after
    pub fn upsert_region(&mut self, code: &str) -> NodeHandle {
        let id = format!("region::{code}");
        if let Some(handle) = self.lookup(&id) {
            return handle;
        }
        self.insert_node(
            id,
            NodeKind::Region,
            NodeAttrs::Region { code: code.to_string() },
        )
    }

    /// Add an undirected labeled edge; re-insertion is a no-op
    ///
    /// Returns true when the edge was newly created.
    pub fn add_edge(&mut self, a: NodeHandle, b: NodeHandle, relation: Relation) -> bool {
        if a == b {
            return false;
        }
        let key = (a.0.min(b.0), a.0.max(b.0));
        if self.relations.contains_key(&key) {
            return false;
        }
        self.relations.insert(key, relation);
        self.adjacency[a.0].push(b);
        self.adjacency[b.0].push(a);
        true
    }

    /// Relation label of the edge between two nodes, if one exists
    pub fn relation(&self, a: NodeHandle, b: NodeHandle) -> Option<Relation> {
        self.relations.get(&(a.0.min(b.0), a.0.max(b.0))).copied()
    }

    /// Connected components, each listed in arena order, discovered in
    /// arena order of their lowest-handle member
    pub fn connected_components(&self) -> Vec<Vec<NodeHandle>> {
        let mut visited = vec![false; self.nodes.len()];
        let mut components = Vec::new();

        for start in 0..self.nodes.len() {
            if visited[start] {
                continue;
            }
            let mut component = Vec::new();
            let mut queue = VecDeque::from([NodeHandle(start)]);
            visited[start] = true;
            while let Some(handle) = queue.pop_front() {
                component.push(handle);
                for &next in &self.adjacency[handle.0] {
                    if !visited[next.0] {
                        visited[next.0] = true;
                        queue.push_back(next);
                    }
                }
            }
            component.sort();
            components.push(component);
        }
        components
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}
