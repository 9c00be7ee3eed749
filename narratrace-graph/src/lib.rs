//! Narratrace Graph - in-memory graph intelligence engine
//!
//! An undirected, typed, attributed graph over actors, content, narratives
//! and regions, incrementally grown per submission:
//! - Arena-backed store with integer node handles and an id side-index
//! - Feature projection + adjacency build over the full node set
//! - Two-hop message-passing scorer ("GNN projection") with a pluggable
//!   numeric backend and a defined no-backend fallback
//! - Analytics reducers: top-risk actors, community snapshots, GNN
//!   clusters, coordination alerts, propagation chains
//! - Feed builders: threat-intel feed and SIEM correlation payload
//!
//! The engine assumes single-writer, synchronous access: callers must
//! serialize mutation and summary computation behind one exclusive section.

pub mod analytics;
pub mod engine;
pub mod feeds;
pub mod projection;
pub mod scorer;
pub mod store;
pub mod summary;

pub use engine::*;
pub use feeds::*;
pub use scorer::{DenseBackend, DisabledBackend, ScoreBackend};
pub use store::*;
pub use summary::*;
