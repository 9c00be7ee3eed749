//! Narratrace Pipeline - triage boundary around the graph engine
//!
//! Wires the external scoring subsystem into the graph intelligence
//! engine:
//! - `RiskScoreProvider`: the interface the scoring collaborators satisfy
//! - `TriagePipeline`: synchronous single-writer intake path; every graph
//!   mutation and summary computation runs behind one mutex
//! - Sharing packages: signed, policy-tagged export envelopes for
//!   partner distribution

pub mod pipeline;
pub mod provider;
pub mod sharing;

pub use pipeline::*;
pub use provider::*;
pub use sharing::*;
