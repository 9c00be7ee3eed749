//! Narratrace Core - domain model for content-risk triage
//!
//! This crate provides the foundational primitives:
//! - Content submissions with optional platform/region/actor metadata
//! - Risk classification bands and externally computed assessments
//! - Anonymous-actor resolution strategies (deterministic source bucketing)
//! - Engine configuration: scorer weights, history window, analytics limits

pub mod actor;
pub mod config;
pub mod risk;
pub mod submission;

pub use actor::*;
pub use config::*;
pub use risk::*;
pub use submission::*;

/// Bounded length of an actor's rolling score history
pub const HISTORY_WINDOW: usize = 20;

/// Bucket count for anonymous actor resolution
pub const ANON_ACTOR_BUCKETS: u64 = 10_000;

/// Severity blend weight applied to a node's own risk score
pub const SEVERITY_SCORE_WEIGHT: f64 = 0.7;

/// Severity blend weight applied to the classification band
pub const SEVERITY_CLASS_WEIGHT: f64 = 0.3;

/// Severity blend weight applied to actor platform density
pub const SEVERITY_PLATFORM_WEIGHT: f64 = 0.2;

/// Classification weight used when a node carries no classification
pub const NEUTRAL_CLASS_WEIGHT: f64 = 0.4;
