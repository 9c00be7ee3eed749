//! Risk classification bands and externally computed assessments
//!
//! The composite score and its classification band are produced by the
//! scoring subsystem (stylometric features, transformer detectors, local
//! LLM analysts) and handed to the graph engine as-is. This crate only
//! models the result.

use serde::{Deserialize, Serialize};

use crate::NEUTRAL_CLASS_WEIGHT;

/// Discrete risk band assigned to a content item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskClass {
    #[serde(rename = "low-risk")]
    Low,
    #[serde(rename = "medium-risk")]
    Medium,
    #[serde(rename = "high-risk")]
    High,
}

impl RiskClass {
    /// Severity weight of the band, used in the feature projection
    pub fn weight(&self) -> f64 {
        match self {
            RiskClass::High => 0.9,
            RiskClass::Medium => 0.6,
            RiskClass::Low => 0.2,
        }
    }

    /// Weight for an optional classification, neutral when absent
    pub fn weight_or_neutral(class: Option<RiskClass>) -> f64 {
        class.map(|c| c.weight()).unwrap_or(NEUTRAL_CLASS_WEIGHT)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskClass::Low => "low-risk",
            RiskClass::Medium => "medium-risk",
            RiskClass::High => "high-risk",
        }
    }
}

/// Externally computed risk verdict for one content item
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Composite risk contribution in [0, 1]
    pub composite_score: f64,
    /// Discrete classification band
    pub classification: RiskClass,
}

impl RiskAssessment {
    pub fn new(composite_score: f64, classification: RiskClass) -> Self {
        Self {
            composite_score: composite_score.clamp(0.0, 1.0),
            classification,
        }
    }
}
