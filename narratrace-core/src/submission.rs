//! Content submissions entering the triage pipeline
//!
//! A submission carries the raw text plus whatever intake metadata the
//! collecting surface could attach. Everything beyond `text` and `source`
//! is optional: field collectors frequently cannot attribute an actor or
//! a platform, and the graph engine has explicit fallbacks for both.

use serde::{Deserialize, Serialize};

/// Optional intake metadata attached to a submission
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmissionMetadata {
    /// Platform the content was observed on (e.g. "telegram", "unknown-forum")
    pub platform: Option<String>,
    /// ISO region code of the suspected origin
    pub region: Option<String>,
    /// Upstream actor identifier, when attribution succeeded
    pub actor_id: Option<String>,
}

/// A piece of content submitted for risk triage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentSubmission {
    /// Raw text of the content item
    pub text: String,
    /// Identifier of the collecting source (feed, crawler, analyst)
    pub source: String,
    /// Intake metadata, if any
    #[serde(default)]
    pub metadata: Option<SubmissionMetadata>,
    /// Narrative tags assigned upstream (e.g. "election", "disinfo-campaign")
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ContentSubmission {
    pub fn new(text: &str, source: &str) -> Self {
        Self {
            text: text.to_string(),
            source: source.to_string(),
            metadata: None,
            tags: Vec::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: SubmissionMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Platform name, if the intake metadata carries one
    pub fn platform(&self) -> Option<&str> {
        self.metadata.as_ref().and_then(|m| m.platform.as_deref())
    }

    /// Region code, if the intake metadata carries one
    pub fn region(&self) -> Option<&str> {
        self.metadata.as_ref().and_then(|m| m.region.as_deref())
    }

    /// Attributed actor id, if the intake metadata carries one
    pub fn actor_id(&self) -> Option<&str> {
        self.metadata.as_ref().and_then(|m| m.actor_id.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_accessors() {
        let submission = ContentSubmission::new("breaking news", "feed-7").with_metadata(
            SubmissionMetadata {
                platform: Some("telegram".to_string()),
                region: Some("EE".to_string()),
                actor_id: None,
            },
        );

        assert_eq!(submission.platform(), Some("telegram"));
        assert_eq!(submission.region(), Some("EE"));
        assert_eq!(submission.actor_id(), None);
    }

    #[test]
    fn test_missing_metadata() {
        let submission = ContentSubmission::new("plain", "feed-1");
        assert!(submission.platform().is_none());
        assert!(submission.region().is_none());
        assert!(submission.tags.is_empty());
    }
}
