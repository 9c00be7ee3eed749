//! Intelligence-sharing packages
//!
//! Export envelopes for partner distribution: policy-tagged, optionally
//! PII-redacted, and signed with a keyed SHA-256 over the canonical
//! envelope serialization so recipients can verify integrity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use narratrace_core::RiskClass;

/// Destinations exempt from export-control review
const TRUSTED_DESTINATIONS: &[&str] = &["USA", "EU", "IN", "AUS"];

/// Metadata keys dropped when personal data is excluded
const PII_KEYS: &[&str] = &["actor_id", "user_id"];

/// Request to share one triaged case with a partner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharingRequest {
    pub intake_id: String,
    pub destination: String,
    pub include_personal_data: bool,
    pub justification: String,
}

/// Case fields packaged for sharing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseRecord {
    pub intake_id: String,
    pub classification: RiskClass,
    pub composite_score: f64,
    pub created_at: DateTime<Utc>,
    pub metadata: Value,
}

/// A signed export envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharingPackage {
    pub package_id: String,
    pub created_at: DateTime<Utc>,
    pub destination: String,
    pub policy_tags: Vec<String>,
    pub payload: Value,
    /// Keyed SHA-256 over the canonical envelope JSON
    pub signature: String,
}

/// Builds signed sharing packages
pub struct SharingEngine {
    secret_key: String,
}

impl SharingEngine {
    pub fn new(secret_key: &str) -> Self {
        Self {
            secret_key: secret_key.to_string(),
        }
    }

    /// Package one case for the requested destination
    pub fn create_package(&self, request: &SharingRequest, record: &CaseRecord) -> SharingPackage {
        let package_id = format!("pkg-{}", Uuid::new_v4());
        let created_at = Utc::now();

        let mut metadata = record.metadata.clone();
        if !request.include_personal_data {
            if let Value::Object(map) = &mut metadata {
                for key in PII_KEYS {
                    map.remove(*key);
                }
            }
        }

        let payload = json!({
            "intake_id": record.intake_id,
            "classification": record.classification,
            "composite_score": record.composite_score,
            "created_at": record.created_at,
            "metadata": metadata,
        });
        let policy_tags = self.policy_tags(request);

        let envelope = json!({
            "intake_id": request.intake_id,
            "destination": request.destination,
            "created_at": created_at,
            "payload": payload,
            "policy_tags": policy_tags,
        });
        let signature = self.sign(&envelope);

        SharingPackage {
            package_id,
            created_at,
            destination: request.destination.clone(),
            policy_tags,
            payload,
            signature,
        }
    }

    fn policy_tags(&self, request: &SharingRequest) -> Vec<String> {
        let mut tags = vec!["classified:restricted".to_string()];
        if !TRUSTED_DESTINATIONS.contains(&request.destination.as_str()) {
            tags.push("export-control:review".to_string());
        }
        if request.include_personal_data {
            tags.push("privacy:pii-included".to_string());
        } else {
            tags.push("privacy:pii-redacted".to_string());
        }
        tags.push(format!(
            "justification:{}",
            justification_bucket(&request.justification)
        ));
        tags
    }

    fn sign(&self, envelope: &Value) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.secret_key.as_bytes());
        hasher.update(envelope.to_string().as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

/// Coarse bucket of a justification string, for the policy tag
fn justification_bucket(justification: &str) -> u64 {
    let digest = Sha256::digest(justification.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(prefix) % 10_000
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> CaseRecord {
        CaseRecord {
            intake_id: "c1".to_string(),
            classification: RiskClass::High,
            composite_score: 0.85,
            created_at: Utc::now(),
            metadata: json!({
                "platform": "telegram",
                "actor_id": "troll-77",
                "user_id": "u-9",
            }),
        }
    }

    fn request(destination: &str, include_pii: bool) -> SharingRequest {
        SharingRequest {
            intake_id: "c1".to_string(),
            destination: destination.to_string(),
            include_personal_data: include_pii,
            justification: "joint takedown".to_string(),
        }
    }

    #[test]
    fn test_trusted_destination_skips_export_review() {
        let engine = SharingEngine::new("secret");
        let package = engine.create_package(&request("EU", false), &record());
        assert!(!package
            .policy_tags
            .contains(&"export-control:review".to_string()));
        assert!(package
            .policy_tags
            .contains(&"privacy:pii-redacted".to_string()));
    }

    #[test]
    fn test_untrusted_destination_flagged() {
        let engine = SharingEngine::new("secret");
        let package = engine.create_package(&request("XX", true), &record());
        assert!(package
            .policy_tags
            .contains(&"export-control:review".to_string()));
        assert!(package
            .policy_tags
            .contains(&"privacy:pii-included".to_string()));
    }

    #[test]
    fn test_pii_redaction() {
        let engine = SharingEngine::new("secret");
        let package = engine.create_package(&request("USA", false), &record());
        let metadata = &package.payload["metadata"];
        assert!(metadata.get("actor_id").is_none());
        assert!(metadata.get("user_id").is_none());
        assert_eq!(metadata["platform"], "telegram");
    }

    #[test]
    fn test_signature_depends_on_key() {
        let record = record();
        let request = request("USA", false);
        let a = SharingEngine::new("key-a").create_package(&request, &record);
        let b = SharingEngine::new("key-b").create_package(&request, &record);
        assert_ne!(a.signature, b.signature);
        assert_eq!(a.signature.len(), 64);
    }

    #[test]
    fn test_package_id_prefix() {
        let engine = SharingEngine::new("secret");
        let package = engine.create_package(&request("USA", false), &record());
        assert!(package.package_id.starts_with("pkg-"));
    }
}
