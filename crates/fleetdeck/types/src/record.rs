//! Registry record for one registered remote compute instance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{InstanceId, RemoteInstanceId};

/// One registered remote compute instance.
///
/// `status` is a cached belief, not ground truth: it is written on a
/// confirmed power transition, on an observed drift, or once when the record
/// is seeded at registration. It is never set optimistically by the request
/// that initiates a transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceRecord {
    /// Locally generated primary key. Immutable.
    pub id: InstanceId,

    /// User-assigned display label. Mutable by explicit user edit only.
    pub friendly_name: String,

    /// Provider-side identifier. Immutable, unique across the registry.
    pub remote_id: RemoteInstanceId,

    /// `true` = believed running, `false` = believed stopped.
    pub status: bool,

    /// Set once at creation. Immutable.
    pub created_at: DateTime<Utc>,
}

impl InstanceRecord {
    /// Create a new record with a fresh local ID and creation timestamp.
    pub fn new(
        friendly_name: impl Into<String>,
        remote_id: RemoteInstanceId,
        status: bool,
    ) -> Self {
        Self {
            id: InstanceId::generate(),
            friendly_name: friendly_name.into(),
            remote_id,
            status,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_defaults() {
        let record = InstanceRecord::new("My GPU", RemoteInstanceId::new("gpu-1"), false);
        assert_eq!(record.friendly_name, "My GPU");
        assert_eq!(record.remote_id.as_str(), "gpu-1");
        assert!(!record.status);
    }

    #[test]
    fn test_record_json_roundtrip() {
        let record = InstanceRecord::new("My GPU", RemoteInstanceId::new("gpu-1"), true);
        let json = serde_json::to_string(&record).unwrap();
        let back: InstanceRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }
}
