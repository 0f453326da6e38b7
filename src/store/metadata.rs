use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::channel::{Channel, Snapshot};
use crate::error::Result;
use crate::store::diff::{ChangeCounts, Diff};
use crate::util;

/// When a snapshot was taken and how many channels it held. This is all the
/// timeline and the report need to know about the snapshot itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotMeta {
    pub timestamp: DateTime<Utc>,
    pub total_count: usize,
}

/// Contents of metadata.json: the last known channel set plus the change
/// counts of the run that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncMetadata {
    #[serde(with = "util::timestamp")]
    pub last_updated: DateTime<Utc>,
    #[serde(alias = "subscription_count")]
    pub total_count: usize,
    #[serde(default)]
    pub changes: ChangeCounts,
    #[serde(default)]
    pub channels: Vec<Channel>,
    #[serde(
        default,
        with = "util::timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub previous_sync: Option<DateTime<Utc>>,
}

impl SyncMetadata {
    pub fn new(current: &Snapshot, diff: &Diff, previous: Option<&SyncMetadata>) -> Self {
        SyncMetadata {
            last_updated: current.taken_at,
            total_count: current.len(),
            changes: diff.counts(),
            channels: current.channels().to_vec(),
            previous_sync: previous.map(|p| p.last_updated),
        }
    }

    pub fn meta(&self) -> SnapshotMeta {
        SnapshotMeta {
            timestamp: self.last_updated,
            total_count: self.total_count,
        }
    }

    /// Rebuild the persisted channel set as a snapshot so it can be diffed.
    pub fn to_snapshot(&self, origin: &str) -> Result<Snapshot> {
        Snapshot::new(self.last_updated, self.channels.clone(), origin)
    }
}
