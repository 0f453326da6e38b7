use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};

/// A subscribed channel. Identity is the id; the name is a display label
/// that can change between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
}

impl Channel {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Channel {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// The full channel set observed at one point in time.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub taken_at: DateTime<Utc>,
    channels: Vec<Channel>,
}

impl Snapshot {
    /// Build a snapshot, rejecting duplicate ids. `origin` names where the
    /// channels came from and ends up in the error message.
    pub fn new(taken_at: DateTime<Utc>, channels: Vec<Channel>, origin: &str) -> Result<Self> {
        let mut seen: HashSet<&str> = HashSet::with_capacity(channels.len());
        for channel in &channels {
            if !seen.insert(channel.id.as_str()) {
                return Err(SyncError::DuplicateChannel {
                    id: channel.id.clone(),
                    origin: origin.to_string(),
                });
            }
        }

        Ok(Snapshot { taken_at, channels })
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn into_channels(self) -> Vec<Channel> {
        self.channels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_unique_ids() {
        let snapshot = Snapshot::new(
            Utc::now(),
            vec![Channel::new("UC1", "One"), Channel::new("UC2", "Two")],
            "test",
        )
        .unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.channels()[1].name, "Two");
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = Snapshot::new(
            Utc::now(),
            vec![Channel::new("UC1", "One"), Channel::new("UC1", "One again")],
            "test",
        )
        .unwrap_err();

        match err {
            SyncError::DuplicateChannel { id, origin } => {
                assert_eq!(id, "UC1");
                assert_eq!(origin, "test");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn same_name_different_ids_is_fine() {
        let snapshot = Snapshot::new(
            Utc::now(),
            vec![Channel::new("UC1", "Same"), Channel::new("UC2", "Same")],
            "test",
        )
        .unwrap();
        assert!(!snapshot.is_empty());
    }
}
