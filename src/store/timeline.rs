//! Bounded change ledger.
//!
//! One entry per sync that changed something, plus a baseline entry for the
//! very first sync. Entries are only ever appended; the oldest are evicted
//! once the ledger exceeds its capacity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::channel::Channel;
use crate::store::diff::Diff;
use crate::store::metadata::SnapshotMeta;
use crate::util;

pub const DEFAULT_MAX_ENTRIES: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredEntry")]
pub struct TimelineEntry {
    #[serde(with = "util::timestamp")]
    timestamp: DateTime<Utc>,
    total_count: usize,
    added_count: usize,
    removed_count: usize,
    unchanged_count: usize,
    added_channels: Vec<Channel>,
    removed_channels: Vec<Channel>,
}

impl TimelineEntry {
    pub fn from_diff(diff: &Diff, meta: &SnapshotMeta) -> Self {
        TimelineEntry {
            timestamp: meta.timestamp,
            total_count: meta.total_count,
            added_count: diff.added.len(),
            removed_count: diff.removed.len(),
            unchanged_count: diff.unchanged.len(),
            added_channels: diff.added.clone(),
            removed_channels: diff.removed.clone(),
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    pub fn added_count(&self) -> usize {
        self.added_count
    }

    pub fn removed_count(&self) -> usize {
        self.removed_count
    }

    pub fn unchanged_count(&self) -> usize {
        self.unchanged_count
    }

    pub fn added_channels(&self) -> &[Channel] {
        &self.added_channels
    }

    pub fn removed_channels(&self) -> &[Channel] {
        &self.removed_channels
    }

    pub fn has_changes(&self) -> bool {
        self.added_count > 0 || self.removed_count > 0
    }

    fn check_counts(&self) -> Result<(), String> {
        if self.added_count != self.added_channels.len() {
            return Err(format!(
                "added_count {} but {} added channels",
                self.added_count,
                self.added_channels.len()
            ));
        }
        if self.removed_count != self.removed_channels.len() {
            return Err(format!(
                "removed_count {} but {} removed channels",
                self.removed_count,
                self.removed_channels.len()
            ));
        }
        Ok(())
    }
}

/// An entry as found on disk. Older ledgers nest the counts and channel
/// lists under `changes` and call the total `subscription_count`.
#[derive(Deserialize)]
struct StoredEntry {
    #[serde(with = "util::timestamp")]
    timestamp: DateTime<Utc>,
    #[serde(alias = "subscription_count")]
    total_count: usize,
    #[serde(flatten)]
    counts: Option<StoredCounts>,
    changes: Option<StoredCounts>,
}

#[derive(Deserialize)]
struct StoredCounts {
    added_count: usize,
    removed_count: usize,
    unchanged_count: usize,
    #[serde(default)]
    added_channels: Vec<Channel>,
    #[serde(default)]
    removed_channels: Vec<Channel>,
}

impl TryFrom<StoredEntry> for TimelineEntry {
    type Error = String;

    fn try_from(stored: StoredEntry) -> Result<Self, Self::Error> {
        let counts = stored
            .changes
            .or(stored.counts)
            .ok_or_else(|| format!("entry at {} has no change counts", stored.timestamp))?;

        Ok(TimelineEntry {
            timestamp: stored.timestamp,
            total_count: stored.total_count,
            added_count: counts.added_count,
            removed_count: counts.removed_count,
            unchanged_count: counts.unchanged_count,
            added_channels: counts.added_channels,
            removed_channels: counts.removed_channels,
        })
    }
}

/// Contents of timeline.json, oldest entry first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    #[serde(default)]
    entries: Vec<TimelineEntry>,
}

impl Timeline {
    pub fn new() -> Self {
        Timeline::default()
    }

    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Up to `limit` entries, newest first.
    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &TimelineEntry> {
        self.entries.iter().rev().take(limit)
    }

    /// Record a sync. An entry is added when the diff has additions or
    /// removals, or when the ledger is empty (baseline). Returns whether an
    /// entry was added. The ledger never exceeds `max_entries` afterwards.
    pub fn append(&mut self, diff: &Diff, meta: &SnapshotMeta, max_entries: usize) -> bool {
        let recorded = diff.has_changes() || self.entries.is_empty();
        if recorded {
            self.entries.push(TimelineEntry::from_diff(diff, meta));
        }
        self.truncate(max_entries);
        recorded
    }

    /// Drop the oldest entries beyond `max_entries`. Returns how many were
    /// evicted.
    pub fn truncate(&mut self, max_entries: usize) -> usize {
        let excess = self.entries.len().saturating_sub(max_entries);
        if excess > 0 {
            self.entries.drain(..excess);
        }
        excess
    }

    /// Check every entry's counts against its channel lists. Returns a
    /// description of the first inconsistent entry.
    pub fn validate(&self) -> Result<(), String> {
        for (index, entry) in self.entries.iter().enumerate() {
            entry
                .check_counts()
                .map_err(|reason| format!("entry {index}: {reason}"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn meta(day: i64, total: usize) -> SnapshotMeta {
        SnapshotMeta {
            timestamp: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + Duration::days(day),
            total_count: total,
        }
    }

    fn added(names: &[&str]) -> Diff {
        Diff {
            added: names
                .iter()
                .map(|n| Channel::new(format!("id-{n}"), *n))
                .collect(),
            ..Diff::default()
        }
    }

    fn unchanged_only() -> Diff {
        Diff {
            unchanged: vec![Channel::new("UC1", "Ch1")],
            ..Diff::default()
        }
    }

    #[test]
    fn first_entry_with_changes() {
        let mut timeline = Timeline::new();
        assert!(timeline.append(&added(&["New Channel"]), &meta(0, 1), 50));

        let entry = &timeline.entries()[0];
        assert_eq!(entry.timestamp(), meta(0, 1).timestamp);
        assert_eq!(entry.total_count(), 1);
        assert_eq!(entry.added_count(), 1);
        assert_eq!(entry.added_channels()[0].name, "New Channel");
    }

    #[test]
    fn first_sync_always_recorded() {
        let mut timeline = Timeline::new();
        assert!(timeline.append(&unchanged_only(), &meta(0, 1), 50));
        assert_eq!(timeline.len(), 1);
        assert!(!timeline.entries()[0].has_changes());
    }

    #[test]
    fn no_change_sync_not_recorded() {
        let mut timeline = Timeline::new();
        timeline.append(&added(&["a"]), &meta(0, 1), 50);

        assert!(!timeline.append(&unchanged_only(), &meta(1, 1), 50));
        assert!(!timeline.append(&unchanged_only(), &meta(2, 1), 50));
        assert_eq!(timeline.len(), 1);
    }

    #[test]
    fn removals_are_recorded() {
        let mut timeline = Timeline::new();
        timeline.append(&added(&["a"]), &meta(0, 1), 50);
        let diff = Diff {
            removed: vec![Channel::new("id-a", "a")],
            ..Diff::default()
        };
        assert!(timeline.append(&diff, &meta(1, 0), 50));
        assert_eq!(timeline.entries()[1].removed_count(), 1);
    }

    #[test]
    fn evicts_oldest_first() {
        let mut timeline = Timeline::new();
        for i in 0..5 {
            let name = format!("Channel {i}");
            timeline.append(&added(&[name.as_str()]), &meta(i, 1), 3);
            assert!(timeline.len() <= 3);
        }

        let names: Vec<&str> = timeline
            .entries()
            .iter()
            .map(|e| e.added_channels()[0].name.as_str())
            .collect();
        assert_eq!(names, vec!["Channel 2", "Channel 3", "Channel 4"]);
    }

    #[test]
    fn truncate_reports_evictions() {
        let mut timeline = Timeline::new();
        for i in 0..4 {
            timeline.append(&added(&["x"]), &meta(i, 1), 10);
        }
        assert_eq!(timeline.truncate(1), 3);
        assert_eq!(timeline.entries()[0].timestamp(), meta(3, 1).timestamp);
        assert_eq!(timeline.truncate(1), 0);
    }

    #[test]
    fn recent_is_newest_first() {
        let mut timeline = Timeline::new();
        for i in 0..4 {
            timeline.append(&added(&["x"]), &meta(i, 1), 10);
        }
        let days: Vec<_> = timeline.recent(2).map(|e| e.timestamp()).collect();
        assert_eq!(days, vec![meta(3, 1).timestamp, meta(2, 1).timestamp]);
    }

    #[test]
    fn loads_entries_and_validates() {
        let raw = r#"{"entries": [{
            "timestamp": "2025-01-01T00:00:00",
            "subscription_count": 5,
            "added_count": 1,
            "removed_count": 0,
            "unchanged_count": 4,
            "added_channels": [{"id": "UC1", "name": "One"}],
            "removed_channels": []
        }]}"#;
        let timeline: Timeline = serde_json::from_str(raw).unwrap();
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline.entries()[0].total_count(), 5);
        assert!(timeline.validate().is_ok());
    }

    #[test]
    fn loads_nested_change_entries() {
        let raw = r#"{"entries": [{
            "timestamp": "2025-01-01T00:00:00.123456",
            "subscription_count": 2,
            "changes": {
                "added_count": 2,
                "removed_count": 0,
                "unchanged_count": 0,
                "added_channels": [{"name": "One", "id": "UC1"}, {"name": "Two", "id": "UC2"}],
                "removed_channels": []
            }
        }]}"#;
        let timeline: Timeline = serde_json::from_str(raw).unwrap();
        let entry = &timeline.entries()[0];
        assert_eq!(entry.total_count(), 2);
        assert_eq!(entry.added_count(), 2);
        assert_eq!(entry.added_channels()[1].id, "UC2");
        assert!(timeline.validate().is_ok());

        // written back in the flat shape
        let written = serde_json::to_value(&timeline).unwrap();
        assert_eq!(written["entries"][0]["added_count"], 2);
        assert!(written["entries"][0].get("changes").is_none());
    }

    #[test]
    fn entry_without_counts_rejected() {
        let raw = r#"{"entries": [{"timestamp": "2025-01-01T00:00:00Z", "total_count": 1}]}"#;
        assert!(serde_json::from_str::<Timeline>(raw).is_err());
    }

    #[test]
    fn inconsistent_counts_fail_validation() {
        let raw = r#"{"entries": [{
            "timestamp": "2025-01-01T00:00:00Z",
            "total_count": 5,
            "added_count": 2,
            "removed_count": 0,
            "unchanged_count": 3,
            "added_channels": [{"id": "UC1", "name": "One"}],
            "removed_channels": []
        }]}"#;
        let timeline: Timeline = serde_json::from_str(raw).unwrap();
        let reason = timeline.validate().unwrap_err();
        assert!(reason.starts_with("entry 0"));
    }
}
