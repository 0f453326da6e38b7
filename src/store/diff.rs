//! Snapshot comparison engine.
//!
//! Partitions the channels of two snapshots by id:
//! - added: only in the current snapshot
//! - removed: only in the previous snapshot (records come from previous)
//! - unchanged: in both (records come from current, so renames show up)
//!
//! Added and unchanged keep current order, removed keeps previous order.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::channel::{Channel, Snapshot};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diff {
    pub added: Vec<Channel>,
    pub removed: Vec<Channel>,
    pub unchanged: Vec<Channel>,
}

impl Diff {
    pub fn has_changes(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty()
    }

    pub fn counts(&self) -> ChangeCounts {
        ChangeCounts {
            added_count: self.added.len(),
            removed_count: self.removed.len(),
            unchanged_count: self.unchanged.len(),
        }
    }
}

/// Sizes of each partition, as persisted in metadata.json.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeCounts {
    pub added_count: usize,
    pub removed_count: usize,
    pub unchanged_count: usize,
}

/// Compare the current snapshot against the previous one. With no previous
/// snapshot (first run) everything counts as added.
pub fn compare(current: &Snapshot, previous: Option<&Snapshot>) -> Diff {
    let Some(previous) = previous else {
        return Diff {
            added: current.channels().to_vec(),
            removed: Vec::new(),
            unchanged: Vec::new(),
        };
    };

    let previous_ids: HashSet<&str> = previous.channels().iter().map(|c| c.id.as_str()).collect();
    let current_ids: HashSet<&str> = current.channels().iter().map(|c| c.id.as_str()).collect();

    let (unchanged, added): (Vec<Channel>, Vec<Channel>) = current
        .channels()
        .iter()
        .cloned()
        .partition(|c| previous_ids.contains(c.id.as_str()));

    let removed = previous
        .channels()
        .iter()
        .filter(|c| !current_ids.contains(c.id.as_str()))
        .cloned()
        .collect();

    Diff {
        added,
        removed,
        unchanged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn channel(id: &str, name: &str) -> Channel {
        Channel::new(id, name)
    }

    fn snapshot(channels: &[Channel]) -> Snapshot {
        Snapshot::new(Utc::now(), channels.to_vec(), "test").unwrap()
    }

    fn ids(channels: &[Channel]) -> Vec<&str> {
        channels.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn first_run_everything_added() {
        let current = snapshot(&[channel("UC1", "One"), channel("UC2", "Two")]);
        let diff = compare(&current, None);
        assert_eq!(diff.added, current.channels());
        assert!(diff.removed.is_empty());
        assert!(diff.unchanged.is_empty());
    }

    #[test]
    fn mixed_changes() {
        let previous = snapshot(&[
            channel("UC123", "Tech Channel"),
            channel("UC456", "Gaming Channel"),
        ]);
        let current = snapshot(&[
            channel("UC123", "Tech Channel"),
            channel("UC999", "New Channel"),
        ]);

        let diff = compare(&current, Some(&previous));
        assert_eq!(diff.added, vec![channel("UC999", "New Channel")]);
        assert_eq!(diff.removed, vec![channel("UC456", "Gaming Channel")]);
        assert_eq!(diff.unchanged, vec![channel("UC123", "Tech Channel")]);
    }

    #[test]
    fn no_changes() {
        let channels = [channel("UC1", "One"), channel("UC2", "Two")];
        let diff = compare(&snapshot(&channels), Some(&snapshot(&channels)));
        assert!(!diff.has_changes());
        assert_eq!(diff.unchanged.len(), 2);
    }

    #[test]
    fn rename_is_unchanged_with_current_name() {
        let previous = snapshot(&[channel("UC1", "Old Name")]);
        let current = snapshot(&[channel("UC1", "New Name")]);
        let diff = compare(&current, Some(&previous));
        assert!(diff.added.is_empty());
        assert!(diff.removed.is_empty());
        assert_eq!(diff.unchanged, vec![channel("UC1", "New Name")]);
    }

    #[test]
    fn removed_records_come_from_previous() {
        let previous = snapshot(&[channel("UC1", "Gone Channel")]);
        let current = snapshot(&[]);
        let diff = compare(&current, Some(&previous));
        assert_eq!(diff.removed, vec![channel("UC1", "Gone Channel")]);
    }

    #[test]
    fn empty_previous_is_not_first_run() {
        let previous = snapshot(&[]);
        let current = snapshot(&[channel("UC1", "One")]);
        let diff = compare(&current, Some(&previous));
        assert_eq!(ids(&diff.added), vec!["UC1"]);
    }

    #[test]
    fn partitions_are_disjoint_and_cover_union() {
        let previous = snapshot(&[
            channel("a", "A"),
            channel("b", "B"),
            channel("c", "C"),
            channel("d", "D"),
        ]);
        let current = snapshot(&[
            channel("e", "E"),
            channel("c", "C"),
            channel("a", "A"),
            channel("f", "F"),
        ]);
        let diff = compare(&current, Some(&previous));

        let mut all: Vec<&str> = ids(&diff.added);
        all.extend(ids(&diff.removed));
        all.extend(ids(&diff.unchanged));
        let unique: HashSet<&str> = all.iter().copied().collect();
        assert_eq!(all.len(), unique.len(), "partitions overlap");

        let expected: HashSet<&str> = ["a", "b", "c", "d", "e", "f"].into_iter().collect();
        assert_eq!(unique, expected);

        // order follows the snapshot each partition is drawn from
        assert_eq!(ids(&diff.added), vec!["e", "f"]);
        assert_eq!(ids(&diff.unchanged), vec!["c", "a"]);
        assert_eq!(ids(&diff.removed), vec!["b", "d"]);
    }

    #[test]
    fn counts_match_partitions() {
        let previous = snapshot(&[channel("a", "A"), channel("b", "B")]);
        let current = snapshot(&[channel("b", "B"), channel("c", "C"), channel("d", "D")]);
        let counts = compare(&current, Some(&previous)).counts();
        assert_eq!(
            counts,
            ChangeCounts {
                added_count: 2,
                removed_count: 1,
                unchanged_count: 1,
            }
        );
    }
}
