//! Data assembly for the html report.
//!
//! Everything the template shows is decided here: ordering, truncation and
//! formatting. The template only lays it out, so the rules below can be
//! tested without parsing markup.

use crate::channel::Channel;
use crate::store::diff::Diff;
use crate::store::metadata::SnapshotMeta;
use crate::store::timeline::{Timeline, TimelineEntry};
use crate::util::display_timestamp;

/// Timeline entries shown in the report, newest first.
pub const TIMELINE_DISPLAY_LIMIT: usize = 10;

/// Channel names listed per entry and direction before "... and N more".
pub const TIMELINE_PREVIEW_LIMIT: usize = 5;

pub struct ReportView<'a> {
    pub last_updated: String,
    pub total_count: usize,
    pub added_count: usize,
    pub removed_count: usize,
    /// Sorted by name, ties keep diff order.
    pub removed: Vec<&'a Channel>,
    /// Sorted by name, ties keep diff order.
    pub added: Vec<&'a Channel>,
    pub timeline: Vec<TimelineItem<'a>>,
    pub hidden: Option<HiddenEntries>,
}

pub struct TimelineItem<'a> {
    pub date: String,
    pub total_count: usize,
    pub added_count: usize,
    pub removed_count: usize,
    pub added: Preview<'a>,
    pub removed: Preview<'a>,
}

impl TimelineItem<'_> {
    pub fn has_changes(&self) -> bool {
        self.added_count > 0 || self.removed_count > 0
    }
}

/// The first few names of a list plus how many were left out.
pub struct Preview<'a> {
    pub names: Vec<&'a str>,
    pub more: usize,
}

/// Footer shown when the ledger holds more entries than the report lists.
#[derive(Debug, PartialEq, Eq)]
pub struct HiddenEntries {
    pub shown: usize,
    pub total: usize,
}

impl HiddenEntries {
    pub fn count(&self) -> usize {
        self.total - self.shown
    }
}

impl<'a> ReportView<'a> {
    pub fn build(diff: &'a Diff, meta: &SnapshotMeta, timeline: &'a Timeline) -> Self {
        let timeline_items = timeline
            .recent(TIMELINE_DISPLAY_LIMIT)
            .map(TimelineItem::from_entry)
            .collect();

        let hidden = (timeline.len() > TIMELINE_DISPLAY_LIMIT).then(|| HiddenEntries {
            shown: TIMELINE_DISPLAY_LIMIT,
            total: timeline.len(),
        });

        ReportView {
            last_updated: display_timestamp(&meta.timestamp),
            total_count: meta.total_count,
            added_count: diff.added.len(),
            removed_count: diff.removed.len(),
            removed: sorted_by_name(&diff.removed),
            added: sorted_by_name(&diff.added),
            timeline: timeline_items,
            hidden,
        }
    }
}

impl<'a> TimelineItem<'a> {
    fn from_entry(entry: &'a TimelineEntry) -> Self {
        TimelineItem {
            date: display_timestamp(&entry.timestamp()),
            total_count: entry.total_count(),
            added_count: entry.added_count(),
            removed_count: entry.removed_count(),
            added: Preview::of(entry.added_channels()),
            removed: Preview::of(entry.removed_channels()),
        }
    }
}

impl<'a> Preview<'a> {
    fn of(channels: &'a [Channel]) -> Self {
        Preview {
            names: channels
                .iter()
                .take(TIMELINE_PREVIEW_LIMIT)
                .map(|c| c.name.as_str())
                .collect(),
            more: channels.len().saturating_sub(TIMELINE_PREVIEW_LIMIT),
        }
    }
}

fn sorted_by_name(channels: &[Channel]) -> Vec<&Channel> {
    let mut sorted: Vec<&Channel> = channels.iter().collect();
    // sort_by is stable, equal names keep their diff order
    sorted.sort_by(|a, b| a.name.cmp(&b.name));
    sorted
}
