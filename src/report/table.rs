//! Terminal output for sync summaries, the timeline and ad-hoc diffs.
//!
//! - Timeline rows are newest first with per-row deltas
//! - Diff listings are sorted by channel name
//! - Long names are truncated to keep columns aligned

use crate::channel::Channel;
use crate::store::diff::Diff;
use crate::store::timeline::Timeline;
use crate::sync::SyncOutcome;
use crate::util::display_timestamp;

const NAME_WIDTH: usize = 40;

pub fn render_outcome(outcome: &SyncOutcome) -> String {
    let mut output = String::new();

    output.push_str(&format!("synced {} channels from {}\n", outcome.total_count, outcome.source));
    output.push_str(&format!("  added:     {}\n", outcome.added_count));
    output.push_str(&format!("  removed:   {}\n", outcome.removed_count));
    output.push_str(&format!("  unchanged: {}\n", outcome.unchanged_count));

    if outcome.timeline_recorded {
        output.push_str(&format!("timeline: recorded ({} entries)\n", outcome.timeline_len));
    } else {
        output.push_str(&format!("timeline: no changes ({} entries)\n", outcome.timeline_len));
    }

    output.push_str(&format!("\nwrote {} files to {}\n", outcome.written.len(), outcome.output_dir.display()));

    if outcome.removed_count > 0 {
        output.push_str(&format!(
            "\n{} channel(s) need to be removed from NewPipe\n  see {} for details\n",
            outcome.removed_count,
            outcome.output_dir.join(super::REPORT_FILE).display()
        ));
    }

    output
}

pub fn render_timeline(timeline: &Timeline, limit: usize) -> String {
    if timeline.is_empty() {
        return String::from("No syncs recorded yet. Run 'subsync sync' to create one.\n");
    }

    let mut output = String::new();
    output.push_str(&format!("{:<22} {:>8} {:>8} {:>8}\n", "Date", "Total", "Added", "Removed"));
    output.push_str(&"-".repeat(50));
    output.push('\n');

    for entry in timeline.recent(limit) {
        output.push_str(&format!(
            "{:<22} {:>8} {:>8} {:>8}\n",
            display_timestamp(&entry.timestamp()),
            entry.total_count(),
            format!("+{}", entry.added_count()),
            format!("-{}", entry.removed_count()),
        ));
        for channel in entry.added_channels() {
            output.push_str(&format!("    [+] {}\n", truncate(&channel.name, NAME_WIDTH)));
        }
        for channel in entry.removed_channels() {
            output.push_str(&format!("    [-] {}\n", truncate(&channel.name, NAME_WIDTH)));
        }
    }

    if timeline.len() > limit {
        output.push_str(&format!("\n({} older entries not shown)\n", timeline.len() - limit));
    }

    output
}

pub fn render_diff(diff: &Diff) -> String {
    if !diff.has_changes() {
        return format!("No changes detected ({} unchanged).\n", diff.unchanged.len());
    }

    let mut output = String::new();

    for channel in sorted(&diff.added) {
        output.push_str(&format!(
            "  [new]  {:<width$} {}\n",
            truncate(&channel.name, NAME_WIDTH),
            channel.id,
            width = NAME_WIDTH
        ));
    }

    for channel in sorted(&diff.removed) {
        output.push_str(&format!(
            "  [gone] {:<width$} {}\n",
            truncate(&channel.name, NAME_WIDTH),
            channel.id,
            width = NAME_WIDTH
        ));
    }

    output.push_str(&format!(
        "\n{} added, {} removed, {} unchanged\n",
        diff.added.len(),
        diff.removed.len(),
        diff.unchanged.len()
    ));

    output
}

fn sorted(channels: &[Channel]) -> Vec<&Channel> {
    let mut sorted: Vec<&Channel> = channels.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));
    sorted
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{truncated}...")
    }
}
