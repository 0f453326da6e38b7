pub mod html;
pub mod table;
pub mod view;

use crate::store::diff::Diff;
use crate::store::metadata::SnapshotMeta;
use crate::store::timeline::Timeline;
use crate::sync::SyncOutcome;
use view::ReportView;

pub const REPORT_FILE: &str = "index.html";

/// Render the cleanup guide. Pure: the only time shown is `meta.timestamp`,
/// so identical inputs give byte-identical output.
pub fn render(diff: &Diff, meta: &SnapshotMeta, timeline: &Timeline) -> String {
    let view = ReportView::build(diff, meta, timeline);
    html::page(&view).into_string()
}

pub fn print(outcome: &SyncOutcome, json: bool) {
    if json {
        match serde_json::to_string_pretty(outcome) {
            Ok(rendered) => println!("{rendered}"),
            Err(e) => eprintln!("error: failed to encode sync summary: {e}"),
        }
    } else {
        print!("{}", table::render_outcome(outcome));
    }
}
