//! One sync run, end to end.
//!
//! Loads previous state, fetches the current subscription list, diffs,
//! records the change in the timeline and renders every artifact in memory.
//! Only then is anything written, so a failed fetch or a corrupt state file
//! leaves the previous outputs untouched.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::channel::Snapshot;
use crate::config::Config;
use crate::error::Result;
use crate::export::changes::ChangesDocument;
use crate::export::newpipe::PortableList;
use crate::export::{csv, to_pretty_json};
use crate::report;
use crate::source::SubscriptionSource;
use crate::store::metadata::SyncMetadata;
use crate::store::{diff, Store, CHANGES_FILE, METADATA_FILE, TIMELINE_FILE};

pub const SUBSCRIPTIONS_JSON: &str = "subscriptions.json";
pub const SUBSCRIPTIONS_CSV: &str = "subscriptions.csv";

#[derive(Debug, Serialize)]
pub struct SyncOutcome {
    pub source: &'static str,
    #[serde(with = "crate::util::timestamp")]
    pub synced_at: DateTime<Utc>,
    pub total_count: usize,
    pub added_count: usize,
    pub removed_count: usize,
    pub unchanged_count: usize,
    pub timeline_recorded: bool,
    pub timeline_len: usize,
    pub output_dir: PathBuf,
    pub written: Vec<PathBuf>,
}

pub fn run(config: &Config, source: &dyn SubscriptionSource, now: DateTime<Utc>) -> Result<SyncOutcome> {
    let store = Store::new(&config.output_dir);

    tracing::info!(dir = %store.dir().display(), "loading previous sync data");
    let previous = store.load_metadata()?;
    let previous_snapshot = previous
        .as_ref()
        .map(|meta| meta.to_snapshot(METADATA_FILE))
        .transpose()?;

    tracing::info!("loading timeline history");
    let mut timeline = store.load_timeline(config.max_timeline_entries)?;

    tracing::info!(source = source.name(), "fetching subscriptions");
    let current = Snapshot::new(now, source.fetch()?, source.name())?;
    tracing::info!(count = current.len(), "found subscriptions");

    let changes = diff::compare(&current, previous_snapshot.as_ref());
    tracing::info!(
        added = changes.added.len(),
        removed = changes.removed.len(),
        unchanged = changes.unchanged.len(),
        "compared with previous sync"
    );

    let metadata = SyncMetadata::new(&current, &changes, previous.as_ref());
    let recorded = timeline.append(&changes, &metadata.meta(), config.max_timeline_entries);
    if recorded {
        tracing::info!(entries = timeline.len(), "recorded timeline entry");
    }

    let portable = to_pretty_json(&PortableList::from_channels(current.channels()), "subscription list")?;
    let csv_export = csv::render(current.channels());
    let changes_doc = ChangesDocument {
        sync_date: now,
        previous_sync: metadata.previous_sync,
        changes,
    };
    let changes_json = to_pretty_json(&changes_doc, "changes")?;
    let metadata_json = to_pretty_json(&metadata, "metadata")?;
    let timeline_json = to_pretty_json(&timeline, "timeline")?;
    let html = report::render(&changes_doc.changes, &metadata.meta(), &timeline);

    let stamp = now.format("%Y-%m-%d");
    let artifacts: Vec<(String, &[u8])> = vec![
        (SUBSCRIPTIONS_JSON.to_string(), portable.as_bytes()),
        (format!("subscriptions-{stamp}.json"), portable.as_bytes()),
        (SUBSCRIPTIONS_CSV.to_string(), csv_export.as_bytes()),
        (format!("subscriptions-{stamp}.csv"), csv_export.as_bytes()),
        (CHANGES_FILE.to_string(), changes_json.as_bytes()),
        (report::REPORT_FILE.to_string(), html.as_bytes()),
        // state last; metadata.json never lands without its timeline entry
        (TIMELINE_FILE.to_string(), timeline_json.as_bytes()),
        (METADATA_FILE.to_string(), metadata_json.as_bytes()),
    ];

    store.ensure_dir()?;
    let mut written = Vec::with_capacity(artifacts.len());
    for (name, contents) in artifacts {
        written.push(store.write(&name, contents)?);
    }

    let counts = changes_doc.changes.counts();
    if counts.removed_count > 0 {
        tracing::warn!(removed = counts.removed_count, "channels need to be removed from NewPipe");
    }
    tracing::info!(files = written.len(), "sync complete");

    Ok(SyncOutcome {
        source: source.name(),
        synced_at: now,
        total_count: metadata.total_count,
        added_count: counts.added_count,
        removed_count: counts.removed_count,
        unchanged_count: counts.unchanged_count,
        timeline_recorded: recorded,
        timeline_len: timeline.len(),
        output_dir: config.output_dir.clone(),
        written,
    })
}

/// Re-render index.html from the persisted state of the last run. No fetch,
/// no state change; running it twice produces the same file.
pub fn rerender(config: &Config) -> Result<Option<PathBuf>> {
    let store = Store::new(&config.output_dir);

    let Some(metadata) = store.load_metadata()? else {
        return Ok(None);
    };
    let Some(changes) = store.load::<ChangesDocument>(CHANGES_FILE)? else {
        return Ok(None);
    };
    let timeline = store.load_timeline(config.max_timeline_entries)?;

    let html = report::render(&changes.changes, &metadata.meta(), &timeline);
    store.write(report::REPORT_FILE, html.as_bytes()).map(Some)
}
