//! Maud template for index.html.
//!
//! All interpolated values go through maud's escaping; the stylesheet is
//! the only `PreEscaped` content and it is a compile-time constant.

use maud::{html, Markup, PreEscaped, DOCTYPE};

use super::view::{Preview, ReportView, TimelineItem};
use crate::channel::Channel;
use crate::util::channel_url;

const STYLESHEET: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, Cantarell, sans-serif; max-width: 800px; margin: 0 auto; padding: 20px; background: #f5f5f5; }
.card { background: white; border-radius: 8px; padding: 20px; margin: 20px 0; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }
h1 { color: #333; margin-top: 0; }
h2 { color: #666; border-bottom: 2px solid #e0e0e0; padding-bottom: 10px; }
.summary { display: flex; justify-content: space-around; flex-wrap: wrap; gap: 10px; }
.stat { background: #f9f9f9; padding: 15px; border-radius: 4px; text-align: center; flex: 1; min-width: 120px; }
.stat-number { font-size: 2em; font-weight: bold; color: #333; }
.stat-label { color: #666; font-size: 0.9em; }
.removed { color: #d32f2f; }
.added { color: #388e3c; }
.channel { padding: 10px; margin: 5px 0; background: #fafafa; border-radius: 4px; display: flex; justify-content: space-between; align-items: center; }
.channel-name { font-weight: 500; }
.channel-link { color: #1976d2; text-decoration: none; font-size: 0.9em; }
.empty { color: #999; text-align: center; padding: 20px; }
.instructions { background: #fff3cd; border-left: 4px solid #ffc107; padding: 15px; margin: 20px 0; }
.downloads { background: #f5f5f5; padding: 15px; border-radius: 4px; margin: 15px 0; word-break: break-all; }
.downloads a { color: #1976d2; }
.timestamp { color: #666; font-size: 0.9em; }
.tip { color: #666; font-size: 0.9em; }
.timeline { margin-top: 20px; }
.timeline-entry { border-left: 3px solid #1976d2; padding: 15px; margin: 15px 0; background: #fafafa; border-radius: 0 4px 4px 0; }
.timeline-entry.no-changes { border-left-color: #999; opacity: 0.7; }
.timeline-header { display: flex; justify-content: space-between; align-items: center; margin-bottom: 10px; }
.timeline-date { font-weight: bold; color: #333; }
.timeline-stats { display: flex; gap: 15px; font-size: 0.9em; }
.timeline-quiet { color: #999; }
.timeline-detail { margin-top: 10px; font-size: 0.9em; }
.timeline-channels { margin-top: 8px; padding-left: 20px; }
"#;

pub fn page(view: &ReportView<'_>) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { "NewPipe Cleanup Guide" }
                style { (PreEscaped(STYLESHEET)) }
            }
            body {
                (summary(view))
                (import_steps())
                @if view.removed.is_empty() {
                    div.card {
                        h2 { "✅ No Cleanup Needed" }
                        p.empty { "All your NewPipe subscriptions match YouTube!" }
                    }
                } @else {
                    (removal_steps(&view.removed))
                }
                @if !view.added.is_empty() {
                    div.card {
                        h2.added { "✨ New Channels Added" }
                        p { "These channels are new since your last sync. They'll be added when you import subscriptions.json above:" }
                        @for channel in &view.added {
                            (channel_row(channel))
                        }
                    }
                }
                (timeline(view))
            }
        }
    }
}

fn summary(view: &ReportView<'_>) -> Markup {
    html! {
        div.card {
            h1 { "📱 NewPipe Cleanup Guide" }
            p.timestamp { "Last updated: " (view.last_updated) }
            div.summary {
                div.stat {
                    div."stat-number" { (view.total_count) }
                    div."stat-label" { "Total Subscriptions" }
                }
                div.stat {
                    div."stat-number".added { (view.added_count) }
                    div."stat-label" { "Added" }
                }
                div.stat {
                    div."stat-number".removed { (view.removed_count) }
                    div."stat-label" { "Removed" }
                }
            }
        }
    }
}

fn import_steps() -> Markup {
    html! {
        div.card {
            h2 { "📥 Step 1: Import New Subscriptions" }
            div.instructions {
                strong { "Import this file to add new YouTube subscriptions to NewPipe:" }
            }
            div.downloads {
                strong { "NewPipe Format:" } br;
                a href="subscriptions.json" { "subscriptions.json" } br; br;
                strong { "YouTube CSV Format (Google Takeout compatible):" } br;
                a href="subscriptions.csv" { "subscriptions.csv" }
            }
            div {
                strong { "How to import (NewPipe):" }
                ol {
                    li { "Open NewPipe on your phone" }
                    li { "Tap the ☰ menu (top-left)" }
                    li { "Go to " strong { "Settings" } " → " strong { "Content" } }
                    li { "Tap " strong { "Import from file" } }
                    li { "Paste the URL above or download and select the file" }
                    li { "Tap " strong { "Import" } }
                }
                p.tip {
                    em { "Tip: Bookmark the subscriptions.json URL for easy access!" } br;
                    em { "The CSV format can be imported into YouTube or other compatible apps." }
                }
            }
        }
    }
}

fn removal_steps(removed: &[&Channel]) -> Markup {
    html! {
        div.card {
            h2.removed { "❌ Step 2: Remove Old Subscriptions" }
            div.instructions {
                strong { "These channels were removed from your YouTube subscriptions." } br;
                "To clean up NewPipe, manually unsubscribe from each channel below:"
                ol {
                    li { "Open NewPipe" }
                    li { "Tap the " strong { "Subscriptions" } " tab" }
                    li { strong { "Long-press" } " the channel" }
                    li { "Select " strong { "Unsubscribe" } }
                }
            }
            @for channel in removed {
                (channel_row(channel))
            }
        }
    }
}

fn channel_row(channel: &Channel) -> Markup {
    html! {
        div.channel {
            span."channel-name" { (channel.name) }
            a."channel-link" href=(channel_url(&channel.id)) target="_blank" { "View" }
        }
    }
}

fn timeline(view: &ReportView<'_>) -> Markup {
    html! {
        div.card {
            h2 { "📅 Change Timeline" }
            p { "History of subscription changes over time:" }
            div.timeline {
                @if view.timeline.is_empty() {
                    p.empty { "No previous syncs recorded yet. This will build up over time!" }
                }
                @for item in &view.timeline {
                    (timeline_entry(item))
                }
                @if let Some(hidden) = &view.hidden {
                    p.empty {
                        "Showing last " (hidden.shown) " of " (hidden.total) " sync events. "
                        "Full history is preserved in timeline.json."
                    }
                }
            }
        }
    }
}

fn timeline_entry(item: &TimelineItem<'_>) -> Markup {
    html! {
        div."timeline-entry"."no-changes"[!item.has_changes()] {
            div."timeline-header" {
                span."timeline-date" { (item.date) }
                div."timeline-stats" {
                    span { "📊 " (item.total_count) " total" }
                    @if item.has_changes() {
                        span.added { "+" (item.added_count) }
                        span.removed { "-" (item.removed_count) }
                    } @else {
                        span."timeline-quiet" { "No changes" }
                    }
                }
            }
            @if item.added_count > 0 {
                (timeline_detail("added", "Added", item.added_count, &item.added))
            }
            @if item.removed_count > 0 {
                (timeline_detail("removed", "Removed", item.removed_count, &item.removed))
            }
        }
    }
}

fn timeline_detail(class: &str, verb: &str, count: usize, preview: &Preview<'_>) -> Markup {
    html! {
        div."timeline-detail" {
            strong class=(class) { (verb) " " (count) " channel(s):" }
            div."timeline-channels" {
                @for name in &preview.names {
                    "• " (name) br;
                }
                @if preview.more > 0 {
                    em { "... and " (preview.more) " more" } br;
                }
            }
        }
    }
}
