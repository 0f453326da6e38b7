use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Overrides;

#[derive(Parser)]
#[command(name = "subsync")]
#[command(about = "Sync YouTube subscriptions to NewPipe and track changes between runs")]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to the platform config dir, e.g. ~/.config/subsync/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding state files and exports [default: ./output]
    #[arg(long, global = true, env = "SUBSYNC_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Maximum number of timeline entries to keep [default: 50]
    #[arg(long, global = true, env = "SUBSYNC_MAX_TIMELINE_ENTRIES")]
    pub max_timeline_entries: Option<usize>,

    /// Show debug logging
    #[arg(long, short = 'v', global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch subscriptions, diff against the last run and write all exports
    Sync(SyncArgs),

    /// Re-render index.html from the last run's state without fetching
    Report,

    /// Show recorded subscription changes, newest first
    Timeline(TimelineArgs),

    /// Compare two exported subscription lists
    Diff(DiffArgs),
}

#[derive(Args)]
pub struct SyncArgs {
    /// Read the current list from an exported subscriptions.json instead of the YouTube API
    #[arg(long)]
    pub from_file: Option<PathBuf>,

    /// Print the run summary as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// OAuth client id
    #[arg(long, env = "YOUTUBE_CLIENT_ID", hide_env_values = true)]
    pub client_id: Option<String>,

    /// OAuth client secret
    #[arg(long, env = "YOUTUBE_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// OAuth refresh token
    #[arg(long, env = "YOUTUBE_REFRESH_TOKEN", hide_env_values = true)]
    pub refresh_token: Option<String>,
}

#[derive(Args)]
pub struct TimelineArgs {
    /// Number of entries to show
    #[arg(long, default_value_t = 10)]
    pub limit: usize,

    /// Output the full timeline as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args)]
pub struct DiffArgs {
    /// Older subscription list (e.g. output/subscriptions-2025-01-01.json)
    #[arg(long)]
    pub from: PathBuf,

    /// Newer subscription list
    #[arg(long)]
    pub to: PathBuf,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            output_dir: self.output_dir.clone(),
            max_timeline_entries: self.max_timeline_entries,
        }
    }
}
