//! subsync: YouTube subscriptions to NewPipe, with change tracking.
//!
//! A run fetches the subscription list, diffs it against the last run,
//! appends the change to a bounded timeline and writes the NewPipe export,
//! a Takeout-style CSV, the diff and an HTML cleanup guide.

pub mod channel;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod report;
pub mod source;
pub mod store;
pub mod sync;
pub mod util;
