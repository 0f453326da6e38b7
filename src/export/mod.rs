//! Serialized artifacts written by a sync run.
//!
//! - newpipe: portable subscription list NewPipe can import
//! - csv: Google Takeout compatible subscription export
//! - changes: machine-readable diff of the run

pub mod changes;
pub mod csv;
pub mod newpipe;

use serde::Serialize;

use crate::error::{Result, SyncError};

/// Pretty JSON with a trailing newline, non-ascii kept as is.
pub fn to_pretty_json<T: Serialize>(value: &T, what: &'static str) -> Result<String> {
    let mut json =
        serde_json::to_string_pretty(value).map_err(|source| SyncError::Encode { what, source })?;
    json.push('\n');
    Ok(json)
}
