use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::diff::Diff;
use crate::util;

/// Contents of changes.json: the diff of the latest run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangesDocument {
    #[serde(with = "util::timestamp")]
    pub sync_date: DateTime<Utc>,
    #[serde(default, with = "util::timestamp::option")]
    pub previous_sync: Option<DateTime<Utc>>,
    pub changes: Diff,
}
