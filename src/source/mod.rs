pub mod youtube;

use std::io;
use std::path::PathBuf;

use crate::channel::Channel;
use crate::error::{Result, SyncError};
use crate::export::newpipe::PortableList;
use crate::store::read_json;

/// Where the current subscription list comes from.
pub trait SubscriptionSource {
    fn name(&self) -> &'static str;
    fn fetch(&self) -> Result<Vec<Channel>>;
}

/// Reads a previously exported portable list (subscriptions.json or one of
/// its dated backups). Used for offline runs.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSource { path: path.into() }
    }
}

impl SubscriptionSource for FileSource {
    fn name(&self) -> &'static str {
        "file"
    }

    fn fetch(&self) -> Result<Vec<Channel>> {
        let list: PortableList = read_json(&self.path)?.ok_or_else(|| {
            SyncError::io(
                &self.path,
                io::Error::new(io::ErrorKind::NotFound, "subscription list not found"),
            )
        })?;
        Ok(list.channels())
    }
}
