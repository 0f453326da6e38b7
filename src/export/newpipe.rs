use serde::{Deserialize, Serialize};

use crate::channel::Channel;
use crate::util::channel_url;

pub const APP_VERSION: &str = "0.26.1";
pub const APP_VERSION_INT: u32 = 996;

/// NewPipe's subscription import format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortableList {
    pub app_version: String,
    pub app_version_int: u32,
    pub subscriptions: Vec<PortableChannel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortableChannel {
    pub id: String,
    pub name: String,
    pub url: String,
}

impl PortableList {
    pub fn from_channels(channels: &[Channel]) -> Self {
        PortableList {
            app_version: APP_VERSION.to_string(),
            app_version_int: APP_VERSION_INT,
            subscriptions: channels
                .iter()
                .map(|c| PortableChannel {
                    id: c.id.clone(),
                    name: c.name.clone(),
                    url: channel_url(&c.id),
                })
                .collect(),
        }
    }

    pub fn channels(&self) -> Vec<Channel> {
        self.subscriptions
            .iter()
            .map(|s| Channel::new(s.id.clone(), s.name.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Channel> {
        vec![
            Channel::new("UC123", "Tech Channel"),
            Channel::new("UC456", "Gaming Channel"),
        ]
    }

    #[test]
    fn maps_channels() {
        let list = PortableList::from_channels(&sample());
        assert_eq!(list.subscriptions.len(), 2);

        let first = &list.subscriptions[0];
        assert_eq!(first.id, "UC123");
        assert_eq!(first.name, "Tech Channel");
        assert_eq!(first.url, "https://www.youtube.com/channel/UC123");
    }

    #[test]
    fn empty_list_keeps_version_tag() {
        let list = PortableList::from_channels(&[]);
        let value = serde_json::to_value(&list).unwrap();
        assert_eq!(value["app_version"], "0.26.1");
        assert_eq!(value["app_version_int"], 996);
        assert_eq!(value["subscriptions"], serde_json::json!([]));
    }

    #[test]
    fn reads_back_channels() {
        let list = PortableList::from_channels(&sample());
        let json = serde_json::to_string(&list).unwrap();
        let parsed: PortableList = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.channels(), sample());
    }
}
