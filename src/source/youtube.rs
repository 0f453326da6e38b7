//! YouTube Data API v3 subscription fetcher.
//!
//! Exchanges a stored OAuth refresh token for an access token, then pages
//! through `subscriptions.list` (mine=true, 50 per page) until the API stops
//! returning a next page token. Failures are returned as is; the scheduler
//! that runs us owns retries.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::SubscriptionSource;
use crate::channel::Channel;
use crate::error::{Result, SyncError};

const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const SUBSCRIPTIONS_URL: &str = "https://www.googleapis.com/youtube/v3/subscriptions";
const PAGE_SIZE: &str = "50";

#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

impl Credentials {
    /// Assemble credentials, naming the first one that is missing or blank.
    pub fn from_parts(
        client_id: Option<String>,
        client_secret: Option<String>,
        refresh_token: Option<String>,
    ) -> Result<Self> {
        fn required(value: Option<String>, name: &'static str) -> Result<String> {
            value
                .filter(|v| !v.trim().is_empty())
                .ok_or(SyncError::MissingCredential(name))
        }

        Ok(Credentials {
            client_id: required(client_id, "YOUTUBE_CLIENT_ID")?,
            client_secret: required(client_secret, "YOUTUBE_CLIENT_SECRET")?,
            refresh_token: required(refresh_token, "YOUTUBE_REFRESH_TOKEN")?,
        })
    }
}

// keep secrets out of debug logs
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

pub struct YouTubeSource {
    credentials: Credentials,
    http: Client,
}

impl YouTubeSource {
    pub fn new(credentials: Credentials, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("subsync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| SyncError::Http {
                stage: "http client setup",
                source,
            })?;

        Ok(YouTubeSource { credentials, http })
    }

    fn access_token(&self) -> Result<String> {
        const STAGE: &str = "oauth token exchange";

        let response = self
            .http
            .post(TOKEN_URL)
            .form(&[
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("refresh_token", self.credentials.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .map_err(|source| SyncError::Http { stage: STAGE, source })?;

        let token: TokenResponse = parse_response(response, STAGE)?;
        Ok(token.access_token)
    }

    fn fetch_page(&self, access_token: &str, page_token: Option<&str>) -> Result<SubscriptionPage> {
        const STAGE: &str = "subscriptions.list";

        let mut query = vec![("part", "snippet"), ("mine", "true"), ("maxResults", PAGE_SIZE)];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }

        let response = self
            .http
            .get(SUBSCRIPTIONS_URL)
            .bearer_auth(access_token)
            .query(&query)
            .send()
            .map_err(|source| SyncError::Http { stage: STAGE, source })?;

        parse_response(response, STAGE)
    }
}

impl SubscriptionSource for YouTubeSource {
    fn name(&self) -> &'static str {
        "youtube"
    }

    fn fetch(&self) -> Result<Vec<Channel>> {
        let access_token = self.access_token()?;
        let mut channels = Vec::new();
        let mut page_token: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let page = self.fetch_page(&access_token, page_token.as_deref())?;
            pages += 1;
            tracing::debug!(page = pages, items = page.items.len(), "fetched subscription page");

            channels.extend(page.items.into_iter().map(Channel::from));

            match page.next_page_token {
                Some(next) if !next.is_empty() => page_token = Some(next),
                _ => break,
            }
        }

        tracing::info!(pages, channels = channels.len(), "fetched subscriptions");
        Ok(channels)
    }
}

fn parse_response<T: DeserializeOwned>(response: Response, stage: &'static str) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(SyncError::Api {
            stage,
            status: status.as_u16(),
            body,
        });
    }

    response
        .json::<T>()
        .map_err(|source| SyncError::Http { stage, source })
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubscriptionPage {
    #[serde(default)]
    items: Vec<SubscriptionItem>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SubscriptionItem {
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    title: String,
    resource_id: ResourceId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceId {
    channel_id: String,
}

impl From<SubscriptionItem> for Channel {
    fn from(item: SubscriptionItem) -> Self {
        Channel::new(item.snippet.resource_id.channel_id, item.snippet.title)
    }
}
