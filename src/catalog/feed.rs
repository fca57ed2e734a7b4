//! Combined update feed backend
//!
//! The feed is one XML document covering every product:
//!
//! ```xml
//! <products>
//!   <product name="IntelliJ IDEA Ultimate">
//!     <channel id="IC-IU-EAP" status="EAP">
//!       <build number="231.9414" fullNumber="231.9414.13"/>
//!     </channel>
//!   </product>
//! </products>
//! ```
//!
//! Products are matched by display name, channels by their `status`
//! attribute (the feed spells EAP in both cases), and the newest build is
//! the byte-wise greatest `fullNumber`. The feed carries no download
//! links, so feed-resolved products supply a `download_url` template with
//! a `{build}` placeholder.

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::env;
use tracing::debug;

use super::{Release, ReleaseCatalog};
use crate::config::{ProductConfig, ReleaseChannel};
use crate::core::ToolupError;

/// Default combined feed location.
pub const DEFAULT_FEED_URL: &str = "https://www.jetbrains.com/updates/updates.xml";

/// Environment override for the feed location.
pub const FEED_URL_ENV: &str = "TOOLUP_FEED_URL";

#[derive(Debug, Deserialize)]
struct UpdatesDocument {
    #[serde(rename = "product", default)]
    products: Vec<FeedProduct>,
}

#[derive(Debug, Deserialize)]
struct FeedProduct {
    name: String,
    #[serde(rename = "channel", default)]
    channels: Vec<FeedChannel>,
}

#[derive(Debug, Deserialize)]
struct FeedChannel {
    #[serde(default)]
    status: String,
    #[serde(rename = "build", default)]
    builds: Vec<FeedBuild>,
}

#[derive(Debug, Deserialize)]
struct FeedBuild {
    #[serde(rename = "fullNumber")]
    full_number: Option<String>,
}

/// Catalog backend over the combined update feed.
pub struct UpdatesFeed {
    client: reqwest::Client,
    url: String,
}

impl UpdatesFeed {
    /// Backend reading the default feed, honoring `TOOLUP_FEED_URL`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_url(env::var(FEED_URL_ENV).unwrap_or_else(|_| DEFAULT_FEED_URL.to_string()))
    }

    /// Backend reading the feed from a specific URL.
    #[must_use]
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    async fn fetch(&self, product: &str) -> Result<String> {
        debug!("Fetching update feed from {}", self.url);
        let query_failed = |reason: String| ToolupError::CatalogQueryFailed {
            product: product.to_string(),
            url: self.url.clone(),
            reason,
        };

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| query_failed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(query_failed(format!("HTTP {}", response.status())).into());
        }

        let body = response.text().await.map_err(|e| query_failed(e.to_string()))?;
        Ok(body)
    }
}

impl Default for UpdatesFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReleaseCatalog for UpdatesFeed {
    async fn latest_release(&self, product: &ProductConfig) -> Result<Release> {
        let template =
            product.download_url.as_deref().ok_or_else(|| ToolupError::CatalogMalformed {
                product: product.name.clone(),
                reason: "product has no download_url template".to_string(),
            })?;

        let document = self.fetch(&product.name).await?;
        let build = select_build(&document, &product.name, product.channel)?;
        debug!("Newest {} build of {}: {}", product.channel, product.name, build);

        Ok(Release {
            download_url: template.replace("{build}", &build),
            build,
        })
    }
}

/// Picks the newest build for a product out of a feed document.
///
/// Newest means the byte-wise greatest `fullNumber` across every build of
/// every channel whose status matches the requested channel
/// case-insensitively. Builds without a `fullNumber` are ignored. A
/// missing product or a channel with nothing to offer is a
/// [`ToolupError::CatalogMalformed`] rather than a silent skip.
fn select_build(
    document: &str,
    name: &str,
    channel: ReleaseChannel,
) -> Result<String, ToolupError> {
    let malformed = |reason: String| ToolupError::CatalogMalformed {
        product: name.to_string(),
        reason,
    };

    let feed: UpdatesDocument =
        serde_xml_rs::from_str(document).map_err(|e| malformed(format!("unparseable feed: {e}")))?;

    let product = feed
        .products
        .iter()
        .find(|p| p.name == name)
        .ok_or_else(|| malformed("product not present in the update feed".to_string()))?;

    product
        .channels
        .iter()
        .filter(|c| c.status.eq_ignore_ascii_case(channel.as_str()))
        .flat_map(|c| c.builds.iter())
        .filter_map(|b| b.full_number.as_deref())
        .max()
        .map(ToString::to_string)
        .ok_or_else(|| malformed(format!("no {channel} builds listed")))
}
