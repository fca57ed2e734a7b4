//! Per-product releases endpoint backend
//!
//! The endpoint answers one product at a time:
//!
//! ```text
//! GET /products/releases?code=CL&latest=true&type=eap
//! ```
//!
//! The response is a JSON object with a single dynamic top-level key (the
//! product code) mapping to an array of release entries. The key is not
//! matched against anything; the object's first value is read generically,
//! and the first entry's `build` and per-platform `downloads` table supply
//! the release.

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use tracing::debug;

use super::{Release, ReleaseCatalog};
use crate::config::ProductConfig;
use crate::core::ToolupError;

/// Default releases endpoint location.
pub const DEFAULT_RELEASES_URL: &str = "https://data.services.jetbrains.com/products/releases";

/// Environment override for the releases endpoint location.
pub const RELEASES_URL_ENV: &str = "TOOLUP_RELEASES_URL";

#[derive(Debug, Deserialize)]
struct ReleaseEntry {
    build: Option<String>,
    #[serde(default)]
    downloads: HashMap<String, DownloadLink>,
}

#[derive(Debug, Deserialize)]
struct DownloadLink {
    link: String,
}

/// Catalog backend over the per-product releases endpoint.
pub struct ReleasesApi {
    client: reqwest::Client,
    url: String,
}

impl ReleasesApi {
    /// Backend querying the default endpoint, honoring
    /// `TOOLUP_RELEASES_URL`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_url(
            env::var(RELEASES_URL_ENV).unwrap_or_else(|_| DEFAULT_RELEASES_URL.to_string()),
        )
    }

    /// Backend querying a specific endpoint URL.
    #[must_use]
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    async fn fetch(&self, product: &ProductConfig, code: &str) -> Result<String> {
        debug!("Querying releases endpoint for {} ({})", product.name, code);
        let query_failed = |reason: String| ToolupError::CatalogQueryFailed {
            product: product.name.clone(),
            url: self.url.clone(),
            reason,
        };

        let response = self
            .client
            .get(&self.url)
            .query(&[("code", code), ("latest", "true"), ("type", product.channel.as_str())])
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

impl Default for ReleasesApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReleaseCatalog for ReleasesApi {
    async fn latest_release(&self, product: &ProductConfig) -> Result<Release> {
        let code = product.code.as_deref().ok_or_else(|| ToolupError::CatalogMalformed {
            product: product.name.clone(),
            reason: "product has no code for the releases endpoint".to_string(),
        })?;

        let document = self.fetch(product, code).await?;
        let release = select_release(&document, &product.name, &product.platform)?;
        debug!("Newest {} build of {}: {}", product.channel, product.name, release.build);
        Ok(release)
    }
}

/// Reads the latest release out of an endpoint response.
fn select_release(
    document: &str,
    product: &str,
    platform: &str,
) -> Result<Release, ToolupError> {
    let malformed = |reason: String| ToolupError::CatalogMalformed {
        product: product.to_string(),
        reason,
    };

    let response: HashMap<String, Vec<ReleaseEntry>> = serde_json::from_str(document)
        .map_err(|e| malformed(format!("unparseable releases response: {e}")))?;

    let entries =
        response.values().next().ok_or_else(|| malformed("empty releases response".to_string()))?;
    let entry = entries.first().ok_or_else(|| malformed("no releases listed".to_string()))?;

    let build = entry
        .build
        .clone()
        .ok_or_else(|| malformed("release entry has no build number".to_string()))?;
    let download_url = entry
        .downloads
        .get(platform)
        .map(|d| d.link.clone())
        .ok_or_else(|| malformed(format!("no download link for platform '{platform}'")))?;

    Ok(Release {
        build,
        download_url,
    })
}
