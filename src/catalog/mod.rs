//! Release catalogs
//!
//! Answers "what is the newest build of this product and where do I
//! download it". Two backends exist because the vendor has shipped release
//! metadata two ways over the years:
//!
//! - a combined XML update feed listing every product's channels and
//!   builds ([`feed::UpdatesFeed`]), paired with a per-product download
//!   URL template from the config, and
//! - a per-product JSON releases endpoint that returns the latest release
//!   with ready-made download links per platform
//!   ([`releases::ReleasesApi`]).
//!
//! [`ProductCatalog`] routes each product to one of them: a configured
//! product `code` selects the releases endpoint, everything else goes
//! through the feed. The updater only sees the [`ReleaseCatalog`] trait,
//! so tests substitute canned catalogs freely.

pub mod feed;
pub mod releases;

pub use feed::UpdatesFeed;
pub use releases::ReleasesApi;

use anyhow::Result;
use async_trait::async_trait;

use crate::config::ProductConfig;

/// The newest available build of a product and where to fetch it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub build: String,
    pub download_url: String,
}

/// Source of latest-release answers.
#[async_trait]
pub trait ReleaseCatalog: Send + Sync {
    /// Returns the newest release on the product's configured channel.
    async fn latest_release(&self, product: &ProductConfig) -> Result<Release>;
}

/// Routes products to the feed or the releases endpoint.
pub struct ProductCatalog {
    feed: UpdatesFeed,
    releases: ReleasesApi,
}

impl ProductCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self {
            feed: UpdatesFeed::new(),
            releases: ReleasesApi::new(),
        }
    }
}

impl Default for ProductCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReleaseCatalog for ProductCatalog {
    async fn latest_release(&self, product: &ProductConfig) -> Result<Release> {
        if product.code.is_some() {
            self.releases.latest_release(product).await
        } else {
            self.feed.latest_release(product).await
        }
    }
}
