//! Star Wars Databank API client
//!
//! Fetches catalog pages from the Databank REST API and converts the wire
//! shape into the canonical [`CatalogPage`] the rest of the application (and
//! the response cache) works with.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use super::repository::CatalogFetcher;
use super::{CatalogItem, CatalogPage, Endpoint, PageInfo};

/// Errors that can occur when fetching catalog data
///
/// These pass through the caching layer untouched; nothing in the repository
/// chain converts or retries them.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure (DNS, connect, TLS, timeout)
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("API request failed with status {status}")]
    Api {
        /// HTTP status code of the response
        status: u16,
    },

    /// The response body did not match the expected shape
    #[error("Failed to decode API response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Wire shape of a Databank page response
#[derive(Debug, Deserialize)]
struct RawPage {
    info: RawInfo,
    data: Vec<RawItem>,
}

#[derive(Debug, Deserialize)]
struct RawInfo {
    total: u32,
    page: u32,
    limit: u32,
    next: Option<String>,
    prev: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawItem {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    image: String,
}

/// Client for the Star Wars Databank REST API
#[derive(Debug, Clone)]
pub struct DatabankClient {
    client: Client,
    base_url: String,
    asset_base_url: String,
}

impl DatabankClient {
    /// Creates a new client.
    ///
    /// # Arguments
    /// * `base_url` - API root, e.g. `https://starwars-databank-server.vercel.app/api/v1`
    /// * `asset_base_url` - Root against which relative image paths resolve
    pub fn new(base_url: impl Into<String>, asset_base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            asset_base_url: asset_base_url.into(),
        }
    }

    /// Creates a client with a custom reqwest client
    #[allow(dead_code)]
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Fetches one page from a catalog section.
    ///
    /// # Arguments
    /// * `endpoint` - Catalog section to query
    /// * `page` - 1-based page number
    /// * `limit` - Page size
    /// * `search` - Optional name filter passed to the API
    ///
    /// # Returns
    /// * `Ok(CatalogPage)` - The normalized page
    /// * `Err(FetchError)` - If the request, the status, or the body decoding fails
    pub async fn fetch_page(
        &self,
        endpoint: Endpoint,
        page: u32,
        limit: u32,
        search: Option<&str>,
    ) -> Result<CatalogPage, FetchError> {
        let url = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.as_str()
        );

        let mut query: Vec<(&str, String)> =
            vec![("page", page.to_string()), ("limit", limit.to_string())];
        if let Some(term) = search {
            query.push(("name", term.to_string()));
        }

        let response = self.client.get(&url).query(&query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Api {
                status: status.as_u16(),
            });
        }

        let text = response.text().await?;
        let raw: RawPage = serde_json::from_str(&text)?;

        Ok(normalize_page(raw, endpoint, &self.asset_base_url))
    }
}

#[async_trait]
impl CatalogFetcher for DatabankClient {
    async fn fetch(
        &self,
        endpoint: Endpoint,
        page: u32,
        limit: u32,
        _use_cache: bool,
        search: Option<&str>,
    ) -> Result<CatalogPage, FetchError> {
        self.fetch_page(endpoint, page, limit, search).await
    }
}

/// Converts a wire page into the canonical shape.
///
/// Runs before anything reaches the cache, so cached entries are always
/// normalized: image URLs resolved, page count derived, and next/prev links
/// reduced to booleans.
fn normalize_page(raw: RawPage, endpoint: Endpoint, asset_base_url: &str) -> CatalogPage {
    let items = raw
        .data
        .into_iter()
        .map(|item| CatalogItem {
            image: normalize_image_url(&item.image, endpoint, asset_base_url),
            id: item.id,
            name: item.name,
            description: item.description,
        })
        .collect();

    let limit = raw.info.limit.max(1);
    let total_pages = ((raw.info.total + limit - 1) / limit).max(1);

    CatalogPage {
        items,
        info: PageInfo {
            total: raw.info.total,
            page: raw.info.page,
            limit: raw.info.limit,
            total_pages,
            has_next: raw.info.next.is_some(),
            has_prev: raw.info.prev.is_some(),
        },
    }
}

/// Resolves a record's image reference into an absolute URL.
///
/// Empty or whitespace-only references become `None`; absolute URLs pass
/// through; relative paths resolve against the asset base and the section
/// name.
fn normalize_image_url(raw: &str, endpoint: Endpoint, asset_base_url: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        return Some(trimmed.to_string());
    }

    Some(format!(
        "{}/{}/{}",
        asset_base_url.trim_end_matches('/'),
        endpoint.as_str(),
        trimmed.trim_matches('/')
    ))
}
