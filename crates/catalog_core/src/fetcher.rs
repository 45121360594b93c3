use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use shared::{domain::Collection, protocol::CatalogPage};
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

pub const DEFAULT_LIST_URL: &str = "https://dummyjson.com/products";
pub const DEFAULT_SEARCH_URL: &str = "https://dummyjson.com/products/search";
pub const DEFAULT_SEARCH_PARAM: &str = "q";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid catalog url '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("request to {url} failed: {source}")]
    Transport { url: Url, source: reqwest::Error },
    #[error("{url} responded with status {status}")]
    Status { url: Url, status: StatusCode },
    #[error("malformed catalog response from {url}: {source}")]
    Decode {
        url: Url,
        source: serde_json::Error,
    },
}

/// Where products come from. The controller only ever talks to this seam.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_all(&self) -> Result<Collection, FetchError>;
    async fn fetch_by_query(&self, query: &str) -> Result<Collection, FetchError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEndpoints {
    pub list_url: String,
    pub search_url: String,
    pub search_param: String,
}

impl Default for CatalogEndpoints {
    fn default() -> Self {
        Self {
            list_url: DEFAULT_LIST_URL.into(),
            search_url: DEFAULT_SEARCH_URL.into(),
            search_param: DEFAULT_SEARCH_PARAM.into(),
        }
    }
}

pub struct CatalogClient {
    http: Client,
    endpoints: CatalogEndpoints,
}

impl CatalogClient {
    pub fn new(endpoints: CatalogEndpoints) -> Self {
        Self {
            http: Client::new(),
            endpoints,
        }
    }

    pub fn endpoints(&self) -> &CatalogEndpoints {
        &self.endpoints
    }

    pub fn list_url(&self) -> Result<Url, FetchError> {
        parse_url(&self.endpoints.list_url)
    }

    /// Builds the search URL, percent-encoding the query the way browsers'
    /// `encodeURIComponent` does (spaces become `%20`, not `+`).
    pub fn search_url(&self, query: &str) -> Result<Url, FetchError> {
        let base = self.endpoints.search_url.trim_end_matches(['?', '&']);
        let separator = if base.contains('?') { '&' } else { '?' };
        parse_url(&format!(
            "{base}{separator}{}={}",
            urlencoding::encode(&self.endpoints.search_param),
            urlencoding::encode(query)
        ))
    }

    async fn get_collection(&self, url: Url) -> Result<Collection, FetchError> {
        debug!(%url, "requesting catalog page");
        let res = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = res.status();
        if !status.is_success() {
            return Err(FetchError::Status { url, status });
        }

        let body = res.bytes().await.map_err(|source| FetchError::Transport {
            url: url.clone(),
            source,
        })?;
        let page: CatalogPage =
            serde_json::from_slice(&body).map_err(|source| FetchError::Decode {
                url: url.clone(),
                source,
            })?;

        info!(
            %url,
            count = page.products.len(),
            total = ?page.total,
            "catalog page decoded"
        );
        Ok(page.products)
    }
}

#[async_trait]
impl CatalogSource for CatalogClient {
    async fn fetch_all(&self) -> Result<Collection, FetchError> {
        let url = self.list_url()?;
        self.get_collection(url).await.inspect_err(|error| {
            warn!(%error, "catalog listing failed");
        })
    }

    async fn fetch_by_query(&self, query: &str) -> Result<Collection, FetchError> {
        let url = self.search_url(query)?;
        self.get_collection(url).await.inspect_err(|error| {
            warn!(%error, query, "catalog search failed");
        })
    }
}

fn parse_url(raw: &str) -> Result<Url, FetchError> {
    Url::parse(raw).map_err(|source| FetchError::InvalidUrl {
        url: raw.to_string(),
        source,
    })
}

#[cfg(test)]
#[path = "tests/fetcher_tests.rs"]
mod tests;
