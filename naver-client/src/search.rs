use crate::throttle::Throttle;
use blogrank_core::{CoreError, SearchApiError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

const SEARCH_API_BASE: &str = "https://openapi.naver.com/v1/search/blog.json";

/// Results fetched per page.
pub const PAGE_SIZE: u32 = 10;

/// Maximum result depth scanned before concluding "not found".
pub const RANK_HORIZON: u32 = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub bloggername: String,
    #[serde(default)]
    pub bloggerlink: String,
    #[serde(default)]
    pub postdate: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub start: u32,
    #[serde(default)]
    pub display: u32,
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

/// Client for the Naver Open API blog search. Authentication is two static
/// headers; there is no token flow.
#[derive(Debug)]
pub struct SearchClient {
    http_client: Client,
    client_id: String,
    client_secret: String,
    throttle: Throttle,
}

impl SearchClient {
    pub fn new(client_id: String, client_secret: String, timeout: Duration) -> Self {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            client_id,
            client_secret,
            throttle: Throttle::new(Duration::from_millis(200)),
        }
    }

    async fn fetch_page(&self, keyword: &str, start: u32) -> Result<SearchResponse, CoreError> {
        self.throttle.pace().await;

        let display = PAGE_SIZE.to_string();
        let start_param = start.to_string();
        let params = [
            ("query", keyword),
            ("display", display.as_str()),
            ("start", start_param.as_str()),
        ];

        debug!("Search request: query={} start={}", keyword, start);
        let response = self
            .http_client
            .get(SEARCH_API_BASE)
            .header("X-Naver-Client-Id", &self.client_id)
            .header("X-Naver-Client-Secret", &self.client_secret)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CoreError::SearchApi(SearchApiError::RequestTimeout)
                } else {
                    CoreError::Network(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(match status.as_u16() {
                401 | 403 => CoreError::SearchApi(SearchApiError::AuthenticationFailed {
                    reason: format!("HTTP {}", status),
                }),
                429 => CoreError::SearchApi(SearchApiError::RateLimited),
                code if status.is_server_error() => {
                    CoreError::SearchApi(SearchApiError::ServerError { status_code: code })
                }
                _ => CoreError::SearchApi(SearchApiError::InvalidResponse {
                    details: format!("unexpected HTTP {}", status),
                }),
            });
        }

        let page: SearchResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse search response: {}", e);
            CoreError::SearchApi(SearchApiError::InvalidResponse {
                details: "failed to parse search response".to_string(),
            })
        })?;

        Ok(page)
    }

    /// Scans the search results for `keyword` in pages of ten up to the
    /// rank horizon and returns the 1-indexed position of the first item
    /// belonging to `target_blog_id`. Any failure is logged and degrades to
    /// `None`; ranking is best-effort and never aborts the caller.
    pub async fn probe_rank(&self, keyword: &str, target_blog_id: &str) -> Option<u32> {
        let mut scanned: u32 = 0;

        while scanned < RANK_HORIZON {
            let page = match self.fetch_page(keyword, scanned + 1).await {
                Ok(page) => page,
                Err(e) => {
                    warn!("Rank probe for '{}' failed: {}", keyword, e);
                    return None;
                }
            };

            if let Some(rank) = match_in_page(&page.items, target_blog_id, scanned) {
                info!("'{}' ranks #{} for blog {}", keyword, rank, target_blog_id);
                return Some(rank);
            }

            if (page.items.len() as u32) < PAGE_SIZE {
                debug!(
                    "Search results for '{}' exhausted after {} items",
                    keyword,
                    scanned + page.items.len() as u32
                );
                return None;
            }

            scanned += PAGE_SIZE;
        }

        debug!("'{}' not found within top {}", keyword, RANK_HORIZON);
        None
    }
}

/// Position of the first item in `items` whose link (or owner link) contains
/// `blog.naver.com/{blog_id}` case-insensitively. `already_scanned` is the
/// number of items consumed on earlier pages; the returned rank is absolute
/// and 1-indexed.
pub fn match_in_page(items: &[SearchItem], blog_id: &str, already_scanned: u32) -> Option<u32> {
    let pattern = format!("blog.naver.com/{}", blog_id).to_lowercase();
    for (offset, item) in items.iter().enumerate() {
        if item.link.to_lowercase().contains(&pattern)
            || item.bloggerlink.to_lowercase().contains(&pattern)
        {
            return Some(already_scanned + offset as u32 + 1);
        }
    }
    None
}
