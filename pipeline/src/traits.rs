use crate::progress::ProgressEvent;
use async_trait::async_trait;
use blogrank_core::{
    AnalysisResult, DatabaseError, FetchError, PostSummary, RawPost, SearchVolume,
};

/// Fetches a post document. Failure here is fatal for the affected post.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch_post(&self, url: &str) -> Result<RawPost, FetchError>;
}

/// Lists a blog's recent posts. An empty list is a valid outcome.
#[async_trait]
pub trait RecentPostsLister: Send + Sync {
    async fn list_recent(&self, blog_id: &str, count: u32)
        -> Result<Vec<PostSummary>, FetchError>;
}

/// Looks up the organic rank of one keyword. Best-effort: failures inside
/// the probe degrade to `None` and never surface here.
#[async_trait]
pub trait RankProbe: Send + Sync {
    async fn probe_rank(&self, keyword: &str, target_blog_id: &str) -> Option<u32>;
}

/// Monthly search volume lookup. Best-effort like the rank probe.
#[async_trait]
pub trait VolumeSource: Send + Sync {
    async fn volume_for(&self, keyword: &str) -> Option<SearchVolume>;
}

/// Local, append-only persistence of analysis results.
#[async_trait]
pub trait ResultStore: Send + Sync {
    async fn save(&self, result: &AnalysisResult) -> Result<(), DatabaseError>;
}

/// Remote fire-and-forget record append. Implementations swallow their own
/// failures; callers never observe them.
#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn append_log(&self, line: &str);
    async fn append_result(&self, result: &AnalysisResult);
}

/// Receives the ordered progress event stream. `emit` must not block or
/// panic; it is called many times per analysis from the orchestrating flow.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: ProgressEvent);
}

#[async_trait]
impl ContentFetcher for naver_client::BlogFetcher {
    async fn fetch_post(&self, url: &str) -> Result<RawPost, FetchError> {
        naver_client::BlogFetcher::fetch_post(self, url).await
    }
}

#[async_trait]
impl RecentPostsLister for naver_client::BlogFetcher {
    async fn list_recent(
        &self,
        blog_id: &str,
        count: u32,
    ) -> Result<Vec<PostSummary>, FetchError> {
        naver_client::BlogFetcher::list_recent(self, blog_id, count).await
    }
}

#[async_trait]
impl RankProbe for naver_client::SearchClient {
    async fn probe_rank(&self, keyword: &str, target_blog_id: &str) -> Option<u32> {
        naver_client::SearchClient::probe_rank(self, keyword, target_blog_id).await
    }
}

#[async_trait]
impl VolumeSource for naver_client::VolumeClient {
    async fn volume_for(&self, keyword: &str) -> Option<SearchVolume> {
        naver_client::VolumeClient::volume_for(self, keyword).await
    }
}

#[async_trait]
impl ResultStore for database::Database {
    async fn save(&self, result: &AnalysisResult) -> Result<(), DatabaseError> {
        self.save_result(result).await.map(|_| ())
    }
}
