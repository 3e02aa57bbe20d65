use crate::analyzer::AnalysisPipeline;
use crate::traits::{ContentFetcher, RecentPostsLister, RecordSink, ResultStore};
use blogrank_core::{AnalysisResult, CoreError, ErrorExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// Outcome of one post inside a batch run. Failures are isolated: a failed
/// post never stops the posts after it.
#[derive(Debug)]
pub struct BatchItem {
    pub url: String,
    pub title: String,
    pub outcome: Result<AnalysisResult, CoreError>,
}

/// Drives whole-blog analysis: list recent posts, analyze each in turn with
/// a pause between posts, persist and record what succeeded.
pub struct BatchRunner {
    pipeline: Arc<AnalysisPipeline>,
    fetcher: Arc<dyn ContentFetcher>,
    store: Option<Arc<dyn ResultStore>>,
    recorder: Option<Arc<dyn RecordSink>>,
    pause_between_posts: Duration,
}

impl BatchRunner {
    pub fn new(
        pipeline: Arc<AnalysisPipeline>,
        fetcher: Arc<dyn ContentFetcher>,
        store: Option<Arc<dyn ResultStore>>,
        recorder: Option<Arc<dyn RecordSink>>,
        pause_between_posts: Duration,
    ) -> Self {
        Self {
            pipeline,
            fetcher,
            store,
            recorder,
            pause_between_posts,
        }
    }

    /// Analyzes a single post end to end, including persistence and the
    /// remote record append. Only the fetch can fail the call; storage and
    /// record failures are logged and the in-memory result still returned.
    pub async fn analyze_url(&self, url: &str) -> Result<AnalysisResult, CoreError> {
        let result = self.pipeline.analyze_url(self.fetcher.as_ref(), url).await?;
        self.persist_and_record(&result).await;
        Ok(result)
    }

    /// Analyzes a blog's recent posts sequentially. Each analysis runs to
    /// completion or failure before the next begins; the pause between
    /// posts keeps the request rate down.
    pub async fn analyze_recent(
        &self,
        lister: &dyn RecentPostsLister,
        blog_id: &str,
        count: u32,
    ) -> Result<Vec<BatchItem>, CoreError> {
        let summaries = lister
            .list_recent(blog_id, count)
            .await
            .map_err(CoreError::Fetch)?;

        if summaries.is_empty() {
            info!("Blog {} has no recent posts to analyze", blog_id);
            return Ok(Vec::new());
        }

        info!(
            "Starting batch of {} posts for blog {}",
            summaries.len(),
            blog_id
        );
        if let Some(recorder) = &self.recorder {
            recorder
                .append_log(&format!("배치 시작: {} ({}건)", blog_id, summaries.len()))
                .await;
        }

        let mut items = Vec::with_capacity(summaries.len());
        for (index, summary) in summaries.into_iter().enumerate() {
            if index > 0 {
                sleep(self.pause_between_posts).await;
            }

            let outcome = self.analyze_url(&summary.link).await;
            if let Err(e) = &outcome {
                warn!("Post '{}' failed: {}", summary.title, e);
                if let Some(recorder) = &self.recorder {
                    recorder
                        .append_log(&format!(
                            "분석 실패: {} ({})",
                            summary.title,
                            e.user_friendly_message()
                        ))
                        .await;
                }
            }
            items.push(BatchItem {
                url: summary.link,
                title: summary.title,
                outcome,
            });
        }

        let succeeded = items.iter().filter(|item| item.outcome.is_ok()).count();
        info!(
            "Batch finished: {}/{} posts analyzed",
            succeeded,
            items.len()
        );
        Ok(items)
    }

    async fn persist_and_record(&self, result: &AnalysisResult) {
        if let Some(store) = &self.store {
            if let Err(e) = store.save(result).await {
                // Caller still gets the in-memory result.
                CoreError::Database(e).log_warn();
            }
        }
        if let Some(recorder) = &self.recorder {
            recorder.append_result(result).await;
        }
    }
}
