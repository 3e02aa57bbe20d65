use crate::progress::{ProgressEvent, Status};
use crate::selection::{other_good_keywords, select_best};
use crate::traits::{ContentFetcher, ProgressSink, RankProbe, VolumeSource};
use blogrank_core::{AnalysisResult, CoreError, ErrorExt, Grade, RankEntry, RawPost};
use chrono::Utc;
use keyword_engine::extract_keywords;
use std::sync::Arc;
use tracing::{debug, info};

/// Runs one post through extraction, rank probing, selection and optional
/// volume enrichment. Probes are issued strictly one at a time; the search
/// API is rate sensitive and the running rank counter depends on page order.
pub struct AnalysisPipeline {
    prober: Arc<dyn RankProbe>,
    volume: Option<Arc<dyn VolumeSource>>,
    progress: Arc<dyn ProgressSink>,
    status: std::sync::Mutex<Status>,
}

impl AnalysisPipeline {
    pub fn new(
        prober: Arc<dyn RankProbe>,
        volume: Option<Arc<dyn VolumeSource>>,
        progress: Arc<dyn ProgressSink>,
    ) -> Self {
        Self {
            prober,
            volume,
            progress,
            status: std::sync::Mutex::new(Status::Idle),
        }
    }

    pub fn status(&self) -> Status {
        *self.status.lock().expect("status lock poisoned")
    }

    fn advance(&self, status: Status) {
        *self.status.lock().expect("status lock poisoned") = status;
    }

    fn emit(&self, event: ProgressEvent) {
        self.progress.emit(event);
    }

    /// Fetches a post and analyzes it. A fetch failure is terminal for the
    /// post: it is logged, surfaced as a `Failed` event, and propagated
    /// without any partial result.
    pub async fn analyze_url(
        &self,
        fetcher: &dyn ContentFetcher,
        url: &str,
    ) -> Result<AnalysisResult, CoreError> {
        self.emit(ProgressEvent::Started {
            url: url.to_string(),
        });

        let post = match fetcher.fetch_post(url).await {
            Ok(post) => post,
            Err(e) => {
                let err = CoreError::Fetch(e);
                err.log_error();
                self.advance(Status::Error);
                self.emit(ProgressEvent::Failed {
                    message: err.user_friendly_message(),
                });
                return Err(err);
            }
        };

        Ok(self.analyze(&post).await)
    }

    /// Analyzes an already-fetched post. Every failure past this point is
    /// degraded inside its probe, so the analysis itself always completes.
    pub async fn analyze(&self, post: &RawPost) -> AnalysisResult {
        info!("Analyzing '{}' ({})", post.title, post.url);

        self.advance(Status::Extracting);
        self.emit(ProgressEvent::Extracting);
        let keywords = extract_keywords(&post.title, &post.content, &post.hashtags);
        self.emit(ProgressEvent::ExtractionDone {
            hashtags: keywords.hashtags.len(),
            smart_keywords: keywords.smart_keywords.len(),
            pool: keywords.pool.len(),
        });

        // Diagnostic probe: how the full title itself performs.
        self.advance(Status::ProbingTitle);
        self.emit(ProgressEvent::ProbingTitle);
        let title_rank = self.prober.probe_rank(&post.title, &post.blog_id).await;
        self.emit(ProgressEvent::TitleProbed { rank: title_rank });

        self.advance(Status::ProbingPool);
        let total = keywords.pool.len();
        self.emit(ProgressEvent::ProbingPool { total });
        let mut ranks = Vec::with_capacity(total);
        for (index, keyword) in keywords.pool.iter().enumerate() {
            let rank = self.prober.probe_rank(keyword, &post.blog_id).await;
            self.emit(ProgressEvent::KeywordProbed {
                index,
                total,
                keyword: keyword.clone(),
                rank,
            });
            ranks.push(RankEntry {
                keyword: keyword.clone(),
                rank,
            });
        }

        self.advance(Status::Selecting);
        let (best_keyword, best_rank) = select_best(&ranks);
        let other_good = other_good_keywords(&ranks, best_keyword.as_deref());
        let grade = Grade::from_rank(best_rank);
        self.emit(ProgressEvent::SelectionDone {
            best_keyword: best_keyword.clone(),
            best_rank,
            grade,
        });

        // The final recommendation is the best rank, full stop; volume is
        // attached for display but never re-weights the selection.
        let final_keyword = best_keyword.clone();

        let search_volume = match (&self.volume, final_keyword.as_deref()) {
            (Some(volume_source), Some(keyword)) => {
                self.advance(Status::Enriching);
                let volume = volume_source.volume_for(keyword).await;
                match volume {
                    Some(volume) => self.emit(ProgressEvent::EnrichmentDone {
                        keyword: keyword.to_string(),
                        volume,
                    }),
                    None => debug!("No volume available for '{}'", keyword),
                }
                volume
            }
            (None, Some(_)) => {
                self.emit(ProgressEvent::EnrichmentSkipped);
                None
            }
            _ => None,
        };

        self.advance(Status::Complete);
        self.emit(ProgressEvent::Completed {
            final_keyword: final_keyword.clone(),
            grade,
        });

        AnalysisResult {
            blog_id: post.blog_id.clone(),
            url: post.url.clone(),
            title: post.title.clone(),
            hashtags: keywords.hashtags,
            smart_keywords: keywords.smart_keywords,
            pool: keywords.pool,
            title_rank,
            ranks,
            best_keyword,
            best_rank,
            other_good_keywords: other_good,
            final_keyword,
            search_volume,
            grade,
            analyzed_at: Utc::now(),
        }
    }
}
