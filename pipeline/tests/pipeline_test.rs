use async_trait::async_trait;
use blogrank_core::{
    AnalysisResult, DatabaseError, FetchError, Grade, PostSummary, RawPost, SearchVolume,
};
use pipeline::{
    AnalysisPipeline, BatchRunner, ContentFetcher, ProgressEvent, ProgressSink, RankProbe,
    RecentPostsLister, RecordSink, ResultStore, Status, VolumeSource,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

struct FakeProber {
    ranks: HashMap<String, u32>,
    probed: Mutex<Vec<String>>,
}

impl FakeProber {
    fn new(ranks: &[(&str, u32)]) -> Self {
        Self {
            ranks: ranks
                .iter()
                .map(|(keyword, rank)| (keyword.to_string(), *rank))
                .collect(),
            probed: Mutex::new(Vec::new()),
        }
    }

    fn probed(&self) -> Vec<String> {
        self.probed.lock().unwrap().clone()
    }
}

#[async_trait]
impl RankProbe for FakeProber {
    async fn probe_rank(&self, keyword: &str, _target_blog_id: &str) -> Option<u32> {
        self.probed.lock().unwrap().push(keyword.to_string());
        self.ranks.get(keyword).copied()
    }
}

struct FakeVolume;

#[async_trait]
impl VolumeSource for FakeVolume {
    async fn volume_for(&self, _keyword: &str) -> Option<SearchVolume> {
        Some(SearchVolume::new(880, 2400))
    }
}

#[derive(Default)]
struct CollectingSink {
    lines: Mutex<Vec<String>>,
}

impl CollectingSink {
    fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl ProgressSink for CollectingSink {
    fn emit(&self, event: ProgressEvent) {
        self.lines.lock().unwrap().push(event.to_string());
    }
}

struct FakeFetcher {
    posts: HashMap<String, RawPost>,
}

impl FakeFetcher {
    fn with_post(post: RawPost) -> Self {
        let mut posts = HashMap::new();
        posts.insert(post.url.clone(), post);
        Self { posts }
    }
}

#[async_trait]
impl ContentFetcher for FakeFetcher {
    async fn fetch_post(&self, url: &str) -> Result<RawPost, FetchError> {
        self.posts
            .get(url)
            .cloned()
            .ok_or(FetchError::DocumentUnavailable {
                details: "missing".to_string(),
            })
    }
}

struct FakeLister {
    summaries: Vec<PostSummary>,
}

#[async_trait]
impl RecentPostsLister for FakeLister {
    async fn list_recent(
        &self,
        _blog_id: &str,
        _count: u32,
    ) -> Result<Vec<PostSummary>, FetchError> {
        Ok(self.summaries.clone())
    }
}

#[derive(Default)]
struct CollectingRecorder {
    logs: Mutex<Vec<String>>,
    results: AtomicUsize,
}

#[async_trait]
impl RecordSink for CollectingRecorder {
    async fn append_log(&self, line: &str) {
        self.logs.lock().unwrap().push(line.to_string());
    }

    async fn append_result(&self, _result: &AnalysisResult) {
        self.results.fetch_add(1, Ordering::SeqCst);
    }
}

struct FailingStore {
    attempts: AtomicUsize,
}

#[async_trait]
impl ResultStore for FailingStore {
    async fn save(&self, _result: &AnalysisResult) -> Result<(), DatabaseError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(DatabaseError::QueryFailed {
            query: "disk full".to_string(),
        })
    }
}

fn restaurant_post() -> RawPost {
    RawPost {
        // Latin title keeps noun extraction out of the way so the pool is
        // exactly the two markup tags.
        title: "weekend".to_string(),
        content: String::new(),
        hashtags: vec!["맛집".to_string(), "강남 맛집".to_string()],
        blog_id: "myblog".to_string(),
        url: "https://blog.naver.com/myblog/223000000001".to_string(),
    }
}

#[tokio::test]
async fn test_best_keyword_wins_and_grades() {
    let prober = Arc::new(FakeProber::new(&[("맛집", 15), ("강남 맛집", 2)]));
    let sink = Arc::new(CollectingSink::default());
    let analysis_pipeline = AnalysisPipeline::new(prober.clone(), None, sink);

    let result = analysis_pipeline.analyze(&restaurant_post()).await;

    assert_eq!(result.pool, vec!["맛집".to_string(), "강남 맛집".to_string()]);
    assert_eq!(result.best_keyword.as_deref(), Some("강남 맛집"));
    assert_eq!(result.best_rank, Some(2));
    assert_eq!(result.final_keyword.as_deref(), Some("강남 맛집"));
    assert_eq!(result.grade, Grade::A);
    // 15 is outside the top ten, so nothing else qualifies.
    assert!(result.other_good_keywords.is_empty());
    assert_eq!(analysis_pipeline.status(), Status::Complete);
}

#[tokio::test]
async fn test_probes_run_in_pool_order_after_title() {
    let prober = Arc::new(FakeProber::new(&[("맛집", 15), ("강남 맛집", 2)]));
    let sink = Arc::new(CollectingSink::default());
    let analysis_pipeline = AnalysisPipeline::new(prober.clone(), None, sink);

    analysis_pipeline.analyze(&restaurant_post()).await;

    assert_eq!(
        prober.probed(),
        vec![
            "weekend".to_string(),
            "맛집".to_string(),
            "강남 맛집".to_string()
        ]
    );
}

#[tokio::test]
async fn test_all_unranked_completes_without_best() {
    let prober = Arc::new(FakeProber::new(&[]));
    let sink = Arc::new(CollectingSink::default());
    let analysis_pipeline = AnalysisPipeline::new(prober, None, sink);

    let result = analysis_pipeline.analyze(&restaurant_post()).await;

    assert_eq!(result.best_keyword, None);
    assert_eq!(result.best_rank, None);
    assert_eq!(result.final_keyword, None);
    assert!(result.other_good_keywords.is_empty());
    assert_eq!(result.grade, Grade::Unexposed);
    // Rank entries still cover the whole pool, in order.
    assert_eq!(result.ranks.len(), 2);
    assert!(result.ranks.iter().all(|entry| entry.rank.is_none()));
}

#[tokio::test]
async fn test_progress_events_arrive_in_step_order() {
    let prober = Arc::new(FakeProber::new(&[("맛집", 15), ("강남 맛집", 2)]));
    let sink = Arc::new(CollectingSink::default());
    let analysis_pipeline = AnalysisPipeline::new(prober, None, sink.clone());

    analysis_pipeline.analyze(&restaurant_post()).await;

    let lines = sink.lines();
    let position = |needle: &str| {
        lines
            .iter()
            .position(|line| line.contains(needle))
            .unwrap_or_else(|| panic!("no line containing '{}'", needle))
    };

    let extracting = position("키워드 추출 중");
    let extraction_done = position("키워드 추출 완료");
    let title_probe = position("제목 전체로");
    let first_keyword = position("[1/2]");
    let second_keyword = position("[2/2]");
    let selection = position("최적 키워드");
    let completed = position("분석 완료");

    assert!(extracting < extraction_done);
    assert!(extraction_done < title_probe);
    assert!(title_probe < first_keyword);
    assert!(first_keyword < second_keyword);
    assert!(second_keyword < selection);
    assert!(selection < completed);
}

#[tokio::test]
async fn test_volume_enrichment_attaches_but_never_reselects() {
    let prober = Arc::new(FakeProber::new(&[("맛집", 15), ("강남 맛집", 2)]));
    let sink = Arc::new(CollectingSink::default());
    let analysis_pipeline =
        AnalysisPipeline::new(prober, Some(Arc::new(FakeVolume)), sink);

    let result = analysis_pipeline.analyze(&restaurant_post()).await;

    assert_eq!(result.final_keyword.as_deref(), Some("강남 맛집"));
    let volume = result.search_volume.expect("volume should be attached");
    assert_eq!(volume.total, 3280);
}

#[tokio::test]
async fn test_fetch_failure_is_terminal_and_emits_failed() {
    let prober = Arc::new(FakeProber::new(&[]));
    let sink = Arc::new(CollectingSink::default());
    let analysis_pipeline = AnalysisPipeline::new(prober, None, sink.clone());
    let fetcher = FakeFetcher {
        posts: HashMap::new(),
    };

    let outcome = analysis_pipeline
        .analyze_url(&fetcher, "https://blog.naver.com/myblog/1")
        .await;

    assert!(outcome.is_err());
    assert_eq!(analysis_pipeline.status(), Status::Error);
    let lines = sink.lines();
    assert!(lines.iter().any(|line| line.contains("분석 실패")));
}

#[tokio::test]
async fn test_batch_continues_past_a_failed_post() {
    let good_post = restaurant_post();
    let good_url = good_post.url.clone();
    let prober = Arc::new(FakeProber::new(&[("강남 맛집", 2)]));
    let sink = Arc::new(CollectingSink::default());
    let analysis_pipeline = Arc::new(AnalysisPipeline::new(prober, None, sink));
    let fetcher = Arc::new(FakeFetcher::with_post(good_post));

    let runner = BatchRunner::new(
        analysis_pipeline,
        fetcher,
        None,
        None,
        Duration::from_millis(1),
    );

    let lister = FakeLister {
        summaries: vec![
            PostSummary {
                title: "사라진 글".to_string(),
                link: "https://blog.naver.com/myblog/0".to_string(),
            },
            PostSummary {
                title: "맛집 글".to_string(),
                link: good_url,
            },
        ],
    };

    let items = runner.analyze_recent(&lister, "myblog", 2).await.unwrap();

    assert_eq!(items.len(), 2);
    assert!(items[0].outcome.is_err());
    let second = items[1].outcome.as_ref().expect("second post should pass");
    assert_eq!(second.best_keyword.as_deref(), Some("강남 맛집"));
}

#[tokio::test]
async fn test_empty_listing_is_not_an_error() {
    let prober = Arc::new(FakeProber::new(&[]));
    let sink = Arc::new(CollectingSink::default());
    let analysis_pipeline = Arc::new(AnalysisPipeline::new(prober, None, sink));
    let fetcher = Arc::new(FakeFetcher {
        posts: HashMap::new(),
    });

    let runner = BatchRunner::new(
        analysis_pipeline,
        fetcher,
        None,
        None,
        Duration::from_millis(1),
    );
    let lister = FakeLister { summaries: vec![] };

    let items = runner.analyze_recent(&lister, "emptyblog", 5).await.unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn test_recorder_sees_batch_log_and_result_rows() {
    let good_post = restaurant_post();
    let good_url = good_post.url.clone();
    let prober = Arc::new(FakeProber::new(&[("강남 맛집", 2)]));
    let sink = Arc::new(CollectingSink::default());
    let analysis_pipeline = Arc::new(AnalysisPipeline::new(prober, None, sink));
    let fetcher = Arc::new(FakeFetcher::with_post(good_post));
    let recorder = Arc::new(CollectingRecorder::default());

    let runner = BatchRunner::new(
        analysis_pipeline,
        fetcher,
        None,
        Some(recorder.clone()),
        Duration::from_millis(1),
    );

    let lister = FakeLister {
        summaries: vec![
            PostSummary {
                title: "사라진 글".to_string(),
                link: "https://blog.naver.com/myblog/0".to_string(),
            },
            PostSummary {
                title: "맛집 글".to_string(),
                link: good_url,
            },
        ],
    };

    runner.analyze_recent(&lister, "myblog", 2).await.unwrap();

    let logs = recorder.logs.lock().unwrap().clone();
    assert!(logs.iter().any(|line| line.contains("배치 시작")));
    assert!(logs.iter().any(|line| line.contains("분석 실패")));
    // Only the successful post produces a result row.
    assert_eq!(recorder.results.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_store_failure_does_not_cost_the_result() {
    let post = restaurant_post();
    let url = post.url.clone();
    let prober = Arc::new(FakeProber::new(&[("강남 맛집", 2)]));
    let sink = Arc::new(CollectingSink::default());
    let analysis_pipeline = Arc::new(AnalysisPipeline::new(prober, None, sink));
    let fetcher = Arc::new(FakeFetcher::with_post(post));
    let store = Arc::new(FailingStore {
        attempts: AtomicUsize::new(0),
    });

    let runner = BatchRunner::new(
        analysis_pipeline,
        fetcher,
        Some(store.clone()),
        None,
        Duration::from_millis(1),
    );

    let result = runner.analyze_url(&url).await.expect("analysis should pass");
    assert_eq!(result.best_keyword.as_deref(), Some("강남 맛집"));
    assert_eq!(store.attempts.load(Ordering::SeqCst), 1);
}
