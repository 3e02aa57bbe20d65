pub mod analyzer;
pub mod batch;
pub mod progress;
pub mod recorder;
pub mod selection;
pub mod traits;

pub use analyzer::AnalysisPipeline;
pub use batch::{BatchItem, BatchRunner};
pub use progress::{ProgressEvent, Status, TracingSink};
pub use recorder::WebhookRecorder;
pub use selection::{other_good_keywords, select_best, GOOD_RANK_THRESHOLD};
pub use traits::{
    ContentFetcher, ProgressSink, RankProbe, RecentPostsLister, RecordSink, ResultStore,
    VolumeSource,
};
