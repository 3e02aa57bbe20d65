use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A blog post as obtained from the content fetcher. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPost {
    pub title: String,
    pub content: String,
    /// Author-supplied tags already present in the page markup.
    pub hashtags: Vec<String>,
    pub blog_id: String,
    pub url: String,
}

/// A recent-post listing entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostSummary {
    pub title: String,
    pub link: String,
}

/// Rank of one pool keyword. `rank` is `None` when the post was not found
/// within the 100-result search horizon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankEntry {
    pub keyword: String,
    pub rank: Option<u32>,
}

/// Monthly query volume for a keyword, split by device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchVolume {
    pub pc: u64,
    pub mobile: u64,
    pub total: u64,
}

impl SearchVolume {
    pub fn new(pc: u64, mobile: u64) -> Self {
        Self {
            pc,
            mobile,
            total: pc + mobile,
        }
    }
}

/// Exposure grade derived from the best rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    S,
    A,
    B,
    C,
    Unexposed,
}

impl Grade {
    /// Closed-interval grading: 1 -> S, 2-5 -> A, 6-10 -> B, 11-30 -> C,
    /// anything deeper or unranked -> Unexposed.
    pub fn from_rank(rank: Option<u32>) -> Self {
        match rank {
            Some(1) => Grade::S,
            Some(2..=5) => Grade::A,
            Some(6..=10) => Grade::B,
            Some(11..=30) => Grade::C,
            _ => Grade::Unexposed,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Grade::S => "S",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::Unexposed => "미노출",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The aggregate outcome of one post analysis. Built once by the pipeline
/// and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub blog_id: String,
    pub url: String,
    pub title: String,
    pub hashtags: Vec<String>,
    pub smart_keywords: Vec<String>,
    pub pool: Vec<String>,
    /// Rank of the full title text, diagnostic only.
    pub title_rank: Option<u32>,
    /// One entry per pool member, in pool order.
    pub ranks: Vec<RankEntry>,
    pub best_keyword: Option<String>,
    pub best_rank: Option<u32>,
    /// Ranked entries other than the best with rank <= 10, ascending.
    pub other_good_keywords: Vec<RankEntry>,
    pub final_keyword: Option<String>,
    pub search_volume: Option<SearchVolume>,
    pub grade: Grade,
    pub analyzed_at: DateTime<Utc>,
}

impl AnalysisResult {
    pub fn grade_label(&self) -> &'static str {
        self.grade.label()
    }
}
