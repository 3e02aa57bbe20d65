use crate::traits::ProgressSink;
use blogrank_core::{Grade, SearchVolume};
use tracing::info;

/// Pipeline status, advanced strictly in sequence. Any unhandled failure
/// lands in `Error` and the run yields nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    Extracting,
    ProbingTitle,
    ProbingPool,
    Selecting,
    Enriching,
    Complete,
    Error,
}

/// One step of the analysis, emitted in order to the injected sink. Events
/// are immutable; the presentation layer renders them however it likes,
/// `Display` provides the live-log line.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    Started {
        url: String,
    },
    Extracting,
    ExtractionDone {
        hashtags: usize,
        smart_keywords: usize,
        pool: usize,
    },
    ProbingTitle,
    TitleProbed {
        rank: Option<u32>,
    },
    ProbingPool {
        total: usize,
    },
    KeywordProbed {
        index: usize,
        total: usize,
        keyword: String,
        rank: Option<u32>,
    },
    SelectionDone {
        best_keyword: Option<String>,
        best_rank: Option<u32>,
        grade: Grade,
    },
    EnrichmentDone {
        keyword: String,
        volume: SearchVolume,
    },
    EnrichmentSkipped,
    Completed {
        final_keyword: Option<String>,
        grade: Grade,
    },
    Failed {
        message: String,
    },
}

fn rank_label(rank: Option<u32>) -> String {
    match rank {
        Some(rank) => format!("{}위", rank),
        None => "미노출".to_string(),
    }
}

impl std::fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProgressEvent::Started { url } => write!(f, "분석 시작: {}", url),
            ProgressEvent::Extracting => write!(f, "키워드 추출 중..."),
            ProgressEvent::ExtractionDone {
                hashtags,
                smart_keywords,
                pool,
            } => write!(
                f,
                "키워드 추출 완료: 해시태그 {}개, 스마트 키워드 {}개, 검색 대상 {}개",
                hashtags, smart_keywords, pool
            ),
            ProgressEvent::ProbingTitle => write!(f, "제목 전체로 순위 확인 중..."),
            ProgressEvent::TitleProbed { rank } => {
                write!(f, "제목 검색 결과: {}", rank_label(*rank))
            }
            ProgressEvent::ProbingPool { total } => {
                write!(f, "키워드 {}개 순위 조회 시작", total)
            }
            ProgressEvent::KeywordProbed {
                index,
                total,
                keyword,
                rank,
            } => write!(
                f,
                "[{}/{}] '{}' : {}",
                index + 1,
                total,
                keyword,
                rank_label(*rank)
            ),
            ProgressEvent::SelectionDone {
                best_keyword,
                best_rank,
                grade,
            } => match best_keyword {
                Some(keyword) => write!(
                    f,
                    "최적 키워드 '{}' ({}, 등급 {})",
                    keyword,
                    rank_label(*best_rank),
                    grade
                ),
                None => write!(f, "노출된 키워드가 없습니다 (등급 {})", grade),
            },
            ProgressEvent::EnrichmentDone { keyword, volume } => write!(
                f,
                "'{}' 월간 검색량: PC {} + 모바일 {} = {}",
                keyword, volume.pc, volume.mobile, volume.total
            ),
            ProgressEvent::EnrichmentSkipped => {
                write!(f, "검색량 조회 생략 (검색광고 API 미설정)")
            }
            ProgressEvent::Completed {
                final_keyword,
                grade,
            } => match final_keyword {
                Some(keyword) => write!(f, "분석 완료: 추천 키워드 '{}' (등급 {})", keyword, grade),
                None => write!(f, "분석 완료: 추천할 키워드 없음 (등급 {})", grade),
            },
            ProgressEvent::Failed { message } => write!(f, "분석 실패: {}", message),
        }
    }
}

/// Default sink: forwards every event to the tracing log.
#[derive(Debug, Default, Clone)]
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn emit(&self, event: ProgressEvent) {
        info!("{}", event);
    }
}
