use regex::Regex;
use std::sync::LazyLock;

static HANGUL_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[가-힣]{2,}").unwrap());

/// Grammatical particles tried against token endings, multi-character forms
/// first. The FIRST list entry that matches and leaves a remainder of at
/// least two characters wins; this is list-order matching, not
/// longest-match, and the list order is observable behavior.
const PARTICLES: &[&str] = &[
    "에서는", "에서도", "으로는", "으로도", "이라는", "까지", "부터", "에서", "에게", "으로",
    "하고", "이랑", "처럼", "보다", "마다", "조차", "은", "는", "이", "가", "을", "를", "과",
    "와", "도", "만", "의", "에", "로", "랑",
];

/// Common temporal/discourse words that carry no keyword value.
const STOPWORDS: &[&str] = &[
    "오늘", "내일", "어제", "지금", "이번", "다음", "지난", "요즘", "하루", "시간", "정말",
    "진짜", "그냥", "너무", "매우", "아주", "바로", "같이", "함께", "모두", "제가", "저는",
    "저희", "우리", "여기", "저기", "거기", "그리고", "그래서", "하지만", "그런데", "때문",
    "생각", "사람",
];

/// Strips the first particle (in list order) whose removal leaves at least
/// two characters. Tokens that cannot be stripped are returned unchanged;
/// stripping never iterates.
pub fn strip_particle(token: &str) -> &str {
    for particle in PARTICLES {
        if let Some(stem) = token.strip_suffix(particle) {
            if stem.chars().count() >= 2 {
                return stem;
            }
        }
    }
    token
}

pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(&token)
}

/// Contiguous Hangul runs of length >= 2, in document order.
pub fn hangul_tokens(text: &str) -> Vec<&str> {
    HANGUL_RUN.find_iter(text).map(|m| m.as_str()).collect()
}

/// Applies particle stripping and the stopword/length filters to one raw
/// token. Returns the surviving stem.
pub fn normalize_token(token: &str) -> Option<&str> {
    let stem = strip_particle(token);
    if stem.chars().count() < 2 || is_stopword(stem) {
        return None;
    }
    Some(stem)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_particle_object_marker() {
        assert_eq!(strip_particle("키워드를"), "키워드");
    }

    #[test]
    fn test_strip_particle_short_remainder_unchanged() {
        // Remainder would be shorter than two characters, so nothing strips.
        assert_eq!(strip_particle("가"), "가");
        assert_eq!(strip_particle("봄이"), "봄이");
    }

    #[test]
    fn test_strip_particle_first_list_match_wins() {
        // "에서는" is listed before "는", so the longer form strips here.
        assert_eq!(strip_particle("카페에서는"), "카페");
        // "로" only matches after every multi-char form fails.
        assert_eq!(strip_particle("지하철로"), "지하철");
    }

    #[test]
    fn test_strip_particle_no_iterative_stripping() {
        // One strip only; the remaining ending is left alone.
        assert_eq!(strip_particle("맛집의"), "맛집");
        assert_eq!(strip_particle("맛집"), "맛집");
    }

    #[test]
    fn test_hangul_tokens_skip_short_runs_and_latin() {
        let tokens = hangul_tokens("봄 나들이 gear 추천 a");
        assert_eq!(tokens, vec!["나들이", "추천"]);
    }

    #[test]
    fn test_normalize_token_filters_stopwords() {
        assert_eq!(normalize_token("오늘"), None);
        assert_eq!(normalize_token("오늘은"), None);
        assert_eq!(normalize_token("맛집을"), Some("맛집"));
    }
}
