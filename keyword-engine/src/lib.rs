pub mod extractor;
pub mod selector;
pub mod tokenizer;

pub use extractor::{extract_hashtags, noun_frequencies, title_ngrams, NounCounts};
pub use selector::{build_pool, scored_nouns, select_smart_keywords, SMART_KEYWORD_CAP};
pub use tokenizer::{hangul_tokens, is_stopword, normalize_token, strip_particle};

use tracing::debug;

/// Everything the extraction stage hands to the rank prober.
#[derive(Debug, Clone)]
pub struct KeywordSet {
    pub hashtags: Vec<String>,
    pub smart_keywords: Vec<String>,
    pub pool: Vec<String>,
}

/// Runs the full extraction stage for one post. Author tags from the page
/// markup come first, then tags found in the running text; the smart
/// selector and pool merge follow the combined list.
pub fn extract_keywords(title: &str, content: &str, markup_tags: &[String]) -> KeywordSet {
    let mut hashtags: Vec<String> = Vec::new();
    for tag in markup_tags {
        let tag = tag.trim_start_matches('#').to_string();
        if !tag.is_empty() && !hashtags.contains(&tag) {
            hashtags.push(tag);
        }
    }
    for tag in extract_hashtags(title).into_iter().chain(extract_hashtags(content)) {
        if !hashtags.contains(&tag) {
            hashtags.push(tag);
        }
    }

    let smart_keywords = select_smart_keywords(&hashtags, title, content);
    let pool = build_pool(&hashtags, &smart_keywords);

    debug!(
        "Extraction complete: {} hashtags, {} smart keywords, pool of {}",
        hashtags.len(),
        smart_keywords.len(),
        pool.len()
    );

    KeywordSet {
        hashtags,
        smart_keywords,
        pool,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_keywords_unions_markup_and_text_tags() {
        let markup = vec!["#봄나들이".to_string()];
        let set = extract_keywords("봄 코디 #데일리룩", "오늘의 옷 #봄나들이", &markup);
        assert_eq!(set.hashtags, vec!["봄나들이".to_string(), "데일리룩".to_string()]);
        assert!(set.pool.starts_with(&["봄나들이".to_string(), "데일리룩".to_string()]));
    }

    #[test]
    fn test_pool_contains_every_smart_keyword() {
        let set = extract_keywords("강남 맛집 추천", "주말마다 맛집 탐방 맛집 기록", &[]);
        for keyword in &set.smart_keywords {
            assert!(set.pool.contains(keyword));
        }
    }
}
