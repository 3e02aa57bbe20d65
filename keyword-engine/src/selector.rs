use crate::extractor::{noun_frequencies, title_ngrams};
use tracing::debug;

/// Upper bound on derived ("smart") keywords per post.
pub const SMART_KEYWORD_CAP: usize = 5;

/// Minimum content frequency for a noun that never appears in the title.
const CONTENT_ONLY_MIN_FREQ: u32 = 2;

/// Weight of a title occurrence relative to a content occurrence.
const TITLE_WEIGHT: u32 = 3;

fn push_unique(keywords: &mut Vec<String>, candidate: &str) -> bool {
    if keywords.iter().any(|existing| existing == candidate) {
        return false;
    }
    keywords.push(candidate.to_string());
    true
}

/// Selects up to five keywords: hashtags first, then title nouns scored
/// against content frequency, then title n-grams. Sources later in the fill
/// order only run while the cap has room; fewer than five is a legitimate
/// outcome.
pub fn select_smart_keywords(hashtags: &[String], title: &str, content: &str) -> Vec<String> {
    let mut selected = Vec::new();

    for tag in hashtags {
        if selected.len() >= SMART_KEYWORD_CAP {
            return selected;
        }
        push_unique(&mut selected, tag);
    }

    if selected.len() < SMART_KEYWORD_CAP {
        for (noun, _score) in scored_nouns(title, content) {
            if selected.len() >= SMART_KEYWORD_CAP {
                break;
            }
            push_unique(&mut selected, &noun);
        }
    }

    if selected.len() < SMART_KEYWORD_CAP {
        for ngram in title_ngrams(title) {
            if selected.len() >= SMART_KEYWORD_CAP {
                break;
            }
            push_unique(&mut selected, &ngram);
        }
    }

    debug!("Selected {} smart keywords", selected.len());
    selected
}

/// Nouns ranked by `title_freq * 3 + content_freq`; nouns appearing only in
/// the content qualify at content frequency >= 2 and score their raw content
/// frequency. Ties keep extraction order (title nouns in title order, then
/// content-only nouns in content order).
pub fn scored_nouns(title: &str, content: &str) -> Vec<(String, u32)> {
    let title_counts = noun_frequencies(title);
    let content_counts = noun_frequencies(content);

    let mut scored: Vec<(String, u32)> = Vec::new();
    for (noun, title_freq) in title_counts.iter() {
        let score = title_freq * TITLE_WEIGHT + content_counts.count(noun);
        scored.push((noun.to_string(), score));
    }
    for (noun, content_freq) in content_counts.iter() {
        if !title_counts.contains(noun) && content_freq >= CONTENT_ONLY_MIN_FREQ {
            scored.push((noun.to_string(), content_freq));
        }
    }

    // Stable sort: equal scores keep the extraction order built above.
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored
}

/// The probe pool: hashtags unioned with smart keywords, first occurrence
/// wins, hashtags leading.
pub fn build_pool(hashtags: &[String], smart_keywords: &[String]) -> Vec<String> {
    let mut pool = Vec::new();
    for tag in hashtags {
        push_unique(&mut pool, tag);
    }
    for keyword in smart_keywords {
        push_unique(&mut pool, keyword);
    }
    pool
}
