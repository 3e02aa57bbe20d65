use crate::tokenizer::{hangul_tokens, normalize_token, strip_particle};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static HASHTAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#([0-9A-Za-z_가-힣]+)").unwrap());

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9A-Za-z가-힣]+").unwrap());

/// Hashtag tokens found in running text, marker stripped, deduplicated with
/// first occurrence order kept.
pub fn extract_hashtags(text: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for capture in HASHTAG.captures_iter(text) {
        let tag = capture[1].to_string();
        if !seen.contains(&tag) {
            seen.push(tag);
        }
    }
    seen
}

/// Noun frequency counts in first-extracted order. Order matters: the smart
/// keyword selector breaks score ties by extraction order.
#[derive(Debug, Clone, Default)]
pub struct NounCounts {
    entries: Vec<(String, u32)>,
    index: HashMap<String, usize>,
}

impl NounCounts {
    fn record(&mut self, noun: &str) {
        if let Some(&at) = self.index.get(noun) {
            self.entries[at].1 += 1;
        } else {
            self.index.insert(noun.to_string(), self.entries.len());
            self.entries.push((noun.to_string(), 1));
        }
    }

    pub fn count(&self, noun: &str) -> u32 {
        self.index.get(noun).map(|&at| self.entries[at].1).unwrap_or(0)
    }

    pub fn contains(&self, noun: &str) -> bool {
        self.index.contains_key(noun)
    }

    /// Entries in first-extracted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(noun, count)| (noun.as_str(), *count))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Accumulates surviving noun stems from contiguous Hangul runs.
pub fn noun_frequencies(text: &str) -> NounCounts {
    let mut counts = NounCounts::default();
    for token in hangul_tokens(text) {
        if let Some(stem) = normalize_token(token) {
            counts.record(stem);
        }
    }
    counts
}

/// Adjacent bigrams and trigrams over the cleaned title tokens, space-joined,
/// emitted left to right (bigram first, then the trigram sharing its start).
pub fn title_ngrams(title: &str) -> Vec<String> {
    let cleaned = NON_WORD.replace_all(title, " ");
    let tokens: Vec<&str> = cleaned
        .split_whitespace()
        .map(strip_particle)
        .filter(|stem| stem.chars().count() >= 2)
        .collect();

    let mut ngrams = Vec::new();
    for i in 0..tokens.len() {
        if i + 1 < tokens.len() {
            ngrams.push(format!("{} {}", tokens[i], tokens[i + 1]));
        }
        if i + 2 < tokens.len() {
            ngrams.push(format!("{} {} {}", tokens[i], tokens[i + 1], tokens[i + 2]));
        }
    }
    ngrams
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_hashtags_dedup_keeps_first_occurrence() {
        assert_eq!(extract_hashtags("#봄 옷 #봄"), vec!["봄".to_string()]);
    }

    #[test]
    fn test_extract_hashtags_mixed_script() {
        let tags = extract_hashtags("주말 #강남맛집 후기 #cafe_tour #2호선");
        assert_eq!(tags, vec!["강남맛집", "cafe_tour", "2호선"]);
    }

    #[test]
    fn test_noun_frequencies_accumulate_per_stem() {
        let counts = noun_frequencies("맛집을 찾았다 맛집은 좋았다");
        assert_eq!(counts.count("맛집"), 2);
    }

    #[test]
    fn test_noun_frequencies_keep_extraction_order() {
        let counts = noun_frequencies("공원에서 산책을 공원은 좋다");
        let nouns: Vec<&str> = counts.iter().map(|(noun, _)| noun).collect();
        assert_eq!(nouns[0], "공원");
        assert!(nouns.contains(&"산책"));
    }

    #[test]
    fn test_title_ngrams_order() {
        let ngrams = title_ngrams("강남 맛집 추천 후기");
        assert_eq!(
            ngrams,
            vec![
                "강남 맛집".to_string(),
                "강남 맛집 추천".to_string(),
                "맛집 추천".to_string(),
                "맛집 추천 후기".to_string(),
                "추천 후기".to_string(),
            ]
        );
    }

    #[test]
    fn test_title_ngrams_strip_punctuation_and_particles() {
        let ngrams = title_ngrams("강남역에서, 맛집을! 찾기");
        assert_eq!(ngrams[0], "강남역 맛집");
    }

    #[test]
    fn test_title_ngrams_too_few_tokens() {
        assert!(title_ngrams("후기").is_empty());
        assert_eq!(title_ngrams("강남 맛집"), vec!["강남 맛집".to_string()]);
    }
}
