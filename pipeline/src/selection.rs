use blogrank_core::RankEntry;

/// Ranks at or above this position count as "good" secondary keywords.
pub const GOOD_RANK_THRESHOLD: u32 = 10;

/// The best-performing keyword: lowest rank wins, ties go to the earlier
/// pool position (the sort is stable over pool order). All-unranked pools
/// select nothing.
pub fn select_best(ranks: &[RankEntry]) -> (Option<String>, Option<u32>) {
    let mut ranked: Vec<&RankEntry> = ranks.iter().filter(|entry| entry.rank.is_some()).collect();
    ranked.sort_by_key(|entry| entry.rank);

    match ranked.first() {
        Some(best) => (Some(best.keyword.clone()), best.rank),
        None => (None, None),
    }
}

/// Every ranked entry other than the best with rank <= 10, in ascending
/// rank order.
pub fn other_good_keywords(ranks: &[RankEntry], best_keyword: Option<&str>) -> Vec<RankEntry> {
    let mut good: Vec<RankEntry> = ranks
        .iter()
        .filter(|entry| {
            entry.rank.map_or(false, |rank| rank <= GOOD_RANK_THRESHOLD)
                && Some(entry.keyword.as_str()) != best_keyword
        })
        .cloned()
        .collect();
    good.sort_by_key(|entry| entry.rank);
    good
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(keyword: &str, rank: Option<u32>) -> RankEntry {
        RankEntry {
            keyword: keyword.to_string(),
            rank,
        }
    }

    #[test]
    fn test_lowest_rank_wins() {
        let ranks = vec![entry("a", None), entry("b", Some(7)), entry("c", Some(3))];
        let (best_keyword, best_rank) = select_best(&ranks);
        assert_eq!(best_keyword.as_deref(), Some("c"));
        assert_eq!(best_rank, Some(3));

        let good = other_good_keywords(&ranks, best_keyword.as_deref());
        assert_eq!(good, vec![entry("b", Some(7))]);
    }

    #[test]
    fn test_all_unranked_selects_nothing() {
        let ranks = vec![entry("a", None), entry("b", None)];
        let (best_keyword, best_rank) = select_best(&ranks);
        assert_eq!(best_keyword, None);
        assert_eq!(best_rank, None);
        assert!(other_good_keywords(&ranks, None).is_empty());
    }

    #[test]
    fn test_tie_breaks_by_pool_order() {
        let ranks = vec![entry("둘째", Some(4)), entry("첫째", Some(4))];
        let (best_keyword, _) = select_best(&ranks);
        assert_eq!(best_keyword.as_deref(), Some("둘째"));
    }

    #[test]
    fn test_good_keywords_exclude_deep_ranks() {
        let ranks = vec![
            entry("a", Some(2)),
            entry("b", Some(10)),
            entry("c", Some(11)),
        ];
        let good = other_good_keywords(&ranks, Some("a"));
        assert_eq!(good, vec![entry("b", Some(10))]);
    }

    #[test]
    fn test_good_keywords_sorted_by_rank() {
        let ranks = vec![
            entry("best", Some(1)),
            entry("b", Some(9)),
            entry("c", Some(4)),
        ];
        let good = other_good_keywords(&ranks, Some("best"));
        assert_eq!(good, vec![entry("c", Some(4)), entry("b", Some(9))]);
    }

    #[test]
    fn test_empty_pool() {
        let (best_keyword, best_rank) = select_best(&[]);
        assert_eq!(best_keyword, None);
        assert_eq!(best_rank, None);
    }
}
