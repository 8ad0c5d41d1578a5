use std::cmp::Ordering;

use crate::record_store::Store;

/// An entry that matched the query with a positive score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub id: u64,
    pub score: f64,
}

/// Rank every entry in `store` against `keywords`.
///
/// Entries scoring zero are not candidates at all. The rest are ordered by
/// descending score, ties by ascending id, and cut to `limit` when given.
pub fn rank<K: AsRef<str>>(
    store: &Store,
    keywords: &[K],
    limit: Option<usize>,
) -> Vec<Candidate> {
    let scored = store.iter().map(|entry| Candidate {
        id: entry.id(),
        score: entry.score(keywords),
    });
    let candidates = order(scored, limit);

    tracing::debug!(
        entries = store.len(),
        candidates = candidates.len(),
        "ranked entries"
    );
    candidates
}

/// Filter, sort and truncate already-scored candidates.
pub fn order(
    scored: impl IntoIterator<Item = Candidate>,
    limit: Option<usize>,
) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> =
        scored.into_iter().filter(|c| c.score > 0.0).collect();

    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then(a.id.cmp(&b.id))
    });

    if let Some(limit) = limit {
        candidates.truncate(limit);
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(items: &[(&str, &[&str])]) -> Store {
        let mut store = Store::new();
        for (i, (label, phrases)) in items.iter().enumerate() {
            store
                .add(
                    format!("hash{i}"),
                    *label,
                    phrases.iter().map(|s| s.to_string()).collect(),
                )
                .unwrap();
        }
        store
    }

    #[test]
    fn ties_break_by_ascending_id() {
        let scored = [
            Candidate { id: 5, score: 0.9 },
            Candidate { id: 2, score: 0.9 },
            Candidate { id: 7, score: 0.3 },
        ];

        let ranked = order(scored, Some(2));

        assert_eq!(
            ranked,
            vec![
                Candidate { id: 2, score: 0.9 },
                Candidate { id: 5, score: 0.9 },
            ]
        );
    }

    #[test]
    fn zero_scores_are_never_candidates() {
        let scored = [
            Candidate { id: 0, score: 0.0 },
            Candidate { id: 1, score: 0.2 },
        ];

        let ranked = order(scored, None);
        assert_eq!(ranked, vec![Candidate { id: 1, score: 0.2 }]);
    }

    #[test]
    fn limit_zero_returns_nothing() {
        let scored = [Candidate { id: 1, score: 0.2 }];
        assert!(order(scored, Some(0)).is_empty());
    }

    #[test]
    fn empty_store_returns_no_candidates() {
        let store = Store::new();
        assert!(rank(&store, &["anything"], Some(5)).is_empty());
    }

    #[test]
    fn best_matching_entry_ranks_first() {
        let store = store_with(&[
            ("0.png", &["cats are liquid"]),
            ("1.png", &["when the code compiles first try"]),
            ("2.png", &["the code"]),
        ]);

        let ranked = rank(&store, &["code compiles"], None);

        assert_eq!(ranked[0].id, 1);
        for pair in ranked.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn unrelated_keywords_return_nothing() {
        let store = store_with(&[("0.png", &["abc"]), ("1.png", &["def"])]);
        assert!(rank(&store, &["xyz"], None).is_empty());
    }

    #[test]
    fn empty_keyword_list_returns_nothing() {
        let store = store_with(&[("0.png", &["abc"])]);
        assert!(rank::<&str>(&store, &[], None).is_empty());
    }

    #[test]
    fn limit_truncates_after_sorting() {
        let store = store_with(&[
            ("0.png", &["xa"]),
            ("1.png", &["hello there"]),
            ("2.png", &["hello"]),
        ]);

        let ranked = rank(&store, &["hello"], Some(1));

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].id, 1);
    }
}
