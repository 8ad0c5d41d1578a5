//! Fuzzy scoring of keywords against a [`FingerprintIndex`].
//!
//! Each keyword is split into contiguous fragments that occur in the index,
//! choosing the split that maximizes the sum of squared fragment lengths.
//! Long matches therefore count for much more than many short ones.

use crate::fingerprint::FingerprintIndex;

/// Best fragment decomposition value of `keyword` against `index`.
///
/// Characters that cannot be covered by any indexed fragment contribute
/// nothing. The result is at most `len(keyword)²`.
pub fn match_keyword(index: &FingerprintIndex, keyword: &str) -> u64 {
    let chars: Vec<char> = keyword.chars().collect();
    let n = chars.len();
    let mut best = vec![0u64; n + 1];

    for i in 1..=n {
        best[i] = best[i - 1];
        for l in 1..=i {
            // A missing chunk means every longer chunk ending at `i`
            // contains it and is missing too.
            if !index.contains(&chars[i - l..i]) {
                break;
            }
            let l_sq = (l as u64) * (l as u64);
            best[i] = best[i].max(best[i - l] + l_sq);
        }
    }

    best[n]
}

/// Upper bound of [`match_keyword`] for a keyword.
fn max_keyword_score(keyword: &str) -> u64 {
    let n = keyword.chars().count() as u64;
    n * n
}

/// Normalized match score of `keywords` against `index`.
///
/// Returns exactly `0.0` when nothing matches, otherwise a value in `(0, 1]`
/// that grows with the raw decomposition score. `1.0` is only reached when
/// every keyword is a single indexed fragment, i.e. a strict substring of
/// some phrase.
pub fn score<K: AsRef<str>>(
    index: &FingerprintIndex,
    keywords: &[K],
) -> f64 {
    let raw: u64 = keywords
        .iter()
        .map(|k| match_keyword(index, k.as_ref()))
        .sum();
    if raw == 0 {
        return 0.0;
    }

    let max_raw: u64 = keywords
        .iter()
        .map(|k| max_keyword_score(k.as_ref()))
        .sum();
    1.0 / (1.0 - (raw as f64 / max_raw as f64).ln())
}
