use std::collections::HashSet;

/// Per-entry substring fingerprint.
///
/// Slot `l` holds every substring of exactly `l` characters that occurs in
/// any of the entry's phrases. A phrase never contributes its own full-length
/// string, so for a phrase of `L` characters only lengths `1..L` are filled.
/// Lengths count `char`s, not bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FingerprintIndex {
    by_len: Vec<HashSet<Vec<char>>>,
}

impl FingerprintIndex {
    pub fn build<S: AsRef<str>>(phrases: &[S]) -> Self {
        let phrases: Vec<Vec<char>> =
            phrases.iter().map(|p| p.as_ref().chars().collect()).collect();
        let max_len = phrases.iter().map(Vec::len).max().unwrap_or(0);

        let mut by_len = vec![HashSet::new(); max_len];
        for phrase in &phrases {
            let len = phrase.len();
            for l in 1..len {
                for window in phrase.windows(l) {
                    by_len[l].insert(window.to_vec());
                }
            }
        }

        tracing::trace!(
            phrases = phrases.len(),
            substrings = by_len.iter().map(HashSet::len).sum::<usize>(),
            "built fingerprint index"
        );

        Self { by_len }
    }

    /// Whether `chunk` occurs in the index. Chunks of length zero or longer
    /// than anything indexed are never present.
    pub fn contains(&self, chunk: &[char]) -> bool {
        if chunk.is_empty() {
            return false;
        }
        self.by_len
            .get(chunk.len())
            .is_some_and(|set| set.contains(chunk))
    }

    /// Substrings of exactly `len` characters, if that length is indexed.
    pub fn substrings(&self, len: usize) -> Option<&HashSet<Vec<char>>> {
        if len == 0 {
            return None;
        }
        self.by_len.get(len)
    }

    pub fn is_empty(&self) -> bool {
        self.by_len.iter().all(HashSet::is_empty)
    }
}
