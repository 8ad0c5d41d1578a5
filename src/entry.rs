use std::cell::OnceCell;

use crate::{
    error::{Error, Result},
    fingerprint::FingerprintIndex,
    scorer,
};

/// Separator between phrases on a stored phrase line.
pub const PHRASE_SEPARATOR: &str = "|";

/// One tagged image.
///
/// The fingerprint is derived from `phrases` on first use and cached for the
/// lifetime of the entry.
#[derive(Debug, Clone)]
pub struct Entry {
    id: u64,
    content_hash: String,
    label: String,
    phrases: Vec<String>,
    fingerprint: OnceCell<FingerprintIndex>,
}

impl Entry {
    /// Create an entry, enforcing the invariants the record format relies
    /// on so that a saved entry always loads back unchanged.
    pub fn new(
        id: u64,
        content_hash: impl Into<String>,
        label: impl Into<String>,
        phrases: Vec<String>,
    ) -> Result<Self> {
        let content_hash = content_hash.into();
        let label = label.into();

        if content_hash.is_empty()
            || content_hash.contains(|c: char| c.is_ascii_whitespace())
        {
            return Err(Error::InvalidEntry(format!(
                "content hash must be a single non-empty token: {content_hash:?}"
            )));
        }
        if label.trim().is_empty() {
            return Err(Error::InvalidEntry("label is empty".into()));
        }
        // Headers are split on whitespace and rejoined with single spaces.
        if label.split_ascii_whitespace().collect::<Vec<_>>().join(" ") != label
        {
            return Err(Error::InvalidEntry(format!(
                "label must be single-spaced on one line: {label:?}"
            )));
        }
        if phrases.is_empty() {
            return Err(Error::InvalidEntry(format!(
                "entry {label} has no phrases"
            )));
        }
        for phrase in &phrases {
            if phrase.is_empty() {
                return Err(Error::InvalidEntry(format!(
                    "entry {label} has an empty phrase"
                )));
            }
            if phrase.contains(PHRASE_SEPARATOR)
                || phrase.contains(['\n', '\r'])
            {
                return Err(Error::InvalidEntry(format!(
                    "phrase {phrase:?} contains a separator or line break"
                )));
            }
        }

        Ok(Self {
            id,
            content_hash,
            label,
            phrases,
            fingerprint: OnceCell::new(),
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    /// The substring fingerprint, built on first call.
    pub fn fingerprint(&self) -> &FingerprintIndex {
        self.fingerprint.get_or_init(|| {
            tracing::debug!(id = self.id, "building fingerprint index");
            FingerprintIndex::build(&self.phrases)
        })
    }

    /// Match score of this entry against `keywords`: `0.0` when nothing
    /// matches, otherwise in `(0, 1]`.
    pub fn score<K: AsRef<str>>(&self, keywords: &[K]) -> f64 {
        scorer::score(self.fingerprint(), keywords)
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.content_hash == other.content_hash
            && self.label == other.label
            && self.phrases == other.phrases
    }
}

impl Eq for Entry {}

#[cfg(test)]
mod tests {
    use super::*;

    fn phrases(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn accepts_valid_entry() {
        let entry =
            Entry::new(0, "abc123", "0 copy.png", phrases(&["hi there"]))
                .unwrap();
        assert_eq!(entry.id(), 0);
        assert_eq!(entry.content_hash(), "abc123");
        assert_eq!(entry.label(), "0 copy.png");
        assert_eq!(entry.phrases(), ["hi there"]);
    }

    #[test]
    fn rejects_empty_label() {
        let err = Entry::new(0, "h", "  ", phrases(&["x"])).unwrap_err();
        assert!(matches!(err, Error::InvalidEntry(_)));
    }

    #[test]
    fn rejects_multiline_label() {
        let err = Entry::new(0, "h", "a\nb", phrases(&["x"])).unwrap_err();
        assert!(matches!(err, Error::InvalidEntry(_)));
    }

    #[test]
    fn rejects_label_with_double_space() {
        let err = Entry::new(0, "h", "a  b", phrases(&["x"])).unwrap_err();
        assert!(matches!(err, Error::InvalidEntry(_)));
    }

    #[test]
    fn rejects_hash_with_space() {
        let err = Entry::new(0, "a b", "0.png", phrases(&["x"])).unwrap_err();
        assert!(matches!(err, Error::InvalidEntry(_)));
    }

    #[test]
    fn rejects_pipe_in_phrase() {
        let err =
            Entry::new(0, "h", "0.png", phrases(&["a|b"])).unwrap_err();
        assert!(matches!(err, Error::InvalidEntry(_)));
    }

    #[test]
    fn rejects_empty_phrase() {
        let err =
            Entry::new(0, "h", "0.png", phrases(&["ok", ""])).unwrap_err();
        assert!(matches!(err, Error::InvalidEntry(_)));
    }

    #[test]
    fn rejects_no_phrases() {
        let err = Entry::new(0, "h", "0.png", vec![]).unwrap_err();
        assert!(matches!(err, Error::InvalidEntry(_)));
    }

    #[test]
    fn fingerprint_is_built_once() {
        let entry = Entry::new(0, "h", "0.png", phrases(&["abc"])).unwrap();
        let first: *const FingerprintIndex = entry.fingerprint();
        let second: *const FingerprintIndex = entry.fingerprint();
        assert_eq!(first, second);
    }

    #[test]
    fn equality_ignores_cached_fingerprint() {
        let a = Entry::new(1, "h", "1.png", phrases(&["abc"])).unwrap();
        let b = a.clone();
        a.fingerprint();
        assert_eq!(a, b);
    }

    #[test]
    fn score_uses_fingerprint() {
        let entry = Entry::new(0, "h", "0.png", phrases(&["ab"])).unwrap();
        let score = entry.score(&["ab"]);
        assert!((score - 1.0 / (1.0 - 0.5f64.ln())).abs() < 1e-12);
    }

    #[test]
    fn score_range_ends() {
        let entry = Entry::new(0, "h", "0.png", phrases(&["abc"])).unwrap();
        assert_eq!(entry.score(&["zz"]), 0.0);
        assert_eq!(entry.score(&["ab"]), 1.0);
    }
}
