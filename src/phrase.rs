//! Normalization of recognized text into storable phrases.

use crate::entry::PHRASE_SEPARATOR;

/// Punctuation kept in phrases. Everything else is OCR noise.
const KEPT_PUNCTUATION: &[char] = &[',', '.', '?', '!', ':', '-', '&'];

fn is_cjk(c: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&c)
}

fn is_punctuation(c: char) -> bool {
    KEPT_PUNCTUATION.contains(&c)
}

fn is_kept(c: char) -> bool {
    is_cjk(c) || c.is_ascii_alphanumeric() || is_punctuation(c) || c == ' '
}

/// Normalize one raw recognized-text string.
///
/// Drops every character outside CJK ideographs, ASCII letters and digits,
/// `,.?!:-&` and spaces (newlines become spaces first). Collapses runs of
/// spaces, trims, then removes a space sitting between two CJK characters
/// or between two punctuation marks.
pub fn normalize(raw: &str) -> String {
    let filtered: String = raw
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .filter(|&c| is_kept(c))
        .collect();
    let collapsed: Vec<char> = filtered
        .split(' ')
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .collect();

    let mut out = String::with_capacity(collapsed.len());
    for (i, &c) in collapsed.iter().enumerate() {
        if c == ' ' && i > 0 && i + 1 < collapsed.len() {
            let (left, right) = (collapsed[i - 1], collapsed[i + 1]);
            if (is_cjk(left) && is_cjk(right))
                || (is_punctuation(left) && is_punctuation(right))
            {
                continue;
            }
        }
        out.push(c);
    }
    out
}

/// Normalize each raw string, dropping the ones that end up empty.
pub fn normalize_all<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    raw.iter()
        .map(|r| normalize(r.as_ref()))
        .filter(|p| !p.is_empty())
        .collect()
}

/// Split user-supplied keywords on `|` and normalize them.
pub fn split_keywords(spec: &str) -> Vec<String> {
    normalize_all(&spec.split(PHRASE_SEPARATOR).collect::<Vec<_>>())
}
