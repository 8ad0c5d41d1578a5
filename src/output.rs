use std::io::Write;

use serde::Serialize;

use crate::{
    data_dir::DataDir,
    error::Result,
    ranker::Candidate,
    record_store::Store,
};

/// A ranked candidate resolved against the store, ready for display.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub rank: usize,
    pub score: f64,
    pub id: u64,
    pub label: String,
    pub path: String,
    pub phrases: Vec<String>,
}

/// One stored entry, as shown by `list`.
#[derive(Debug, Clone, Serialize)]
pub struct EntryView {
    pub id: u64,
    pub hash: String,
    pub label: String,
    pub path: String,
    pub phrases: Vec<String>,
}

#[derive(Serialize)]
struct SearchOutput<'a> {
    keywords: &'a [String],
    result_count: usize,
    results: &'a [SearchHit],
}

/// Attach entry details and 1-based ranks to ranked candidates.
pub fn resolve_hits(
    store: &Store,
    data_dir: &DataDir,
    candidates: &[Candidate],
) -> Vec<SearchHit> {
    candidates
        .iter()
        .filter_map(|c| store.get(c.id).map(|entry| (c, entry)))
        .enumerate()
        .map(|(i, (c, entry))| SearchHit {
            rank: i + 1,
            score: c.score,
            id: c.id,
            label: entry.label().to_string(),
            path: data_dir.image_path(entry.label()).display().to_string(),
            phrases: entry.phrases().to_vec(),
        })
        .collect()
}

pub fn entry_views(store: &Store, data_dir: &DataDir) -> Vec<EntryView> {
    store
        .iter()
        .map(|entry| EntryView {
            id: entry.id(),
            hash: entry.content_hash().to_string(),
            label: entry.label().to_string(),
            path: data_dir.image_path(entry.label()).display().to_string(),
            phrases: entry.phrases().to_vec(),
        })
        .collect()
}

/// Human-readable search results. With `detail`, each hit's phrases follow.
pub fn write_hits_human<W: Write>(
    w: &mut W,
    hits: &[SearchHit],
    detail: bool,
) -> Result<()> {
    if hits.is_empty() {
        writeln!(w, "No matching memes found.")?;
        return Ok(());
    }

    for hit in hits {
        writeln!(
            w,
            "{:>3}. [{:.3}] #{} {}",
            hit.rank, hit.score, hit.id, hit.path
        )?;
        if detail {
            writeln!(w, "     {}", hit.phrases.join(" | "))?;
        }
    }
    Ok(())
}

pub fn write_hits_json<W: Write>(
    w: &mut W,
    hits: &[SearchHit],
    keywords: &[String],
) -> Result<()> {
    let output = SearchOutput {
        keywords,
        result_count: hits.len(),
        results: hits,
    };
    serde_json::to_writer(&mut *w, &output)?;
    writeln!(w)?;
    Ok(())
}

/// One absolute image path per line.
pub fn write_hits_files<W: Write>(
    w: &mut W,
    hits: &[SearchHit],
) -> Result<()> {
    for hit in hits {
        writeln!(w, "{}", hit.path)?;
    }
    Ok(())
}

pub fn write_entries_human<W: Write>(
    w: &mut W,
    entries: &[EntryView],
) -> Result<()> {
    if entries.is_empty() {
        writeln!(w, "No memes in the database yet.")?;
        return Ok(());
    }
    for entry in entries {
        writeln!(
            w,
            "{}\t{}\t{}",
            entry.id,
            entry.label,
            entry.phrases.join(" | ")
        )?;
    }
    Ok(())
}

pub fn write_entries_json<W: Write>(
    w: &mut W,
    entries: &[EntryView],
) -> Result<()> {
    serde_json::to_writer(&mut *w, entries)?;
    writeln!(w)?;
    Ok(())
}
