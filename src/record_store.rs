//! The persisted collection of entries.
//!
//! The database is a line-oriented UTF-8 text file:
//!
//! ```text
//! <n>
//! <id> <content_hash> <label>
//! <phrase>|<phrase>|...
//! ```
//!
//! with one header/phrase line pair per entry. Labels may contain spaces;
//! everything after the second header token belongs to the label.

use std::{
    collections::BTreeMap,
    io::{BufWriter, Write},
    path::Path,
};

use crate::{
    entry::{Entry, PHRASE_SEPARATOR},
    error::{Error, Result},
};

/// All known entries, keyed by id.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Store {
    entries: BTreeMap<u64, Entry>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Id the next added entry will receive.
    ///
    /// This is the store size, bumped past the highest id if a hand-edited
    /// database left gaps, so ids are never reused.
    pub fn next_id(&self) -> u64 {
        let size = self.entries.len() as u64;
        match self.entries.keys().next_back() {
            Some(&max) if max >= size => max + 1,
            _ => size,
        }
    }

    pub fn get(&self, id: u64) -> Option<&Entry> {
        self.entries.get(&id)
    }

    /// Entries in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    /// Id of the entry with the given content hash, if any.
    pub fn find_by_hash(&self, content_hash: &str) -> Option<u64> {
        self.iter()
            .find(|e| e.content_hash() == content_hash)
            .map(Entry::id)
    }

    /// Create an entry under the next free id and insert it.
    pub fn add(
        &mut self,
        content_hash: impl Into<String>,
        label: impl Into<String>,
        phrases: Vec<String>,
    ) -> Result<&Entry> {
        let entry = Entry::new(self.next_id(), content_hash, label, phrases)?;
        let id = entry.id();
        self.insert(entry)?;
        Ok(&self.entries[&id])
    }

    /// Insert an already-built entry. Fails if its id is taken.
    pub fn insert(&mut self, entry: Entry) -> Result<()> {
        if self.entries.contains_key(&entry.id()) {
            return Err(Error::InvalidEntry(format!(
                "duplicate entry id {}",
                entry.id()
            )));
        }
        self.entries.insert(entry.id(), entry);
        Ok(())
    }

    /// Remove and return the entry with `id`.
    pub fn remove(&mut self, id: u64) -> Option<Entry> {
        self.entries.remove(&id)
    }
}

/// Load the store at `path`.
///
/// Any format violation yields [`Error::CorruptDatabase`]; no partial store
/// is ever returned.
pub fn load(path: &Path) -> Result<Store> {
    if !path.exists() {
        return Err(Error::NotFound {
            kind: "database",
            name: path.display().to_string(),
        });
    }

    let bytes = std::fs::read(path)?;
    let content = String::from_utf8(bytes).map_err(|e| {
        let valid = &e.as_bytes()[..e.utf8_error().valid_up_to()];
        let line = valid.iter().filter(|&&b| b == b'\n').count() + 1;
        Error::corrupt(line, "text is not valid UTF-8")
    })?;

    let store = parse(&content)?;
    tracing::debug!(
        path = %path.display(),
        entries = store.len(),
        "loaded database"
    );
    Ok(store)
}

/// Load the store at `path`, creating an empty database first if the file
/// does not exist yet.
pub fn load_or_init(path: &Path) -> Result<Store> {
    if !path.exists() {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        tracing::info!(path = %path.display(), "creating empty database");
        save(path, &Store::new())?;
    }
    load(path)
}

/// Parse database text into a store.
pub fn parse(content: &str) -> Result<Store> {
    let mut lines = content.lines().enumerate().map(|(i, l)| (i + 1, l));

    let (_, count_line) = lines
        .next()
        .ok_or_else(|| Error::corrupt(1, "missing entry count"))?;
    let count: usize = count_line.trim().parse().map_err(|_| {
        Error::corrupt(
            1,
            format!("entry count is not an integer: {count_line:?}"),
        )
    })?;

    let mut store = Store::new();
    for n in 0..count {
        let (header_no, header) = lines.next().ok_or_else(|| {
            Error::corrupt(
                2 * n + 2,
                format!("expected {count} entries, found {n}"),
            )
        })?;
        let (id, content_hash, label) = parse_header(header_no, header)?;

        let (phrases_no, phrase_line) = lines.next().ok_or_else(|| {
            Error::corrupt(
                header_no + 1,
                format!("entry {id} has no phrase line"),
            )
        })?;
        let phrases = phrase_line
            .split(PHRASE_SEPARATOR)
            .map(str::to_string)
            .collect();

        let entry = Entry::new(id, content_hash, label, phrases)
            .map_err(|e| Error::corrupt(phrases_no, e.to_string()))?;
        store
            .insert(entry)
            .map_err(|e| Error::corrupt(header_no, e.to_string()))?;
    }

    if let Some((line_no, _)) = lines.find(|(_, l)| !l.trim().is_empty()) {
        return Err(Error::corrupt(
            line_no,
            format!("unexpected data after {count} entries"),
        ));
    }

    Ok(store)
}

fn parse_header(line_no: usize, header: &str) -> Result<(u64, &str, String)> {
    let mut tokens = header.split_ascii_whitespace();

    let id = tokens
        .next()
        .ok_or_else(|| Error::corrupt(line_no, "empty entry header"))?;
    let id: u64 = id.parse().map_err(|_| {
        Error::corrupt(line_no, format!("entry id is not an integer: {id:?}"))
    })?;
    let content_hash = tokens.next().ok_or_else(|| {
        Error::corrupt(line_no, format!("entry {id} has no content hash"))
    })?;
    let label = tokens.collect::<Vec<_>>().join(" ");
    if label.is_empty() {
        return Err(Error::corrupt(
            line_no,
            format!("entry {id} has an empty file name"),
        ));
    }

    Ok((id, content_hash, label))
}

/// Atomically replace the database at `path` with `store`.
///
/// The records are written to a temporary file in the same directory, synced
/// and renamed over `path`. On any failure the previous database is left as
/// it was and the temporary file is removed.
pub fn save(path: &Path, store: &Store) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".memes-")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        write_records(&mut writer, store)?;
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    tracing::debug!(
        path = %path.display(),
        entries = store.len(),
        "saved database"
    );
    Ok(())
}

fn write_records<W: Write>(w: &mut W, store: &Store) -> std::io::Result<()> {
    writeln!(w, "{}", store.len())?;
    for entry in store.iter() {
        writeln!(
            w,
            "{} {} {}",
            entry.id(),
            entry.content_hash(),
            entry.label()
        )?;
        writeln!(w, "{}", entry.phrases().join(PHRASE_SEPARATOR))?;
    }
    Ok(())
}
