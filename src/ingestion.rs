use std::path::{Path, PathBuf};

use crate::{
    error::{Error, Result},
    ocr::TextExtractor,
    phrase,
    record_store::Store,
    walker,
};

/// Options for adding images to the store.
#[derive(Debug, Clone)]
pub struct AddOptions {
    /// Descend into subdirectories when adding a directory.
    pub recursive: bool,
    /// Accepted extensions, lowercase, without dots.
    pub formats: Vec<String>,
    /// `|`-separated phrases to use instead of OCR. Only honored when a
    /// single file is added.
    pub keywords: Option<String>,
}

/// Outcome of an ingestion run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Ids of the newly created entries, in insertion order.
    pub added: Vec<u64>,
    /// Files whose content is already stored.
    pub duplicates: usize,
    /// Files that yielded no usable text or could not be read.
    pub skipped: usize,
}

/// Lowercase hex MD5 digest of `bytes`.
pub fn content_hash(bytes: &[u8]) -> String {
    format!("{:x}", md5::compute(bytes))
}

/// Add the image (or directory of images) at `path` to `store`.
///
/// Stored copies are written into `images_dir`. The store is only modified
/// in memory; saving it is up to the caller.
pub fn add_path(
    store: &mut Store,
    images_dir: &Path,
    path: &Path,
    options: &AddOptions,
    extractor: &dyn TextExtractor,
) -> Result<IngestReport> {
    let files =
        walker::discover_images(path, options.recursive, &options.formats)?;
    let n = files.len();
    tracing::info!(
        "{n} file{} found. Scanning...",
        if n == 1 { "" } else { "s" }
    );

    let keywords = match &options.keywords {
        Some(_) if path.is_dir() => {
            tracing::warn!(
                "--keywords is ignored when adding a directory of images"
            );
            None
        }
        Some(spec) => {
            let keywords = phrase::split_keywords(spec);
            if keywords.is_empty() {
                return Err(Error::Config(format!(
                    "no usable keywords in {spec:?}"
                )));
            }
            Some(keywords)
        }
        None => None,
    };

    ingest_files(store, images_dir, &files, keywords.as_deref(), extractor)
}

/// Ingest `files` in order.
///
/// Each file is hashed and skipped if already present. Its phrases come from
/// `keywords` when given, otherwise from `extractor`. Files left without any
/// phrase after normalization are skipped.
///
/// On error the run is undone: entries added by it are removed from `store`
/// and their copies are deleted from `images_dir`.
pub fn ingest_files(
    store: &mut Store,
    images_dir: &Path,
    files: &[PathBuf],
    keywords: Option<&[String]>,
    extractor: &dyn TextExtractor,
) -> Result<IngestReport> {
    let mut report = IngestReport::default();
    let mut copies = Vec::new();

    if let Err(e) = ingest_each(
        store,
        images_dir,
        files,
        keywords,
        extractor,
        &mut report,
        &mut copies,
    ) {
        roll_back(store, &report.added, &copies);
        return Err(e);
    }

    let n = report.added.len();
    tracing::info!(
        "{n} new meme{} added to database",
        if n == 1 { "" } else { "s" }
    );
    Ok(report)
}

fn ingest_each(
    store: &mut Store,
    images_dir: &Path,
    files: &[PathBuf],
    keywords: Option<&[String]>,
    extractor: &dyn TextExtractor,
    report: &mut IngestReport,
    copies: &mut Vec<PathBuf>,
) -> Result<()> {
    for file in files {
        let bytes = match std::fs::read(file) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(
                    "cannot read file '{}', skipping: {e}",
                    file.display()
                );
                report.skipped += 1;
                continue;
            }
        };

        let hash = content_hash(&bytes);
        if let Some(id) = store.find_by_hash(&hash) {
            tracing::warn!(
                "file '{}' is already stored in database as id {id}",
                file.display()
            );
            report.duplicates += 1;
            continue;
        }

        let raw = match keywords {
            Some(keywords) => keywords.to_vec(),
            None => match extractor.extract(file) {
                Ok(raw) => raw,
                Err(Error::Ocr(msg)) => {
                    tracing::warn!(
                        "file '{}' could not be scanned, skipping: {msg}",
                        file.display()
                    );
                    report.skipped += 1;
                    continue;
                }
                Err(e) => return Err(e),
            },
        };
        let phrases = phrase::normalize_all(&raw);
        if phrases.is_empty() {
            tracing::warn!(
                "file '{}' does not contain recognizable text, skipping",
                file.display()
            );
            report.skipped += 1;
            continue;
        }

        let id = store.next_id();
        let label = stored_name(id, file);
        let copy = images_dir.join(&label);
        std::fs::write(&copy, &bytes)?;
        copies.push(copy);
        store.add(hash, label, phrases)?;

        if let Some(entry) = store.get(id) {
            tracing::debug!(
                "file '{}' scanned as id {id}, keywords: {}",
                file.display(),
                entry.phrases().join(" | ")
            );
        }
        report.added.push(id);
    }
    Ok(())
}

fn roll_back(store: &mut Store, added: &[u64], copies: &[PathBuf]) {
    for &id in added {
        store.remove(id);
    }
    for copy in copies {
        if let Err(e) = std::fs::remove_file(copy) {
            tracing::warn!(
                "could not remove stored copy '{}': {e}",
                copy.display()
            );
        }
    }
    if !copies.is_empty() {
        tracing::warn!(
            "run failed, removed {} stored image(s)",
            copies.len()
        );
    }
}

/// Name of the stored copy: the entry id plus the original extension.
fn stored_name(id: u64, file: &Path) -> String {
    match file.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{id}.{}", ext.to_ascii_lowercase()),
        None => id.to_string(),
    }
}
