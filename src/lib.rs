//! memedex - find your memes by the text written on them.
//!
//! Every stored image carries a few short phrases, usually recognized by OCR.
//! Searching splits each keyword into the longest fragments that occur in an
//! image's phrases and scores the split, so partial and misspelled keywords
//! still find the right meme.
//!
//! # Quick start
//!
//! ```no_run
//! use memedex::{DataDir, ranker, record_store};
//!
//! let data_dir = DataDir::resolve(None).unwrap();
//! let store = record_store::load(&data_dir.database()).unwrap();
//!
//! for candidate in ranker::rank(&store, &["when the code"], Some(5)) {
//!     let entry = store.get(candidate.id).unwrap();
//!     println!("{:.3} {}", candidate.score, entry.label());
//! }
//! ```

pub mod data_dir;
pub mod entry;
pub mod error;
pub mod fingerprint;
pub mod ingestion;
pub mod ocr;
pub mod output;
pub mod phrase;
pub mod ranker;
pub mod record_store;
pub mod scorer;
pub mod walker;

pub use data_dir::DataDir;
pub use entry::Entry;
pub use error::{Error, Result};
pub use fingerprint::FingerprintIndex;
pub use ranker::Candidate;
pub use record_store::Store;
