//! Corpus ingestion: manifest parsing and document loading.
//!
//! A manifest is a text file with one entry per line:
//!
//! ```text
//! <path> [# <comment>]
//! ```
//!
//! Blank paths are skipped and comments are logged. Each path's *filename*
//! encodes the document's required repeat count via a configurable pattern
//! (default `pages=?(\d+)`, so `invoice_pages=12.prn` requires 12 repeats).
//!
//! Ingestion is deliberately forgiving: a line that fails (unreadable file,
//! missing repeat count, body too short) is logged and skipped so one bad
//! document does not sink the corpus. An empty manifest or a corpus that
//! loses every document is fatal.
//!
//! Files are memory-mapped read-only; the index builder consumes the raw
//! bytes in one streaming pass per document and nothing is retained after
//! construction.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use regex::Regex;

use crate::error::{IngestError, ManifestError};
use crate::index::{IndexBuilder, InvertedIndex, DEFAULT_HEADER_SIZE};
use crate::util::selectivity_cmp;

/// Default filename pattern extracting the required repeat count.
pub const DEFAULT_PAGES_PATTERN: &str = r"pages=?(\d+)";

/// Compiles the default filename pattern.
pub fn default_pattern() -> Regex {
    Regex::new(DEFAULT_PAGES_PATTERN).expect("default pattern compiles")
}

/// Ingestion knobs.
#[derive(Clone, Debug)]
pub struct IngestOptions {
    /// Bytes skipped at the start of every document.
    pub header_size: usize,
    /// Documents allowed to fall short per candidate (stored on the index).
    pub n_bad_allowed: u32,
    /// Filename pattern; capture group 1 is the required repeat count.
    pub pattern: Regex,
    /// Log skipped documents and manifest comments to stderr.
    pub log_skips: bool,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            header_size: DEFAULT_HEADER_SIZE,
            n_bad_allowed: 0,
            pattern: default_pattern(),
            log_skips: true,
        }
    }
}

/// One manifest line that parsed cleanly.
#[derive(Clone, Debug)]
pub struct ManifestEntry {
    /// Document path.
    pub path: PathBuf,
    /// Required repeat count from the filename.
    pub required: u32,
    /// File size from metadata, for selectivity ordering.
    pub size: u64,
}

/// Ingestion counters, reported on the final stats line.
#[derive(Clone, Copy, Debug, Default)]
pub struct IngestStats {
    /// Documents indexed.
    pub docs: u64,
    /// Raw bytes indexed (headers included).
    pub bytes: u64,
    /// Manifest lines or documents skipped with a logged reason.
    pub skipped: u64,
}

/// Reads the manifest and resolves each entry's required count and size.
///
/// Per-line failures are logged and counted in `stats.skipped`; only a
/// missing/unreadable manifest or zero surviving entries is fatal.
pub fn read_manifest(
    manifest: &Path,
    options: &IngestOptions,
    stats: &mut IngestStats,
) -> Result<Vec<ManifestEntry>, ManifestError> {
    let text = fs::read_to_string(manifest).map_err(|source| ManifestError::Io {
        path: manifest.to_path_buf(),
        source,
    })?;

    let mut entries = Vec::new();
    for line in text.lines() {
        let (code, comment) = match line.split_once('#') {
            Some((code, comment)) => (code.trim(), Some(comment.trim())),
            None => (line.trim(), None),
        };
        if let Some(comment) = comment {
            if options.log_skips && !comment.is_empty() {
                eprintln!("repeats: manifest note: {}", comment);
            }
        }
        if code.is_empty() {
            continue;
        }
        let path = PathBuf::from(code);
        match entry_for(&path, options) {
            Ok(entry) => entries.push(entry),
            Err(err) => {
                stats.skipped += 1;
                if options.log_skips {
                    eprintln!("repeats: skipping document: {}", err);
                }
            }
        }
    }

    if entries.is_empty() {
        return Err(ManifestError::Empty {
            path: manifest.to_path_buf(),
        });
    }
    Ok(entries)
}

fn entry_for(path: &Path, options: &IngestOptions) -> Result<ManifestEntry, IngestError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let required: u32 = options
        .pattern
        .captures(&name)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .ok_or_else(|| IngestError::NoRepeatCount {
            path: path.to_path_buf(),
        })?;
    if required == 0 {
        return Err(IngestError::ZeroRepeatCount {
            path: path.to_path_buf(),
        });
    }
    let meta = fs::metadata(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(ManifestEntry {
        path: path.to_path_buf(),
        required,
        size: meta.len(),
    })
}

/// Builds the inverted index from manifest entries.
///
/// Entries are sorted into ascending `size / required` order (most
/// selective first), then streamed through the builder one memory-mapped
/// file at a time. Read failures are logged and skipped.
pub fn build_index(
    entries: &[ManifestEntry],
    options: &IngestOptions,
    stats: &mut IngestStats,
) -> InvertedIndex {
    let mut order: Vec<&ManifestEntry> = entries.iter().collect();
    order.sort_by(|a, b| {
        selectivity_cmp(a.size, a.required, b.size, b.required).then_with(|| a.path.cmp(&b.path))
    });

    let mut builder = IndexBuilder::new(options.header_size, options.n_bad_allowed);
    for entry in order {
        match index_one(&mut builder, entry) {
            Ok(len) => {
                stats.docs += 1;
                stats.bytes += len;
            }
            Err(err) => {
                stats.skipped += 1;
                if options.log_skips {
                    eprintln!("repeats: skipping document: {}", err);
                }
            }
        }
    }
    builder.finish()
}

fn index_one(builder: &mut IndexBuilder, entry: &ManifestEntry) -> Result<u64, IngestError> {
    let io_err = |source| IngestError::Io {
        path: entry.path.clone(),
        source,
    };
    let file = File::open(&entry.path).map_err(io_err)?;
    let len = file.metadata().map_err(io_err)?.len();
    if len == 0 {
        // Mapping a zero-length file fails on some platforms; report the
        // real problem instead.
        return Err(IngestError::TooShort {
            path: entry.path.clone(),
            len: 0,
            header: builder.header_size(),
        });
    }
    // SAFETY: read-only mapping; the corpus is expected to be quiescent
    // while indexing, same as any mmap-based reader.
    let mmap = unsafe { Mmap::map(&file) }.map_err(io_err)?;
    let name = entry.path.to_string_lossy();
    builder.add_document(&name, entry.required, &mmap)?;
    Ok(len)
}
