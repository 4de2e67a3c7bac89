//! Error types for the ingestion and indexing stages.
//!
//! Errors are stage-specific to keep diagnostics precise and avoid a single
//! monolithic error enum that grows unbounded. All enums are
//! `#[non_exhaustive]` to allow adding variants without breaking callers;
//! consumers should include a fallback match arm.
//!
//! # Design Notes
//! - I/O errors preserve their source to keep diagnostics actionable.
//! - Ingest errors are per-document and recoverable: the caller logs them,
//!   skips the document, and continues.
//! - [`MissingDocument`] is an invariant violation inside the engine, not an
//!   expected runtime condition. It is propagated rather than panicked on so
//!   embedders get a clean failure.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors from reading and parsing the path manifest.
///
/// Any of these aborts the run: without a manifest there is no corpus.
#[derive(Debug)]
#[non_exhaustive]
pub enum ManifestError {
    /// The manifest file could not be opened or read.
    Io { path: PathBuf, source: io::Error },
    /// The manifest contained no usable entries.
    Empty { path: PathBuf },
}

impl fmt::Display for ManifestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read manifest {}: {}", path.display(), source)
            }
            Self::Empty { path } => {
                write!(f, "manifest {} has no usable entries", path.display())
            }
        }
    }
}

impl std::error::Error for ManifestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Empty { .. } => None,
        }
    }
}

/// Per-document ingestion errors.
///
/// These are recoverable: the document is skipped and processing continues
/// with the rest of the corpus.
#[derive(Debug)]
#[non_exhaustive]
pub enum IngestError {
    /// The document could not be opened, mapped, or read.
    Io { path: PathBuf, source: io::Error },
    /// The document is not longer than the fixed header.
    TooShort {
        path: PathBuf,
        len: u64,
        header: usize,
    },
    /// The document body does not fit the 32-bit offset space.
    TooLarge { path: PathBuf, len: u64 },
    /// The filename does not encode a required repeat count.
    NoRepeatCount { path: PathBuf },
    /// The filename encodes a repeat count of zero.
    ZeroRepeatCount { path: PathBuf },
}

impl IngestError {
    /// The document path this error refers to.
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::Io { path, .. }
            | Self::TooShort { path, .. }
            | Self::TooLarge { path, .. }
            | Self::NoRepeatCount { path }
            | Self::ZeroRepeatCount { path } => path,
        }
    }
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read {}: {}", path.display(), source)
            }
            Self::TooShort { path, len, header } => write!(
                f,
                "{} is {} bytes, not longer than the {}-byte header",
                path.display(),
                len,
                header
            ),
            Self::TooLarge { path, len } => write!(
                f,
                "{} is {} bytes, too large for 32-bit offsets",
                path.display(),
                len
            ),
            Self::NoRepeatCount { path } => write!(
                f,
                "{} does not encode a repeat count in its name",
                path.display()
            ),
            Self::ZeroRepeatCount { path } => {
                write!(f, "{} encodes a repeat count of zero", path.display())
            }
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Postings lookup for a document index that is not present.
///
/// Every postings value that reaches the engine must be complete (one entry
/// per corpus document), so hitting this means a construction or frontier
/// invariant was broken. Fatal: the engine propagates it to the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MissingDocument {
    /// Dense index of the absent document.
    pub doc: u32,
}

impl fmt::Display for MissingDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "postings missing document index {}", self.doc)
    }
}

impl std::error::Error for MissingDocument {}

/// Index builder misuse.
#[derive(Debug)]
#[non_exhaustive]
pub enum IndexError {
    /// A document index was inserted into a postings value twice.
    DuplicateDocument { doc: u32 },
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateDocument { doc } => {
                write!(f, "document index {} added twice", doc)
            }
        }
    }
}

impl std::error::Error for IndexError {}
