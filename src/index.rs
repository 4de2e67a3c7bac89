//! Inverted index: document table plus byte-level offset postings.
//!
//! Construction is a two-pass-per-document streaming build:
//! 1. Histogram the document body (256 bins).
//! 2. Bytes with count below the document's required repeats are locally
//!    invalid; the running allowed set is the intersection of every
//!    document's locally valid set.
//! 3. Materialize offset vectors for allowed bytes in one fill pass, each
//!    pre-sized from the histogram so the pass never reallocates.
//! 4. Merge into the byte postings, pruning bytes that just left the
//!    intersection.
//!
//! After `finish`, the index is immutable: the iteration phase only reads
//! it. Post-condition: the byte postings hold exactly the bytes repeated at
//! least the required number of times in every document, each complete
//! (one entry per document).
//!
//! # Invariants
//! - Documents must be added in ascending `size / required` order (the
//!   selectivity order candidate builds will use); `from_docs` sorts for
//!   you, `IndexBuilder` asserts monotonicity in debug builds.
//! - Offsets are relative to end-of-header and strictly ascending per
//!   document.

use std::path::PathBuf;

use crate::error::IngestError;
use crate::postings::{Offset, Postings};
use crate::util::selectivity_cmp;

/// Number of bytes skipped at the start of every document.
///
/// Spool files carry a fixed-size job header whose fields vary per print
/// job; offsets are measured from the first body byte.
pub const DEFAULT_HEADER_SIZE: usize = 484;

/// Largest accepted document body.
///
/// Keeps `offset + displacement` comfortably inside `u32` for any term the
/// engine can build, so the join inner loop runs unchecked arithmetic.
pub const MAX_BODY_LEN: usize = (u32::MAX as usize) - 4096;

/// One corpus document: identity plus its validity requirement.
#[derive(Clone, Debug)]
pub struct DocRecord {
    /// Opaque identifier (usually the source path).
    pub name: String,
    /// Total raw length in bytes, header included.
    pub len: u64,
    /// Minimum non-overlapping occurrences for a term to be valid here.
    pub required: u32,
}

/// Immutable corpus index: document table + byte postings.
#[derive(Debug)]
pub struct InvertedIndex {
    docs: Vec<DocRecord>,
    header_size: usize,
    n_bad_allowed: u32,
    // Slot b holds the postings of byte b, None for pruned bytes.
    byte_postings: Box<[Option<Postings>; 256]>,
    // Sorted list of bytes with live postings.
    valid_bytes: Vec<u8>,
}

impl InvertedIndex {
    /// Builds an index from in-memory documents `(name, required, raw
    /// bytes)`, sorting them into selectivity order first.
    ///
    /// This is the embedding and test entry point; the CLI streams files
    /// through [`IndexBuilder`] instead of holding the corpus in memory.
    pub fn from_docs(
        docs: &[(&str, u32, &[u8])],
        header_size: usize,
        n_bad_allowed: u32,
    ) -> Result<Self, IngestError> {
        let mut order: Vec<usize> = (0..docs.len()).collect();
        order.sort_by(|&a, &b| {
            selectivity_cmp(
                docs[a].2.len() as u64,
                docs[a].1,
                docs[b].2.len() as u64,
                docs[b].1,
            )
            .then_with(|| docs[a].0.cmp(docs[b].0))
        });
        let mut builder = IndexBuilder::new(header_size, n_bad_allowed);
        for &i in &order {
            let (name, required, raw) = docs[i];
            builder.add_document(name, required, raw)?;
        }
        Ok(builder.finish())
    }

    /// Number of documents in the corpus.
    pub fn num_docs(&self) -> u32 {
        self.docs.len() as u32
    }

    /// The document table, in dense-index order.
    pub fn docs(&self) -> &[DocRecord] {
        &self.docs
    }

    /// Documents allowed to fall short of their requirement per candidate.
    pub fn n_bad_allowed(&self) -> u32 {
        self.n_bad_allowed
    }

    /// Header bytes skipped during construction.
    pub fn header_size(&self) -> usize {
        self.header_size
    }

    /// Bytes that survived the corpus-wide intersection, ascending.
    pub fn valid_bytes(&self) -> &[u8] {
        &self.valid_bytes
    }

    /// Postings of byte `b`, if it survived.
    pub fn byte_postings(&self, b: u8) -> Option<&Postings> {
        self.byte_postings[b as usize].as_ref()
    }

    /// Sum of raw document lengths.
    pub fn corpus_bytes(&self) -> u64 {
        self.docs.iter().map(|d| d.len).sum()
    }
}

/// Streaming index construction; one document at a time, selectivity order.
pub struct IndexBuilder {
    header_size: usize,
    n_bad_allowed: u32,
    docs: Vec<DocRecord>,
    // Running intersection of locally valid byte sets.
    allowed: [bool; 256],
    byte_postings: Box<[Option<Postings>; 256]>,
}

impl IndexBuilder {
    /// Header bytes this builder strips from every document.
    pub fn header_size(&self) -> usize {
        self.header_size
    }

    /// Builder skipping `header_size` bytes per document.
    pub fn new(header_size: usize, n_bad_allowed: u32) -> Self {
        Self {
            header_size,
            n_bad_allowed,
            docs: Vec::new(),
            allowed: [true; 256],
            byte_postings: Box::new(std::array::from_fn(|_| None)),
        }
    }

    /// Indexes one document from its raw bytes (header still attached).
    ///
    /// Returns the document's dense index. Errors leave the builder
    /// unchanged, so the caller can skip the document and continue.
    pub fn add_document(
        &mut self,
        name: &str,
        required: u32,
        raw: &[u8],
    ) -> Result<u32, IngestError> {
        debug_assert!(required >= 1);
        if raw.len() <= self.header_size {
            return Err(IngestError::TooShort {
                path: PathBuf::from(name),
                len: raw.len() as u64,
                header: self.header_size,
            });
        }
        let body = &raw[self.header_size..];
        if body.len() > MAX_BODY_LEN {
            return Err(IngestError::TooLarge {
                path: PathBuf::from(name),
                len: raw.len() as u64,
            });
        }
        debug_assert!(
            self.docs.last().map_or(true, |prev| {
                selectivity_cmp(prev.len, prev.required, raw.len() as u64, required).is_le()
            }),
            "documents must arrive in ascending size/required order"
        );

        // Pass 1: byte histogram.
        let mut counts = [0usize; 256];
        for &b in body {
            counts[b as usize] += 1;
        }

        // Locally valid bytes shrink the running intersection.
        for b in 0..256 {
            if counts[b] < required as usize {
                self.allowed[b] = false;
            }
        }

        // Pass 2: materialize offsets for allowed bytes, pre-sized so the
        // fill never reallocates.
        let mut per_byte: [Vec<Offset>; 256] = std::array::from_fn(|b| {
            if self.allowed[b] {
                Vec::with_capacity(counts[b])
            } else {
                Vec::new()
            }
        });
        for (i, &b) in body.iter().enumerate() {
            if self.allowed[b as usize] {
                per_byte[b as usize].push(i as Offset);
            }
        }

        let doc_index = self.docs.len() as u32;
        self.docs.push(DocRecord {
            name: name.to_string(),
            len: raw.len() as u64,
            required,
        });

        // Merge, pruning bytes that just left the intersection.
        for b in 0..256 {
            if !self.allowed[b] {
                self.byte_postings[b] = None;
                continue;
            }
            let offsets = std::mem::take(&mut per_byte[b]);
            self.byte_postings[b]
                .get_or_insert_with(Postings::new)
                .add_document(doc_index, offsets)
                .expect("document indices are assigned sequentially");
        }
        Ok(doc_index)
    }

    /// Seals the index.
    pub fn finish(self) -> InvertedIndex {
        let valid_bytes: Vec<u8> = (0u16..256)
            .filter(|&b| self.byte_postings[b as usize].is_some())
            .map(|b| b as u8)
            .collect();
        InvertedIndex {
            docs: self.docs,
            header_size: self.header_size,
            n_bad_allowed: self.n_bad_allowed,
            byte_postings: self.byte_postings,
            valid_bytes,
        }
    }
}
