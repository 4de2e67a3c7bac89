//! Postings: per-term container of per-document sorted offset lists.
//!
//! A postings value maps dense document indices to the strictly ascending
//! offsets at which one term occurs in that document. Byte-level postings
//! live in the inverted index for the whole run; higher-length postings are
//! created and dropped per frontier round.
//!
//! # Invariants
//! - Each offset vector is strictly ascending and duplicate-free. The
//!   construction paths guarantee this (single forward passes); it is
//!   debug-asserted at insertion.
//! - A postings value is *complete* iff it holds exactly one entry per
//!   corpus document. Only complete postings may propagate into the next
//!   frontier.

use ahash::AHashMap;

use crate::error::{IndexError, MissingDocument};

/// Byte position within a document body, measured from end-of-header.
///
/// 32-bit on purpose: one offset per body byte bounds index memory at 4x the
/// corpus size, and ingestion rejects bodies that would overflow the
/// `offset + displacement` arithmetic in the inner loop.
pub type Offset = u32;

/// Per-document sorted offset lists for a single term.
#[derive(Clone, Debug, Default)]
pub struct Postings {
    // doc index -> strictly ascending offsets.
    offsets: AHashMap<u32, Vec<Offset>>,
    // Cached sum of all offset vector lengths.
    total: u64,
}

impl Postings {
    /// Creates an empty postings value.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the offset vector for one document.
    ///
    /// `offsets` must be strictly ascending; the vector may be empty (a
    /// tolerated document that fell short still contributes an entry so the
    /// postings stay complete).
    pub fn add_document(&mut self, doc: u32, offsets: Vec<Offset>) -> Result<(), IndexError> {
        debug_assert!(offsets.windows(2).all(|w| w[0] < w[1]));
        if self.offsets.contains_key(&doc) {
            return Err(IndexError::DuplicateDocument { doc });
        }
        self.total += offsets.len() as u64;
        self.offsets.insert(doc, offsets);
        Ok(())
    }

    /// The offsets of the term in document `doc`.
    ///
    /// Fails with [`MissingDocument`] if the document has no entry; by the
    /// completeness invariant this is an internal error, not a user-visible
    /// condition.
    pub fn offsets_of(&self, doc: u32) -> Result<&[Offset], MissingDocument> {
        self.offsets
            .get(&doc)
            .map(Vec::as_slice)
            .ok_or(MissingDocument { doc })
    }

    /// Number of documents with an entry.
    pub fn num_documents(&self) -> usize {
        self.offsets.len()
    }

    /// Total number of offsets across all documents.
    pub fn total_offsets(&self) -> u64 {
        self.total
    }

    /// True if no document has an entry.
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// True iff there is exactly one entry per document index in `0..docs`.
    ///
    /// Entries are only ever added for valid dense indices, so the count
    /// check suffices.
    pub fn is_complete(&self, docs: u32) -> bool {
        self.offsets.len() == docs as usize
    }

    /// Iterates `(doc index, offsets)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &[Offset])> {
        self.offsets.iter().map(|(&d, v)| (d, v.as_slice()))
    }
}
