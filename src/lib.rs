//! Longest repeated byte-sequence miner over a corpus of binary documents.
//!
//! Every corpus document carries its own required repeat count `R`; a term
//! (byte string, or byte sequence with wildcards) is *valid* if it occurs at
//! least `R` times without overlap in every document. The engine returns the
//! longest valid terms, plus the terms whose raw count equals `R` everywhere
//! (*exact matches*).
//!
//! The search is bottom-up over an inverted index of byte offsets:
//! 1) Index construction: per-document byte histograms, intersection of the
//!    locally repeated byte sets, offset postings for surviving bytes.
//! 2) Frontier iteration: length-m terms propose length-(m+1) extensions;
//!    each proposal joins its prefix offsets against a suffix byte's offsets
//!    (two-pointer merge, galloping on skewed ratios).
//! 3) Pruning: non-overlapping counts against per-document requirements,
//!    with a bounded bad-document tolerance, plus a pluggable noise filter.
//! 4) Convergence: the last non-empty frontier holds the answer.
//!
//! High-level flow (CLI):
//! Manifest -> ingest (mmap, header strip) -> inverted index -> frontier
//! iteration -> report.
//!
//! Single-threaded by design: the iteration phase does no I/O and candidate
//! builds share nothing but the immutable index.

pub mod config;
pub mod engine;
pub mod error;
pub mod extend;
pub mod filter;
pub mod index;
pub mod ingest;
pub mod join;
pub mod overlap;
pub mod postings;
pub mod term;
pub mod util;

pub use config::{SearchConfig, DEFAULT_EPSILON, DEFAULT_EXACT_LATCH, DEFAULT_MAX_TERM_LEN};
pub use engine::{
    find_repeated_sequences, find_repeated_strings, Frontier, FrontierSet, SearchOutcome,
    SearchStats,
};
pub use error::{IndexError, IngestError, ManifestError, MissingDocument};
pub use extend::{Candidate, Extender, SeqExtender, StringExtender};
pub use filter::{AllowAll, NoiseFilter, TermFilter, DEFAULT_MIN_TERM_SIZE};
pub use index::{DocRecord, IndexBuilder, InvertedIndex, DEFAULT_HEADER_SIZE, MAX_BODY_LEN};
pub use ingest::{
    build_index, default_pattern, read_manifest, IngestOptions, IngestStats, ManifestEntry,
};
pub use join::{join, join_into, GALLOP_RATIO};
pub use overlap::non_overlapping_count;
pub use postings::{Offset, Postings};
pub use term::{ByteTerm, SeqTerm, Sym, Term};
