//! Frontier iteration: bottom-up expansion from single bytes to the longest
//! valid terms.
//!
//! Round `m -> m+1` takes every proposal from the mode's extender, joins the
//! source term's offsets against the suffix byte's offsets per document, and
//! keeps the extension only if enough documents still reach their required
//! non-overlapping count. The surviving postings become the next frontier.
//! Iteration stops when a round keeps nothing (*converged*) or the length
//! cap is reached.
//!
//! # Invariants
//! - The inverted index is immutable here; per-round frontier maps are the
//!   only mutable state.
//! - Every postings value in a frontier is complete (one entry per corpus
//!   document), so a [`MissingDocument`] from a lookup is a broken invariant
//!   and aborts the search.
//! - Documents are visited in the index's selectivity order inside every
//!   candidate build, so the bad-document early abort fires at the same
//!   point on every run and results are reproducible.
//! - Candidate evaluation order is the extender's deterministic proposal
//!   order; duplicate result terms resolve last-write-wins on equal-valued
//!   postings.

use ahash::AHashMap;

use crate::config::SearchConfig;
use crate::error::MissingDocument;
use crate::extend::{Candidate, Extender, SeqExtender, StringExtender};
use crate::filter::TermFilter;
use crate::index::InvertedIndex;
use crate::join::join_into;
use crate::overlap::non_overlapping_count;
use crate::postings::{Offset, Postings};
use crate::term::{ByteTerm, SeqTerm, Term};

/// All valid terms of one length, with their postings.
pub struct Frontier<T: Term> {
    map: AHashMap<T, Postings>,
    // Lex-sorted keys of `map`, rebuilt by `seal`.
    terms: Vec<T>,
}

impl<T: Term> Frontier<T> {
    fn new() -> Self {
        Self {
            map: AHashMap::new(),
            terms: Vec::new(),
        }
    }

    /// Sorted terms of this level. Valid after the owning set is sealed.
    pub fn terms(&self) -> &[T] {
        &self.terms
    }

    /// Postings of `term`, if present.
    pub fn postings(&self, term: &T) -> Option<&Postings> {
        self.map.get(term)
    }

    /// Number of terms at this level.
    pub fn num_terms(&self) -> usize {
        self.map.len()
    }

    /// True if the level holds no terms.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Sum of stored offsets across all terms at this level.
    pub fn total_offsets(&self) -> u64 {
        self.map.values().map(Postings::total_offsets).sum()
    }

    fn insert(&mut self, term: T, postings: Postings) {
        self.map.insert(term, postings);
    }

    fn seal(&mut self) {
        if self.terms.len() != self.map.len() {
            self.terms = self.map.keys().cloned().collect();
            self.terms.sort_unstable();
        }
    }

    fn clear(&mut self) {
        self.map.clear();
        self.terms.clear();
    }
}

/// Per-length frontier levels.
///
/// String mode only ever populates one level at a time; sequence mode keeps
/// a sliding band of lengths `[ceil(epsilon * m), m]` alive because gap
/// extensions reach back to shorter sources.
pub struct FrontierSet<T: Term> {
    levels: Vec<Frontier<T>>,
}

impl<T: Term> FrontierSet<T> {
    /// Set with room for lengths `0..=max_len + 1`.
    pub fn new(max_len: usize) -> Self {
        Self {
            levels: (0..max_len + 2).map(|_| Frontier::new()).collect(),
        }
    }

    /// The frontier at `len`.
    pub fn level(&self, len: usize) -> &Frontier<T> {
        &self.levels[len]
    }

    /// Inserts a term at the level of its own length.
    pub fn insert(&mut self, term: T, postings: Postings) {
        let len = term.len();
        self.levels[len].insert(term, postings);
    }

    /// Rebuilds the sorted term vectors of levels touched since last seal.
    pub fn seal(&mut self) {
        for level in &mut self.levels {
            level.seal();
        }
    }

    fn drop_below(&mut self, min_len: usize) {
        let cut = min_len.min(self.levels.len());
        for level in &mut self.levels[..cut] {
            level.clear();
        }
    }

    fn highest_nonempty(&self) -> Option<usize> {
        (0..self.levels.len()).rev().find(|&i| !self.levels[i].is_empty())
    }

    fn total_terms(&self) -> usize {
        self.levels.iter().map(Frontier::num_terms).sum()
    }

    fn total_offsets(&self) -> u64 {
        self.levels.iter().map(Frontier::total_offsets).sum()
    }
}

/// Counters for one search run.
#[derive(Clone, Copy, Debug, Default)]
pub struct SearchStats {
    /// Extension rounds executed.
    pub rounds: u32,
    /// Candidates proposed by the extender.
    pub proposed: u64,
    /// Candidates whose postings survived the validity checks.
    pub built: u64,
    /// Survivors rejected by the domain filter.
    pub filtered: u64,
    /// Candidates abandoned by the bad-document abort.
    pub dropped: u64,
    /// Terms inserted into frontiers.
    pub kept: u64,
    /// High-water mark of resident frontier terms.
    pub peak_terms: usize,
    /// High-water mark of resident frontier offsets.
    pub peak_offsets: u64,
}

/// Final result of a repeat search.
#[derive(Clone, Debug)]
pub struct SearchOutcome<T: Term> {
    /// True if iteration stopped because a round kept nothing; false if the
    /// length cap ended it.
    pub converged: bool,
    /// Length of the longest valid terms (0 if none survived).
    pub longest_len: usize,
    /// Longest valid terms, lex-sorted.
    pub longest: Vec<T>,
    /// Most recent non-empty exact-match set (raw count equal to the
    /// requirement in every document), once the latch opened.
    pub exact: Vec<T>,
    /// Run counters.
    pub stats: SearchStats,
}

/// Finds the longest repeated byte strings in the corpus.
pub fn find_repeated_strings(
    index: &InvertedIndex,
    filter: &dyn TermFilter,
    cfg: &SearchConfig,
) -> Result<SearchOutcome<ByteTerm>, MissingDocument> {
    run(index, &StringExtender, filter, cfg)
}

/// Finds the longest repeated byte sequences, wildcard gaps allowed.
pub fn find_repeated_sequences(
    index: &InvertedIndex,
    filter: &dyn TermFilter,
    cfg: &SearchConfig,
) -> Result<SearchOutcome<SeqTerm>, MissingDocument> {
    let extender = SeqExtender {
        epsilon: cfg.epsilon,
    };
    run(index, &extender, filter, cfg)
}

fn run<T, X>(
    index: &InvertedIndex,
    extender: &X,
    filter: &dyn TermFilter,
    cfg: &SearchConfig,
) -> Result<SearchOutcome<T>, MissingDocument>
where
    T: Term,
    X: Extender<T>,
{
    let mut frontiers: FrontierSet<T> = FrontierSet::new(cfg.max_term_len);
    for &b in index.valid_bytes() {
        if let Some(postings) = index.byte_postings(b) {
            frontiers.insert(T::from_byte(b), postings.clone());
        }
    }
    frontiers.seal();

    let mut stats = SearchStats {
        peak_terms: frontiers.total_terms(),
        peak_offsets: frontiers.total_offsets(),
        ..SearchStats::default()
    };
    let mut exact: Vec<T> = Vec::new();
    let mut latched = false;
    let mut converged = false;
    let mut candidates: Vec<Candidate> = Vec::new();
    let mut scratch: Vec<Offset> = Vec::new();

    let mut m = 1;
    loop {
        // Exact matches are scanned per length; the latch keeps early noisy
        // rounds from being retained, then the longest non-empty set wins.
        let matches = exact_matches_at(frontiers.level(m), index);
        if matches.len() >= cfg.exact_latch {
            latched = true;
        }
        if latched && !matches.is_empty() {
            exact = matches;
        }

        if m + 1 > cfg.max_term_len {
            break;
        }

        extender.candidates(&frontiers, m, index.valid_bytes(), &mut candidates);
        stats.proposed += candidates.len() as u64;

        let mut round_out: AHashMap<T, Postings> = AHashMap::new();
        let mut built = 0u64;
        let mut filtered = 0u64;
        for cand in &candidates {
            let level = frontiers.level(cand.src_len);
            let source = &level.terms()[cand.src_idx];
            let Some(s_postings) = level.postings(source) else {
                continue;
            };
            let Some(postings) = build_candidate(index, s_postings, cand, &mut scratch)? else {
                stats.dropped += 1;
                continue;
            };
            built += 1;
            let term = source.extend(cand.gap, cand.byte);
            if !filter.is_allowed(term.literal(), term.len()) {
                filtered += 1;
                continue;
            }
            round_out.insert(term, postings);
        }
        stats.built += built;
        stats.filtered += filtered;
        stats.rounds += 1;

        if cfg.log_rounds {
            eprintln!(
                "repeats: len={} terms={} proposed={} built={} kept={} filtered={}",
                m,
                frontiers.level(m).num_terms(),
                candidates.len(),
                built,
                round_out.len(),
                filtered
            );
        }

        if round_out.is_empty() {
            converged = true;
            break;
        }
        stats.kept += round_out.len() as u64;
        for (term, postings) in round_out {
            frontiers.insert(term, postings);
        }
        frontiers.drop_below(extender.min_source_len(m + 1));
        frontiers.seal();
        stats.peak_terms = stats.peak_terms.max(frontiers.total_terms());
        stats.peak_offsets = stats.peak_offsets.max(frontiers.total_offsets());
        m += 1;
    }

    let (longest_len, longest) = match frontiers.highest_nonempty() {
        Some(len) => (len, frontiers.level(len).terms().to_vec()),
        None => (0, Vec::new()),
    };
    Ok(SearchOutcome {
        converged,
        longest_len,
        longest,
        exact,
        stats,
    })
}

/// Builds a candidate's postings, or `None` if too many documents fall
/// short of their required count.
///
/// Documents within tolerance still contribute their (possibly empty)
/// offsets so surviving postings stay complete.
fn build_candidate(
    index: &InvertedIndex,
    s_postings: &Postings,
    cand: &Candidate,
    scratch: &mut Vec<Offset>,
) -> Result<Option<Postings>, MissingDocument> {
    let Some(b_postings) = index.byte_postings(cand.byte) else {
        return Ok(None);
    };
    let displacement = (cand.src_len + cand.gap) as Offset;
    let new_len = (cand.src_len + cand.gap + 1) as u32;
    let n_bad_allowed = index.n_bad_allowed();

    let mut bad_docs = 0u32;
    let mut out = Postings::new();
    for (doc, record) in index.docs().iter().enumerate() {
        let doc = doc as u32;
        let s_offsets = s_postings.offsets_of(doc)?;
        let b_offsets = b_postings.offsets_of(doc)?;
        join_into(s_offsets, displacement, b_offsets, scratch);

        let required = record.required as usize;
        if scratch.len() < required || non_overlapping_count(scratch, new_len) < required {
            bad_docs += 1;
            if bad_docs > n_bad_allowed {
                return Ok(None);
            }
        }
        out.add_document(doc, scratch.clone())
            .expect("each document is joined exactly once per candidate");
    }
    Ok(Some(out))
}

/// Terms at this level whose raw occurrence count equals the requirement in
/// every document, lex-sorted.
fn exact_matches_at<T: Term>(frontier: &Frontier<T>, index: &InvertedIndex) -> Vec<T> {
    let docs = index.docs();
    let mut out: Vec<T> = frontier
        .terms()
        .iter()
        .filter(|term| {
            frontier.postings(term).is_some_and(|postings| {
                postings
                    .iter()
                    .all(|(doc, offsets)| offsets.len() as u64 == u64::from(docs[doc as usize].required))
            })
        })
        .cloned()
        .collect();
    out.sort_unstable();
    out
}
