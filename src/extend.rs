//! Candidate extension: which (gap, byte) extensions of frontier terms are
//! worth building.
//!
//! Extension proposals are cheap bookkeeping; the expensive part is the
//! postings join each proposal triggers. Both extenders therefore prune as
//! hard as their mode allows before anything is joined:
//!
//! - String mode uses the both-ends rule: `s + b` can only be valid if its
//!   length-m suffix `s[1..] + b` is itself a valid frontier term, because
//!   every substring of a valid term is at least as frequent. Membership is
//!   a binary search on the lex-sorted frontier.
//! - Sequence mode cannot use the suffix rule (a gap extension's suffix is
//!   not a frontier key), so it prunes on the wildcard budget instead:
//!   at target length m+1 a term may carry at most
//!   `W = (m+1) - ceil(epsilon * (m+1))` wildcards, and only source terms
//!   of length `i >= ceil(epsilon * m)` with
//!   `wildcards + (m - i) <= W` can still reach a conforming extension.

use crate::engine::FrontierSet;
use crate::term::{ByteTerm, SeqTerm, Term};

/// One proposed extension: source term (by frontier position), wildcard gap,
/// suffix byte.
///
/// Candidates index into the sorted term vector of their source level so
/// proposal lists stay flat and copyable; the engine resolves them while the
/// frontier is still immutable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Candidate {
    /// Length of the source term (frontier level).
    pub src_len: usize,
    /// Index into the sorted terms of that level.
    pub src_idx: usize,
    /// Wildcards inserted between source and suffix byte.
    pub gap: usize,
    /// Appended byte.
    pub byte: u8,
}

/// Mode-specific candidate proposal strategy.
pub trait Extender<T: Term> {
    /// Proposes extensions for round `m -> m+1` into `out` (cleared first).
    ///
    /// Proposal order must be deterministic: the engine resolves duplicate
    /// result terms by last write in proposal order.
    fn candidates(
        &self,
        frontiers: &FrontierSet<T>,
        m: usize,
        valid_bytes: &[u8],
        out: &mut Vec<Candidate>,
    );

    /// Lowest frontier level still needed as a source at round `m`.
    ///
    /// Levels below this are dropped after each round.
    fn min_source_len(&self, m: usize) -> usize;
}

/// String-mode extender: gap-free, both-ends pruned.
#[derive(Clone, Copy, Debug, Default)]
pub struct StringExtender;

impl Extender<ByteTerm> for StringExtender {
    fn candidates(
        &self,
        frontiers: &FrontierSet<ByteTerm>,
        m: usize,
        valid_bytes: &[u8],
        out: &mut Vec<Candidate>,
    ) {
        out.clear();
        let terms = frontiers.level(m).terms();
        // One suffix buffer for the whole round; only the last byte changes
        // per proposal, so the membership probe never allocates.
        let mut suffix = vec![0u8; m];
        for (src_idx, s) in terms.iter().enumerate() {
            suffix[..m - 1].copy_from_slice(&s.as_bytes()[1..]);
            for &byte in valid_bytes {
                suffix[m - 1] = byte;
                let found = terms
                    .binary_search_by(|t| t.as_bytes().cmp(suffix.as_slice()))
                    .is_ok();
                if found {
                    out.push(Candidate {
                        src_len: m,
                        src_idx,
                        gap: 0,
                        byte,
                    });
                }
            }
        }
    }

    fn min_source_len(&self, m: usize) -> usize {
        // Only the previous length feeds a string-mode round.
        m
    }
}

/// Sequence-mode extender: wildcard gaps under an epsilon budget.
#[derive(Clone, Copy, Debug)]
pub struct SeqExtender {
    /// Minimum fraction of non-wildcard positions per term.
    pub epsilon: f64,
}

impl SeqExtender {
    /// Smallest integer `>= epsilon * n`.
    fn ceil_frac(&self, n: usize) -> usize {
        (self.epsilon * n as f64).ceil() as usize
    }

    /// Maximum wildcards a term of length `len` may carry.
    pub fn wildcard_budget(&self, len: usize) -> usize {
        len - self.ceil_frac(len).min(len)
    }
}

impl Extender<SeqTerm> for SeqExtender {
    fn candidates(
        &self,
        frontiers: &FrontierSet<SeqTerm>,
        m: usize,
        valid_bytes: &[u8],
        out: &mut Vec<Candidate>,
    ) {
        out.clear();
        let budget = self.wildcard_budget(m + 1);
        let min_len = self.min_source_len(m);
        for src_len in min_len..=m {
            let terms = frontiers.level(src_len).terms();
            for (src_idx, t) in terms.iter().enumerate() {
                let wild = t.wildcards();
                if wild + (m - src_len) > budget {
                    continue;
                }
                for gap in 0..=(budget - wild) {
                    for &byte in valid_bytes {
                        out.push(Candidate {
                            src_len,
                            src_idx,
                            gap,
                            byte,
                        });
                    }
                }
            }
        }
    }

    fn min_source_len(&self, m: usize) -> usize {
        self.ceil_frac(m).max(1)
    }
}
