//! Merge-join inner loop: derive extended-term offsets from prefix offsets.
//!
//! Given the sorted offsets `S` of a term `s` and the sorted offsets `B` of
//! a byte `b`, the join emits every `x` in `S` with `x + d` in `B`, where
//! `d` is the displacement from the start of `s` to the appended byte
//! (`|s|` plus any wildcard gap). This is the hot path of every candidate
//! build: everything else in a round is bookkeeping around this loop.
//!
//! Two advance strategies, picked per call from the size ratio:
//! - Balanced (`|B| < 8 * |S|`): plain two-pointer linear advance,
//!   `O(|S| + |B|)`.
//! - Skewed: the `B` cursor advances by fixed power-of-two jumps bracketed
//!   with a binary search, bounding the cost by `O(|S| * log(|B|/|S|))`
//!   while the `S` cursor stays linear.
//!
//! The output is strictly ascending and duplicate-free by construction:
//! `S` is strictly ascending and each element is emitted at most once.

use crate::postings::Offset;

/// Ratio `|B| / |S|` at or above which the galloping branch is used.
pub const GALLOP_RATIO: usize = 8;

/// Joins into a fresh vector. Convenience wrapper around [`join_into`].
pub fn join(s_offsets: &[Offset], displacement: Offset, b_offsets: &[Offset]) -> Vec<Offset> {
    let mut out = Vec::new();
    join_into(s_offsets, displacement, b_offsets, &mut out);
    out
}

/// Emits all `x` in `s_offsets` with `x + displacement` in `b_offsets`.
///
/// `out` is cleared first; callers reuse one buffer across candidate builds
/// to keep the inner loop allocation-free after warm-up.
///
/// Offset arithmetic is unchecked: ingestion bounds document bodies so that
/// `offset + displacement` cannot wrap (see `ingest`).
pub fn join_into(
    s_offsets: &[Offset],
    displacement: Offset,
    b_offsets: &[Offset],
    out: &mut Vec<Offset>,
) {
    out.clear();
    if s_offsets.is_empty() || b_offsets.is_empty() {
        return;
    }
    if b_offsets.len() < GALLOP_RATIO * s_offsets.len() {
        join_linear(s_offsets, displacement, b_offsets, out);
    } else {
        join_gallop(s_offsets, displacement, b_offsets, out);
    }
}

/// Two-pointer walk, both cursors linear.
fn join_linear(s: &[Offset], d: Offset, b: &[Offset], out: &mut Vec<Offset>) {
    let mut i = 0;
    let mut j = 0;
    while i < s.len() && j < b.len() {
        let target = s[i] + d;
        if b[j] == target {
            out.push(s[i]);
            i += 1;
            j += 1;
        } else if b[j] < target {
            while j < b.len() && b[j] < target {
                j += 1;
            }
        } else {
            // b[j] > target: catch s up to the first x with x + d >= b[j].
            let floor = b[j] - d;
            while i < s.len() && s[i] < floor {
                i += 1;
            }
        }
    }
}

/// Two-pointer walk with jump-and-bisect advance on the large side.
fn join_gallop(s: &[Offset], d: Offset, b: &[Offset], out: &mut Vec<Offset>) {
    let step = (b.len() / s.len().max(1)).next_power_of_two();
    let mut i = 0;
    let mut j = 0;
    while i < s.len() && j < b.len() {
        let target = s[i] + d;
        if b[j] == target {
            out.push(s[i]);
            i += 1;
            j += 1;
        } else if b[j] < target {
            j = advance_gallop(b, j, target, step);
        } else {
            let floor = b[j] - d;
            while i < s.len() && s[i] < floor {
                i += 1;
            }
        }
    }
}

/// First index `>= from` whose value is `>= target`.
///
/// Jumps forward in fixed `step`-sized strides (each stride moves the
/// cursor, so total stride work across a whole join is linear in `|B|/step`),
/// then bisects the final stride.
fn advance_gallop(b: &[Offset], from: usize, target: Offset, step: usize) -> usize {
    debug_assert!(step.is_power_of_two());
    let mut lo = from;
    let mut probe = from + step;
    while probe < b.len() && b[probe] < target {
        lo = probe;
        probe += step;
    }
    let hi = probe.min(b.len());
    lo + b[lo..hi].partition_point(|&x| x < target)
}
