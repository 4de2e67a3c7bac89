//! Maximum non-overlapping occurrence count over sorted offsets.
//!
//! Validity pruning counts only non-overlapping occurrences: greedy
//! left-to-right selection (keep the first offset, then the next offset at
//! least `len` further on) is optimal for interval scheduling with uniform
//! lengths.
//!
//! The count is computed on the side; the postings offsets are never
//! replaced by their non-overlapping subset. Overlapping length-m offsets
//! can still be prefixes of non-overlapping length-(m+1) occurrences:
//! in "aabcabcaa" with two required repeats, "ab" at offsets 1 and 4
//! overlaps "aa"/"ca" picks at length 2, yet "abc" at length 3 is the
//! answer. Dropping overlapped offsets at length 2 would lose it.

use crate::postings::Offset;

/// Maximum number of offsets selectable so that no two chosen offsets are
/// closer than `len`.
///
/// Pruning with this count at the current length is monotone: every
/// non-overlapping length-(m+1) occurrence starts at a non-overlapping
/// length-m occurrence, so a term is never discarded while an extension of
/// it could still be valid.
pub fn non_overlapping_count(offsets: &[Offset], len: u32) -> usize {
    let mut iter = offsets.iter();
    let Some(&first) = iter.next() else {
        return 0;
    };
    let mut count = 1;
    let mut last = first;
    for &off in iter {
        debug_assert!(off > last);
        if off >= last + len {
            count += 1;
            last = off;
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_singleton() {
        assert_eq!(non_overlapping_count(&[], 3), 0);
        assert_eq!(non_overlapping_count(&[7], 3), 1);
    }

    #[test]
    fn dense_run_packs_by_length() {
        // Offsets 0..10, length 3: picks 0, 3, 6, 9.
        let offsets: Vec<Offset> = (0..10).collect();
        assert_eq!(non_overlapping_count(&offsets, 3), 4);
        assert_eq!(non_overlapping_count(&offsets, 1), 10);
        assert_eq!(non_overlapping_count(&offsets, 10), 1);
    }

    #[test]
    fn aabcabcaa_counts() {
        // The counterexample for pruning postings down to their
        // non-overlapping subset.
        let text = b"aabcabcaa";
        let offsets_of = |needle: &[u8]| -> Vec<Offset> {
            (0..=text.len() - needle.len())
                .filter(|&i| &text[i..i + needle.len()] == needle)
                .map(|i| i as Offset)
                .collect()
        };
        // m = 1.
        assert_eq!(non_overlapping_count(&offsets_of(b"a"), 1), 5);
        assert_eq!(non_overlapping_count(&offsets_of(b"b"), 1), 2);
        assert_eq!(non_overlapping_count(&offsets_of(b"c"), 1), 2);
        // m = 2: "aa" at 0,7 and "ab" at 1,4 both count 2 even though the
        // occurrences interleave.
        assert_eq!(non_overlapping_count(&offsets_of(b"aa"), 2), 2);
        assert_eq!(non_overlapping_count(&offsets_of(b"ab"), 2), 2);
        // m = 3: "abc" twice, non-overlapping.
        assert_eq!(non_overlapping_count(&offsets_of(b"abc"), 3), 2);
    }

    #[test]
    fn greedy_skips_only_overlaps() {
        assert_eq!(non_overlapping_count(&[0, 1, 5, 6, 10], 5), 3);
        assert_eq!(non_overlapping_count(&[0, 4, 8], 5), 2);
    }
}
