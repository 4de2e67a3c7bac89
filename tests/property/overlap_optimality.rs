//! Property tests for the non-overlapping occurrence counter.
//!
//! Greedy keep-first selection must equal the true optimum, checked against
//! an independent O(n^2) dynamic program.

use proptest::prelude::*;

use repeats_rs::{non_overlapping_count, Offset};

/// Exact optimum by take-or-skip dynamic programming.
fn dp_optimum(offsets: &[Offset], len: u32) -> usize {
    let n = offsets.len();
    let mut opt = vec![0usize; n + 1];
    for i in (0..n).rev() {
        let skip = opt[i + 1];
        // First offset no closer than `len`; always past i since len >= 1.
        let next = offsets.partition_point(|&x| x < offsets[i] + len);
        let take = 1 + opt[next];
        opt[i] = skip.max(take);
    }
    opt[0]
}

fn sorted_offsets() -> impl Strategy<Value = Vec<Offset>> {
    proptest::collection::btree_set(0u32..1 << 14, 0..64)
        .prop_map(|set| set.into_iter().collect())
}

proptest! {
    #[test]
    fn greedy_equals_dp_optimum(offsets in sorted_offsets(), len in 1u32..64) {
        prop_assert_eq!(non_overlapping_count(&offsets, len), dp_optimum(&offsets, len));
    }

    #[test]
    fn count_is_monotone_in_length(offsets in sorted_offsets(), len in 1u32..63) {
        // A longer term can only reduce how many occurrences fit.
        prop_assert!(
            non_overlapping_count(&offsets, len + 1) <= non_overlapping_count(&offsets, len)
        );
    }
}
