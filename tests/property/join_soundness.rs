//! Property tests for the merge-join inner loop.
//!
//! The join must equal plain set semantics `{ x in S : x + d in B }` on both
//! the linear and the galloping branch; branch selection is a size-ratio
//! internal that must never change results.

use proptest::prelude::*;

use repeats_rs::{join, Offset, GALLOP_RATIO};

/// Reference semantics, no merge tricks.
fn naive(s: &[Offset], d: Offset, b: &[Offset]) -> Vec<Offset> {
    s.iter()
        .copied()
        .filter(|&x| b.binary_search(&(x + d)).is_ok())
        .collect()
}

fn sorted_offsets(max_len: usize) -> impl Strategy<Value = Vec<Offset>> {
    proptest::collection::btree_set(0u32..1 << 16, 0..max_len)
        .prop_map(|set| set.into_iter().collect())
}

proptest! {
    #[test]
    fn join_matches_set_semantics(
        s in sorted_offsets(64),
        b in sorted_offsets(64),
        d in 0u32..512,
    ) {
        prop_assert_eq!(join(&s, d, &b), naive(&s, d, &b));
    }

    #[test]
    fn gallop_branch_matches_set_semantics(
        s in sorted_offsets(8),
        b in proptest::collection::btree_set(0u32..1 << 16, 512..1024)
            .prop_map(|set| set.into_iter().collect::<Vec<Offset>>()),
        d in 0u32..512,
    ) {
        // |B| >= 512 and |S| <= 8 forces the galloping branch whenever S is
        // non-empty.
        prop_assert!(s.is_empty() || b.len() >= GALLOP_RATIO * s.len());
        prop_assert_eq!(join(&s, d, &b), naive(&s, d, &b));
    }

    #[test]
    fn join_output_is_strictly_ascending(
        s in sorted_offsets(64),
        b in sorted_offsets(256),
        d in 0u32..512,
    ) {
        let out = join(&s, d, &b);
        prop_assert!(out.windows(2).all(|w| w[0] < w[1]));
    }
}
