//! End-to-end laws for the string-mode engine against a brute-force oracle.
//!
//! On bounded random corpora the frontier iteration must agree exactly with
//! direct enumeration: the longest valid set, its length, and the exact-match
//! tracking (latch 1) are all compared. Idempotence and the convergence-flag
//! contract are checked separately.

use std::collections::BTreeSet;

use proptest::prelude::*;

use repeats_rs::{
    find_repeated_strings, non_overlapping_count, AllowAll, ByteTerm, InvertedIndex, Offset,
    SearchConfig, SearchOutcome, Term,
};

type Doc = (Vec<u8>, u32);

/// All start offsets of `term` in `body`, overlaps included.
fn occurrences(body: &[u8], term: &[u8]) -> Vec<Offset> {
    if term.is_empty() || term.len() > body.len() {
        return Vec::new();
    }
    (0..=body.len() - term.len())
        .filter(|&i| &body[i..i + term.len()] == term)
        .map(|i| i as Offset)
        .collect()
}

fn is_valid(docs: &[Doc], term: &[u8]) -> bool {
    docs.iter().all(|(body, required)| {
        let occ = occurrences(body, term);
        non_overlapping_count(&occ, term.len() as u32) >= *required as usize
    })
}

fn is_exact(docs: &[Doc], term: &[u8]) -> bool {
    docs.iter()
        .all(|(body, required)| occurrences(body, term).len() == *required as usize)
}

/// Brute-force enumeration of the longest valid set and the exact-match
/// tracking with latch 1 (most recent non-empty per-length exact set).
fn oracle(docs: &[Doc]) -> (usize, BTreeSet<Vec<u8>>, BTreeSet<Vec<u8>>) {
    let max_len = docs.iter().map(|(b, _)| b.len()).min().unwrap_or(0);
    let mut longest: (usize, BTreeSet<Vec<u8>>) = (0, BTreeSet::new());
    let mut exact_latest: BTreeSet<Vec<u8>> = BTreeSet::new();
    for len in 1..=max_len {
        // A term valid everywhere occurs in the first document, so its
        // substrings enumerate every candidate.
        let body0 = &docs[0].0;
        let mut valid_at: BTreeSet<Vec<u8>> = BTreeSet::new();
        let mut exact_at: BTreeSet<Vec<u8>> = BTreeSet::new();
        for i in 0..=body0.len().saturating_sub(len) {
            let term = &body0[i..i + len];
            if valid_at.contains(term) {
                continue;
            }
            if is_valid(docs, term) {
                valid_at.insert(term.to_vec());
                if is_exact(docs, term) {
                    exact_at.insert(term.to_vec());
                }
            }
        }
        if !exact_at.is_empty() {
            exact_latest = exact_at;
        }
        if valid_at.is_empty() {
            // Validity is substring-monotone: nothing longer can be valid.
            break;
        }
        longest = (len, valid_at);
    }
    (longest.0, longest.1, exact_latest)
}

fn run_engine(docs: &[Doc], cfg: &SearchConfig) -> SearchOutcome<ByteTerm> {
    let names: Vec<String> = (0..docs.len()).map(|i| format!("d{}", i)).collect();
    let input: Vec<(&str, u32, &[u8])> = docs
        .iter()
        .zip(&names)
        .map(|((body, required), name)| (name.as_str(), *required, body.as_slice()))
        .collect();
    let index = InvertedIndex::from_docs(&input, 0, 0).expect("corpus builds");
    find_repeated_strings(&index, &AllowAll, cfg).expect("complete postings")
}

fn term_set(terms: &[ByteTerm]) -> BTreeSet<Vec<u8>> {
    terms.iter().map(|t| t.as_bytes().to_vec()).collect()
}

fn doc_strategy() -> impl Strategy<Value = Doc> {
    (
        proptest::collection::vec(prop_oneof![Just(b'a'), Just(b'b'), Just(b'c')], 4..24),
        1u32..=3,
    )
}

fn corpus_strategy() -> impl Strategy<Value = Vec<Doc>> {
    proptest::collection::vec(doc_strategy(), 1..=3)
}

proptest! {
    #[test]
    fn engine_matches_brute_force(docs in corpus_strategy()) {
        let cfg = SearchConfig {
            exact_latch: 1,
            ..SearchConfig::default()
        };
        let out = run_engine(&docs, &cfg);
        let (want_len, want_longest, want_exact) = oracle(&docs);

        prop_assert!(out.converged);
        prop_assert_eq!(out.longest_len, want_len);
        prop_assert_eq!(term_set(&out.longest), want_longest);
        prop_assert_eq!(term_set(&out.exact), want_exact);
    }

    #[test]
    fn reruns_are_identical(docs in corpus_strategy()) {
        let cfg = SearchConfig {
            exact_latch: 1,
            ..SearchConfig::default()
        };
        let a = run_engine(&docs, &cfg);
        let b = run_engine(&docs, &cfg);
        prop_assert_eq!(a.converged, b.converged);
        prop_assert_eq!(a.longest_len, b.longest_len);
        prop_assert_eq!(term_set(&a.longest), term_set(&b.longest));
        prop_assert_eq!(term_set(&a.exact), term_set(&b.exact));
    }

    #[test]
    fn convergence_flag_matches_cap(docs in corpus_strategy(), cap in 2usize..6) {
        let cfg = SearchConfig {
            max_term_len: cap,
            exact_latch: 1,
            ..SearchConfig::default()
        };
        let out = run_engine(&docs, &cfg);
        if out.converged {
            // The frontier died before the cap.
            prop_assert!(out.longest_len < cap);
        } else {
            // The cap ended the run with live terms at the cap length.
            prop_assert_eq!(out.longest_len, cap);
            prop_assert_eq!(out.stats.rounds as usize, cap - 1);
        }
    }

    #[test]
    fn reported_terms_meet_their_floors(docs in corpus_strategy()) {
        let out = run_engine(&docs, &SearchConfig::default());
        for term in &out.longest {
            prop_assert!(is_valid(&docs, term.as_bytes()));
            prop_assert_eq!(term.len(), out.longest_len);
        }
        for term in &out.exact {
            prop_assert!(is_exact(&docs, term.as_bytes()));
        }
    }
}
