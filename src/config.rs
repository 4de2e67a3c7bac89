//! Engine configuration.

/// Default upper bound on term length (and therefore round count).
pub const DEFAULT_MAX_TERM_LEN: usize = 100;

/// Default minimum non-wildcard fraction for sequence-mode terms.
pub const DEFAULT_EPSILON: f64 = 0.9;

/// Default number of exact matches a round must produce before the
/// exact-match tracker starts latching results.
pub const DEFAULT_EXACT_LATCH: usize = 3;

/// Tuning knobs for a repeat search.
///
/// Corpus-shaped settings (header size, bad-document tolerance) live where
/// the corpus is built; this struct only carries per-search iteration
/// parameters.
#[derive(Clone, Debug)]
pub struct SearchConfig {
    /// Upper bound on term length; the iteration stops (unconverged) when a
    /// frontier would exceed it.
    pub max_term_len: usize,

    /// Minimum fraction of non-wildcard positions per term. Sequence mode
    /// only; ignored by the string-mode engine.
    pub epsilon: f64,

    /// Rounds must produce at least this many exact matches before the
    /// tracker starts retaining them (dampens noise at short lengths).
    pub exact_latch: usize,

    /// Write one key=value progress line per round to stderr.
    pub log_rounds: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_term_len: DEFAULT_MAX_TERM_LEN,
            epsilon: DEFAULT_EPSILON,
            exact_latch: DEFAULT_EXACT_LATCH,
            log_rounds: false,
        }
    }
}
