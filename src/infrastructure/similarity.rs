//! Similarity oracles backed by edit distance.

use crate::application::ports::SimilarityOracle;

/// Damerau-Levenshtein distance normalized by the longer string's length.
///
/// Works on `char`s, so each CJK character counts as one edit. Two empty
/// strings are identical (distance 0); an empty string against a non-empty
/// one is fully dissimilar (distance 1).
///
/// # Example
/// ```
/// use reply_throttle::{DamerauLevenshtein, SimilarityOracle};
///
/// let oracle = DamerauLevenshtein;
/// assert_eq!(oracle.distance("光炮 1", "光炮 1"), 0.0);
/// // One deletion out of four characters
/// assert!((oracle.distance("光炮 1", "光炮1") - 0.25).abs() < 1e-9);
/// // Adjacent transposition is a single edit
/// assert!((oracle.distance("ab", "ba") - 0.5).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DamerauLevenshtein;

impl SimilarityOracle for DamerauLevenshtein {
    fn distance(&self, a: &str, b: &str) -> f64 {
        let similarity = strsim::normalized_damerau_levenshtein(a, b);
        (1.0 - similarity).clamp(0.0, 1.0)
    }
}

/// Strict equality: distance 0 for equal strings, 1 otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactMatch;

impl SimilarityOracle for ExactMatch {
    fn distance(&self, a: &str, b: &str) -> f64 {
        if a == b {
            0.0
        } else {
            1.0
        }
    }
}
