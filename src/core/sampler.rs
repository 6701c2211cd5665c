// File: src/core/sampler.rs
use crate::core::types::{CandidateSet, RuleTable, NULL};
use rand::Rng;

impl CandidateSet {
    /// Inverse-CDF lookup: the first candidate whose cumulative weight is at
    /// least `draw`. Falls back to the last candidate when the weights never
    /// reach `draw`, so a key whose weights stop short of 1.0 still samples.
    pub fn pick(&self, draw: f64) -> Option<&str> {
        self.candidates()
            .iter()
            .zip(self.cumulative())
            .find(|(_, cum)| **cum >= draw)
            .map(|(c, _)| c.as_str())
            .or_else(|| self.candidates().last().map(String::as_str))
    }
}

/// Maps the NULL sentinel to the empty string.
fn resolve(candidate: &str) -> &str {
    if candidate == NULL {
        ""
    } else {
        candidate
    }
}

impl RuleTable {
    /// Draws one transliteration of `grapheme`.
    ///
    /// Graphemes with no rule (digits, punctuation, whitespace, anything
    /// the key does not cover) come back unchanged.
    pub fn sample<'a, R: Rng + ?Sized>(&'a self, grapheme: &'a str, rng: &mut R) -> &'a str {
        if grapheme == NULL {
            return "";
        }
        match self.get(grapheme) {
            Some(set) => {
                let draw: f64 = rng.random();
                set.pick(draw).map(resolve).unwrap_or(grapheme)
            }
            None => grapheme,
        }
    }
}
