// src/core/types.rs
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An atomic unit of the source orthography: a base letter, a digraph, or a
/// diacritic cluster. Case-sensitive; lowercase is the canonical form.
pub type Grapheme = String;

/// Candidate value meaning "drop this grapheme". Sampling it yields `""` and
/// case expansion never touches it.
pub const NULL: &str = "<null>";

/// Ordered transliteration candidates for one grapheme with their cumulative
/// weights. Earlier candidates are the more typical outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSet {
    candidates: Vec<String>,
    /// Ascending upper bounds in [0, 1]; the last one is 1.0 for a well-formed key.
    cumulative: Vec<f64>,
}

impl CandidateSet {
    /// Pairs candidates with cumulative weights. Returns `None` when the two
    /// lists differ in length or are empty.
    pub fn new(candidates: Vec<String>, cumulative: Vec<f64>) -> Option<Self> {
        if candidates.is_empty() || candidates.len() != cumulative.len() {
            return None;
        }
        Some(Self { candidates, cumulative })
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }

    /// Same weights, every non-NULL candidate rewritten by `f`.
    pub(crate) fn map_candidates(&self, f: impl Fn(&str) -> String) -> Self {
        let candidates = self
            .candidates
            .iter()
            .map(|c| if c == NULL { c.clone() } else { f(c) })
            .collect();
        Self { candidates, cumulative: self.cumulative.clone() }
    }
}

/// One parsed key-file line.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub grapheme: Grapheme,
    pub candidates: CandidateSet,
}

/// Grapheme -> candidates. Never holds an empty key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleTable {
    rules: HashMap<Grapheme, CandidateSet>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a rule, returning the previous candidates.
    /// Empty graphemes are ignored.
    pub fn insert(&mut self, grapheme: Grapheme, candidates: CandidateSet) -> Option<CandidateSet> {
        if grapheme.is_empty() {
            return None;
        }
        self.rules.insert(grapheme, candidates)
    }

    /// Inserts only when `grapheme` has no rule yet. Returns whether it did.
    pub fn insert_if_absent(&mut self, grapheme: Grapheme, candidates: CandidateSet) -> bool {
        if grapheme.is_empty() || self.rules.contains_key(&grapheme) {
            return false;
        }
        self.rules.insert(grapheme, candidates);
        true
    }

    pub fn get(&self, grapheme: &str) -> Option<&CandidateSet> {
        self.rules.get(grapheme)
    }

    pub fn contains(&self, grapheme: &str) -> bool {
        self.rules.contains_key(grapheme)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CandidateSet)> {
        self.rules.iter().map(|(g, c)| (g.as_str(), c))
    }

    pub fn graphemes(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }
}
