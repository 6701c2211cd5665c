// File: src/core/key.rs
//! Parser for handwritten romanization keys.
//!
//! One rule per line:
//!
//! ```text
//! # comment
//! a --- a; e
//! kh --- kh; k, h
//! ```
//!
//! Candidates before the `;` are the typical outputs and share
//! `prop_typical` of the probability mass; those after it share the rest.
//! With nothing after the `;` the typical candidates get all of it.

use crate::core::types::{CandidateSet, Rule};
use crate::encoding::{read_text, UTF_8};
use crate::error::{Result, RomanizerError};
use encoding_rs::Encoding;
use std::path::Path;
use tracing::{debug, warn};

const SEPARATOR: &str = " --- ";
pub const DEFAULT_PROP_TYPICAL: f64 = 0.9;

/// What to do with a non-blank, non-comment line that is not a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedLines {
    /// Log a warning and keep going.
    #[default]
    Skip,
    /// Abort with [`RomanizerError::MalformedLine`].
    Fail,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyOptions {
    /// Share of probability mass given to the typical candidates, in (0, 1).
    pub prop_typical: f64,
    pub malformed: MalformedLines,
    /// Encoding of the key file, and by default of the files transliterated
    /// with the resulting romanizer.
    pub encoding: &'static Encoding,
}

impl Default for KeyOptions {
    fn default() -> Self {
        Self {
            prop_typical: DEFAULT_PROP_TYPICAL,
            malformed: MalformedLines::Skip,
            encoding: UTF_8,
        }
    }
}

impl KeyOptions {
    pub fn with_prop_typical(prop_typical: f64) -> Self {
        Self { prop_typical, ..Self::default() }
    }

    pub fn strict(mut self) -> Self {
        self.malformed = MalformedLines::Fail;
        self
    }

    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn validate(&self) -> Result<()> {
        // Written this way so NaN is rejected too.
        if self.prop_typical > 0.0 && self.prop_typical < 1.0 {
            Ok(())
        } else {
            Err(RomanizerError::InvalidPropTypical(self.prop_typical))
        }
    }
}

/// `n` evenly spaced cumulative weights in `(start, stop]`, the last one
/// exactly `stop`.
fn spread(start: f64, stop: f64, n: usize) -> impl Iterator<Item = f64> {
    (1..=n).map(move |i| {
        if i == n {
            stop
        } else {
            start + (stop - start) * i as f64 / n as f64
        }
    })
}

fn split_candidates(segment: &str) -> Vec<String> {
    segment.split(',').map(|c| c.trim().to_string()).collect()
}

/// Parses a single trimmed rule line. Returns `None` if it is not a rule.
pub fn parse_rule(line: &str, prop_typical: f64) -> Option<Rule> {
    // Both splits take the last occurrence so a `;` or ` --- ` inside the
    // grapheme or typical segment stays there.
    let (head, less) = line.rsplit_once(';')?;
    let (grapheme, typical) = head.rsplit_once(SEPARATOR)?;
    if grapheme.is_empty() {
        return None;
    }

    let mut candidates = split_candidates(typical);
    let less = less.trim();
    let cumulative: Vec<f64> = if less.is_empty() {
        spread(0.0, 1.0, candidates.len()).collect()
    } else {
        let less_typical = split_candidates(less);
        let mut weights: Vec<f64> = spread(0.0, prop_typical, candidates.len()).collect();
        weights.extend(spread(prop_typical, 1.0, less_typical.len()));
        candidates.extend(less_typical);
        weights
    };

    let candidates = CandidateSet::new(candidates, cumulative)?;
    Some(Rule { grapheme: grapheme.to_string(), candidates })
}

/// Parses key-file lines into rules, in file order.
pub fn parse_key<I, S>(lines: I, options: &KeyOptions) -> Result<Vec<Rule>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    options.validate()?;
    let mut rules = Vec::new();
    let mut skipped = 0usize;

    for (idx, raw) in lines.into_iter().enumerate() {
        let raw = raw.as_ref();
        if raw.starts_with('#') {
            continue;
        }
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        match parse_rule(line, options.prop_typical) {
            Some(rule) => rules.push(rule),
            None => match options.malformed {
                MalformedLines::Skip => {
                    warn!(line_no = idx + 1, line, "skipping malformed key line");
                    skipped += 1;
                }
                MalformedLines::Fail => {
                    return Err(RomanizerError::MalformedLine {
                        line_no: idx + 1,
                        line: line.to_string(),
                    });
                }
            },
        }
    }

    debug!(rules = rules.len(), skipped, "parsed romanization key");
    Ok(rules)
}

/// Reads and parses a key file in `options.encoding`.
pub fn read_key_file(path: &Path, options: &KeyOptions) -> Result<Vec<Rule>> {
    let text = read_text(path, options.encoding)?;
    parse_key(text.lines(), options)
}
