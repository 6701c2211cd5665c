// File: src/core/case.rs
//! Derives capitalized and all-caps rules from the rules a key spells out.
//!
//! A sentence-initial word only capitalizes the first letter of a digraph
//! ("Kh"), while an acronym or shouted word upper-cases all of it ("KH").
//! For a single character the two coincide, so only one variant is added.

use crate::core::types::{Rule, RuleTable};
use tracing::{debug, warn};

/// First character upper-cased, the rest untouched.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn is_alphabetic(grapheme: &str) -> bool {
    !grapheme.is_empty() && grapheme.chars().all(char::is_alphabetic)
}

/// Builds the rule table from parsed rules and adds the case variants of
/// every alphabetic grapheme.
///
/// Rules written in the key always win over derived ones, and rules are
/// visited in key order so the first derivation of a variant sticks. When a
/// grapheme is defined twice in the key, the later definition is kept.
pub fn expand_case(rules: Vec<Rule>) -> RuleTable {
    let mut table = RuleTable::new();
    let mut order = Vec::with_capacity(rules.len());

    for rule in rules {
        if table.insert(rule.grapheme.clone(), rule.candidates).is_some() {
            warn!(grapheme = %rule.grapheme, "grapheme defined twice in key, keeping the later rule");
        } else {
            order.push(rule.grapheme);
        }
    }

    let explicit = table.len();
    for grapheme in &order {
        if !is_alphabetic(grapheme) {
            continue;
        }
        let Some(source) = table.get(grapheme).cloned() else {
            continue;
        };

        table.insert_if_absent(capitalize(grapheme), source.map_candidates(capitalize));
        if grapheme.chars().count() > 1 {
            table.insert_if_absent(grapheme.to_uppercase(), source.map_candidates(str::to_uppercase));
        }
    }

    debug!(explicit, derived = table.len() - explicit, "expanded case variants");
    table
}
