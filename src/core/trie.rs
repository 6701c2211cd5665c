// --- File: src/core/trie.rs
use crate::core::types::RuleTable;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
struct TrieNode {
    children: HashMap<char, usize>,
    /// The full grapheme ending at this node, if any.
    terminal: Option<Box<str>>,
}

/// Prefix tree over every multi-character grapheme of a rule table.
///
/// Nodes live in a flat arena and refer to children by index. It is only an
/// index for segmentation; weights stay in the [`RuleTable`].
#[derive(Debug, Clone)]
pub struct GraphemeTrie {
    nodes: Vec<TrieNode>,
    graphemes: usize,
}

impl Default for GraphemeTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphemeTrie {
    pub fn new() -> Self {
        Self { nodes: vec![TrieNode::default()], graphemes: 0 }
    }

    /// Indexes every grapheme of `rules` longer than one character.
    pub fn from_rules(rules: &RuleTable) -> Self {
        let mut trie = Self::new();
        for grapheme in rules.graphemes() {
            trie.insert(grapheme);
        }
        trie
    }

    /// Adds a grapheme. Single characters are ignored since segmentation
    /// falls back to them anyway.
    /// O(k) complexity where k is the grapheme length.
    pub fn insert(&mut self, grapheme: &str) {
        if grapheme.chars().nth(1).is_none() {
            return;
        }

        let mut node_idx = 0;
        for ch in grapheme.chars() {
            node_idx = match self.nodes[node_idx].children.get(&ch) {
                Some(&next) => next,
                None => {
                    let next = self.nodes.len();
                    self.nodes.push(TrieNode::default());
                    self.nodes[node_idx].children.insert(ch, next);
                    next
                }
            };
        }

        let node = &mut self.nodes[node_idx];
        if node.terminal.is_none() {
            self.graphemes += 1;
        }
        node.terminal = Some(grapheme.into());
    }

    /// Longest indexed grapheme that is a prefix of `text`.
    ///
    /// The walk keeps going past a terminal in case a longer grapheme extends
    /// it, and stops at the first character with no matching child.
    pub fn longest_match(&self, text: &str) -> Option<&str> {
        let mut node_idx = 0;
        let mut best = None;
        for ch in text.chars() {
            match self.nodes[node_idx].children.get(&ch) {
                Some(&next) => node_idx = next,
                None => break,
            }
            if let Some(grapheme) = &self.nodes[node_idx].terminal {
                best = Some(&**grapheme);
            }
        }
        best
    }

    /// Number of graphemes indexed.
    pub fn len(&self) -> usize {
        self.graphemes
    }

    pub fn is_empty(&self) -> bool {
        self.graphemes == 0
    }

    pub(crate) fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trie(graphemes: &[&str]) -> GraphemeTrie {
        let mut t = GraphemeTrie::new();
        for g in graphemes {
            t.insert(g);
        }
        t
    }

    #[test]
    fn single_chars_not_indexed() {
        let t = trie(&["a", "b", "ab"]);
        assert_eq!(t.len(), 1);
        assert_eq!(t.longest_match("a"), None);
    }

    #[test]
    fn longest_of_nested_graphemes() {
        let t = trie(&["ab", "abc"]);
        assert_eq!(t.longest_match("abcab"), Some("abc"));
        assert_eq!(t.longest_match("abd"), Some("ab"));
        assert_eq!(t.longest_match("ab"), Some("ab"));
    }

    #[test]
    fn last_terminal_seen_before_dead_end() {
        // "abcd" is indexed but the input diverges after "abc".
        let t = trie(&["ab", "abcd"]);
        assert_eq!(t.longest_match("abcx"), Some("ab"));
    }

    #[test]
    fn path_without_terminal_is_no_match() {
        let t = trie(&["abc"]);
        assert_eq!(t.longest_match("abx"), None);
        assert_eq!(t.longest_match("xabc"), None);
        assert_eq!(t.longest_match(""), None);
    }

    #[test]
    fn multibyte_graphemes() {
        let t = trie(&["ու", "Ու", "ՈՒ"]);
        assert_eq!(t.longest_match("ուր"), Some("ու"));
        assert_eq!(t.longest_match("ՈՒՐ"), Some("ՈՒ"));
        assert_eq!(t.len(), 3);
    }

    #[test]
    fn reinsert_does_not_double_count() {
        let t = trie(&["kh", "kh"]);
        assert_eq!(t.len(), 1);
        assert_eq!(t.node_count(), 3);
    }
}
