// File: src/core/segment.rs
use crate::core::trie::GraphemeTrie;

/// Greedy longest-match split of a string into graphemes.
///
/// Each item borrows from the input, and concatenating the items gives the
/// input back exactly. Characters that start no indexed grapheme come out
/// on their own.
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    trie: &'a GraphemeTrie,
    rest: &'a str,
}

impl<'a> Segments<'a> {
    pub fn new(trie: &'a GraphemeTrie, text: &'a str) -> Self {
        Self { trie, rest: text }
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let first = self.rest.chars().next()?;
        let len = match self.trie.longest_match(self.rest) {
            Some(grapheme) => grapheme.len(),
            None => first.len_utf8(),
        };
        let (head, tail) = self.rest.split_at(len);
        self.rest = tail;
        Some(head)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // At most one item per byte.
        (usize::from(!self.rest.is_empty()), Some(self.rest.len()))
    }
}

impl std::iter::FusedIterator for Segments<'_> {}

/// Collects [`Segments`] into a vector.
pub fn segment<'a>(trie: &'a GraphemeTrie, text: &'a str) -> Vec<&'a str> {
    Segments::new(trie, text).collect()
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
    fn longest_match_then_continue() {
        let t = trie(&["a", "ab", "abc"]);
        assert_eq!(segment(&t, "abcab"), ["abc", "ab"]);
    }

    #[test]
    fn falls_back_to_single_chars() {
        let t = trie(&["kh"]);
        assert_eq!(segment(&t, "k9h kh!"), ["k", "9", "h", " ", "kh", "!"]);
    }

    #[test]
    fn dead_end_path_emits_one_char() {
        let t = trie(&["abc"]);
        assert_eq!(segment(&t, "abab"), ["a", "b", "a", "b"]);
    }

    #[test]
    fn empty_input_yields_nothing() {
        let t = trie(&["ab"]);
        assert!(segment(&t, "").is_empty());
    }

    #[test]
    fn newline_kept_as_its_own_segment() {
        let t = trie(&["ու"]);
        assert_eq!(segment(&t, "ուր\n"), ["ու", "ր", "\n"]);
    }
}
