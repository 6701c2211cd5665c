// File: src/core/engine.rs
use crate::core::case::expand_case;
use crate::core::key::{parse_key, read_key_file, KeyOptions};
use crate::core::segment::Segments;
use crate::core::trie::GraphemeTrie;
use crate::core::types::RuleTable;
use crate::encoding::{decode, encode, UTF_8};
use crate::error::{Result, RomanizerError};
use encoding_rs::Encoding;
use rand::Rng;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Turns source-orthography text into randomly varied romanized text.
///
/// Built once from a key (parse, expand case, index) and read-only after
/// that, so one instance can serve many threads. Randomness comes from the
/// generator handed to each call. Files are read and written in the
/// romanizer's encoding, UTF-8 unless the key options name another.
#[derive(Debug, Clone)]
pub struct Romanizer {
    rules: RuleTable,
    trie: GraphemeTrie,
    encoding: &'static Encoding,
}

impl Romanizer {
    /// Builds from key-file lines with the given typical-candidate share.
    pub fn from_key<I, S>(lines: I, prop_typical: f64) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_key_with(lines, &KeyOptions::with_prop_typical(prop_typical))
    }

    pub fn from_key_with<I, S>(lines: I, options: &KeyOptions) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rules = parse_key(lines, options)?;
        Ok(Self::from_rule_table(expand_case(rules)).with_encoding(options.encoding))
    }

    pub fn from_key_file(path: impl AsRef<Path>, options: &KeyOptions) -> Result<Self> {
        let rules = read_key_file(path.as_ref(), options)?;
        Ok(Self::from_rule_table(expand_case(rules)).with_encoding(options.encoding))
    }

    /// Wraps an already expanded rule table, e.g. one loaded from a snapshot.
    pub fn from_rule_table(rules: RuleTable) -> Self {
        let trie = GraphemeTrie::from_rules(&rules);
        debug!(
            rules = rules.len(),
            long_graphemes = trie.len(),
            trie_nodes = trie.node_count(),
            "romanizer ready"
        );
        Self { rules, trie, encoding: UTF_8 }
    }

    /// Sets the encoding used by the file entry points.
    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn trie(&self) -> &GraphemeTrie {
        &self.trie
    }

    /// Splits `text` into graphemes, longest match first.
    pub fn segment<'a>(&'a self, text: &'a str) -> Segments<'a> {
        Segments::new(&self.trie, text)
    }

    pub fn sample_with<'a, R: Rng + ?Sized>(&'a self, grapheme: &'a str, rng: &mut R) -> &'a str {
        self.rules.sample(grapheme, rng)
    }

    pub fn transliterate_with<R: Rng + ?Sized>(&self, text: &str, rng: &mut R) -> String {
        let mut result = String::with_capacity(text.len());
        for grapheme in self.segment(text) {
            result.push_str(self.rules.sample(grapheme, rng));
        }
        result
    }

    /// Transliterates with the thread-local generator.
    pub fn transliterate(&self, text: &str) -> String {
        self.transliterate_with(text, &mut rand::rng())
    }

    /// Transliterates line by line. Each line goes through with its own
    /// terminator, so the output has the same line structure as the input.
    /// Returns the number of lines written.
    pub fn transliterate_stream<B, W, R>(&self, mut reader: B, writer: W, rng: &mut R) -> Result<usize>
    where
        B: BufRead,
        W: Write,
        R: Rng + ?Sized,
    {
        let mut writer = BufWriter::new(writer);
        let mut line = String::new();
        let mut count = 0;
        loop {
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                break;
            }
            writer.write_all(self.transliterate_with(&line, rng).as_bytes())?;
            count += 1;
        }
        writer.flush()?;
        Ok(count)
    }

    /// Like [`transliterate_stream`](Self::transliterate_stream) for raw
    /// bytes in the romanizer's encoding: decodes `input`, writes each line
    /// encoded back into the same encoding. Fails on bytes that do not
    /// decode and on output the encoding cannot represent.
    pub fn transliterate_encoded<W, R>(&self, input: &[u8], writer: W, rng: &mut R) -> Result<usize>
    where
        W: Write,
        R: Rng + ?Sized,
    {
        let text = decode(input, self.encoding)?;
        let mut writer = BufWriter::new(writer);
        let mut count = 0;
        for line in text.split_inclusive('\n') {
            let romanized = self.transliterate_with(line, rng);
            writer.write_all(&encode(&romanized, self.encoding)?)?;
            count += 1;
        }
        writer.flush()?;
        Ok(count)
    }

    /// Transliterates `input` into `output`, replacing `output` if it exists.
    pub fn transliterate_file_with<R: Rng + ?Sized>(
        &self,
        input: &Path,
        output: &Path,
        rng: &mut R,
    ) -> Result<usize> {
        self.transliterate_into(input, output, |path| File::create(path), rng)
    }

    /// Like [`transliterate_file_with`](Self::transliterate_file_with) but
    /// never replaces an existing `output`. The existence check and the
    /// creation are one step, so a file appearing in between is not
    /// clobbered; that case fails with [`RomanizerError::Open`] carrying
    /// `ErrorKind::AlreadyExists`.
    pub fn transliterate_new_file_with<R: Rng + ?Sized>(
        &self,
        input: &Path,
        output: &Path,
        rng: &mut R,
    ) -> Result<usize> {
        let create_new = |path: &Path| OpenOptions::new().write(true).create_new(true).open(path);
        self.transliterate_into(input, output, create_new, rng)
    }

    fn transliterate_into<F, R>(&self, input: &Path, output: &Path, open: F, rng: &mut R) -> Result<usize>
    where
        F: FnOnce(&Path) -> std::io::Result<File>,
        R: Rng + ?Sized,
    {
        // Input first: a missing input leaves no empty output behind.
        let bytes = fs::read(input).map_err(|source| RomanizerError::Open {
            path: input.to_path_buf(),
            source,
        })?;
        let writer = open(output).map_err(|source| RomanizerError::Open {
            path: output.to_path_buf(),
            source,
        })?;
        let lines = self.transliterate_encoded(&bytes, writer, rng)?;
        debug!(
            input = %input.display(),
            output = %output.display(),
            encoding = self.encoding.name(),
            lines,
            "transliterated file"
        );
        Ok(lines)
    }

    pub fn transliterate_file(&self, input: &Path, output: &Path) -> Result<usize> {
        self.transliterate_file_with(input, output, &mut rand::rng())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{RngCore, SeedableRng};
    use std::fs;

    /// Generator whose every `f64` draw is the same value.
    struct FixedDraw(u64);

    impl RngCore for FixedDraw {
        fn next_u32(&mut self) -> u32 {
            (self.0 >> 32) as u32
        }
        fn next_u64(&mut self) -> u64 {
            self.0
        }
        fn fill_bytes(&mut self, dst: &mut [u8]) {
            for chunk in dst.chunks_mut(8) {
                chunk.copy_from_slice(&self.0.to_le_bytes()[..chunk.len()]);
            }
        }
    }

    fn romanizer(lines: &[&str]) -> Romanizer {
        Romanizer::from_key(lines, 0.9).unwrap()
    }

    #[test]
    fn low_draw_picks_typical_high_draw_picks_less_typical() {
        let r = romanizer(&["k --- k; c"]);
        assert_eq!(r.transliterate_with("k", &mut FixedDraw(0)), "k");
        assert_eq!(r.transliterate_with("k", &mut FixedDraw(u64::MAX)), "c");
        assert_eq!(r.transliterate_with("Kk", &mut FixedDraw(u64::MAX)), "Cc");
    }

    #[test]
    fn same_seed_same_output() {
        let r = romanizer(&["a --- a; e, o", "kh --- kh; k, x", "t --- t; d"]);
        let text = "Khat kha takh KHAT\n";
        let first = r.transliterate_with(text, &mut StdRng::seed_from_u64(42));
        for _ in 0..5 {
            assert_eq!(r.transliterate_with(text, &mut StdRng::seed_from_u64(42)), first);
        }
    }

    #[test]
    fn deterministic_key_is_deterministic() {
        let r = romanizer(&["ш --- sh;", "щ --- shch;", "ь --- <null>;"]);
        assert_eq!(r.transliterate("шьщ, Щ!"), "shshch, Shch!");
    }

    #[test]
    fn null_only_line_becomes_empty() {
        let r = romanizer(&["ъ --- <null>;", "ьъ --- <null>;"]);
        assert_eq!(r.transliterate("ъьъъ"), "");
    }

    #[test]
    fn multi_char_case_variants_used() {
        let r = romanizer(&["ու --- u;"]);
        assert_eq!(r.transliterate("ու Ու ՈՒ"), "u U U");
    }

    #[test]
    fn stream_preserves_line_structure() {
        let r = romanizer(&["ա --- a;", "բ --- b;"]);
        let input = "աբ\n\nբա\r\nա";
        let mut out = Vec::new();
        let n = r
            .transliterate_stream(input.as_bytes(), &mut out, &mut StdRng::seed_from_u64(0))
            .unwrap();
        assert_eq!(n, 4);
        assert_eq!(String::from_utf8(out).unwrap(), "ab\n\nba\r\na");
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.txt");
        let output = dir.path().join("out.txt");
        fs::write(&input, "բա\nաա\n").unwrap();

        let r = romanizer(&["ա --- a;", "բ --- b;"]);
        let n = r.transliterate_file(&input, &output).unwrap();
        assert_eq!(n, 2);
        assert_eq!(fs::read_to_string(&output).unwrap(), "ba\naa\n");
    }

    #[test]
    fn latin1_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.txt");
        let output = dir.path().join("out.txt");
        fs::write(&input, [b'c', b'a', b'f', 0xe9, b'\n', 0xc9, b't', b'\n']).unwrap();

        let latin1 = crate::encoding::encoding_for_label("iso-8859-1").unwrap();
        let options = KeyOptions::default().with_encoding(latin1);
        let r = Romanizer::from_key_with(["é --- è;"], &options).unwrap();
        assert_eq!(r.encoding(), latin1);

        let n = r.transliterate_file(&input, &output).unwrap();
        assert_eq!(n, 2);
        assert_eq!(fs::read(&output).unwrap(), [b'c', b'a', b'f', 0xe8, b'\n', 0xc8, b't', b'\n']);
    }

    #[test]
    fn latin1_input_rejected_by_utf8_romanizer() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.txt");
        fs::write(&input, [b'c', b'a', b'f', 0xe9, b'\n']).unwrap();
        let r = romanizer(&["é --- e;"]);
        let err = r.transliterate_file(&input, &dir.path().join("out.txt")).unwrap_err();
        assert!(matches!(err, RomanizerError::Io(ref e) if e.kind() == std::io::ErrorKind::InvalidData));
    }

    #[test]
    fn output_outside_the_encoding_is_an_error() {
        let latin1 = crate::encoding::encoding_for_label("latin1").unwrap();
        let r = romanizer(&["e --- щ;"]).with_encoding(latin1);
        let mut out = Vec::new();
        let err = r
            .transliterate_encoded(b"e\n", &mut out, &mut StdRng::seed_from_u64(0))
            .unwrap_err();
        assert!(matches!(err, RomanizerError::Io(_)));
    }

    #[test]
    fn missing_input_is_fatal_and_creates_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.txt");
        let r = romanizer(&["a --- a;"]);
        let err = r.transliterate_file(&dir.path().join("missing.txt"), &output).unwrap_err();
        assert!(matches!(err, RomanizerError::Open { .. }));
        assert!(!output.exists());
    }

    #[test]
    fn new_file_refuses_existing_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.txt");
        let output = dir.path().join("out.txt");
        fs::write(&input, "աբ\n").unwrap();
        fs::write(&output, "keep me").unwrap();

        let r = romanizer(&["ա --- a;", "բ --- b;"]);
        let mut rng = StdRng::seed_from_u64(0);
        let err = r.transliterate_new_file_with(&input, &output, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            RomanizerError::Open { ref source, .. } if source.kind() == std::io::ErrorKind::AlreadyExists
        ));
        assert_eq!(fs::read_to_string(&output).unwrap(), "keep me");

        let fresh = dir.path().join("fresh.txt");
        assert_eq!(r.transliterate_new_file_with(&input, &fresh, &mut rng).unwrap(), 1);
        assert_eq!(fs::read_to_string(&fresh).unwrap(), "ab\n");
    }

    #[test]
    fn shared_across_threads() {
        let r = romanizer(&["ա --- a; o", "ու --- u;"]);
        let outputs: Vec<String> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|i| {
                    let r = &r;
                    s.spawn(move || r.transliterate_with("ուա", &mut StdRng::seed_from_u64(i)))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        for out in outputs {
            assert!(out == "ua" || out == "uo", "unexpected {out}");
        }
    }
}
