// File: src/encoding.rs
//! Text encodings for key files and transliterated files. UTF-8 unless a
//! caller names another WHATWG encoding label.
use crate::error::{Result, RomanizerError};
use encoding_rs::Encoding;
use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::Path;

pub use encoding_rs::UTF_8;

/// Resolves a label such as `"utf8"`, `"latin1"` or `"windows-1251"`.
pub fn encoding_for_label(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| RomanizerError::UnknownEncoding(label.to_string()))
}

/// Strict decode: malformed input is an `InvalidData` error, never replaced.
pub fn decode<'a>(bytes: &'a [u8], encoding: &'static Encoding) -> io::Result<Cow<'a, str>> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("input is not valid {}", encoding.name()),
            )
        })
}

/// Strict encode: a character the encoding cannot represent is an
/// `InvalidData` error. Decode-only encodings such as UTF-16 are refused.
pub fn encode<'a>(text: &'a str, encoding: &'static Encoding) -> io::Result<Cow<'a, [u8]>> {
    let (bytes, used, had_errors) = encoding.encode(text);
    if used != encoding {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("cannot write {}", encoding.name()),
        ));
    }
    if had_errors {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("output has characters not representable in {}", encoding.name()),
        ));
    }
    Ok(bytes)
}

/// Reads and decodes a whole file.
pub fn read_text(path: &Path, encoding: &'static Encoding) -> Result<String> {
    let bytes = fs::read(path).map_err(|source| RomanizerError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(decode(&bytes, encoding)?.into_owned())
}
