// src/lib.rs
//! Synthetic romanization: turns text in a source orthography into randomly
//! varied Latin-script text, following a handwritten transliteration key.
//!
//! ```
//! use romanizer_core::Romanizer;
//!
//! let key = ["ու --- u;", "ր --- r;"];
//! let romanizer = Romanizer::from_key(key, 0.9).unwrap();
//! assert_eq!(romanizer.transliterate("Ուր"), "Ur");
//! ```

pub mod core;
pub mod encoding;
pub mod error;
pub mod persistence;
pub mod trace_init;

pub use crate::core::engine::Romanizer;
pub use crate::core::key::{KeyOptions, MalformedLines, DEFAULT_PROP_TYPICAL};
pub use crate::core::types::{CandidateSet, Grapheme, Rule, RuleTable, NULL};
pub use crate::encoding::encoding_for_label;
pub use crate::error::{Result, RomanizerError};
