pub mod case;
pub mod engine;
pub mod key;
pub mod sampler;
pub mod segment;
pub mod trie;
pub mod types;
