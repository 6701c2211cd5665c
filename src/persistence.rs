// File: src/persistence.rs
//! Compiled-key snapshots.
//!
//! A snapshot holds the rule table after case expansion, so loading one
//! skips parsing and expansion. The trie is rebuilt on load.
use crate::core::engine::Romanizer;
use crate::core::types::RuleTable;
use crate::error::{Result, RomanizerError};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

const SNAPSHOT_VERSION: u32 = 1;

#[derive(serde::Serialize, serde::Deserialize)]
struct SerializableState {
    version: u32,
    rules: RuleTable,
}

/// Writes the romanizer's rules to `path`, atomically replacing any
/// existing file.
pub fn save_to_disk(romanizer: &Romanizer, path: &Path) -> Result<()> {
    let parent_dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let state = SerializableState {
        version: SNAPSHOT_VERSION,
        rules: romanizer.rules().clone(),
    };

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(temp_file.as_file());
        bincode::serialize_into(&mut writer, &state)?;
        writer.flush()?;
    }

    temp_file.persist(path).map_err(|e| RomanizerError::Io(e.error))?;
    debug!(path = %path.display(), rules = state.rules.len(), "saved snapshot");
    Ok(())
}

pub fn load_from_disk(path: &Path) -> Result<Romanizer> {
    let file = File::open(path).map_err(|source| RomanizerError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    let state: SerializableState = bincode::deserialize_from(reader)?;
    if state.version != SNAPSHOT_VERSION {
        return Err(RomanizerError::UnsupportedVersion(state.version));
    }

    debug!(path = %path.display(), rules = state.rules.len(), "loaded snapshot");
    Ok(Romanizer::from_rule_table(state.rules))
}
