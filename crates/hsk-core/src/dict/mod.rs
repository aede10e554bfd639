//! CC-CEDICT storage and lookup.
//!
//! `CedictRepository` indexes parsed entries by written form and derives the
//! per-Hanzi syllable map the aligner filters candidates with.
//! `OverrideTable` holds manual pronunciation choices for ambiguous rows.

mod candidates;
mod overrides;
mod parser;
mod repository;
#[cfg(test)]
mod tests;

pub use candidates::{
    exact_match, group_candidates, split_numbered_variants, tone_insensitive,
    tone_insensitive_matches, CandidateGroup, DEFINITION_SEPARATOR,
};
pub use overrides::OverrideTable;
pub use parser::{normalize_cedict_syllable, parse_cedict_line, parse_pronunciation, ParsedLine};
pub use repository::{CedictRepository, RepositoryStats};

use std::io;
use std::path::PathBuf;

use serde::Serialize;

use crate::pinyin::{join_syllables, NumberedSyllable};

#[derive(Debug, thiserror::Error)]
pub enum DictError {
    #[error("dictionary file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// One pronunciation of one written form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DictEntry {
    pub word: String,
    pub tokens: Vec<NumberedSyllable>,
    pub definition: String,
    /// Traditional form of the source line.
    pub traditional: String,
}

impl DictEntry {
    pub fn pinyin_numbered(&self) -> String {
        join_syllables(&self.tokens)
    }
}
