use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, debug_span};

use super::parser::parse_cedict_line;
use super::{DictEntry, DictError};
use crate::pinyin::NumberedSyllable;
use crate::settings::Settings;

/// Load statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RepositoryStats {
    pub total_lines: usize,
    pub skipped_lines: usize,
    pub entries: usize,
    pub words: usize,
    pub hanzi: usize,
}

/// Parsed dictionary plus the derived lookup maps.
///
/// Entries keep first-seen order; duplicates (same word, tokens, definition
/// and traditional form) are dropped.
pub struct CedictRepository {
    entries: Vec<DictEntry>,
    by_word: HashMap<String, Vec<usize>>,
    word_syllables: HashMap<String, BTreeSet<Vec<NumberedSyllable>>>,
    hanzi_syllables: HashMap<char, BTreeSet<NumberedSyllable>>,
    stats: RepositoryStats,
}

impl CedictRepository {
    /// Load a dictionary file. A missing file is an error.
    pub fn open(path: &Path, settings: &Settings) -> Result<Self, DictError> {
        let _span = debug_span!("open_cedict", path = %path.display()).entered();
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => DictError::NotFound(path.to_path_buf()),
            _ => DictError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        })?;
        Ok(Self::from_text(&text, settings))
    }

    pub fn from_text(text: &str, settings: &Settings) -> Self {
        Self::from_lines(text.lines(), settings)
    }

    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a str>, settings: &Settings) -> Self {
        let mut entries: Vec<DictEntry> = Vec::new();
        let mut seen: HashSet<DictEntry> = HashSet::new();
        let mut total_lines = 0usize;
        let mut skipped_lines = 0usize;

        for line in lines {
            total_lines += 1;
            let Some(parsed) = parse_cedict_line(line) else {
                skipped_lines += 1;
                continue;
            };
            for entry in parsed.into_entries() {
                if seen.insert(entry.clone()) {
                    entries.push(entry);
                }
            }
        }

        let mut by_word: HashMap<String, Vec<usize>> = HashMap::new();
        let mut word_syllables: HashMap<String, BTreeSet<Vec<NumberedSyllable>>> = HashMap::new();
        for (idx, entry) in entries.iter().enumerate() {
            by_word.entry(entry.word.clone()).or_default().push(idx);
            word_syllables
                .entry(entry.word.clone())
                .or_default()
                .insert(entry.tokens.clone());
        }

        let hanzi_syllables = build_hanzi_syllables(&entries, settings);

        let stats = RepositoryStats {
            total_lines,
            skipped_lines,
            entries: entries.len(),
            words: by_word.len(),
            hanzi: hanzi_syllables.len(),
        };
        debug!(
            total_lines,
            skipped_lines,
            entries = stats.entries,
            words = stats.words,
            hanzi = stats.hanzi,
            "cedict loaded"
        );

        Self {
            entries,
            by_word,
            word_syllables,
            hanzi_syllables,
            stats,
        }
    }

    pub fn entries(&self) -> &[DictEntry] {
        &self.entries
    }

    /// Entries for an exact written form, in load order.
    pub fn entries_for_word<'a>(&'a self, word: &str) -> impl Iterator<Item = &'a DictEntry> + 'a {
        self.by_word
            .get(word)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
            .iter()
            .map(move |&idx| &self.entries[idx])
    }

    pub fn contains_word(&self, word: &str) -> bool {
        self.by_word.contains_key(word)
    }

    /// Every syllable sequence recorded for a written form.
    pub fn word_syllables(&self, word: &str) -> Option<&BTreeSet<Vec<NumberedSyllable>>> {
        self.word_syllables.get(word)
    }

    /// Candidate syllables for a single character.
    pub fn hanzi_syllables(&self, ch: char) -> Option<&BTreeSet<NumberedSyllable>> {
        self.hanzi_syllables.get(&ch)
    }

    pub fn stats(&self) -> RepositoryStats {
        self.stats
    }
}

/// Per-character candidate syllables.
///
/// Single-character entries contribute directly. Multi-character entries
/// contribute a position's syllable only when the character has no
/// candidate with that base yet, so contextual tone changes inside longer
/// words do not flood the map. Sandhi-prone characters then get every tone
/// of their base.
fn build_hanzi_syllables(
    entries: &[DictEntry],
    settings: &Settings,
) -> HashMap<char, BTreeSet<NumberedSyllable>> {
    let mut map: HashMap<char, BTreeSet<NumberedSyllable>> = HashMap::new();
    let mut contextual: Vec<(char, &NumberedSyllable)> = Vec::new();

    for entry in entries {
        let chars: Vec<char> = entry.word.chars().collect();
        if chars.len() != entry.tokens.len() {
            continue;
        }
        if chars.len() == 1 {
            map.entry(chars[0]).or_default().insert(entry.tokens[0].clone());
        } else {
            contextual.extend(chars.into_iter().zip(entry.tokens.iter()));
        }
    }

    for (ch, syllable) in contextual {
        let existing = map.entry(ch).or_default();
        if !existing.iter().any(|s| s.base() == syllable.base()) {
            existing.insert(syllable.clone());
        }
    }

    for (ch, base) in settings.alignment.sandhi() {
        let set = map.entry(ch).or_default();
        set.extend((1..=5).filter_map(|tone| NumberedSyllable::new(base, tone)));
    }

    map
}
