//! Pinyin numbering aligned to Hanzi.
//!
//! Tone-marked source pinyin is segmented into syllables and assigned one
//! syllable per Hanzi, using the dictionary's per-character candidates as
//! constraints. Words without Hanzi are segmented freely.

mod search;
#[cfg(test)]
mod tests;

use std::collections::{BTreeSet, HashSet};

use tracing::{debug, debug_span};

use crate::dict::CedictRepository;
use crate::pinyin::{
    bases, decompose, join_syllables, normalize, split_alternates, tokenize, Decomposed,
    NumberedSyllable, SyllableInventory, NEUTRAL_TONE,
};
use crate::rows::{NumberedRow, RawRow};
use crate::settings::Settings;
use crate::unicode::hanzi_chars;

use search::{segment_free, Search};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AlignError {
    #[error("empty pinyin")]
    EmptyPinyin,

    #[error("missing CC-CEDICT pinyin mapping for Hanzi '{hanzi}'")]
    MissingCoverage { hanzi: String },

    #[error("multiple tone marks in syllable '{syllable}' (pinyin '{pinyin}')")]
    ConflictingTones { syllable: String, pinyin: String },

    #[error("unable to align pinyin to Hanzi '{word}'")]
    NoAlignment { word: String },

    #[error(
        "ambiguous pinyin alignment for '{word}': {} valid segmentations ({})",
        .candidates.len(),
        .candidates.join("; ")
    )]
    Ambiguous { word: String, candidates: Vec<String> },

    #[error("pinyin normalization mismatch: '{expected}' != '{actual}'")]
    RoundTrip { expected: String, actual: String },

    #[error("unable to segment pinyin '{letters}' into valid syllables")]
    Unsegmentable { letters: String },

    #[error("pinyin token '{token}' has no letters")]
    NoLetters { token: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("word index {word_index}: {source}")]
pub struct RowError {
    pub word_index: String,
    #[source]
    pub source: AlignError,
}

/// Converts tone-marked pinyin into numbered syllables aligned to Hanzi.
pub struct Aligner<'a> {
    inventory: &'a SyllableInventory,
    repo: &'a CedictRepository,
    settings: &'a Settings,
}

impl<'a> Aligner<'a> {
    pub fn new(
        inventory: &'a SyllableInventory,
        repo: &'a CedictRepository,
        settings: &'a Settings,
    ) -> Self {
        Self {
            inventory,
            repo,
            settings,
        }
    }

    /// Numbered pinyin for one headword: `/`-separated variants of
    /// space-separated syllables, one variant per source alternate.
    pub fn number(&self, pinyin: &str, word: &str) -> Result<String, AlignError> {
        let hanzi = hanzi_chars(word);
        if !hanzi.is_empty() {
            self.check_coverage(&hanzi)?;
        }

        let normalized = normalize(pinyin);
        let alternates = split_alternates(&normalized);
        if alternates.is_empty() {
            return Err(AlignError::EmptyPinyin);
        }
        if hanzi.is_empty() {
            return self.number_unaligned(&alternates);
        }

        let variants = alternates
            .iter()
            .map(|alternate| self.align_alternate(alternate, &hanzi).map(|s| join_syllables(&s)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(variants.join("/"))
    }

    pub fn number_row(&self, row: &RawRow) -> Result<NumberedRow, RowError> {
        let _span = debug_span!("number_row", word_index = row.word_index()).entered();
        let numbered = self
            .number(row.pinyin(), row.word())
            .map_err(|source| RowError {
                word_index: row.word_index().to_string(),
                source,
            })?;
        debug!(word = row.word(), pinyin_numbered = %numbered);
        Ok(NumberedRow::new(row.clone(), numbered))
    }

    /// Number every row; the first failure aborts the batch.
    pub fn number_rows(&self, rows: &[RawRow]) -> Result<Vec<NumberedRow>, RowError> {
        let _span = debug_span!("number_rows", count = rows.len()).entered();
        rows.iter().map(|row| self.number_row(row)).collect()
    }

    /// Align one alternate reading to the headword's Hanzi.
    pub fn align_alternate(
        &self,
        alternate: &str,
        hanzi: &[char],
    ) -> Result<Vec<NumberedSyllable>, AlignError> {
        let tokens = decompose_tokens(tokenize(alternate, self.settings))?;
        if tokens.is_empty() {
            return Err(AlignError::EmptyPinyin);
        }

        let word: String = hanzi.iter().collect();
        let outcome = Search::new(
            self.inventory,
            &tokens,
            hanzi,
            self.allowed_bases(hanzi),
            self.erhua_suffix(),
        )
        .run();

        let mut solutions = outcome.solutions;
        let chosen = if solutions.len() > 1 {
            self.disambiguate(word, solutions)?
        } else if let Some(only) = solutions.pop() {
            only
        } else if let Some(syllable) = outcome.conflict {
            return Err(AlignError::ConflictingTones {
                syllable,
                pinyin: alternate.to_string(),
            });
        } else {
            return Err(AlignError::NoAlignment { word });
        };

        check_round_trip(&tokens, &chosen)?;
        Ok(chosen)
    }

    fn check_coverage(&self, hanzi: &[char]) -> Result<(), AlignError> {
        let missing: BTreeSet<char> = hanzi
            .iter()
            .copied()
            .filter(|&ch| self.repo.hanzi_syllables(ch).is_none())
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        Err(AlignError::MissingCoverage {
            hanzi: missing
                .iter()
                .map(char::to_string)
                .collect::<Vec<_>>()
                .join(" "),
        })
    }

    fn allowed_bases(&self, hanzi: &[char]) -> Vec<HashSet<&'a str>> {
        hanzi
            .iter()
            .map(|&ch| {
                self.repo
                    .hanzi_syllables(ch)
                    .map(|set| set.iter().map(NumberedSyllable::base).collect())
                    .unwrap_or_default()
            })
            .collect()
    }

    /// The erhua suffix, if the dictionary gives it a neutral `r` reading.
    fn erhua_suffix(&self) -> Option<char> {
        let suffix = self.settings.alignment.erhua_suffix();
        let r5 = NumberedSyllable::new("r", NEUTRAL_TONE)?;
        self.repo
            .hanzi_syllables(suffix)
            .filter(|set| set.contains(&r5))
            .map(|_| suffix)
    }

    /// Pick the one candidate whose tone-free syllables the dictionary lists
    /// for the whole word.
    fn disambiguate(
        &self,
        word: String,
        solutions: Vec<Vec<NumberedSyllable>>,
    ) -> Result<Vec<NumberedSyllable>, AlignError> {
        let mut remaining = solutions;
        if let Some(known) = self.repo.word_syllables(&word) {
            let known: HashSet<Vec<&str>> = known.iter().map(|seq| bases(seq)).collect();
            let mut filtered: Vec<Vec<NumberedSyllable>> = remaining
                .iter()
                .filter(|solution| known.contains(&bases(solution)))
                .cloned()
                .collect();
            debug!(word = %word, before = remaining.len(), after = filtered.len(), "ambiguity filter");
            if filtered.len() == 1 {
                if let Some(only) = filtered.pop() {
                    return Ok(only);
                }
            }
            if !filtered.is_empty() {
                remaining = filtered;
            }
        }
        Err(AlignError::Ambiguous {
            word,
            candidates: remaining.iter().map(|s| join_syllables(s)).collect(),
        })
    }

    fn number_unaligned(&self, alternates: &[&str]) -> Result<String, AlignError> {
        let mut variants = Vec::with_capacity(alternates.len());
        for &alternate in alternates {
            let mut syllables: Vec<NumberedSyllable> = Vec::new();
            for decomposed in decompose_tokens(tokenize(alternate, self.settings))? {
                let unsegmentable = || AlignError::Unsegmentable {
                    letters: decomposed.base.clone(),
                };
                let pieces = segment_free(self.inventory, &decomposed.base).ok_or_else(unsegmentable)?;
                let mut start = 0;
                for piece in pieces {
                    let end = start + piece.len();
                    let tone = decomposed.tone_of(start, end).ok_or_else(|| {
                        AlignError::ConflictingTones {
                            syllable: piece.to_string(),
                            pinyin: alternate.to_string(),
                        }
                    })?;
                    syllables.push(NumberedSyllable::new(piece, tone).ok_or_else(unsegmentable)?);
                    start = end;
                }
            }
            if syllables.is_empty() {
                return Err(AlignError::EmptyPinyin);
            }
            variants.push(join_syllables(&syllables));
        }
        Ok(variants.join("/"))
    }
}

/// Strip tone marks from every token. A token left without letters (a
/// stray combining mark) is malformed.
fn decompose_tokens(tokens: Vec<&str>) -> Result<Vec<Decomposed>, AlignError> {
    tokens
        .into_iter()
        .map(|token| {
            let decomposed = decompose(token);
            if decomposed.is_empty() {
                Err(AlignError::NoLetters {
                    token: token.to_string(),
                })
            } else {
                Ok(decomposed)
            }
        })
        .collect()
}

/// The chosen syllables must spell exactly the source letters.
fn check_round_trip(tokens: &[Decomposed], chosen: &[NumberedSyllable]) -> Result<(), AlignError> {
    let expected: String = tokens.iter().map(|t| t.base.as_str()).collect();
    let actual: String = chosen.iter().map(NumberedSyllable::base).collect();
    if expected == actual {
        Ok(())
    } else {
        Err(AlignError::RoundTrip { expected, actual })
    }
}
