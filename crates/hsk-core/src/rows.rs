//! Stage row types.
//!
//! Each stage wraps the previous stage's row and adds its own fields; earlier
//! fields are never rewritten. Rows are built by explicit construction and
//! are immutable afterwards.

use serde::Serialize;

/// A syllabus row as supplied by the extraction collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawRow {
    word_index: String,
    level: String,
    word: String,
    pinyin: String,
    part_of_speech: String,
}

impl RawRow {
    pub fn new(
        word_index: impl Into<String>,
        level: impl Into<String>,
        word: impl Into<String>,
        pinyin: impl Into<String>,
        part_of_speech: impl Into<String>,
    ) -> Self {
        Self {
            word_index: word_index.into(),
            level: level.into(),
            word: word.into(),
            pinyin: pinyin.into(),
            part_of_speech: part_of_speech.into(),
        }
    }

    pub fn word_index(&self) -> &str {
        &self.word_index
    }

    pub fn level(&self) -> &str {
        &self.level
    }

    /// Headword, possibly with a trailing disambiguation digit (`点1`).
    pub fn word(&self) -> &str {
        &self.word
    }

    /// Tone-marked source pinyin, possibly with `/` alternates.
    pub fn pinyin(&self) -> &str {
        &self.pinyin
    }

    pub fn part_of_speech(&self) -> &str {
        &self.part_of_speech
    }
}

/// A row with numbered pinyin aligned to the headword's Hanzi.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumberedRow {
    #[serde(flatten)]
    raw: RawRow,
    pinyin_numbered: String,
}

impl NumberedRow {
    pub fn new(raw: RawRow, pinyin_numbered: impl Into<String>) -> Self {
        Self {
            raw,
            pinyin_numbered: pinyin_numbered.into(),
        }
    }

    pub fn raw(&self) -> &RawRow {
        &self.raw
    }

    pub fn word_index(&self) -> &str {
        self.raw.word_index()
    }

    pub fn level(&self) -> &str {
        self.raw.level()
    }

    pub fn word(&self) -> &str {
        self.raw.word()
    }

    pub fn pinyin(&self) -> &str {
        self.raw.pinyin()
    }

    pub fn part_of_speech(&self) -> &str {
        self.raw.part_of_speech()
    }

    /// `/`-separated variants of space-separated numbered syllables.
    pub fn pinyin_numbered(&self) -> &str {
        &self.pinyin_numbered
    }
}

/// A row enriched with the resolved CC-CEDICT pronunciation, traditional
/// form(s) and definition.
///
/// The three enrichment fields are either all set or all empty; the empty
/// form only exists when unresolved rows are tolerated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichedRow {
    #[serde(flatten)]
    numbered: NumberedRow,
    pinyin_cc_cedict: String,
    traditional_cc_cedict: String,
    definition_cc_cedict: String,
}

impl EnrichedRow {
    pub fn resolved(
        numbered: NumberedRow,
        pinyin: impl Into<String>,
        traditional: impl Into<String>,
        definition: impl Into<String>,
    ) -> Self {
        Self {
            numbered,
            pinyin_cc_cedict: pinyin.into(),
            traditional_cc_cedict: traditional.into(),
            definition_cc_cedict: definition.into(),
        }
    }

    pub fn unresolved(numbered: NumberedRow) -> Self {
        Self::resolved(numbered, "", "", "")
    }

    /// The numbered row this enrichment was built from.
    pub fn numbered(&self) -> &NumberedRow {
        &self.numbered
    }

    pub fn word_index(&self) -> &str {
        self.numbered.word_index()
    }

    pub fn level(&self) -> &str {
        self.numbered.level()
    }

    pub fn word(&self) -> &str {
        self.numbered.word()
    }

    pub fn pinyin(&self) -> &str {
        self.numbered.pinyin()
    }

    pub fn part_of_speech(&self) -> &str {
        self.numbered.part_of_speech()
    }

    pub fn pinyin_numbered(&self) -> &str {
        self.numbered.pinyin_numbered()
    }

    pub fn pinyin_cc_cedict(&self) -> &str {
        &self.pinyin_cc_cedict
    }

    pub fn traditional_cc_cedict(&self) -> &str {
        &self.traditional_cc_cedict
    }

    pub fn definition_cc_cedict(&self) -> &str {
        &self.definition_cc_cedict
    }

    pub fn is_resolved(&self) -> bool {
        !self.pinyin_cc_cedict.is_empty()
    }
}

/// Any stage row; used by the row-set statistics helpers.
pub trait StageRow {
    fn word_index(&self) -> &str;
    fn level(&self) -> &str;
    fn part_of_speech(&self) -> &str;
}

macro_rules! impl_stage_row {
    ($($ty:ty),*) => {
        $(impl StageRow for $ty {
            fn word_index(&self) -> &str {
                <$ty>::word_index(self)
            }
            fn level(&self) -> &str {
                <$ty>::level(self)
            }
            fn part_of_speech(&self) -> &str {
                <$ty>::part_of_speech(self)
            }
        })*
    };
}

impl_stage_row!(RawRow, NumberedRow, EnrichedRow);
