//! Pinyin primitives: tone marks, numbered syllables, tokenization and the
//! syllable inventory.
//!
//! Source pinyin is tone-marked (`bàba`); the engines work on tone-free
//! letters plus per-letter tone marks, and emit numbered syllables (`ba4`).

mod inventory;
mod syllable;
mod tokenize;
mod tone;

pub use inventory::SyllableInventory;
pub use syllable::{bases, join_syllables, NumberedSyllable, SyllableParseError, NEUTRAL_TONE};
pub use tokenize::{split_alternates, tokenize, ALTERNATE_DELIMITER};
pub use tone::{apply_tone_mark, decompose, normalize, strip_tone_marks, Decomposed};
