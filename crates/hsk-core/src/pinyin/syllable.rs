use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// Neutral tone digit.
pub const NEUTRAL_TONE: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid numbered syllable: {0:?}")]
pub struct SyllableParseError(pub String);

/// A tone-free syllable plus a tone digit 1–5, rendered as `ba4`.
///
/// Ordering compares the base first, then the tone, which coincides with
/// ordering the rendered strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NumberedSyllable {
    base: String,
    tone: u8,
}

fn is_syllable_letter(c: char) -> bool {
    c.is_ascii_lowercase() || c == 'ü'
}

impl NumberedSyllable {
    /// Build from parts. Returns `None` for an empty or non-letter base or a
    /// tone outside 1–5.
    pub fn new(base: impl Into<String>, tone: u8) -> Option<Self> {
        let base = base.into();
        if base.is_empty() || !base.chars().all(is_syllable_letter) || !(1..=5).contains(&tone) {
            return None;
        }
        Some(Self { base, tone })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn tone(&self) -> u8 {
        self.tone
    }
}

impl FromStr for NumberedSyllable {
    type Err = SyllableParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || SyllableParseError(s.to_string());
        let mut chars = s.chars();
        let tone = chars
            .next_back()
            .and_then(|c| c.to_digit(10))
            .ok_or_else(err)?;
        Self::new(chars.as_str(), tone as u8).ok_or_else(err)
    }
}

impl fmt::Display for NumberedSyllable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.base, self.tone)
    }
}

impl Serialize for NumberedSyllable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Render a syllable sequence as space-separated text (`ba4 ba5`).
pub fn join_syllables(syllables: &[NumberedSyllable]) -> String {
    syllables
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Tone-free bases of a syllable sequence.
pub fn bases(syllables: &[NumberedSyllable]) -> Vec<&str> {
    syllables.iter().map(|s| s.base()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display() {
        let s: NumberedSyllable = "lü4".parse().unwrap();
        assert_eq!(s.base(), "lü");
        assert_eq!(s.tone(), 4);
        assert_eq!(s.to_string(), "lü4");
    }

    #[test]
    fn parse_rejects_malformed() {
        for bad in ["", "4", "ba", "ba0", "ba6", "Ba4", "b a4", "ba44"] {
            assert!(bad.parse::<NumberedSyllable>().is_err(), "{bad:?}");
        }
    }

    #[test]
    fn ordering_matches_rendered_text() {
        let mut syllables: Vec<NumberedSyllable> = ["ban1", "ba4", "ba1", "bü2", "bz3"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        let mut rendered: Vec<String> = syllables.iter().map(|s| s.to_string()).collect();
        syllables.sort();
        rendered.sort();
        let sorted: Vec<String> = syllables.iter().map(|s| s.to_string()).collect();
        assert_eq!(sorted, rendered);
    }

    #[test]
    fn join_and_bases() {
        let seq: Vec<NumberedSyllable> = ["yi2", "ge5"].iter().map(|s| s.parse().unwrap()).collect();
        assert_eq!(join_syllables(&seq), "yi2 ge5");
        assert_eq!(bases(&seq), vec!["yi", "ge"]);
    }
}
