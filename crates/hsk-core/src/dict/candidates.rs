use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Serialize;

use super::DictEntry;
use crate::pinyin::{bases, join_syllables, NumberedSyllable};

/// Separator between the definitions of distinct merged entries.
pub const DEFINITION_SEPARATOR: &str = " | ";

/// Dictionary pronunciations of one written form sharing a syllable
/// sequence, with their definitions and traditional forms merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateGroup {
    pub tokens: Vec<NumberedSyllable>,
    /// Sorted, deduplicated, non-empty definitions.
    pub definitions: Vec<String>,
    /// Sorted, deduplicated traditional forms.
    pub traditional_forms: Vec<String>,
}

impl CandidateGroup {
    pub fn pinyin_numbered(&self) -> String {
        join_syllables(&self.tokens)
    }

    /// Definitions of the merged entries, separated by `DEFINITION_SEPARATOR`;
    /// glosses inside one definition keep their `/`.
    pub fn definition(&self) -> String {
        self.definitions.join(DEFINITION_SEPARATOR)
    }

    pub fn traditional(&self) -> String {
        self.traditional_forms.join("/")
    }

    fn matches_exactly(&self, variant: &[&str]) -> bool {
        self.tokens.len() == variant.len()
            && self
                .tokens
                .iter()
                .zip(variant)
                .all(|(token, source)| token.to_string() == *source)
    }
}

/// Split `/`-separated numbered pinyin into token lists, dropping empty
/// variants.
pub fn split_numbered_variants(numbered: &str) -> Vec<Vec<&str>> {
    numbered
        .split('/')
        .map(|part| part.split_whitespace().collect::<Vec<_>>())
        .filter(|tokens| !tokens.is_empty())
        .collect()
}

/// Drop the trailing tone digit of each token.
pub fn tone_insensitive<'a>(tokens: &[&'a str]) -> Vec<&'a str> {
    tokens
        .iter()
        .map(|&token| token.strip_suffix(|c: char| c.is_ascii_digit()).unwrap_or(token))
        .collect()
}

/// Group entries by syllable sequence, ordered by that sequence.
pub fn group_candidates<'a>(entries: impl IntoIterator<Item = &'a DictEntry>) -> Vec<CandidateGroup> {
    let mut grouped: BTreeMap<&[NumberedSyllable], (BTreeSet<&str>, BTreeSet<&str>)> =
        BTreeMap::new();
    for entry in entries {
        let (definitions, traditional) = grouped.entry(entry.tokens.as_slice()).or_default();
        if !entry.definition.is_empty() {
            definitions.insert(entry.definition.as_str());
        }
        traditional.insert(entry.traditional.as_str());
    }

    grouped
        .into_iter()
        .map(|(tokens, (definitions, traditional))| CandidateGroup {
            tokens: tokens.to_vec(),
            definitions: definitions.into_iter().map(str::to_string).collect(),
            traditional_forms: traditional.into_iter().map(str::to_string).collect(),
        })
        .collect()
}

/// First group matching a source variant exactly, trying variants in
/// source order.
pub fn exact_match<'g>(groups: &'g [CandidateGroup], variants: &[Vec<&str>]) -> Option<&'g CandidateGroup> {
    variants
        .iter()
        .find_map(|variant| groups.iter().find(|group| group.matches_exactly(variant)))
}

/// Groups whose tone-free syllables equal any source variant's.
pub fn tone_insensitive_matches<'g>(
    groups: &'g [CandidateGroup],
    variants: &[Vec<&str>],
) -> Vec<&'g CandidateGroup> {
    let wanted: HashSet<Vec<&str>> = variants.iter().map(|v| tone_insensitive(v)).collect();
    groups
        .iter()
        .filter(|group| wanted.contains(&bases(&group.tokens)))
        .collect()
}
