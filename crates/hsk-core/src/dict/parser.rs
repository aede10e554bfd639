use crate::pinyin::NumberedSyllable;

use super::DictEntry;

const ALSO_PR_OPEN: &str = "also pr. [";

/// One parsed CC-CEDICT line: `TRAD SIMP [pin1 yin1] /gloss/gloss/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub traditional: String,
    pub simplified: String,
    /// Main pronunciation first, then every `also pr. [...]` alternate.
    pub pronunciations: Vec<Vec<NumberedSyllable>>,
    /// Non-empty glosses joined with `/`.
    pub definition: String,
}

impl ParsedLine {
    /// Entries for each written form whose character count matches a
    /// pronunciation's syllable count.
    pub fn into_entries(self) -> Vec<DictEntry> {
        let mut words = vec![self.traditional.clone()];
        if self.simplified != self.traditional {
            words.push(self.simplified.clone());
        }

        let mut entries = Vec::new();
        for word in &words {
            let char_count = word.chars().count();
            for tokens in &self.pronunciations {
                if tokens.len() != char_count {
                    continue;
                }
                entries.push(DictEntry {
                    word: word.clone(),
                    tokens: tokens.clone(),
                    definition: self.definition.clone(),
                    traditional: self.traditional.clone(),
                });
            }
        }
        entries
    }
}

/// Normalise one CC-CEDICT syllable (`u:` and `v` become `ü`, lowercase).
///
/// Returns `None` unless the result is letters followed by a tone 1–5.
pub fn normalize_cedict_syllable(token: &str) -> Option<NumberedSyllable> {
    let normalized = token
        .trim()
        .replace("u:", "ü")
        .replace("U:", "ü")
        .replace(['v', 'V'], "ü")
        .to_lowercase();
    normalized.parse().ok()
}

/// Parse a bracketed pronunciation payload; any bad token rejects it.
pub fn parse_pronunciation(payload: &str) -> Option<Vec<NumberedSyllable>> {
    let tokens: Option<Vec<NumberedSyllable>> = payload
        .split_whitespace()
        .map(normalize_cedict_syllable)
        .collect();
    tokens.filter(|t| !t.is_empty())
}

/// Alternate pronunciations named inside the gloss payload.
fn also_pronounced(payload: &str) -> Vec<Vec<NumberedSyllable>> {
    let mut found = Vec::new();
    let mut rest = payload;
    while let Some(pos) = rest.find(ALSO_PR_OPEN) {
        rest = &rest[pos + ALSO_PR_OPEN.len()..];
        let Some(close) = rest.find(']') else {
            break;
        };
        if let Some(tokens) = parse_pronunciation(&rest[..close]) {
            found.push(tokens);
        }
        rest = &rest[close + 1..];
    }
    found
}

/// Parse one line. Comments, blank lines and malformed lines yield `None`.
pub fn parse_cedict_line(line: &str) -> Option<ParsedLine> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let (traditional, rest) = line.split_once(char::is_whitespace)?;
    let (simplified, rest) = rest.trim_start().split_once(char::is_whitespace)?;
    let rest = rest.trim_start().strip_prefix('[')?;
    let (pronunciation, rest) = rest.split_once(']')?;
    if pronunciation.is_empty() {
        return None;
    }
    let payload = rest.trim_start().strip_prefix('/')?.strip_suffix('/')?;

    let mut pronunciations = vec![parse_pronunciation(pronunciation)?];
    for alternate in also_pronounced(payload) {
        if !pronunciations.contains(&alternate) {
            pronunciations.push(alternate);
        }
    }

    let definition = payload
        .split('/')
        .map(str::trim)
        .filter(|gloss| !gloss.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    Some(ParsedLine {
        traditional: traditional.to_string(),
        simplified: simplified.to_string(),
        pronunciations,
        definition,
    })
}
