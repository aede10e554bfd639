use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

/// Why a row could not be resolved. `Display` renders the stable reason
/// code used in reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoMatchReason {
    EmptySource,
    NoWordEntry,
    NoPinyinMatch,
    /// Several tone-insensitive candidates and no override.
    MultipleCandidates(Vec<String>),
    /// The override names a pronunciation outside the candidates.
    OverrideNotCandidate(String),
    /// The patch dictionary failed for a reason worth reporting.
    Patch(Box<NoMatchReason>),
}

impl NoMatchReason {
    /// Only a missing word or a missing pronunciation falls through to the
    /// patch dictionary.
    pub fn allows_patch(&self) -> bool {
        matches!(self, Self::NoWordEntry | Self::NoPinyinMatch)
    }
}

impl fmt::Display for NoMatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySource => f.write_str("empty_source_pinyin_numbered"),
            Self::NoWordEntry => f.write_str("no_word_entry"),
            Self::NoPinyinMatch => f.write_str("no_pinyin_match"),
            Self::MultipleCandidates(candidates) => {
                write!(f, "tone_insensitive_multiple_candidates:{}", candidates.join(", "))
            }
            Self::OverrideNotCandidate(selected) => {
                write!(f, "disambiguation_selected_not_in_candidates:{selected}")
            }
            Self::Patch(inner) => write!(f, "patch_{inner}"),
        }
    }
}

impl Serialize for NoMatchReason {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToneInsensitiveUniqueMatch {
    pub word_index: String,
    pub word: String,
    pub source_pinyin: String,
    pub source_pinyin_numbered: String,
    pub selected_cedict_pinyin: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToneInsensitiveMultiMatch {
    pub word_index: String,
    pub word: String,
    pub source_pinyin: String,
    pub source_pinyin_numbered: String,
    /// Sorted candidate pronunciations.
    pub candidate_cedict_pinyin: Vec<String>,
    pub selected_cedict_pinyin: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatchedMatch {
    pub word_index: String,
    pub word: String,
    pub source_pinyin_numbered: String,
    pub selected_cedict_pinyin: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoMatchItem {
    pub word_index: String,
    pub word: String,
    pub source_pinyin: String,
    pub source_pinyin_numbered: String,
    pub reason: NoMatchReason,
}

/// Resolution diagnostics, each list ordered by numeric word index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionReport {
    pub tone_insensitive_unique: Vec<ToneInsensitiveUniqueMatch>,
    pub tone_insensitive_multi: Vec<ToneInsensitiveMultiMatch>,
    pub patched: Vec<PatchedMatch>,
    pub no_match: Vec<NoMatchItem>,
}

/// Numeric indexes first in numeric order, anything else after in text
/// order.
fn index_order(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

impl ResolutionReport {
    pub(crate) fn sort(&mut self) {
        self.tone_insensitive_unique
            .sort_by(|a, b| index_order(&a.word_index, &b.word_index));
        self.tone_insensitive_multi
            .sort_by(|a, b| index_order(&a.word_index, &b.word_index));
        self.patched
            .sort_by(|a, b| index_order(&a.word_index, &b.word_index));
        self.no_match
            .sort_by(|a, b| index_order(&a.word_index, &b.word_index));
    }

    /// True when every row resolved without falling back.
    pub fn is_clean(&self) -> bool {
        self.tone_insensitive_unique.is_empty()
            && self.tone_insensitive_multi.is_empty()
            && self.patched.is_empty()
            && self.no_match.is_empty()
    }

    /// Bulleted preview of unresolved rows, at most `limit` lines plus a
    /// remainder line.
    pub fn no_match_preview(&self, limit: usize) -> String {
        let mut lines: Vec<String> = self
            .no_match
            .iter()
            .take(limit)
            .map(|item| {
                format!(
                    "- idx={} word={} source={} reason={}",
                    item.word_index, item.word, item.source_pinyin_numbered, item.reason
                )
            })
            .collect();
        let remaining = self.no_match.len().saturating_sub(limit);
        if remaining > 0 {
            lines.push(format!("- ... and {remaining} more"));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(idx: &str) -> NoMatchItem {
        NoMatchItem {
            word_index: idx.to_string(),
            word: "龘".to_string(),
            source_pinyin: "dá".to_string(),
            source_pinyin_numbered: "da2".to_string(),
            reason: NoMatchReason::NoWordEntry,
        }
    }

    #[test]
    fn reason_codes() {
        assert_eq!(NoMatchReason::EmptySource.to_string(), "empty_source_pinyin_numbered");
        assert_eq!(
            NoMatchReason::MultipleCandidates(vec!["yi1".into(), "yi2".into()]).to_string(),
            "tone_insensitive_multiple_candidates:yi1, yi2"
        );
        assert_eq!(
            NoMatchReason::Patch(Box::new(NoMatchReason::OverrideNotCandidate("yi3".into())))
                .to_string(),
            "patch_disambiguation_selected_not_in_candidates:yi3"
        );
        assert!(NoMatchReason::NoPinyinMatch.allows_patch());
        assert!(!NoMatchReason::EmptySource.allows_patch());
    }

    #[test]
    fn sort_is_numeric() {
        let mut report = ResolutionReport {
            no_match: vec![item("10"), item("9"), item("x"), item("100")],
            ..Default::default()
        };
        report.sort();
        let order: Vec<&str> = report.no_match.iter().map(|i| i.word_index.as_str()).collect();
        assert_eq!(order, vec!["9", "10", "100", "x"]);
    }

    #[test]
    fn preview_truncates() {
        let report = ResolutionReport {
            no_match: (1..=4).map(|i| item(&i.to_string())).collect(),
            ..Default::default()
        };
        let preview = report.no_match_preview(2);
        assert_eq!(preview.lines().count(), 3);
        assert!(preview.starts_with("- idx=1 word=龘 source=da2 reason=no_word_entry"));
        assert!(preview.ends_with("- ... and 2 more"));
        assert!(!report.is_clean());
    }
}
