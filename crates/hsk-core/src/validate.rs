//! Schema checks for each stage's rows, plus row-set statistics.
//!
//! Each check collects every problem before failing, so one run reports
//! the whole batch.

use std::collections::BTreeMap;
use std::fmt;

use crate::pinyin::{normalize, split_alternates, NumberedSyllable};
use crate::rows::{EnrichedRow, NumberedRow, RawRow, StageRow};
use crate::settings::Settings;
use crate::unicode::{hanzi_chars, is_hanzi, is_headword};

/// Problems shown in a validation error before the remainder is counted.
pub const ERROR_PREVIEW_LIMIT: usize = 25;

const POS_DELIMITER: char = '、';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Raw,
    Numbered,
    Enriched,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Raw => "raw",
            Stage::Numbered => "numbered",
            Stage::Enriched => "enriched",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{stage} row validation failed with {} errors:{}", .errors.len(), preview(.errors))]
pub struct ValidationError {
    pub stage: Stage,
    pub errors: Vec<String>,
}

fn preview(errors: &[String]) -> String {
    let mut out = String::new();
    for error in errors.iter().take(ERROR_PREVIEW_LIMIT) {
        out.push_str("\n- ");
        out.push_str(error);
    }
    let remaining = errors.len().saturating_sub(ERROR_PREVIEW_LIMIT);
    if remaining > 0 {
        out.push_str(&format!("\n- ... and {remaining} more"));
    }
    out
}

fn finish(stage: Stage, errors: Vec<String>) -> Result<(), ValidationError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { stage, errors })
    }
}

pub fn validate_raw_rows(rows: &[RawRow], settings: &Settings) -> Result<(), ValidationError> {
    let mut errors = Vec::new();
    for (n, row) in rows.iter().enumerate().map(|(i, r)| (i + 1, r)) {
        let idx = row.word_index();
        if idx.is_empty() || !idx.chars().all(|c| c.is_ascii_digit()) {
            errors.push(format!("row {n}: invalid word_index '{idx}'"));
        }
        if !settings.is_valid_level(row.level()) {
            errors.push(format!("row {n}: invalid level '{}'", row.level()));
        }
        if !is_headword(row.word()) {
            errors.push(format!("row {n}: invalid word '{}'", row.word()));
        }
        if row.pinyin().trim().is_empty() {
            errors.push(format!("row {n}: empty pinyin"));
        }
    }
    finish(Stage::Raw, errors)
}

pub fn validate_numbered_rows(rows: &[NumberedRow]) -> Result<(), ValidationError> {
    let mut errors = Vec::new();
    for (n, row) in rows.iter().enumerate().map(|(i, r)| (i + 1, r)) {
        let numbered = row.pinyin_numbered();
        if numbered.trim().is_empty() {
            errors.push(format!("row {n}: empty pinyin_numbered"));
            continue;
        }

        let variants: Vec<Vec<&str>> = numbered
            .split('/')
            .map(|v| v.split_whitespace().collect())
            .collect();
        let hanzi_count = hanzi_chars(row.word()).len();

        for tokens in &variants {
            if tokens.is_empty() {
                errors.push(format!("row {n}: empty pinyin variant in '{numbered}'"));
                continue;
            }
            for token in tokens {
                if token.parse::<NumberedSyllable>().is_err() {
                    errors.push(format!(
                        "row {n}: invalid pinyin_numbered token '{token}' in '{numbered}'"
                    ));
                }
            }
            if hanzi_count > 0 && tokens.len() != hanzi_count {
                errors.push(format!(
                    "row {n}: {} syllables for {hanzi_count} Hanzi in '{numbered}'",
                    tokens.len()
                ));
            }
        }

        let alternates = split_alternates(&normalize(row.pinyin())).len();
        if variants.len() != alternates {
            errors.push(format!(
                "row {n}: {} variants for {alternates} source alternates in '{numbered}'",
                variants.len()
            ));
        }
    }
    finish(Stage::Numbered, errors)
}

fn is_valid_traditional(value: &str) -> bool {
    value
        .split('/')
        .all(|segment| !segment.is_empty() && segment.chars().all(is_hanzi))
}

pub fn validate_enriched_rows(
    rows: &[EnrichedRow],
    allow_unresolved: bool,
) -> Result<(), ValidationError> {
    let mut errors = Vec::new();
    for (n, row) in rows.iter().enumerate().map(|(i, r)| (i + 1, r)) {
        let fields = [
            ("pinyin_cc-cedict", row.pinyin_cc_cedict()),
            ("traditional_cc-cedict", row.traditional_cc_cedict()),
            ("definition_cc-cedict", row.definition_cc_cedict()),
        ];
        let empty = fields.iter().filter(|(_, value)| value.is_empty()).count();

        if empty > 0 && empty < fields.len() {
            errors.push(format!("row {n}: partially enriched"));
        }
        if !allow_unresolved {
            for (name, value) in &fields {
                if value.is_empty() {
                    errors.push(format!("row {n}: empty {name}"));
                }
            }
        }

        let traditional = row.traditional_cc_cedict();
        if !traditional.is_empty() && !is_valid_traditional(traditional) {
            errors.push(format!("row {n}: invalid traditional_cc-cedict '{traditional}'"));
        }
    }
    finish(Stage::Enriched, errors)
}

/// Gaps in the observed numeric index range. Non-numeric indexes are
/// ignored.
pub fn missing_word_indexes<R: StageRow>(rows: &[R]) -> Vec<u64> {
    let mut indexes: Vec<u64> = rows
        .iter()
        .filter_map(|row| row.word_index().parse().ok())
        .collect();
    indexes.sort_unstable();
    indexes.dedup();

    let (Some(&first), Some(&last)) = (indexes.first(), indexes.last()) else {
        return Vec::new();
    };
    let mut missing = Vec::new();
    let mut observed = indexes.iter().peekable();
    for idx in first..=last {
        if observed.peek() == Some(&&idx) {
            observed.next();
        } else {
            missing.push(idx);
        }
    }
    missing
}

pub fn level_counts<R: StageRow>(rows: &[R]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for row in rows {
        *counts.entry(row.level().to_string()).or_insert(0) += 1;
    }
    counts
}

/// Counts of each part-of-speech tag; multi-tag fields are split on `、`.
pub fn pos_counts<R: StageRow>(rows: &[R]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for row in rows {
        for tag in row.part_of_speech().split(POS_DELIMITER).map(str::trim) {
            if !tag.is_empty() {
                *counts.entry(tag.to_string()).or_insert(0) += 1;
            }
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(idx: &str, level: &str, word: &str, pinyin: &str) -> RawRow {
        RawRow::new(idx, level, word, pinyin, "名、动")
    }

    fn enriched(pinyin: &str, traditional: &str, definition: &str) -> EnrichedRow {
        let numbered = NumberedRow::new(raw("1", "1", "爱", "ài"), "ai4");
        EnrichedRow::resolved(numbered, pinyin, traditional, definition)
    }

    #[test]
    fn raw_rows_accept_valid() {
        let rows = vec![raw("1", "1", "爱", "ài"), raw("2", "7-9", "点1", "diǎn")];
        assert!(validate_raw_rows(&rows, &Settings::default()).is_ok());
    }

    #[test]
    fn raw_rows_collect_every_problem() {
        let rows = vec![raw("x", "8", "abc", " ")];
        let err = validate_raw_rows(&rows, &Settings::default()).unwrap_err();
        assert_eq!(err.stage, Stage::Raw);
        assert_eq!(err.errors.len(), 4);
        assert!(err.to_string().starts_with("raw row validation failed with 4 errors:"));
    }

    #[test]
    fn numbered_rows_check_tokens_and_counts() {
        let ok = vec![
            NumberedRow::new(raw("1", "1", "谁", "shéi/shuí"), "shei2/shui2"),
            NumberedRow::new(raw("2", "1", "玩儿", "wánr"), "wan2 r5"),
        ];
        assert!(validate_numbered_rows(&ok).is_ok());

        let bad = vec![
            NumberedRow::new(raw("1", "1", "爸爸", "bàba"), "ba4 ba"),
            NumberedRow::new(raw("2", "1", "爸爸", "bàba"), "ba4"),
            NumberedRow::new(raw("3", "1", "谁", "shéi/shuí"), "shei2"),
            NumberedRow::new(raw("4", "1", "谁", "shéi"), " "),
        ];
        let err = validate_numbered_rows(&bad).unwrap_err();
        assert_eq!(err.errors.len(), 4, "{err}");
        assert!(err.errors[0].contains("invalid pinyin_numbered token 'ba'"));
    }

    #[test]
    fn enriched_accepts_single_and_multi_traditional() {
        let rows = vec![enriched("ai4", "愛", "to love"), enriched("li3", "裏/裡", "inside")];
        assert!(validate_enriched_rows(&rows, false).is_ok());
    }

    #[test]
    fn enriched_rejects_bad_traditional() {
        let err = validate_enriched_rows(&[enriched("ai4", "A", "x")], false).unwrap_err();
        assert!(err.to_string().contains("invalid traditional_cc-cedict"));

        let err = validate_enriched_rows(&[enriched("ai4", "傳統//繁體", "x")], false).unwrap_err();
        assert!(err.to_string().contains("invalid traditional_cc-cedict"));
    }

    #[test]
    fn enriched_empty_only_when_tolerated() {
        let rows = vec![enriched("", "", "")];
        assert!(validate_enriched_rows(&rows, true).is_ok());

        let err = validate_enriched_rows(&rows, false).unwrap_err();
        assert!(err.to_string().contains("empty traditional_cc-cedict"));

        let err = validate_enriched_rows(&[enriched("ai4", "", "to love")], true).unwrap_err();
        assert!(err.errors[0].contains("partially enriched"));
    }

    #[test]
    fn preview_is_bounded() {
        let rows: Vec<RawRow> = (0..30).map(|_| raw("1", "0", "爱", "ài")).collect();
        let message = validate_raw_rows(&rows, &Settings::default())
            .unwrap_err()
            .to_string();
        assert_eq!(message.lines().count(), 1 + ERROR_PREVIEW_LIMIT + 1);
        assert!(message.ends_with("- ... and 5 more"));
    }

    #[test]
    fn statistics() {
        let rows = vec![
            raw("1", "1", "爱", "ài"),
            raw("4", "2", "爸爸", "bàba"),
            raw("2", "1", "谁", "shéi"),
        ];
        assert_eq!(missing_word_indexes(&rows), vec![3]);
        assert!(missing_word_indexes::<RawRow>(&[]).is_empty());

        let levels = level_counts(&rows);
        assert_eq!(levels.get("1"), Some(&2));
        assert_eq!(levels.get("2"), Some(&1));

        let pos = pos_counts(&rows);
        assert_eq!(pos.get("名"), Some(&3));
        assert_eq!(pos.get("动"), Some(&3));
    }
}
