//! Domain settings loaded from TOML.
//!
//! - `parse_settings_toml(toml_content)` parses and validates a custom TOML
//! - `Settings::default()` parses the embedded defaults
//! - Default values are embedded via `include_str!("default_settings.toml")`
//!
//! Settings are constructed once by the caller and passed by reference to the
//! aligner and resolver; there is no global instance.

use std::collections::BTreeMap;

use serde::Deserialize;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

/// Returns the embedded default settings TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub rows: RowSettings,
    pub pinyin: PinyinSettings,
    pub alignment: AlignmentSettings,
    pub resolution: ResolutionSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RowSettings {
    pub levels: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PinyinSettings {
    pub separators: String,
    pub interjections: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlignmentSettings {
    erhua_suffix: String,
    #[serde(default)]
    sandhi: BTreeMap<String, String>,
}

impl AlignmentSettings {
    /// The diminutive suffix character (validated to be exactly one char).
    pub fn erhua_suffix(&self) -> char {
        self.erhua_suffix.chars().next().unwrap_or('儿')
    }

    /// Sandhi-prone characters and their tone-free base syllable.
    pub fn sandhi(&self) -> impl Iterator<Item = (char, &str)> {
        self.sandhi
            .iter()
            .filter_map(|(ch, base)| Some((ch.chars().next()?, base.as_str())))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResolutionSettings {
    pub error_preview_limit: usize,
}

impl Settings {
    pub fn is_valid_level(&self, level: &str) -> bool {
        self.rows.levels.iter().any(|l| l == level)
    }

    /// Whitespace and configured separators are token boundaries.
    pub fn is_separator(&self, ch: char) -> bool {
        ch.is_whitespace() || self.pinyin.separators.contains(ch)
    }
}

impl Default for Settings {
    fn default() -> Self {
        parse_settings_toml(DEFAULT_SETTINGS_TOML).expect("settings TOML must be valid")
    }
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let s: Settings = toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    Ok(s)
}

fn invalid(field: &str, reason: &str) -> SettingsError {
    SettingsError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

fn is_syllable_text(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_lowercase() || c == 'ü')
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    if s.rows.levels.is_empty() {
        return Err(invalid("rows.levels", "must not be empty"));
    }
    if s.rows.levels.iter().any(|l| l.trim().is_empty()) {
        return Err(invalid("rows.levels", "labels must not be blank"));
    }
    if s.pinyin.separators.contains(char::is_alphanumeric) {
        return Err(invalid(
            "pinyin.separators",
            "separators must not contain letters or digits",
        ));
    }
    for syllable in &s.pinyin.interjections {
        if !is_syllable_text(syllable) {
            return Err(SettingsError::InvalidValue {
                field: "pinyin.interjections".to_string(),
                reason: format!("{syllable:?} is not a lowercase syllable"),
            });
        }
    }
    if s.alignment.erhua_suffix.chars().count() != 1 {
        return Err(invalid(
            "alignment.erhua_suffix",
            "must be exactly one character",
        ));
    }
    for (ch, base) in &s.alignment.sandhi {
        if ch.chars().count() != 1 {
            return Err(SettingsError::InvalidValue {
                field: format!("alignment.sandhi.{ch}"),
                reason: "key must be exactly one character".to_string(),
            });
        }
        if !is_syllable_text(base) {
            return Err(SettingsError::InvalidValue {
                field: format!("alignment.sandhi.{ch}"),
                reason: format!("{base:?} is not a tone-free syllable"),
            });
        }
    }
    if s.resolution.error_preview_limit == 0 {
        return Err(invalid(
            "resolution.error_preview_limit",
            "must be greater than 0",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_default_settings() {
        let s = parse_settings_toml(DEFAULT_SETTINGS_TOML).unwrap();
        assert_eq!(s.rows.levels.len(), 7);
        assert!(s.is_valid_level("7-9"));
        assert!(!s.is_valid_level("8"));
        assert_eq!(s.alignment.erhua_suffix(), '儿');
        let sandhi: Vec<(char, &str)> = s.alignment.sandhi().collect();
        assert_eq!(sandhi, vec![('一', "yi"), ('不', "bu")]);
        assert_eq!(s.resolution.error_preview_limit, 25);
    }

    #[test]
    fn separators() {
        let s = Settings::default();
        assert!(s.is_separator(' '));
        assert!(s.is_separator('\t'));
        assert!(s.is_separator('-'));
        assert!(s.is_separator('’'));
        assert!(!s.is_separator('a'));
    }

    #[test]
    fn error_invalid_toml() {
        let err = parse_settings_toml("not valid toml {{{").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn error_multi_char_erhua_suffix() {
        let toml = DEFAULT_SETTINGS_TOML.replace("erhua_suffix = \"儿\"", "erhua_suffix = \"儿子\"");
        let err = parse_settings_toml(&toml).unwrap_err();
        assert!(
            matches!(err, SettingsError::InvalidValue { ref field, .. } if field == "alignment.erhua_suffix")
        );
    }

    #[test]
    fn error_zero_preview_limit() {
        let toml =
            DEFAULT_SETTINGS_TOML.replace("error_preview_limit = 25", "error_preview_limit = 0");
        assert!(parse_settings_toml(&toml).is_err());
    }

    #[test]
    fn error_bad_sandhi_base() {
        let toml = DEFAULT_SETTINGS_TOML.replace("\"不\" = \"bu\"", "\"不\" = \"bu4\"");
        let err = parse_settings_toml(&toml).unwrap_err();
        assert!(err.to_string().contains("alignment.sandhi.不"));
    }
}
