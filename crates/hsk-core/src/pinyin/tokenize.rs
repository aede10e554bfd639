use crate::settings::Settings;

/// Delimiter between alternate readings (`shéi/shuí`).
pub const ALTERNATE_DELIMITER: char = '/';

/// Split source pinyin into alternate readings, dropping empty parts.
pub fn split_alternates(pinyin: &str) -> Vec<&str> {
    pinyin
        .split(ALTERNATE_DELIMITER)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect()
}

/// Split one alternate into tokens on whitespace and configured separators.
///
/// Separators are boundaries only; they never appear in the output.
pub fn tokenize<'a>(alternate: &'a str, settings: &Settings) -> Vec<&'a str> {
    alternate
        .split(|c: char| c == ALTERNATE_DELIMITER || settings.is_separator(c))
        .filter(|token| !token.is_empty())
        .collect()
}
