//! Character-level Unicode classification for Hanzi headwords.

/// Check the CJK Unified Ideographs block (U+4E00..U+9FFF).
///
/// Extension blocks are not headword characters.
pub fn is_hanzi(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c)
}

/// Ordered Hanzi of a headword, skipping suffix markers such as `1`/`2`.
pub fn hanzi_chars(word: &str) -> Vec<char> {
    word.chars().filter(|&c| is_hanzi(c)).collect()
}

/// Dictionary lookup key for a headword.
///
/// Source rows may carry a sense suffix (`点1`, `点2`); dictionary keys do
/// not. Returns the Hanzi-only form, or the word itself when it has no Hanzi.
pub fn lookup_key(word: &str) -> String {
    let key: String = word.chars().filter(|&c| is_hanzi(c)).collect();
    if key.is_empty() {
        word.to_string()
    } else {
        key
    }
}

/// Check if a string is a valid headword: one or more Hanzi, optionally
/// followed by a single ASCII disambiguation digit.
pub fn is_headword(s: &str) -> bool {
    let mut chars = s.chars().peekable();
    let mut hanzi = 0usize;
    while let Some(&c) = chars.peek() {
        if !is_hanzi(c) {
            break;
        }
        hanzi += 1;
        chars.next();
    }
    if hanzi == 0 {
        return false;
    }
    match (chars.next(), chars.next()) {
        (None, _) => true,
        (Some(d), None) => d.is_ascii_digit(),
        _ => false,
    }
}
