use unicode_normalization::UnicodeNormalization;

/// Precomposed tone-marked letters → (base letter, tone).
///
/// `ê` carries no pitch contour of its own; it is recorded as an explicit
/// neutral mark so that it still counts as "marked" inside a syllable.
const TONE_MARKS: &[(char, char, u8)] = &[
    ('ā', 'a', 1),
    ('á', 'a', 2),
    ('ǎ', 'a', 3),
    ('à', 'a', 4),
    ('ē', 'e', 1),
    ('é', 'e', 2),
    ('ě', 'e', 3),
    ('è', 'e', 4),
    ('ī', 'i', 1),
    ('í', 'i', 2),
    ('ǐ', 'i', 3),
    ('ì', 'i', 4),
    ('ō', 'o', 1),
    ('ó', 'o', 2),
    ('ǒ', 'o', 3),
    ('ò', 'o', 4),
    ('ū', 'u', 1),
    ('ú', 'u', 2),
    ('ǔ', 'u', 3),
    ('ù', 'u', 4),
    ('ǖ', 'ü', 1),
    ('ǘ', 'ü', 2),
    ('ǚ', 'ü', 3),
    ('ǜ', 'ü', 4),
    ('ń', 'n', 2),
    ('ň', 'n', 3),
    ('ǹ', 'n', 4),
    ('ḿ', 'm', 2),
    ('ê', 'e', 5),
    ('ế', 'e', 2),
    ('ề', 'e', 4),
];

/// Combining tone marks left over after NFC (e.g. `m̄`, `ê̄`).
fn combining_tone(c: char) -> Option<u8> {
    match c {
        '\u{0304}' => Some(1),
        '\u{0301}' => Some(2),
        '\u{030C}' => Some(3),
        '\u{0300}' => Some(4),
        _ => None,
    }
}

fn combining_mark(tone: u8) -> Option<char> {
    match tone {
        1 => Some('\u{0304}'),
        2 => Some('\u{0301}'),
        3 => Some('\u{030C}'),
        4 => Some('\u{0300}'),
        _ => None,
    }
}

fn lookup_mark(c: char) -> Option<(char, u8)> {
    TONE_MARKS
        .iter()
        .find(|(marked, _, _)| *marked == c)
        .map(|&(_, base, tone)| (base, tone))
}

/// NFC-normalise and lowercase source pinyin.
pub fn normalize(pinyin: &str) -> String {
    pinyin.nfc().collect::<String>().to_lowercase()
}

/// A pinyin token split into tone-free letters and per-letter tone marks.
///
/// `tones` is indexed by *byte* offset into `base` so that slicing by a
/// syllable's byte range yields that syllable's marks; multi-byte letters
/// (`ü`) repeat their mark for each byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decomposed {
    pub base: String,
    tones: Vec<u8>,
}

impl Decomposed {
    /// Tone of the syllable spanning `base[start..end]`.
    ///
    /// Returns `None` when the span carries two different marks, `Some(5)`
    /// when it carries none.
    pub fn tone_of(&self, start: usize, end: usize) -> Option<u8> {
        let mut found: Option<u8> = None;
        for &tone in &self.tones[start..end] {
            if tone == 0 {
                continue;
            }
            match found {
                Some(t) if t != tone => return None,
                _ => found = Some(tone),
            }
        }
        Some(found.unwrap_or(5))
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }
}

/// Strip tone diacritics from one (already normalised) token.
///
/// `v` is the legacy keyboard spelling of `ü` and is mapped to it.
pub fn decompose(token: &str) -> Decomposed {
    let mut base = String::with_capacity(token.len());
    let mut tones: Vec<u8> = Vec::with_capacity(token.len());
    let mut last_start: Option<usize> = None;

    for c in token.chars() {
        if let Some(tone) = combining_tone(c) {
            if let Some(start) = last_start {
                for t in &mut tones[start..] {
                    *t = tone;
                }
            }
            continue;
        }
        let (letter, tone) = match lookup_mark(c) {
            Some(pair) => pair,
            None if c == 'v' => ('ü', 0),
            None => (c, 0),
        };
        last_start = Some(base.len());
        base.push(letter);
        tones.resize(base.len(), tone);
    }

    Decomposed { base, tones }
}

/// Tone-free letters of a pinyin string.
pub fn strip_tone_marks(s: &str) -> String {
    decompose(&normalize(s)).base
}

/// Render a tone-free syllable with its tone diacritic.
///
/// Placement follows the standard rule: `a` or `e` takes the mark, then the
/// `o` of `ou`, otherwise the last vowel. Syllables without a vowel (`m`,
/// `ng`, `hng`) mark their first nasal. Tone 5 is left unmarked.
pub fn apply_tone_mark(base: &str, tone: u8) -> String {
    let Some(mark) = combining_mark(tone) else {
        return base.to_string();
    };
    let chars: Vec<char> = base.chars().collect();
    let is_vowel = |c: &char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'ü');

    let target = chars
        .iter()
        .position(|&c| c == 'a')
        .or_else(|| chars.iter().position(|&c| c == 'e'))
        .or_else(|| base.find("ou").map(|_| chars.iter().position(|&c| c == 'o').unwrap_or(0)))
        .or_else(|| chars.iter().rposition(is_vowel))
        .or_else(|| chars.iter().position(|&c| c == 'm' || c == 'n'));

    let Some(target) = target else {
        return base.to_string();
    };
    let mut out = String::with_capacity(base.len() + 2);
    for (i, &c) in chars.iter().enumerate() {
        out.push(c);
        if i == target {
            out.push(mark);
        }
    }
    out.nfc().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decompose_precomposed_marks() {
        let d = decompose("bàba");
        assert_eq!(d.base, "baba");
        assert_eq!(d.tone_of(0, 2), Some(4));
        assert_eq!(d.tone_of(2, 4), Some(5));
    }

    #[test]
    fn decompose_u_umlaut_and_v() {
        let d = decompose("lǜ");
        assert_eq!(d.base, "lü");
        assert_eq!(d.tone_of(0, d.base.len()), Some(4));

        let d = decompose("nv");
        assert_eq!(d.base, "nü");
        assert_eq!(d.tone_of(0, d.base.len()), Some(5));
    }

    #[test]
    fn decompose_combining_marks() {
        // m + combining macron has no precomposed form
        let d = decompose(&normalize("m\u{0304}"));
        assert_eq!(d.base, "m");
        assert_eq!(d.tone_of(0, 1), Some(1));
    }

    #[test]
    fn conflicting_marks_in_one_span() {
        let d = decompose("hǎó");
        assert_eq!(d.base, "hao");
        assert_eq!(d.tone_of(0, 3), None);
        assert_eq!(d.tone_of(0, 2), Some(3));
    }

    #[test]
    fn normalize_composes_and_lowercases() {
        assert_eq!(normalize("A\u{0300}"), "à");
        assert_eq!(normalize("BÀBA"), "bàba");
        assert_eq!(strip_tone_marks("Zhōngguó"), "zhongguo");
    }

    #[test]
    fn tone_mark_placement() {
        assert_eq!(apply_tone_mark("hao", 3), "hǎo");
        assert_eq!(apply_tone_mark("xie", 4), "xiè");
        assert_eq!(apply_tone_mark("gou", 3), "gǒu");
        assert_eq!(apply_tone_mark("gui", 4), "guì");
        assert_eq!(apply_tone_mark("liu", 2), "liú");
        assert_eq!(apply_tone_mark("lü", 4), "lǜ");
        assert_eq!(apply_tone_mark("n", 2), "ń");
        assert_eq!(apply_tone_mark("ma", 5), "ma");
    }

    #[test]
    fn tone_mark_roundtrip() {
        for (base, tone) in [("zhuang", 1), ("nüe", 4), ("er", 2), ("shui", 3)] {
            let d = decompose(&apply_tone_mark(base, tone));
            assert_eq!(d.base, base);
            assert_eq!(d.tone_of(0, d.base.len()), Some(tone));
        }
    }
}
