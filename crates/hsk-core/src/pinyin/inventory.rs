use std::collections::{BTreeSet, HashMap, HashSet};

use pinyin::ToPinyinMulti;
use tracing::{debug, debug_span};

use super::tone::strip_tone_marks;
use crate::settings::Settings;

/// Code point ranges scanned for readings when building the standard
/// inventory: CJK Extension A and the CJK Unified Ideographs block.
const CJK_RANGES: &[(char, char)] = &[('\u{3400}', '\u{4DBF}'), ('\u{4E00}', '\u{9FFF}')];

fn is_syllable_text(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_lowercase() || c == 'ü')
}

/// Closed set of valid tone-free syllables.
///
/// Syllables are kept longest first (ties broken lexicographically) and
/// bucketed by initial letter, so prefix enumeration yields candidates in a
/// stable order.
pub struct SyllableInventory {
    syllables: Vec<String>,
    by_initial: HashMap<char, Vec<usize>>,
    members: HashSet<String>,
    interjections: HashSet<String>,
}

impl SyllableInventory {
    /// Inventory built from the `pinyin` crate's heteronym readings.
    pub fn standard(settings: &Settings) -> Self {
        let _span = debug_span!("standard_inventory").entered();
        let mut readings: BTreeSet<&'static str> = BTreeSet::new();
        for &(start, end) in CJK_RANGES {
            for ch in start..=end {
                let Some(multi) = ch.to_pinyin_multi() else {
                    continue;
                };
                for i in 0..multi.count() {
                    readings.insert(multi.get(i).with_tone());
                }
            }
        }
        debug!(reading_count = readings.len());
        Self::from_lexicon(readings, settings)
    }

    /// Inventory built from arbitrary (tone-marked or tone-free) readings.
    ///
    /// Every syllable not already ending in `r` also gets its erhua form
    /// (`wan` → `wanr`), then the configured interjections are added.
    pub fn from_lexicon<I, S>(lexicon: I, settings: &Settings) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set: BTreeSet<String> = lexicon
            .into_iter()
            .map(|reading| strip_tone_marks(reading.as_ref()))
            .filter(|base| is_syllable_text(base))
            .collect();

        let erhua: Vec<String> = set
            .iter()
            .filter(|s| !s.ends_with('r'))
            .map(|s| format!("{s}r"))
            .collect();
        set.extend(erhua);

        let interjections: HashSet<String> = settings.pinyin.interjections.iter().cloned().collect();
        set.extend(interjections.iter().cloned());

        let mut syllables: Vec<String> = set.into_iter().collect();
        syllables.sort_by(|a, b| {
            b.chars()
                .count()
                .cmp(&a.chars().count())
                .then_with(|| a.cmp(b))
        });

        let mut by_initial: HashMap<char, Vec<usize>> = HashMap::new();
        for (idx, s) in syllables.iter().enumerate() {
            if let Some(first) = s.chars().next() {
                by_initial.entry(first).or_default().push(idx);
            }
        }
        let members = syllables.iter().cloned().collect();

        Self {
            syllables,
            by_initial,
            members,
            interjections,
        }
    }

    /// All syllables that prefix `letters`, longest first.
    pub fn prefixes_of<'a>(&'a self, letters: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        let bucket = letters
            .chars()
            .next()
            .and_then(|c| self.by_initial.get(&c))
            .map(|v| v.as_slice())
            .unwrap_or(&[]);
        bucket
            .iter()
            .map(move |&idx| self.syllables[idx].as_str())
            .filter(move |s| letters.starts_with(s))
    }

    pub fn contains(&self, syllable: &str) -> bool {
        self.members.contains(syllable)
    }

    /// Interjections bypass the per-character candidate filter.
    pub fn is_interjection(&self, syllable: &str) -> bool {
        self.interjections.contains(syllable)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.syllables.iter().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.syllables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.syllables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> SyllableInventory {
        SyllableInventory::from_lexicon(
            ["xī", "ān", "xiān", "ba", "bà", "er", "wán", "lǜ", "kè!"],
            &Settings::default(),
        )
    }

    #[test]
    fn from_lexicon_strips_and_extends() {
        let inv = small();
        assert!(inv.contains("xian"));
        assert!(inv.contains("xianr"));
        assert!(inv.contains("wanr"));
        assert!(inv.contains("lü"));
        // "er" already ends in r
        assert!(!inv.contains("err"));
        // interjections from settings
        assert!(inv.contains("hng"));
        assert!(inv.is_interjection("r"));
        assert!(!inv.is_interjection("ba"));
        // non-letter readings are dropped
        assert!(!inv.contains("ke!"));
    }

    #[test]
    fn longest_first_ordering() {
        let inv = small();
        let lengths: Vec<usize> = inv.iter().map(|s| s.chars().count()).collect();
        assert!(lengths.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn prefixes_longest_first() {
        let inv = small();
        let found: Vec<&str> = inv.prefixes_of("xian").collect();
        assert_eq!(found, vec!["xian", "xi"]);
        assert!(inv.prefixes_of("").next().is_none());
        assert!(inv.prefixes_of("q").next().is_none());
    }

    #[test]
    fn standard_inventory_covers_common_syllables() {
        let inv = SyllableInventory::standard(&Settings::default());
        for s in ["ba", "shei", "shui", "yi", "ge", "zhuang", "lü", "nüe", "er", "wanr", "ng"] {
            assert!(inv.contains(s), "missing {s}");
        }
        assert!(!inv.contains("zzz"));
    }
}
