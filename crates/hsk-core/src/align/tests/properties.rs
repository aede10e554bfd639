//! Property-based tests for alignment.
//!
//! Builds headwords from characters with a single unambiguous reading and
//! checks that numbering recovers exactly the syllables the pinyin was
//! rendered from.

use proptest::prelude::*;

use crate::align::Aligner;
use crate::pinyin::{apply_tone_mark, strip_tone_marks};
use crate::testutil::{inventory, mini_repo, settings};

/// (character, base, tone) readings present in the mini dictionary.
const READINGS: &[(char, &str, u8)] = &[
    ('爱', "ai", 4),
    ('爸', "ba", 4),
    ('西', "xi", 1),
    ('安', "an", 1),
    ('玩', "wan", 2),
    ('错', "cuo", 4),
    ('个', "ge", 4),
];

fn arb_word() -> impl Strategy<Value = Vec<(char, &'static str, u8)>> {
    prop::collection::vec(prop::sample::select(READINGS.to_vec()), 1..5)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn spaced_pinyin_numbers_one_syllable_per_hanzi(readings in arb_word()) {
        let repo = mini_repo();
        let aligner = Aligner::new(inventory(), &repo, settings());

        let word: String = readings.iter().map(|(ch, _, _)| *ch).collect();
        let pinyin = readings
            .iter()
            .map(|(_, base, tone)| apply_tone_mark(base, *tone))
            .collect::<Vec<_>>()
            .join(" ");
        let expected = readings
            .iter()
            .map(|(_, base, tone)| format!("{base}{tone}"))
            .collect::<Vec<_>>()
            .join(" ");

        let numbered = aligner.number(&pinyin, &word).unwrap();
        prop_assert_eq!(&numbered, &expected);

        // deterministic
        prop_assert_eq!(aligner.number(&pinyin, &word).unwrap(), numbered.clone());

        // letters survive numbering
        let letters: String = numbered
            .chars()
            .filter(|c| !c.is_ascii_digit() && *c != ' ')
            .collect();
        prop_assert_eq!(letters, strip_tone_marks(&pinyin).replace(' ', ""));
    }
}
