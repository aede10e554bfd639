use crate::dict::{CedictRepository, DictError};
use crate::pinyin::NumberedSyllable;
use crate::testutil::{mini_repo, settings};

fn syl(s: &str) -> NumberedSyllable {
    s.parse().unwrap()
}

fn tones(repo: &CedictRepository, ch: char) -> Vec<String> {
    repo.hanzi_syllables(ch)
        .map(|set| set.iter().map(|s| s.to_string()).collect())
        .unwrap_or_default()
}

#[test]
fn open_missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cedict.u8");
    let err = CedictRepository::open(&path, settings()).err().unwrap();
    assert!(matches!(err, DictError::NotFound(p) if p == path));
}

#[test]
fn open_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cedict.u8");
    std::fs::write(&path, "# header\n愛 爱 [ai4] /to love/\nbroken line\n").unwrap();
    let repo = CedictRepository::open(&path, settings()).unwrap();
    let stats = repo.stats();
    assert_eq!(stats.total_lines, 3);
    assert_eq!(stats.skipped_lines, 2);
    // traditional and simplified forms
    assert_eq!(stats.entries, 2);
    assert_eq!(stats.words, 2);
}

#[test]
fn duplicate_entries_are_dropped() {
    let repo = CedictRepository::from_text(
        "愛 爱 [ai4] /to love/\n愛 爱 [ai4] /to love/\n",
        settings(),
    );
    assert_eq!(repo.entries_for_word("爱").count(), 1);
}

#[test]
fn entries_keep_traditional_form() {
    let repo = mini_repo();
    let entry = repo.entries_for_word("一个").next().unwrap();
    assert_eq!(entry.traditional, "一個");
    assert_eq!(entry.pinyin_numbered(), "yi1 ge4");
    assert!(repo.contains_word("一個"));
    assert!(!repo.contains_word("龘"));
}

#[test]
fn also_pr_creates_alternate_entries() {
    let repo = mini_repo();
    let set = repo.word_syllables("谁").unwrap();
    assert!(set.contains(&vec![syl("shei2")]));
    assert!(set.contains(&vec![syl("shui2")]));
}

#[test]
fn hanzi_map_from_single_char_entries() {
    let repo = mini_repo();
    assert_eq!(tones(&repo, '儿'), vec!["er2", "r5"]);
    assert_eq!(tones(&repo, '爸'), vec!["ba4"]);
}

#[test]
fn hanzi_map_contextual_only_for_new_bases() {
    // 爸爸 contributes ba5 only if 爸 had no "ba" candidate
    let repo = mini_repo();
    assert!(!tones(&repo, '爸').contains(&"ba5".to_string()));

    // a character seen only inside a longer word still gets a candidate
    let repo = CedictRepository::from_text("蝴蝶 蝴蝶 [hu2 die2] /butterfly/\n", settings());
    assert_eq!(tones(&repo, '蝴'), vec!["hu2"]);
    assert_eq!(tones(&repo, '蝶'), vec!["die2"]);
}

#[test]
fn sandhi_characters_get_every_tone() {
    let repo = mini_repo();
    assert_eq!(tones(&repo, '一'), vec!["yi1", "yi2", "yi3", "yi4", "yi5"]);
    assert_eq!(tones(&repo, '不'), vec!["bu1", "bu2", "bu3", "bu4", "bu5"]);

    // even without any dictionary entry
    let repo = CedictRepository::from_text("", settings());
    assert_eq!(tones(&repo, '一').len(), 5);
}
