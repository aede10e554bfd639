//! Shared test fixtures.

use std::sync::OnceLock;

use crate::dict::CedictRepository;
use crate::pinyin::SyllableInventory;
use crate::settings::Settings;

pub(crate) const MINI_CEDICT: &str = "\
# mini CC-CEDICT
愛 爱 [ai4] /to love/
爸 爸 [ba4] /father/
爸爸 爸爸 [ba4 ba5] /father/dad/
誰 谁 [shei2] /who/also pr. [shui2]/
一 一 [yi1] /one/
個 个 [ge4] /individual/
一個 一个 [yi1 ge4] /one item/
玩 玩 [wan2] /to play/
兒 儿 [er2] /child/
兒 儿 [r5] /non-syllabic diminutive suffix/
玩兒 玩儿 [wan2 r5] /to play/
西 西 [xi1] /west/
安 安 [an1] /peace/
西安 西安 [Xi1 an1] /Xi'an/
行 行 [xing2] /to walk/
行 行 [hang2] /row/
不 不 [bu4] /no/
不錯 不错 [bu4 cuo4] /not bad/
錯 错 [cuo4] /mistake/
";

pub(crate) fn settings() -> &'static Settings {
    static SETTINGS: OnceLock<Settings> = OnceLock::new();
    SETTINGS.get_or_init(Settings::default)
}

pub(crate) fn mini_repo() -> CedictRepository {
    CedictRepository::from_text(MINI_CEDICT, settings())
}

/// The full inventory is costly to build; share one across tests.
pub(crate) fn inventory() -> &'static SyllableInventory {
    static INVENTORY: OnceLock<SyllableInventory> = OnceLock::new();
    INVENTORY.get_or_init(|| SyllableInventory::standard(settings()))
}
