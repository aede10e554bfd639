use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use hsk_core::align::Aligner;
use hsk_core::dict::CedictRepository;
use hsk_core::pinyin::SyllableInventory;
use hsk_core::settings::Settings;

const BENCH_CEDICT: &str = "\
愛 爱 [ai4] /to love/
爸 爸 [ba4] /father/
爸爸 爸爸 [ba4 ba5] /father/
一 一 [yi1] /one/
個 个 [ge4] /individual/
中 中 [zhong1] /middle/
國 国 [guo2] /country/
人 人 [ren2] /person/
民 民 [min2] /people/
共 共 [gong4] /common/
和 和 [he2] /and/
中華人民共和國 中华人民共和国 [Zhong1 hua2 Ren2 min2 Gong4 he2 guo2] /PRC/
華 华 [hua2] /China/
玩 玩 [wan2] /to play/
兒 儿 [r5] /diminutive suffix/
";

fn bench_number(c: &mut Criterion) {
    let settings = Settings::default();
    let inventory = SyllableInventory::standard(&settings);
    let repo = CedictRepository::from_text(BENCH_CEDICT, &settings);
    let aligner = Aligner::new(&inventory, &repo, &settings);

    let mut group = c.benchmark_group("number");
    for (word, pinyin) in [
        ("爱", "ài"),
        ("爸爸", "bàba"),
        ("玩儿", "wánr"),
        ("中华人民共和国", "Zhōnghuá Rénmín Gònghéguó"),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(word), &pinyin, |b, pinyin| {
            b.iter(|| aligner.number(pinyin, word));
        });
    }
    group.finish();
}

fn bench_inventory(c: &mut Criterion) {
    let settings = Settings::default();
    c.bench_function("inventory_standard", |b| {
        b.iter(|| SyllableInventory::standard(&settings));
    });
}

criterion_group!(benches, bench_number, bench_inventory);
criterion_main!(benches);
