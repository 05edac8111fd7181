//! Benchmarks for field normalization
//!
//! Run with: cargo bench --package enrichment

use catalog::{RawImages, RawPrice};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use enrichment::{first_image_url, normalize_price};

fn bench_normalize_price(c: &mut Criterion) {
    let raw = RawPrice::Text("$1,249.99".to_string());

    c.bench_function("normalize_price_currency_string", |b| {
        b.iter(|| black_box(normalize_price(black_box(Some(&raw)))))
    });
}

fn bench_first_image_url(c: &mut Criterion) {
    let urls: Vec<String> = (0..8)
        .map(|i| format!("'https://m.media-amazon.com/images/I/{}1abcXYZ._AC_SL1500_.jpg'", i))
        .collect();
    let raw = RawImages::Text(format!("[{}]", urls.join(", ")));

    c.bench_function("first_image_url_eight_urls", |b| {
        b.iter(|| black_box(first_image_url(black_box(Some(&raw)))))
    });
}

criterion_group!(benches, bench_normalize_price, bench_first_image_url);
criterion_main!(benches);
