// Model build and recommendation benchmarks
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nexin_core::{normalize, ModelGeneration, RawProduct, RecommendationCache, Recommender};
use rand::prelude::*;
use rand::rngs::StdRng;

const CATEGORIES: &[&str] = &["Electronics", "Kitchen", "Garden", "Books", "Toys", "Sports"];
const BRANDS: &[&str] = &["Logi", "Razer", "Brew", "Forge", "Green", "Acme", "Nova"];
const WORDS: &[&str] = &[
    "wireless", "mouse", "keyboard", "kettle", "steel", "glass", "hose", "novel", "puzzle",
    "ball", "gaming", "ergonomic", "portable", "compact", "premium", "classic", "smart", "usb",
    "bluetooth", "cotton", "leather", "outdoor", "indoor", "light", "heavy", "mini", "pro",
];

fn generate_catalog(size: usize, seed: u64) -> Vec<RawProduct> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..size)
        .map(|i| {
            let name: Vec<&str> = (0..3).map(|_| WORDS[rng.random_range(0..WORDS.len())]).collect();
            let description: Vec<&str> = (0..8).map(|_| WORDS[rng.random_range(0..WORDS.len())]).collect();
            RawProduct::new(
                format!("p{}", i),
                name.join(" "),
                BRANDS[rng.random_range(0..BRANDS.len())],
                CATEGORIES[rng.random_range(0..CATEGORIES.len())],
                description.join(" "),
                rng.random_range(5.0..500.0),
            )
        })
        .collect()
}

fn benchmark_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    group.sample_size(10);

    for size in [100, 1000, 3000].iter() {
        let records = generate_catalog(*size, 42);
        group.bench_with_input(BenchmarkId::new("model", size), &records, |b, records| {
            b.iter(|| {
                let model = ModelGeneration::build(normalize(records)).unwrap();
                black_box(model.len())
            });
        });
    }

    group.finish();
}

fn benchmark_recommend(c: &mut Criterion) {
    let mut group = c.benchmark_group("recommend");
    let model = ModelGeneration::build(normalize(&generate_catalog(3000, 7))).unwrap();
    let recommender = Recommender::default();

    group.bench_function("uncached", |b| {
        let mut i = 0usize;
        b.iter(|| {
            i = (i + 1) % model.len();
            black_box(recommender.recommend(&model, &format!("p{}", i)))
        });
    });

    let cache = RecommendationCache::default();
    group.bench_function("cached", |b| {
        b.iter(|| {
            black_box(cache.get_or_compute(0, "p1", || recommender.recommend(&model, "p1")))
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_build, benchmark_recommend);
criterion_main!(benches);
