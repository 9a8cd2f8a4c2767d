use criterion::{criterion_group, criterion_main, Criterion};
use memorito_core::{
    BoardGenerator, BoardMetrics, Difficulty, RandomBoardGenerator, DEFAULT_SYMBOL_POOL,
};

fn bench_generate_tiers(c: &mut Criterion) {
    let mut generator = RandomBoardGenerator::new(12345);

    for difficulty in Difficulty::ALL {
        let profile = difficulty.profile();
        c.bench_function(difficulty.name(), |b| {
            b.iter(|| {
                generator
                    .generate(&profile, DEFAULT_SYMBOL_POOL, BoardMetrics::default())
                    .unwrap()
            })
        });
    }
}

criterion_group!(benches, bench_generate_tiers);
criterion_main!(benches);
