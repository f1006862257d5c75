use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pairflip_core::{CardFace, DealBuilder, DealConfig, RandomDealBuilder};

fn faces(count: usize) -> Vec<CardFace> {
    (0..count)
        .map(|i| CardFace::new(format!("img/{i:03}.png")))
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_deal");
    for count in [2, 8, 16, 64] {
        let input = faces(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &input, |b, input| {
            let mut seed = 0;
            b.iter(|| {
                seed += 1;
                let builder = RandomDealBuilder::new(seed, DealConfig::default());
                black_box(builder.build(black_box(input)))
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build);
criterion_main!(benches);
