use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use jar_core::{ArcGeometryRenderer, JarStateStore, PercentageAllocator};
use jar_domain::{ArcSegment, ChartGeometry, Jar, JarCategory, RoundingPolicy};

fn sample_jars() -> Vec<Jar> {
    JarCategory::ALL
        .into_iter()
        .zip([33u8, 17, 9, 11, 7, 23])
        .map(|(category, percent)| Jar::new(category, percent))
        .collect()
}

fn bench_derivation(c: &mut Criterion) {
    let jars = sample_jars();

    c.bench_function("derive_amounts_per_jar", |b| {
        b.iter_batched(
            || jars.clone(),
            |mut jars| {
                PercentageAllocator::derive_amounts(
                    &mut jars,
                    black_box(987_654_321),
                    RoundingPolicy::PerJar,
                );
                jars
            },
            BatchSize::SmallInput,
        )
    });

    c.bench_function("derive_amounts_largest_remainder", |b| {
        b.iter_batched(
            || jars.clone(),
            |mut jars| {
                PercentageAllocator::derive_amounts(
                    &mut jars,
                    black_box(987_654_321),
                    RoundingPolicy::LargestRemainder,
                );
                jars
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_edit_session(c: &mut Criterion) {
    c.bench_function("store_edit_commit_1k", |b| {
        b.iter(|| {
            let mut store = JarStateStore::default();
            for step in 0..1_000usize {
                let _ = store.edit_percent(step % 6, black_box((step % 70) as f64));
            }
            store.commit_edits()
        })
    });
}

fn bench_chart(c: &mut Criterion) {
    let segments: Vec<ArcSegment> = [55.0, 10.0, 10.0, 5.0, 5.0, 15.0]
        .into_iter()
        .map(|percent| ArcSegment::new(percent, "#1A75FF"))
        .collect();
    let geometry = ChartGeometry::new(240.0, 32.0, 2.0);

    c.bench_function("build_arc_paths_six_jars", |b| {
        b.iter(|| ArcGeometryRenderer::build_arc_paths(black_box(&segments), geometry))
    });

    let chart = ArcGeometryRenderer::build_arc_paths(&segments, geometry);
    c.bench_function("render_svg_six_jars", |b| {
        b.iter(|| ArcGeometryRenderer::render_svg(black_box(&chart), "#eee"))
    });
}

criterion_group!(benches, bench_derivation, bench_edit_session, bench_chart);
criterion_main!(benches);
