//! # Filter Update Benchmarks
//!
//! Measures dependency-ordered re-evaluation over a layered filter graph.
//!
//! ```bash
//! cargo bench --package filtergraph-core --bench update_filter
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use filtergraph_core::collection::FilterCollection;
use filtergraph_core::group::{shared, FilterGroup, FilteredView};

/// `layers` layers of `width` filters; every filter feeds all filters of the next layer.
fn layered(layers: usize, width: usize, elements: usize) -> FilterCollection {
    let view = shared(FilteredView::new((0..elements as u64).collect::<Vec<_>>()));
    let mut builder = FilterGroup::builder("g", view);

    for layer in 0..layers {
        for slot in 0..width {
            let dependents: Vec<String> = if layer + 1 < layers {
                (0..width).map(|next| format!("g.f{}_{}", layer + 1, next)).collect()
            } else {
                Vec::new()
            };
            let modulus = (layer * width + slot) as u64 + 2;
            builder = builder
                .add_fixed_filter(format!("f{layer}_{slot}"), move |v: &u64| v % modulus != 0)
                .with_dependents(dependents)
                .with_static_precondition(true);
        }
    }

    FilterCollection::builder()
        .add_filter_group(builder.build().expect("valid keys"))
        .build()
        .expect("acyclic graph")
}

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("update_filter");

    for &(layers, width) in &[(4, 4), (8, 8), (16, 8)] {
        let mut collection = layered(layers, width, 1_000);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{layers}x{width}")),
            &"g.f0_0",
            |b, key| b.iter(|| collection.update_filter(black_box(key)).expect("update")),
        );
    }

    group.finish();
}

fn bench_finish_creation(c: &mut Criterion) {
    c.bench_function("finish_creation/16x8", |b| {
        b.iter(|| black_box(layered(16, 8, 10)))
    });
}

criterion_group!(benches, bench_update, bench_finish_creation);
criterion_main!(benches);
