use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use clfirst::status::FailureKind;

/// Sweep the whole defined code range plus a stretch of unknown codes; the
/// translator sits on every device call, so it should stay trivially cheap.
fn bench_translate(c: &mut Criterion) {
    c.bench_function("from_code sweep", |b| {
        b.iter(|| {
            for code in -70..=10 {
                black_box(FailureKind::from_code(black_box(code)));
            }
        })
    });
}

criterion_group!(benches, bench_translate);
criterion_main!(benches);
