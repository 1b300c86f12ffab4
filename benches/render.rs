//! Benchmarks for the work `emit` does on the caller's thread.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use dislog::webhook::{FallbackContext, MessageRenderer};
use dislog::{DefaultFormatter, DislogLevel, DislogRecord, SharedFormatter};

fn bench_render(c: &mut Criterion) {
    let short = DislogRecord::new("app.db", DislogLevel::Error, "connection refused");
    let long = DislogRecord::new("app.db", DislogLevel::Error, &"x".repeat(10_000));

    let raw = MessageRenderer::default();
    c.bench_function("render_short_raw", |b| {
        b.iter(|| raw.render(black_box(&short)))
    });
    c.bench_function("render_long_truncated", |b| {
        b.iter(|| raw.render(black_box(&long)))
    });

    let formatted = MessageRenderer::new(
        Default::default(),
        Some(SharedFormatter::new(DefaultFormatter)),
        Some("alerts".into()),
    );
    c.bench_function("render_short_formatted", |b| {
        b.iter(|| formatted.render(black_box(&short)))
    });

    c.bench_function("fallback_notice", |b| {
        b.iter(|| {
            FallbackContext::new(black_box(&short), Some("@here".into()), None)
                .message(&"HTTP status 500")
        })
    });
}

criterion_group!(benches, bench_render);
criterion_main!(benches);
