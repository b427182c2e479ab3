use std::hint::black_box;
use std::time::Duration;

use criterion::{Criterion, criterion_group, criterion_main};
use lyric_sync::{ParsingOptions, active_indices, parse_ttml};

const SAMPLE_TTML: &str = include_str!("../tests/test_data/real_world.ttml");

fn benchmark_parse_ttml(c: &mut Criterion) {
    let mut group = c.benchmark_group("TTML Parsing");

    group.measurement_time(Duration::from_secs(20));
    group.sample_size(200);

    let default_options = ParsingOptions::default();

    group.bench_function("parse_normal_ttml", |b| {
        b.iter(|| {
            let document = parse_ttml(black_box(SAMPLE_TTML), black_box(&default_options))
                .expect("样本解析失败");

            black_box(document);
        });
    });

    group.finish();
}

fn benchmark_active_indices(c: &mut Criterion) {
    let document = parse_ttml(SAMPLE_TTML, &ParsingOptions::default()).expect("样本解析失败");

    c.bench_function("active_indices_per_frame", |b| {
        b.iter(|| {
            // 模拟 60 FPS 播放 10 秒
            for frame in 0..600 {
                let time = f64::from(frame) / 60.0;
                black_box(active_indices(black_box(document.lines()), time));
            }
        });
    });
}

criterion_group!(benches, benchmark_parse_ttml, benchmark_active_indices);

criterion_main!(benches);
