//! Benchmarks for the audio feature pipeline.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::f32::consts::PI;

use emoverse::audio::classifier::classify_features;
use emoverse::audio::mfcc::MfccExtractor;
use emoverse::audio::{MfccConfig, FEATURE_DIM};

fn tone(secs: f32) -> Vec<f32> {
    let n = (16000.0 * secs) as usize;
    (0..n)
        .map(|i| (2.0 * PI * 440.0 * i as f32 / 16000.0).sin() * 0.5)
        .collect()
}

fn bench_mfcc(c: &mut Criterion) {
    let samples = tone(3.0);
    let mut extractor = MfccExtractor::new(MfccConfig::default()).unwrap();

    c.bench_function("mfcc_mean_3s", |b| {
        b.iter(|| extractor.mean_features(black_box(&samples)).unwrap())
    });
}

fn bench_classify(c: &mut Criterion) {
    let features: Vec<f32> = (0..FEATURE_DIM).map(|i| (i as f32).sin()).collect();

    c.bench_function("classify_features", |b| {
        b.iter(|| classify_features(black_box(&features)).unwrap())
    });
}

criterion_group!(benches, bench_mfcc, bench_classify);
criterion_main!(benches);
