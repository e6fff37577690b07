//! Criterion benchmarks for payload parsing and normalization

use chrono::{TimeZone, Utc};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::{json, Value};
use std::hint::black_box;
use warstatus::services::{fetcher, filters, normalizer};
use warstatus::types::Endpoint;

/// Synthetic `/v1/planets` body with `count` entries
fn planets_payload(count: usize) -> Value {
    let planets: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "index": i,
                "name": format!("Planet {}", i),
                "sector": "Umlaut",
                "biome": {"name": "Desert", "description": "Dunes"},
                "hazards": [{"name": "Fire Tornadoes"}],
                "position": {"x": 0.1, "y": -0.2},
                "maxHealth": 1_000_000,
                "health": 400_000 + i,
                "currentOwner": if i % 3 == 0 { "Humans" } else { "Terminids" },
                "statistics": {"playerCount": i * 7, "missionsWon": i, "missionsLost": 1}
            })
        })
        .collect();
    Value::Array(planets)
}

/// Synthetic `/v1/dispatches` body mixing numeric and text types
fn dispatches_payload(count: usize) -> Value {
    let base = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    let items: Vec<Value> = (0..count)
        .map(|i| {
            let published = base - chrono::Duration::hours(i as i64);
            json!({
                "id": i,
                "type": if i % 2 == 0 { json!(0) } else { json!("Tactical") },
                "message": "<i=1>Helldivers</i>, hold the line.",
                "published": published.to_rfc3339(),
            })
        })
        .collect();
    json!({ "dispatches": items })
}

fn bench_parse_body(c: &mut Criterion) {
    let body = serde_json::to_vec(&planets_payload(262)).unwrap_or_default();

    let mut group = c.benchmark_group("fetcher");
    group.throughput(Throughput::Bytes(body.len() as u64));
    group.bench_function("parse_body_planets", |b| {
        b.iter(|| fetcher::parse_body(Endpoint::Planets, black_box(&body)));
    });
    group.finish();
}

fn bench_normalize_planets(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalizer");
    for count in [10usize, 262] {
        let payload = planets_payload(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("planets", count), &payload, |b, p| {
            b.iter(|| normalizer::planets(black_box(p)));
        });
    }
    group.finish();
}

fn bench_dispatch_pipeline(c: &mut Criterion) {
    let payload = dispatches_payload(200);
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();

    let mut group = c.benchmark_group("normalizer");
    group.throughput(Throughput::Elements(200));
    group.bench_function("dispatches_then_filter", |b| {
        b.iter(|| {
            let dispatches = normalizer::dispatches(black_box(&payload));
            filters::recent_dispatches(dispatches, now)
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_parse_body,
    bench_normalize_planets,
    bench_dispatch_pipeline
);
criterion_main!(benches);
