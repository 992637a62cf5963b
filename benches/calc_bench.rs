//! Benchmarks for the ColdCloud calculators and history
//!
//! Run with: cargo bench

use coldcloud::calc::*;
use coldcloud::storage::{FileStore, MemoryStore, SharedStore};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;
use tempfile::tempdir;

fn bench_formulas(c: &mut Criterion) {
    let mut group = c.benchmark_group("formulas");

    let cooling = CoolingLoadInput::new(6.0, 5.0, 3.0)
        .room_type(RoomType::Living)
        .occupants(4)
        .climate(Climate::Hot)
        .sun_exposure(SunExposure::High);
    group.bench_function("cooling_load", |b| {
        b.iter(|| cooling_load(black_box(&cooling)).unwrap())
    });

    let round = DuctInput::round(1000.0);
    group.bench_function("duct_round", |b| {
        b.iter(|| duct_size(black_box(&round)).unwrap())
    });

    let rect = DuctInput::rectangular(2400.0).aspect_ratio(2.0);
    group.bench_function("duct_rectangular", |b| {
        b.iter(|| duct_size(black_box(&rect)).unwrap())
    });

    let energy = EnergyInput {
        capacity_tons: 3.0,
        efficiency: 11.0,
        rate_per_kwh: 0.18,
        hours_per_day: Some(10.0),
        climate: Climate::Hot,
    };
    group.bench_function("energy_cost", |b| {
        b.iter(|| energy_cost(black_box(&energy)).unwrap())
    });

    group.finish();
}

fn bench_history(c: &mut Criterion) {
    let mut group = c.benchmark_group("history");
    let input = CoolingLoadInput::new(5.0, 4.0, 3.0);

    for size in [10, 100, 1000] {
        let engine = CalculationEngine::new(MemoryStore::shared());
        for _ in 0..size {
            engine.cooling_load(&input).unwrap();
        }

        group.bench_with_input(BenchmarkId::new("recent", size), &engine, |b, engine| {
            b.iter(|| engine.history().recent(black_box(CalculationKind::Btu)).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("export_csv", size), &engine, |b, engine| {
            b.iter(|| engine.history().export(black_box(ExportFormat::Csv)).unwrap())
        });
    }

    group.bench_function("record_file_store", |b| {
        let dir = tempdir().unwrap();
        let store: SharedStore = Arc::new(FileStore::open(dir.path()).unwrap());
        let engine = CalculationEngine::new(store);

        b.iter(|| {
            engine.history().clear().unwrap();
            engine.cooling_load(black_box(&input)).unwrap()
        });
    });

    group.finish();
}

criterion_group!(benches, bench_formulas, bench_history);
criterion_main!(benches);
