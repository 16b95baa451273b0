// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Sweep microbenchmarks
//!
//! Purpose:
//! - Track the cost of one scan + advance over networks with steady activity.
//! - Compare single-shard sweeps with partitioned parallel sweeps.
//!
//! Notes:
//! - Keep runtime low (CI runners are noisy and slower).
//! - Fixed topology and stimuli, no I/O.

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tcn_npu_cascade_engine::{
    CascadeEngine, CascadeParameters, EngineOptions, ExecutionMode, NetworkBuilder,
};
use tcn_npu_neural::{windowed_sum, DecayTable, NodeId};

/// Ring with one strong forward link and `fan_out - 1` weak links per node.
/// Waves injected every `spacing` nodes circulate forever.
fn create_ring_engine(
    node_count: usize,
    fan_out: usize,
    partitions: usize,
    execution: ExecutionMode,
) -> CascadeEngine {
    let n = node_count as u32;
    let mut builder = NetworkBuilder::new(node_count, node_count * fan_out).unwrap();
    for i in 0..n {
        builder.connect(NodeId(i), NodeId((i + 1) % n), 1, 12_000, 0).unwrap();
        for k in 1..fan_out as u32 {
            let target = (i + k * 31 + 7) % n;
            builder
                .connect(NodeId(i), NodeId(target), 1 + k % 6, 2_000, 0)
                .unwrap();
        }
    }
    let network = builder.build();
    let options = EngineOptions::for_network(&network).with_partitions(partitions, execution);
    let mut engine =
        CascadeEngine::with_options(network, CascadeParameters::default(), options).unwrap();

    let spacing = 16;
    for i in (0..n).step_by(spacing) {
        engine.inject(NodeId(i), 12_000, 0).unwrap();
    }
    engine
}

fn bench_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("sweep");
    group.measurement_time(Duration::from_secs(3));
    group.warm_up_time(Duration::from_secs(1));
    group.sample_size(30);

    for &node_count in &[1_000usize, 10_000] {
        group.throughput(Throughput::Elements(node_count as u64));

        let mut engine = create_ring_engine(node_count, 4, 1, ExecutionMode::Sequential);
        group.bench_with_input(
            BenchmarkId::new("single_shard", node_count),
            &node_count,
            |b, _| {
                b.iter(|| {
                    let report = engine.step().unwrap();
                    black_box(report.cascades)
                })
            },
        );

        let mut engine = create_ring_engine(node_count, 4, 4, ExecutionMode::Parallel);
        group.bench_with_input(
            BenchmarkId::new("four_shards_parallel", node_count),
            &node_count,
            |b, _| {
                b.iter(|| {
                    let report = engine.step().unwrap();
                    black_box(report.cascades)
                })
            },
        );
    }
    group.finish();
}

fn bench_windowed_sum(c: &mut Criterion) {
    let table = DecayTable::default();
    let signals: Vec<(u64, i32)> = (0..32).map(|i| (990 + (i % 12) as u64, 6_000)).collect();

    c.bench_function("windowed_sum_32", |b| {
        b.iter(|| windowed_sum(black_box(1_000), &table, signals.iter().copied()))
    });
}

criterion_group!(benches, bench_sweep, bench_windowed_sum);
criterion_main!(benches);
