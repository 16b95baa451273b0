// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! End-to-end propagation scenarios
//!
//! # Coverage
//! - Staggered signal trains below / above threshold
//! - Threshold equality
//! - Refractory drops (cross-node and self-loop)
//! - Strictly increasing sweep ticks and quiescence

use tcn_npu_cascade_engine::{CascadeEngine, CascadeParameters, Network, NetworkBuilder};
use tcn_npu_neural::{NodeId, Tick};

// ============================================================================
// Helper Functions
// ============================================================================

const A: NodeId = NodeId(0);
const B: NodeId = NodeId(1);

/// Five A -> B connections, temporal distances 1000 down to 996, 6000 each.
fn staggered_train() -> Network {
    let mut builder = NetworkBuilder::new(2, 5).unwrap();
    for distance in (996..=1000).rev() {
        builder.connect(A, B, distance, 6000, 0).unwrap();
    }
    builder.build()
}

fn engine(network: Network) -> CascadeEngine {
    CascadeEngine::new(network, CascadeParameters::default()).unwrap()
}

/// Sweep until quiescent, recording (tick, cascading nodes) for every sweep.
fn run_recording(engine: &mut CascadeEngine, max_sweeps: usize) -> Vec<(Tick, Vec<NodeId>)> {
    let mut trace = Vec::new();
    for _ in 0..max_sweeps {
        let report = engine.scan();
        trace.push((report.tick, engine.last_cascades().to_vec()));
        if engine.advance().unwrap().is_none() {
            break;
        }
    }
    trace
}

// ============================================================================
// Staggered trains
// ============================================================================

#[test]
fn test_staggered_train_stays_below_threshold() {
    let mut engine = engine(staggered_train());
    engine.inject(A, 12_000, 0).unwrap();

    let trace = run_recording(&mut engine, 32);
    let ticks: Vec<Tick> = trace.iter().map(|(t, _)| *t).collect();
    assert_eq!(ticks, vec![0, 996, 997, 998, 999, 1000]);
    assert_eq!(trace[0].1, vec![A]);
    assert!(trace[1..].iter().all(|(_, cascades)| cascades.is_empty()));

    assert!(engine.is_quiescent());
    assert_eq!(engine.stats().cascades, 1);
    assert_eq!(engine.stats().signals_generated, 5);
    // Every arrival is still inside B's window at tick 1000
    assert_eq!(engine.pending_signals(B).len(), 5);
}

#[test]
fn test_staggered_train_tipped_over_by_stimulus() {
    let mut engine = engine(staggered_train());
    engine.inject(A, 12_000, 0).unwrap();

    let summary = engine.run_until(999).unwrap();
    assert_eq!(summary.sweeps, 5);
    assert_eq!(engine.next_global_tick(), Some(1000));

    // 11625 from the train + 400 = 12025
    assert!(engine.inject(B, 400, 1000).unwrap());
    assert_eq!(engine.advance().unwrap(), Some(1000));
    let report = engine.scan();
    assert_eq!(report.tick, 1000);
    assert_eq!(report.next_tick, None);
    assert_eq!(engine.last_cascades(), &[B]);
    assert_eq!(engine.node(B).unwrap().refractory_end, Some(1005));
    assert!(engine.pending_signals(B).is_empty());
    assert!(engine.is_quiescent());
    assert_eq!(engine.stats().cascades, 2);
}

#[test]
fn test_stimulus_one_tick_late_does_not_tip() {
    let mut engine = engine(staggered_train());
    engine.inject(A, 12_000, 0).unwrap();
    engine.inject(B, 400, 1001).unwrap();

    engine.run_until_quiescent(32).unwrap();
    // At 1001: 400 + 6000/2 + 6000/4 + 6000/8 + 6000/16 + 6000/32 < 12000
    assert_eq!(engine.stats().cascades, 1);
}

// ============================================================================
// Thresholds
// ============================================================================

#[test]
fn test_threshold_is_inclusive() {
    let network = NetworkBuilder::new(2, 0).unwrap().build();
    let mut engine = engine(network);
    engine.inject(A, 12_000, 3).unwrap();
    engine.inject(B, 11_999, 3).unwrap();

    engine.run_until_quiescent(8).unwrap();
    assert_eq!(engine.last_cascades(), &[A]);
    assert_eq!(engine.current_tick(), 3);
}

#[test]
fn test_same_tick_signals_superpose() {
    let network = NetworkBuilder::new(1, 0).unwrap().build();
    let mut engine = engine(network);
    for _ in 0..4 {
        engine.inject(A, 3000, 7).unwrap();
    }
    engine.run_until_quiescent(8).unwrap();
    assert_eq!(engine.stats().cascades, 1);
}

// ============================================================================
// Refractory behaviour
// ============================================================================

#[test]
fn test_signal_into_refractory_window_dropped() {
    // 0 -> 1 (d=1), 0 -> 2 (d=3), 2 -> 1 (d=1)
    let mut builder = NetworkBuilder::new(3, 3).unwrap();
    builder.connect(NodeId(0), NodeId(1), 1, 12_000, 0).unwrap();
    builder.connect(NodeId(0), NodeId(2), 3, 12_000, 0).unwrap();
    builder.connect(NodeId(2), NodeId(1), 1, 12_000, 0).unwrap();
    let mut engine = engine(builder.build());
    engine.inject(NodeId(0), 12_000, 0).unwrap();

    let trace = run_recording(&mut engine, 16);
    assert_eq!(
        trace,
        vec![
            (0, vec![NodeId(0)]),
            (1, vec![NodeId(1)]),
            (3, vec![NodeId(2)]),
        ]
    );
    // Arrival at 4 <= refractory end 6
    assert_eq!(engine.stats().signals_dropped_refractory, 1);
    assert!(engine.node(NodeId(1)).unwrap().pending.is_empty());
}

#[test]
fn test_self_loop_silenced_by_refractory() {
    let mut builder = NetworkBuilder::new(1, 1).unwrap();
    builder.connect(A, A, 1, 12_000, 0).unwrap();
    let mut engine = engine(builder.build());
    engine.inject(A, 12_000, 0).unwrap();

    let summary = engine.run_until_quiescent(32).unwrap();
    assert!(summary.quiescent);
    assert_eq!(summary.cascades, 1);
}

#[test]
fn test_self_loop_oscillates_without_refractory() {
    let mut builder = NetworkBuilder::new(1, 1).unwrap();
    builder.connect(A, A, 1, 12_000, 0).unwrap();
    let params = CascadeParameters {
        refractory_width: 0,
        ..Default::default()
    };
    let mut engine = CascadeEngine::new(builder.build(), params).unwrap();
    engine.inject(A, 12_000, 0).unwrap();

    let summary = engine.run_until(10).unwrap();
    assert_eq!(summary.sweeps, 11);
    assert_eq!(summary.cascades, 11);
    assert!(!summary.quiescent);
}

// ============================================================================
// Clock
// ============================================================================

#[test]
fn test_sweep_ticks_strictly_increase() {
    let mut builder = NetworkBuilder::new(8, 16).unwrap();
    for i in 0..8u32 {
        builder
            .connect(NodeId(i), NodeId((i + 1) % 8), 1 + i % 3, 12_000, 0)
            .unwrap();
        builder
            .connect(NodeId(i), NodeId((i + 3) % 8), 7, 6000, 0)
            .unwrap();
    }
    let mut engine = engine(builder.build());
    engine.inject(NodeId(0), 12_000, 0).unwrap();
    engine.inject(NodeId(5), 12_000, 2).unwrap();

    let trace = run_recording(&mut engine, 200);
    assert!(trace.windows(2).all(|w| w[0].0 < w[1].0));
    assert!(trace.iter().any(|(_, c)| !c.is_empty()));
}

#[test]
fn test_quiescent_engine_stays_put() {
    let network = NetworkBuilder::new(3, 0).unwrap().build();
    let mut engine = engine(network);
    engine.scan();
    assert!(engine.is_quiescent());
    assert_eq!(engine.advance().unwrap(), None);
    assert_eq!(engine.current_tick(), 0);

    // New work after quiescence restarts the clock
    engine.inject(NodeId(2), 12_000, 40).unwrap();
    assert_eq!(engine.advance().unwrap(), Some(40));
    engine.scan();
    assert_eq!(engine.last_cascades(), &[NodeId(2)]);
}
