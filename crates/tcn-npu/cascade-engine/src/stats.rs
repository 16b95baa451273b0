// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Engine counters

use serde::Serialize;

/// Counters accumulated by the scanner and generator.
///
/// Each shard keeps its own copy; the engine merges them on request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EngineStats {
    /// Completed sweeps (engine level only)
    pub sweeps: u64,
    /// Due nodes whose window was aggregated
    pub nodes_evaluated: u64,
    pub cascades: u64,
    /// Cascade signals written into a signal store (counted by the receiving shard)
    pub signals_generated: u64,
    /// Signals dropped because the target was refractory at arrival
    pub signals_dropped_refractory: u64,
    /// Cascade signals routed to another shard through the outbox; each one is
    /// later counted as generated or dropped by the receiving shard
    pub signals_handed_off: u64,
    /// External stimuli accepted by `inject`
    pub stimuli_injected: u64,
    /// Pending entries whose slot had been reused by another node
    pub stale_discarded: u64,
    /// Pending entries older than the aggregation window
    pub expired_discarded: u64,
    pub purges: u64,
    /// Pending entries removed by purges
    pub purged_entries: u64,
}

impl EngineStats {
    pub fn merge(&mut self, other: &EngineStats) {
        self.sweeps += other.sweeps;
        self.nodes_evaluated += other.nodes_evaluated;
        self.cascades += other.cascades;
        self.signals_generated += other.signals_generated;
        self.signals_dropped_refractory += other.signals_dropped_refractory;
        self.signals_handed_off += other.signals_handed_off;
        self.stimuli_injected += other.stimuli_injected;
        self.stale_discarded += other.stale_discarded;
        self.expired_discarded += other.expired_discarded;
        self.purges += other.purges;
        self.purged_entries += other.purged_entries;
    }

    pub fn avg_cascades_per_sweep(&self) -> f64 {
        if self.sweeps == 0 {
            0.0
        } else {
            self.cascades as f64 / self.sweeps as f64
        }
    }

    pub fn avg_signals_per_cascade(&self) -> f64 {
        if self.cascades == 0 {
            0.0
        } else {
            (self.signals_generated + self.signals_dropped_refractory) as f64
                / self.cascades as f64
        }
    }
}

/// Signal-store allocation counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SignalStoreStats {
    pub allocations: u64,
    /// Times the cursor returned to slot 0
    pub wraps: u64,
    /// Allocations that replaced a signal still in flight
    pub live_overwrites: u64,
}

impl SignalStoreStats {
    pub fn merge(&mut self, other: &SignalStoreStats) {
        self.allocations += other.allocations;
        self.wraps += other.wraps;
        self.live_overwrites += other.live_overwrites;
    }
}
