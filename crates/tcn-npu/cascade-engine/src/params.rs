// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Global propagation parameters

use tcn_npu_neural::{DecayTable, NeuralError};

/// Default cascade threshold (scaled integer units).
pub const DEFAULT_CASCADE_THRESHOLD: i64 = 12_000;
/// Default refractory width in ticks.
pub const DEFAULT_REFRACTORY_WIDTH: u64 = 5;
/// Default aggregation window, the window of `DecayTable::default()`.
pub const DEFAULT_AGGREGATION_WINDOW: u32 = 5;
/// Pending-list length above which a node is purged on any visit.
pub const DEFAULT_PURGE_THRESHOLD: usize = 32;

/// Parameters shared by every node in the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeParameters {
    /// Aggregate at or above this value triggers a cascade
    pub cascade_threshold: i64,
    /// A cascade at `t` makes the node refractory through `t + refractory_width`
    pub refractory_width: u64,
    /// Per-distance divisors; also fixes the aggregation window
    pub decay: DecayTable,
    /// Pending-list length that forces a purge
    pub purge_threshold: usize,
}

impl CascadeParameters {
    pub fn new(
        cascade_threshold: i64,
        refractory_width: u64,
        decay: DecayTable,
        purge_threshold: usize,
    ) -> Result<Self, NeuralError> {
        if cascade_threshold <= 0 {
            return Err(NeuralError::InvalidParameter {
                name: "cascade_threshold",
                reason: format!("must be positive, got {}", cascade_threshold),
            });
        }
        Ok(Self {
            cascade_threshold,
            refractory_width,
            decay,
            purge_threshold,
        })
    }

    #[inline]
    pub fn aggregation_window(&self) -> u32 {
        self.decay.window()
    }

    #[inline(always)]
    pub fn crosses_threshold(&self, total: i64) -> bool {
        total >= self.cascade_threshold
    }
}

impl Default for CascadeParameters {
    fn default() -> Self {
        Self {
            cascade_threshold: DEFAULT_CASCADE_THRESHOLD,
            refractory_width: DEFAULT_REFRACTORY_WIDTH,
            decay: DecayTable::default(),
            purge_threshold: DEFAULT_PURGE_THRESHOLD,
        }
    }
}
