// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Directed, weighted, delayed link owned by its source node

use core::num::NonZeroU32;

use super::error::{NeuralError, Result};
use super::ids::NodeId;
use super::Tick;

/// A single connection (compact representation)
///
/// The target node never reads or writes this record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Connection {
    pub target: NodeId,
    /// Ticks from source cascade to arrival at the target (never zero)
    pub temporal_distance: NonZeroU32,
    /// Tick of the most recent cascade that engaged this connection
    pub last_signal_time: Option<Tick>,
    pub short_term_weight: i32,
    pub long_term_weight: i32,
}

impl Connection {
    pub fn new(
        target: NodeId,
        temporal_distance: u32,
        short_term_weight: i32,
        long_term_weight: i32,
    ) -> Result<Self> {
        let temporal_distance =
            NonZeroU32::new(temporal_distance).ok_or(NeuralError::ZeroTemporalDistance)?;
        Ok(Self {
            target,
            temporal_distance,
            last_signal_time: None,
            short_term_weight,
            long_term_weight,
        })
    }

    /// Absolute arrival tick for a cascade at `now`. Always strictly after `now`.
    #[inline(always)]
    pub fn arrival_tick(&self, now: Tick) -> Tick {
        now + u64::from(self.temporal_distance.get())
    }

    /// Sum of the additive weight terms.
    #[inline(always)]
    pub fn combined_weight(&self) -> i32 {
        self.short_term_weight.saturating_add(self.long_term_weight)
    }
}
