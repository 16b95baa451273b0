// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Passive aggregation unit
//!
//! Nodes hold no behaviour beyond small state queries. The scanner and the
//! signal generator are the only writers.

use super::ids::{ConnectionId, SignalSlot};
use super::Tick;

/// A node record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    /// Unordered signal-store slots targeting this node
    pub pending: Vec<SignalSlot>,
    /// Static list of owned outgoing connections
    pub outgoing: Vec<ConnectionId>,
    /// Last tick (inclusive) of the refractory period, `None` when not refractory
    pub refractory_end: Option<Tick>,
    /// Earliest action time among retained pending signals not yet due
    pub next_relevant_tick: Option<Tick>,
}

impl Node {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn is_refractory_at(&self, now: Tick) -> bool {
        matches!(self.refractory_end, Some(end) if now <= end)
    }

    /// A signal arriving at `arrival` is accepted only once refractory has ended.
    #[inline(always)]
    pub fn accepts_arrival(&self, arrival: Tick) -> bool {
        match self.refractory_end {
            Some(end) => arrival > end,
            None => true,
        }
    }

    /// Lower `next_relevant_tick` to `tick` if it is earlier.
    #[inline(always)]
    pub fn tighten_next_relevant(&mut self, tick: Tick) {
        self.next_relevant_tick = Some(match self.next_relevant_tick {
            Some(current) => current.min(tick),
            None => tick,
        });
    }

    #[inline]
    pub fn is_due_at(&self, now: Tick) -> bool {
        self.next_relevant_tick == Some(now)
    }
}
