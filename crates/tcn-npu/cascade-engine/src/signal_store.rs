// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! Fixed-capacity signal store with a wrapping cursor
//!
//! Slots are never freed. Allocation hands out the slot under the cursor and
//! advances it modulo capacity, so a slot can be reused while a node still
//! lists it as pending. Readers must go through [`SignalStore::read_for`] (or
//! [`Signal::action_time_for`]) so reused slots are recognised as stale.

use crate::stats::SignalStoreStats;
use tcn_npu_neural::{NeuralError, NodeId, Signal, SignalSlot, Tick};
use tracing::warn;

pub struct SignalStore {
    slots: Vec<Signal>,
    cursor: usize,
    stats: SignalStoreStats,
}

impl SignalStore {
    /// Create a store with `capacity` empty slots.
    pub fn new(capacity: usize) -> Result<Self, NeuralError> {
        if capacity == 0 || capacity > u32::MAX as usize {
            return Err(NeuralError::InvalidParameter {
                name: "signal_capacity",
                reason: format!("must be in 1..={}, got {}", u32::MAX, capacity),
            });
        }
        Ok(Self {
            slots: vec![Signal::EMPTY; capacity],
            cursor: 0,
            stats: SignalStoreStats::default(),
        })
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Slot the next allocation will return.
    #[inline]
    pub fn cursor(&self) -> SignalSlot {
        SignalSlot(self.cursor as u32)
    }

    /// Reserve the slot under the cursor and advance it.
    ///
    /// The first call returns slot 0; call `capacity + 1` returns slot 0 again.
    #[inline]
    pub fn allocate(&mut self) -> SignalSlot {
        let slot = SignalSlot(self.cursor as u32);
        self.cursor += 1;
        if self.cursor == self.slots.len() {
            self.cursor = 0;
            self.stats.wraps += 1;
        }
        self.stats.allocations += 1;
        slot
    }

    /// Allocate a slot and write `signal` into it.
    ///
    /// If the previous content was still in flight at `now`, that signal is
    /// lost. This is counted, and logged once per store.
    pub fn emit(&mut self, signal: Signal, now: Tick) -> SignalSlot {
        self.emit_reclaiming(signal, now).0
    }

    /// [`Self::emit`], also returning the owner of the overwritten content.
    ///
    /// When that owner is the new signal's owner, the slot may already sit in
    /// its pending list and must not be listed twice.
    pub fn emit_reclaiming(&mut self, signal: Signal, now: Tick) -> (SignalSlot, Option<NodeId>) {
        let slot = self.allocate();
        let capacity = self.slots.len();
        let previous = &mut self.slots[slot.index()];
        if matches!(previous.action_time, Some(t) if t > now) {
            self.stats.live_overwrites += 1;
            if self.stats.live_overwrites == 1 {
                warn!(
                    target: "tcn-npu",
                    "[SIGNAL-STORE] Capacity {} too small: {} overwritten while in flight \
                     (owner {:?}, due {:?}, now {})",
                    capacity,
                    slot,
                    previous.owner,
                    previous.action_time,
                    now
                );
            }
        }
        let reclaimed = std::mem::replace(previous, signal).owner;
        (slot, reclaimed)
    }

    /// Raw slot content, without the owner check.
    ///
    /// Panics if `slot` is outside the store.
    #[inline(always)]
    pub fn get(&self, slot: SignalSlot) -> &Signal {
        &self.slots[slot.index()]
    }

    /// Slot content if it still belongs to `reader`.
    #[inline]
    pub fn read_for(&self, slot: SignalSlot, reader: NodeId) -> Option<&Signal> {
        self.slots
            .get(slot.index())
            .filter(|signal| !signal.is_empty() && signal.is_owned_by(reader))
    }

    pub fn stats(&self) -> SignalStoreStats {
        self.stats
    }
}

impl std::fmt::Debug for SignalStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalStore")
            .field("capacity", &self.slots.len())
            .field("cursor", &self.cursor)
            .field("stats", &self.stats)
            .finish()
    }
}
