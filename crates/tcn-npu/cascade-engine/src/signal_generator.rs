// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Signal generation and delivery
//!
//! A cascading node emits one signal per outgoing connection. Targets owned by
//! the same shard receive it immediately; targets owned by another shard get
//! it through the outbox at the sweep barrier. Either way the refractory
//! check runs against the target's state at delivery.

use crate::clock::NextTick;
use crate::scheduler::SweepContext;
use crate::shard::{HandOff, Shard};
use tcn_npu_neural::{NodeId, Signal, Tick};

impl Shard {
    /// Emit on every outgoing connection of `source`.
    ///
    /// Returns the number of signals written into this shard's store.
    pub(crate) fn generate_outgoing_signals(
        &mut self,
        source: NodeId,
        ctx: &SweepContext<'_>,
        next: &mut NextTick,
    ) -> usize {
        let now = ctx.now;
        let mut generated = 0;
        let outgoing = self.nodes.get(source).outgoing.len();

        for i in 0..outgoing {
            let id = self.nodes.get(source).outgoing[i];
            let position = self.connections.position(id).unwrap_or_else(|| {
                panic!(
                    "Invariant violation: {} listed by {} is not stored in shard {}",
                    id, source, self.index
                )
            });
            let connection = self.connections.at_mut(position);

            let handoff = HandOff {
                target: connection.target,
                action_time: connection.arrival_tick(now),
                source_connection: Some(id),
                amplitude: ctx.weights.emitted_amplitude(connection, now),
            };
            // Recorded even when the target drops the signal
            connection.last_signal_time = Some(now);
            ctx.weights.on_emit(connection, now);

            if self.nodes.contains(handoff.target) {
                if self.deliver(handoff, now, next) {
                    self.stats.signals_generated += 1;
                    generated += 1;
                }
            } else {
                self.outbox.push(handoff);
                self.stats.signals_handed_off += 1;
            }
        }
        generated
    }

    /// Write `handoff` into this shard's store and register it with the target.
    ///
    /// Returns `false` (a normal drop) when the target is still refractory at
    /// the arrival tick.
    pub(crate) fn deliver(&mut self, handoff: HandOff, now: Tick, next: &mut NextTick) -> bool {
        debug_assert!(handoff.action_time >= now, "delivery into the past");
        if !self.nodes.get(handoff.target).accepts_arrival(handoff.action_time) {
            self.stats.signals_dropped_refractory += 1;
            return false;
        }

        let (slot, reclaimed) = self.store.emit_reclaiming(
            Signal::new(
                handoff.action_time,
                handoff.target,
                handoff.source_connection,
                handoff.amplitude,
            ),
            now,
        );
        let target = self.nodes.get_mut(handoff.target);
        // A wrapped slot handed back to its previous owner may still be listed
        if reclaimed != Some(handoff.target) || !target.pending.contains(&slot) {
            target.pending.push(slot);
        }
        target.tighten_next_relevant(handoff.action_time);
        next.tighten(handoff.action_time);
        true
    }
}
