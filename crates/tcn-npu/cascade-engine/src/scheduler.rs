// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! Scanner / scheduler
//!
//! One sweep visits every node of a shard exactly once at the current tick.
//! Per node the state is one of:
//!
//! | State      | Condition                                   | Action                          |
//! |------------|---------------------------------------------|---------------------------------|
//! | Refractory | `now <= refractory_end`                     | no aggregation, opportunistic purge |
//! | Idle       | not refractory, `next_relevant_tick != now` | nothing due                     |
//! | Due        | not refractory, `next_relevant_tick == now` | aggregate, maybe cascade        |
//!
//! Every visit ends by folding the node's `next_relevant_tick` into the
//! sweep's [`NextTick`] tracker.

use crate::clock::NextTick;
use crate::params::CascadeParameters;
use crate::shard::Shard;
use std::sync::OnceLock;
use tcn_npu_neural::{classify_signal, NodeId, SignalPhase, Tick, WeightRule};
use tracing::{trace, warn};

/// Runtime-gated tracing config for cascades and aggregation.
/// Enable with:
/// - TCN_NPU_TRACE_CASCADE=1
///   Optional filter:
/// - TCN_NPU_TRACE_NODE=<u32 node_id>
struct CascadeTraceCfg {
    enabled: bool,
    node_filter: Option<u32>,
}

impl CascadeTraceCfg {
    #[inline(always)]
    fn wants(&self, id: NodeId) -> bool {
        self.enabled && self.node_filter.map_or(true, |n| n == id.0)
    }
}

fn cascade_trace_cfg() -> &'static CascadeTraceCfg {
    static CFG: OnceLock<CascadeTraceCfg> = OnceLock::new();
    CFG.get_or_init(|| {
        let enabled = std::env::var("TCN_NPU_TRACE_CASCADE")
            .ok()
            .as_deref()
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let node_filter = std::env::var("TCN_NPU_TRACE_NODE")
            .ok()
            .and_then(|v| v.parse().ok());

        CascadeTraceCfg {
            enabled,
            node_filter,
        }
    })
}

/// Read-only state shared by every shard during one sweep.
#[derive(Clone, Copy)]
pub struct SweepContext<'a> {
    pub now: Tick,
    pub params: &'a CascadeParameters,
    pub weights: &'a dyn WeightRule,
}

impl Shard {
    /// Visit every owned node once, in ascending id order.
    pub(crate) fn scan(&mut self, ctx: &SweepContext<'_>, next: &mut NextTick) {
        self.cascades.clear();
        for raw in self.nodes.id_range() {
            self.visit(NodeId(raw), ctx, next);
        }
    }

    fn visit(&mut self, id: NodeId, ctx: &SweepContext<'_>, next: &mut NextTick) {
        let now = ctx.now;
        let purge_threshold = ctx.params.purge_threshold;
        let node = self.nodes.get_mut(id);

        if node.is_refractory_at(now) {
            let overdue = matches!(node.next_relevant_tick, Some(t) if t <= now);
            if overdue || node.pending.len() > purge_threshold {
                self.purge(id, now);
            }
            next.tighten_opt(self.nodes.get(id).next_relevant_tick);
            return;
        }

        // First visit after refractory: drop whatever came due while suppressed
        if let Some(end) = node.refractory_end.take() {
            if !node.pending.is_empty() {
                self.purge(id, end);
            }
        }

        match self.nodes.get(id).next_relevant_tick {
            Some(t) if t == now => {
                let total = self.aggregate(id, ctx);
                if ctx.params.crosses_threshold(total) {
                    self.cascade(id, total, ctx, next);
                    return;
                }
            }
            Some(t) if t < now => {
                warn!(
                    target: "tcn-npu",
                    "[SCHEDULER] {} was due at tick {} but not evaluated (now {}); purging",
                    id,
                    t,
                    now
                );
                self.purge(id, now);
            }
            _ => {}
        }

        if self.nodes.get(id).pending.len() > purge_threshold {
            self.purge(id, now);
        }
        next.tighten_opt(self.nodes.get(id).next_relevant_tick);
    }

    /// Decayed sum of the node's in-window signals at `ctx.now`.
    ///
    /// Stale and expired entries are removed, future entries are kept and
    /// define the new `next_relevant_tick`. The total is computed in full
    /// before the threshold is compared, so pending-list order never matters.
    fn aggregate(&mut self, id: NodeId, ctx: &SweepContext<'_>) -> i64 {
        let now = ctx.now;
        let table = &ctx.params.decay;
        let Shard {
            nodes,
            store,
            stats,
            ..
        } = self;
        let node = nodes.get_mut(id);

        let mut total: i64 = 0;
        let mut upcoming = NextTick::INFINITE;
        node.pending.retain(|&slot| {
            let signal = store.get(slot);
            let Some(action_time) = signal.action_time_for(id) else {
                stats.stale_discarded += 1;
                return false;
            };
            match classify_signal(action_time, now, table) {
                SignalPhase::Future => {
                    upcoming.tighten(action_time);
                    true
                }
                SignalPhase::InWindow { distance } => {
                    total += table.scale(signal.amplitude, distance).unwrap_or(0);
                    true
                }
                SignalPhase::Expired => {
                    stats.expired_discarded += 1;
                    false
                }
            }
        });
        node.next_relevant_tick = upcoming.get();
        stats.nodes_evaluated += 1;

        if cascade_trace_cfg().wants(id) {
            trace!(
                target: "tcn-npu-trace",
                "[AGGREGATE] tick={} node={} total={} retained={} next={:?}",
                now,
                id.0,
                total,
                node.pending.len(),
                node.next_relevant_tick
            );
        }
        total
    }

    fn cascade(&mut self, id: NodeId, total: i64, ctx: &SweepContext<'_>, next: &mut NextTick) {
        let now = ctx.now;
        let emitted = self.generate_outgoing_signals(id, ctx, next);

        let refractory_end = now + ctx.params.refractory_width;
        self.nodes.get_mut(id).refractory_end = Some(refractory_end);
        self.purge(id, now);
        self.cascades.push(id);
        self.stats.cascades += 1;
        next.tighten_opt(self.nodes.get(id).next_relevant_tick);

        if cascade_trace_cfg().wants(id) {
            trace!(
                target: "tcn-npu-trace",
                "[CASCADE] tick={} node={} total={} emitted={} refractory_until={}",
                now,
                id.0,
                total,
                emitted,
                refractory_end
            );
        }
    }

    /// Remove every entry due at or before `cutoff` (and every stale entry),
    /// then recompute `next_relevant_tick` from what is left.
    pub(crate) fn purge(&mut self, id: NodeId, cutoff: Tick) {
        let Shard {
            nodes,
            store,
            stats,
            ..
        } = self;
        let node = nodes.get_mut(id);
        let before = node.pending.len();

        let mut upcoming = NextTick::INFINITE;
        node.pending
            .retain(|&slot| match store.get(slot).action_time_for(id) {
                Some(action_time) if action_time > cutoff => {
                    upcoming.tighten(action_time);
                    true
                }
                _ => false,
            });
        node.next_relevant_tick = upcoming.get();

        stats.purges += 1;
        stats.purged_entries += (before - node.pending.len()) as u64;
    }
}
