// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! Cascade engine
//!
//! Owns the shards, the global clock and the propagation parameters, and
//! drives the scan / barrier / advance cycle:
//!
//! 1. every shard sweeps its nodes at the current tick (in parallel when
//!    partitioned and [`ExecutionMode::Parallel`] is selected)
//! 2. barrier: per-shard next-tick trackers are folded into the clock and
//!    outboxes are delivered in (source shard, emission) order
//! 3. the clock jumps to the earliest upcoming tick, or reports quiescence

use crate::clock::{GlobalClock, NextTick};
use crate::error::{EngineError, Result};
use crate::params::CascadeParameters;
use crate::partition::{split_network, PartitionPlan};
use crate::scheduler::SweepContext;
use crate::shard::{HandOff, Shard};
use crate::stats::{EngineStats, SignalStoreStats};
use crate::topology::Network;
use rayon::prelude::*;
use tcn_npu_neural::{
    Connection, ConnectionId, NeuralError, Node, NodeId, PassThroughWeights, Signal, Tick,
    WeightRule,
};
use tracing::{debug, info};

/// How shards are swept within one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExecutionMode {
    /// One shard after another on the calling thread
    #[default]
    Sequential,
    /// Shards swept concurrently on the rayon pool
    Parallel,
}

/// Sizing and execution options fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    pub signal_capacity: usize,
    pub partitions: usize,
    pub execution: ExecutionMode,
    pub start_tick: Tick,
}

impl EngineOptions {
    /// Default signal slots per node.
    pub const SIGNALS_PER_NODE: usize = 10;

    pub fn for_network(network: &Network) -> Self {
        Self {
            signal_capacity: (network.node_count() * Self::SIGNALS_PER_NODE).max(1),
            partitions: 1,
            execution: ExecutionMode::Sequential,
            start_tick: 0,
        }
    }

    pub fn with_signal_capacity(mut self, signal_capacity: usize) -> Self {
        self.signal_capacity = signal_capacity;
        self
    }

    pub fn with_partitions(mut self, partitions: usize, execution: ExecutionMode) -> Self {
        self.partitions = partitions;
        self.execution = execution;
        self
    }

    pub fn with_start_tick(mut self, start_tick: Tick) -> Self {
        self.start_tick = start_tick;
        self
    }
}

/// Outcome of one sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    pub tick: Tick,
    pub cascades: usize,
    /// Earliest upcoming tick after the sweep, `None` if quiescent
    pub next_tick: Option<Tick>,
}

/// Outcome of a multi-sweep run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub sweeps: u64,
    pub cascades: u64,
    pub first_tick: Option<Tick>,
    pub final_tick: Tick,
    /// Run ended because nothing was left to process
    pub quiescent: bool,
}

impl RunSummary {
    fn record(&mut self, report: &SweepReport) {
        self.sweeps += 1;
        self.cascades += report.cascades as u64;
        self.first_tick.get_or_insert(report.tick);
    }
}

pub struct CascadeEngine {
    shards: Vec<Shard>,
    plan: PartitionPlan,
    clock: GlobalClock,
    params: CascadeParameters,
    weights: Box<dyn WeightRule>,
    execution: ExecutionMode,
    last_cascades: Vec<NodeId>,
    sweeps: u64,
}

impl CascadeEngine {
    /// Single-shard engine with default sizing.
    pub fn new(network: Network, params: CascadeParameters) -> Result<Self> {
        let options = EngineOptions::for_network(&network);
        Self::with_options(network, params, options)
    }

    pub fn with_options(
        network: Network,
        params: CascadeParameters,
        options: EngineOptions,
    ) -> Result<Self> {
        let node_count = network.node_count();
        let connection_count = network.connection_count();
        let plan = PartitionPlan::even(node_count, options.partitions)?;
        let shards = split_network(network, &plan, options.signal_capacity)?;

        info!(
            target: "tcn-npu",
            "[ENGINE] Initialized: {} nodes, {} connections, {} shard(s) ({:?}), \
             signal capacity {}, threshold {}, refractory {}, window {}",
            node_count,
            connection_count,
            shards.len(),
            options.execution,
            options.signal_capacity,
            params.cascade_threshold,
            params.refractory_width,
            params.aggregation_window()
        );

        Ok(Self {
            shards,
            plan,
            clock: GlobalClock::new(options.start_tick),
            params,
            weights: Box::new(PassThroughWeights),
            execution: options.execution,
            last_cascades: Vec::new(),
            sweeps: 0,
        })
    }

    /// Replace the emitted-amplitude rule.
    pub fn with_weight_rule(mut self, weights: Box<dyn WeightRule>) -> Self {
        debug!(target: "tcn-npu", "[ENGINE] Weight rule: {}", weights.name());
        self.weights = weights;
        self
    }

    /// Schedule an external stimulus for `target` at `at_tick`.
    ///
    /// Allowed for any tick not yet swept. Returns `Ok(false)` when the target
    /// is refractory at `at_tick` and the stimulus is dropped.
    pub fn inject(&mut self, target: NodeId, amplitude: i32, at_tick: Tick) -> Result<bool> {
        let current = self.clock.current();
        if at_tick < current || (at_tick == current && self.clock.is_swept()) {
            return Err(EngineError::InjectionInPast {
                tick: at_tick,
                current,
            });
        }
        let index = self
            .plan
            .shard_of(target)
            .ok_or(NeuralError::InvalidNodeId {
                id: target,
                capacity: self.plan.node_count(),
            })?;

        let handoff = HandOff {
            target,
            action_time: at_tick,
            source_connection: None,
            amplitude,
        };
        let shard = &mut self.shards[index];
        let accepted = shard.deliver(handoff, current, self.clock.tracker_mut());
        if accepted {
            shard.stats.stimuli_injected += 1;
        }
        Ok(accepted)
    }

    /// Sweep every node once at the current tick.
    pub fn scan(&mut self) -> SweepReport {
        let now = self.clock.current();
        self.clock.begin_sweep();

        let ctx = SweepContext {
            now,
            params: &self.params,
            weights: self.weights.as_ref(),
        };
        let shard_next: Vec<NextTick> = match self.execution {
            ExecutionMode::Parallel if self.shards.len() > 1 => self
                .shards
                .par_iter_mut()
                .map(|shard| sweep_shard(shard, &ctx))
                .collect(),
            _ => self
                .shards
                .iter_mut()
                .map(|shard| sweep_shard(shard, &ctx))
                .collect(),
        };

        // Barrier: every shard has finished this tick
        for next in shard_next {
            self.clock.absorb(next);
        }
        self.exchange_hand_offs(now);

        self.last_cascades.clear();
        for shard in &self.shards {
            self.last_cascades.extend_from_slice(&shard.cascades);
        }
        self.clock.finish_sweep();
        self.sweeps += 1;

        let report = SweepReport {
            tick: now,
            cascades: self.last_cascades.len(),
            next_tick: self.clock.next_global(),
        };
        debug!(
            target: "tcn-npu",
            "[SWEEP] tick={} cascades={} next={:?}",
            report.tick,
            report.cascades,
            report.next_tick
        );
        report
    }

    /// Deliver every outbox, source shards in index order, each in emission order.
    fn exchange_hand_offs(&mut self, now: Tick) {
        for source in 0..self.shards.len() {
            if self.shards[source].outbox.is_empty() {
                continue;
            }
            let mut outbox = std::mem::take(&mut self.shards[source].outbox);
            for handoff in outbox.drain(..) {
                let dest = self.plan.shard_of(handoff.target).unwrap_or_else(|| {
                    panic!(
                        "Invariant violation: hand-off for unknown {} from shard {}",
                        handoff.target, source
                    )
                });
                let shard = &mut self.shards[dest];
                if shard.deliver(handoff, now, self.clock.tracker_mut()) {
                    shard.stats.signals_generated += 1;
                }
            }
            // Keep the allocation for the next sweep
            self.shards[source].outbox = outbox;
        }
    }

    /// Move the clock to the earliest upcoming tick.
    ///
    /// `Ok(None)` means the network is quiescent and the clock did not move.
    pub fn advance(&mut self) -> Result<Option<Tick>> {
        self.clock.advance()
    }

    /// Sweep the current tick, then advance.
    pub fn step(&mut self) -> Result<SweepReport> {
        let report = self.scan();
        self.advance()?;
        Ok(report)
    }

    /// Sweep every scheduled tick up to and including `last_tick`.
    pub fn run_until(&mut self, last_tick: Tick) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        while self.clock.current() <= last_tick {
            if !self.clock.is_swept() {
                let report = self.scan();
                summary.record(&report);
            }
            match self.clock.next_global() {
                Some(next) if next <= last_tick => {
                    self.clock.advance()?;
                }
                Some(_) => break,
                None => {
                    summary.quiescent = true;
                    break;
                }
            }
        }
        summary.final_tick = self.clock.current();
        self.log_run("run_until", &summary);
        Ok(summary)
    }

    /// Sweep until nothing is scheduled, or `max_sweeps` sweeps have run.
    pub fn run_until_quiescent(&mut self, max_sweeps: u64) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        loop {
            if !self.clock.is_swept() {
                if summary.sweeps >= max_sweeps {
                    break;
                }
                let report = self.scan();
                summary.record(&report);
            }
            if self.clock.advance()?.is_none() {
                summary.quiescent = true;
                break;
            }
        }
        summary.final_tick = self.clock.current();
        self.log_run("run_until_quiescent", &summary);
        Ok(summary)
    }

    fn log_run(&self, mode: &str, summary: &RunSummary) {
        info!(
            target: "tcn-npu",
            "[ENGINE] {} finished: {} sweeps, {} cascades, ticks {:?}..={}, quiescent={}",
            mode,
            summary.sweeps,
            summary.cascades,
            summary.first_tick,
            summary.final_tick,
            summary.quiescent
        );
    }

    // ---------------------------------------------------------------------
    // Inspection
    // ---------------------------------------------------------------------

    pub fn current_tick(&self) -> Tick {
        self.clock.current()
    }

    pub fn next_global_tick(&self) -> Option<Tick> {
        self.clock.next_global()
    }

    pub fn is_quiescent(&self) -> bool {
        self.clock.is_quiescent()
    }

    /// Nodes that cascaded in the last sweep, ascending by id.
    pub fn last_cascades(&self) -> &[NodeId] {
        &self.last_cascades
    }

    pub fn parameters(&self) -> &CascadeParameters {
        &self.params
    }

    pub fn weight_rule_name(&self) -> &'static str {
        self.weights.name()
    }

    pub fn execution_mode(&self) -> ExecutionMode {
        self.execution
    }

    pub fn partition_plan(&self) -> &PartitionPlan {
        &self.plan
    }

    pub fn shards(&self) -> &[Shard] {
        &self.shards
    }

    pub fn node_count(&self) -> usize {
        self.plan.node_count()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.plan
            .shard_of(id)
            .and_then(|index| self.shards[index].nodes.try_get(id))
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.shards
            .iter()
            .find_map(|shard| shard.connections.get(id))
    }

    /// Valid (owner-checked) pending signals of `id`.
    pub fn pending_signals(&self, id: NodeId) -> Vec<Signal> {
        self.plan
            .shard_of(id)
            .map(|index| self.shards[index].pending_signals(id))
            .unwrap_or_default()
    }

    /// Counters merged across shards.
    pub fn stats(&self) -> EngineStats {
        let mut total = EngineStats::default();
        for shard in &self.shards {
            total.merge(&shard.stats);
        }
        total.sweeps = self.sweeps;
        total
    }

    pub fn signal_store_stats(&self) -> SignalStoreStats {
        let mut total = SignalStoreStats::default();
        for shard in &self.shards {
            total.merge(&shard.store.stats());
        }
        total
    }
}

fn sweep_shard(shard: &mut Shard, ctx: &SweepContext<'_>) -> NextTick {
    let mut next = NextTick::INFINITE;
    shard.scan(ctx, &mut next);
    next
}

impl std::fmt::Debug for CascadeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CascadeEngine")
            .field("clock", &self.clock)
            .field("shards", &self.shards.len())
            .field("execution", &self.execution)
            .field("params", &self.params)
            .field("weights", &self.weights.name())
            .finish()
    }
}
