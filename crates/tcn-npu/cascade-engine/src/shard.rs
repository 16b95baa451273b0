// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Shard: the unit of storage and sweeping
//!
//! A shard owns a contiguous block of nodes, every connection leaving those
//! nodes, and a private signal store. The reference engine runs a single
//! shard; the partitioned engine runs several side by side and exchanges
//! cross-shard signals through each shard's outbox at the sweep barrier.

use crate::connection_pool::ConnectionPool;
use crate::node_pool::NodePool;
use crate::signal_store::SignalStore;
use crate::stats::EngineStats;
use tcn_npu_neural::{ConnectionId, NodeId, Signal, Tick};

/// A signal bound for a node, not yet written into any store.
///
/// Used for cross-shard delivery and for external stimuli.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandOff {
    pub target: NodeId,
    pub action_time: Tick,
    /// `None` for injected stimuli
    pub source_connection: Option<ConnectionId>,
    pub amplitude: i32,
}

#[derive(Debug)]
pub struct Shard {
    pub(crate) index: usize,
    pub(crate) nodes: NodePool,
    pub(crate) connections: ConnectionPool,
    pub(crate) store: SignalStore,
    /// Nodes that cascaded during the last sweep, in scan order
    pub(crate) cascades: Vec<NodeId>,
    /// Signals for nodes owned by other shards, in emission order
    pub(crate) outbox: Vec<HandOff>,
    pub(crate) stats: EngineStats,
}

impl Shard {
    pub(crate) fn new(
        index: usize,
        nodes: NodePool,
        connections: ConnectionPool,
        store: SignalStore,
    ) -> Self {
        Self {
            index,
            nodes,
            connections,
            store,
            cascades: Vec::new(),
            outbox: Vec::new(),
            stats: EngineStats::default(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn nodes(&self) -> &NodePool {
        &self.nodes
    }

    pub fn connections(&self) -> &ConnectionPool {
        &self.connections
    }

    pub fn signal_store(&self) -> &SignalStore {
        &self.store
    }

    pub fn last_cascades(&self) -> &[NodeId] {
        &self.cascades
    }

    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    /// Signals still listed for `id` whose slot content belongs to it.
    pub fn pending_signals(&self, id: NodeId) -> Vec<Signal> {
        self.nodes
            .try_get(id)
            .map(|node| {
                node.pending
                    .iter()
                    .filter_map(|&slot| self.store.read_for(slot, id).copied())
                    .collect()
            })
            .unwrap_or_default()
    }
}
