// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Node-range partitioning
//!
//! Shard `i` owns node ids `bounds[i]..bounds[i + 1]`, every connection whose
//! source is in that range, and a slice of the signal capacity proportional to
//! its node count.

use crate::connection_pool::ConnectionPool;
use crate::error::{EngineError, Result};
use crate::node_pool::NodePool;
use crate::shard::Shard;
use crate::signal_store::SignalStore;
use crate::topology::Network;
use std::ops::Range;
use tcn_npu_neural::{Connection, ConnectionId, NeuralError, Node, NodeId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionPlan {
    bounds: Vec<u32>,
}

impl PartitionPlan {
    /// Split `node_count` nodes into `partitions` contiguous ranges whose
    /// sizes differ by at most one.
    pub fn even(node_count: usize, partitions: usize) -> Result<Self> {
        if partitions == 0 {
            return Err(EngineError::InvalidPartitioning(
                "at least one partition is required".to_string(),
            ));
        }
        if partitions > 1 && partitions > node_count {
            return Err(EngineError::InvalidPartitioning(format!(
                "{} partitions requested for {} nodes",
                partitions, node_count
            )));
        }
        let base = node_count / partitions;
        let extra = node_count % partitions;
        let sizes: Vec<usize> = (0..partitions)
            .map(|i| base + usize::from(i < extra))
            .collect();
        Self::from_sizes(&sizes)
    }

    /// Explicit range sizes, in node-id order.
    pub fn from_sizes(sizes: &[usize]) -> Result<Self> {
        if sizes.is_empty() {
            return Err(EngineError::InvalidPartitioning(
                "at least one partition is required".to_string(),
            ));
        }
        let mut bounds = Vec::with_capacity(sizes.len() + 1);
        let mut acc: u64 = 0;
        bounds.push(0);
        for &size in sizes {
            acc += size as u64;
            let bound = u32::try_from(acc).map_err(|_| {
                EngineError::InvalidPartitioning(format!("{} nodes exceed the id space", acc))
            })?;
            bounds.push(bound);
        }
        Ok(Self { bounds })
    }

    pub fn shard_count(&self) -> usize {
        self.bounds.len() - 1
    }

    pub fn node_count(&self) -> usize {
        self.bounds[self.bounds.len() - 1] as usize
    }

    pub fn range(&self, shard: usize) -> Range<u32> {
        self.bounds[shard]..self.bounds[shard + 1]
    }

    /// Shard owning `id`, or `None` for ids past the last node.
    #[inline]
    pub fn shard_of(&self, id: NodeId) -> Option<usize> {
        if id.0 as usize >= self.node_count() {
            return None;
        }
        Some(self.bounds.partition_point(|&b| b <= id.0) - 1)
    }
}

/// Signal slots for a shard owning `nodes` of `total` nodes, at least one.
fn shard_signal_capacity(signal_capacity: usize, nodes: usize, total: usize) -> usize {
    if total == 0 {
        return signal_capacity.max(1);
    }
    ((signal_capacity as u128 * nodes as u128) / total as u128).max(1) as usize
}

/// Move every node and connection of `network` into the shard that owns it.
pub(crate) fn split_network(
    network: Network,
    plan: &PartitionPlan,
    signal_capacity: usize,
) -> Result<Vec<Shard>> {
    if plan.node_count() != network.node_count() {
        return Err(EngineError::InvalidPartitioning(format!(
            "plan covers {} nodes, network has {}",
            plan.node_count(),
            network.node_count()
        )));
    }
    let Network { nodes, connections } = network;

    if plan.shard_count() == 1 {
        let store = SignalStore::new(signal_capacity)?;
        return Ok(vec![Shard::new(0, nodes, connections, store)]);
    }

    let total = nodes.len();
    let mut remaining = nodes.into_nodes().into_iter();
    let mut shards = Vec::with_capacity(plan.shard_count());

    for index in 0..plan.shard_count() {
        let range = plan.range(index);
        let block: Vec<Node> = remaining.by_ref().take(range.len()).collect();

        let mut owned = block
            .iter()
            .flat_map(|node| node.outgoing.iter().copied())
            .map(|id| {
                connections
                    .get(id)
                    .map(|connection| (id, *connection))
                    .ok_or(NeuralError::InvalidConnectionId {
                        id,
                        capacity: connections.len(),
                    })
            })
            .collect::<std::result::Result<Vec<(ConnectionId, Connection)>, NeuralError>>()?;
        owned.sort_unstable_by_key(|(id, _)| *id);

        let capacity = shard_signal_capacity(signal_capacity, block.len(), total);
        shards.push(Shard::new(
            index,
            NodePool::from_block(range.start, block),
            ConnectionPool::from_sorted(owned),
            SignalStore::new(capacity)?,
        ));
    }
    Ok(shards)
}
