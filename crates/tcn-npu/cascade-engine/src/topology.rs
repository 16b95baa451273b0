// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Topology construction
//!
//! Nodes and connections are created up front; the engine takes ownership of
//! the finished [`Network`] and never changes its shape.

use crate::connection_pool::ConnectionPool;
use crate::error::Result;
use crate::node_pool::NodePool;
use tcn_npu_neural::{Connection, ConnectionId, NeuralError, Node, NodeId};
use tracing::debug;

/// Accumulates nodes and connections before the engine starts.
///
/// # Example
/// ```
/// use tcn_npu_cascade_engine::NetworkBuilder;
/// use tcn_npu_neural::NodeId;
///
/// let mut builder = NetworkBuilder::new(2, 1).unwrap();
/// let id = builder.connect(NodeId(0), NodeId(1), 3, 12_000, 0).unwrap();
/// let network = builder.build();
/// assert_eq!(network.node(NodeId(0)).unwrap().outgoing, vec![id]);
/// ```
#[derive(Debug)]
pub struct NetworkBuilder {
    nodes: NodePool,
    connections: ConnectionPool,
}

impl NetworkBuilder {
    /// Reserve `node_count` nodes and room for `connection_capacity` connections.
    pub fn new(node_count: usize, connection_capacity: usize) -> Result<Self> {
        if node_count > u32::MAX as usize {
            return Err(NeuralError::CapacityExceeded {
                pool: "node",
                capacity: u32::MAX as usize,
            }
            .into());
        }
        Ok(Self {
            nodes: NodePool::new(node_count),
            connections: ConnectionPool::with_capacity(connection_capacity),
        })
    }

    /// Add a connection from `source` to `target` and register it in the
    /// source's outgoing list.
    pub fn connect(
        &mut self,
        source: NodeId,
        target: NodeId,
        temporal_distance: u32,
        short_term_weight: i32,
        long_term_weight: i32,
    ) -> Result<ConnectionId> {
        for id in [source, target] {
            if !self.nodes.contains(id) {
                return Err(NeuralError::InvalidNodeId {
                    id,
                    capacity: self.nodes.len(),
                }
                .into());
            }
        }
        let connection =
            Connection::new(target, temporal_distance, short_term_weight, long_term_weight)?;
        let id = self.connections.allocate(connection)?;
        self.nodes.get_mut(source).outgoing.push(id);
        Ok(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn build(self) -> Network {
        debug!(
            target: "tcn-npu",
            "[TOPOLOGY] Built network: {} nodes, {} connections",
            self.nodes.len(),
            self.connections.len()
        );
        Network {
            nodes: self.nodes,
            connections: self.connections,
        }
    }
}

/// Finished, immutable-shape topology.
#[derive(Debug)]
pub struct Network {
    pub(crate) nodes: NodePool,
    pub(crate) connections: ConnectionPool,
}

impl Network {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.try_get(id)
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.get(id)
    }
}
