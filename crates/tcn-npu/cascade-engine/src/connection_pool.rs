// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Connection pool
//!
//! Connections are allocated monotonically during topology construction and
//! never freed. A pool is either dense (position == global id) or holds a
//! sorted subset of global ids after partitioning.

use tcn_npu_neural::{Connection, ConnectionId, NeuralError};

#[derive(Debug, Clone)]
pub struct ConnectionPool {
    connections: Vec<Connection>,
    /// Global ids in ascending order; empty for a dense pool
    ids: Vec<ConnectionId>,
    capacity: usize,
}

impl ConnectionPool {
    /// Empty dense pool that accepts at most `capacity` connections.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            connections: Vec::with_capacity(capacity),
            ids: Vec::new(),
            capacity,
        }
    }

    /// Pool holding a subset of another pool's connections.
    ///
    /// `entries` must be sorted by id.
    pub(crate) fn from_sorted(entries: Vec<(ConnectionId, Connection)>) -> Self {
        debug_assert!(entries.windows(2).all(|w| w[0].0 < w[1].0));
        let capacity = entries.len();
        let (ids, connections) = entries.into_iter().unzip();
        Self {
            connections,
            ids,
            capacity,
        }
    }

    /// Append a connection to a dense pool.
    pub fn allocate(&mut self, connection: Connection) -> Result<ConnectionId, NeuralError> {
        debug_assert!(self.ids.is_empty(), "allocate on a partitioned pool");
        if self.connections.len() >= self.capacity {
            return Err(NeuralError::CapacityExceeded {
                pool: "connection",
                capacity: self.capacity,
            });
        }
        let id = ConnectionId(self.connections.len() as u32);
        self.connections.push(connection);
        Ok(id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Position of `id` inside this pool.
    #[inline(always)]
    pub fn position(&self, id: ConnectionId) -> Option<usize> {
        if self.ids.is_empty() {
            (id.index() < self.connections.len()).then_some(id.index())
        } else {
            self.ids.binary_search(&id).ok()
        }
    }

    pub fn get(&self, id: ConnectionId) -> Option<&Connection> {
        self.position(id).map(|pos| &self.connections[pos])
    }

    pub fn get_mut(&mut self, id: ConnectionId) -> Option<&mut Connection> {
        self.position(id).map(move |pos| &mut self.connections[pos])
    }

    #[inline(always)]
    pub(crate) fn at_mut(&mut self, position: usize) -> &mut Connection {
        &mut self.connections[position]
    }

    pub fn iter(&self) -> impl Iterator<Item = (ConnectionId, &Connection)> + '_ {
        self.connections.iter().enumerate().map(move |(pos, conn)| {
            let id = if self.ids.is_empty() {
                ConnectionId(pos as u32)
            } else {
                self.ids[pos]
            };
            (id, conn)
        })
    }
}
