// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for record construction and topology validation

use super::ids::{ConnectionId, NodeId};

/// Errors raised while building records and pools.
///
/// The propagation hot path never produces these; they surface at build time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NeuralError {
    #[error("invalid node id {id} (pool holds {capacity} nodes)")]
    InvalidNodeId { id: NodeId, capacity: usize },

    #[error("invalid connection id {id} (pool holds {capacity} connections)")]
    InvalidConnectionId { id: ConnectionId, capacity: usize },

    #[error("temporal distance must be at least one tick")]
    ZeroTemporalDistance,

    #[error("{pool} pool exhausted: capacity {capacity}")]
    CapacityExceeded { pool: &'static str, capacity: usize },

    #[error("invalid decay table: {0}")]
    InvalidDecayTable(String),

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

pub type Result<T> = core::result::Result<T, NeuralError>;
