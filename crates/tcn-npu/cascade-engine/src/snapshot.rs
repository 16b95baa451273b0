// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Diagnostic snapshots
//!
//! A serializable view of the engine for debugging and test fixtures. Nodes
//! at rest (nothing pending, not refractory) are left out.

use crate::engine::CascadeEngine;
use crate::stats::{EngineStats, SignalStoreStats};
use serde::Serialize;
use tcn_npu_neural::Tick;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeSnapshot {
    pub id: u32,
    pub refractory_end: Option<Tick>,
    pub next_relevant_tick: Option<Tick>,
    pub pending: usize,
    pub outgoing: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineSnapshot {
    pub current_tick: Tick,
    pub next_global_tick: Option<Tick>,
    pub shards: usize,
    pub weight_rule: &'static str,
    pub last_cascades: Vec<u32>,
    pub stats: EngineStats,
    pub signal_store: SignalStoreStats,
    pub active_nodes: Vec<NodeSnapshot>,
}

impl EngineSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl CascadeEngine {
    pub fn snapshot(&self) -> EngineSnapshot {
        let active_nodes = self
            .shards()
            .iter()
            .flat_map(|shard| shard.nodes().iter())
            .filter(|(_, node)| {
                !node.pending.is_empty()
                    || node.refractory_end.is_some()
                    || node.next_relevant_tick.is_some()
            })
            .map(|(id, node)| NodeSnapshot {
                id: id.0,
                refractory_end: node.refractory_end,
                next_relevant_tick: node.next_relevant_tick,
                pending: node.pending.len(),
                outgoing: node.outgoing.len(),
            })
            .collect();

        EngineSnapshot {
            current_tick: self.current_tick(),
            next_global_tick: self.next_global_tick(),
            shards: self.shards().len(),
            weight_rule: self.weight_rule_name(),
            last_cascades: self.last_cascades().iter().map(|id| id.0).collect(),
            stats: self.stats(),
            signal_store: self.signal_store_stats(),
            active_nodes,
        }
    }
}
