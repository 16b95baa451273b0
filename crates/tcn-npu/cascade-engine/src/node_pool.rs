// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Node pool
//!
//! A contiguous block of nodes addressed by global [`NodeId`]. The reference
//! engine owns one pool covering every node; each partition owns the block
//! for its id range.

use std::ops::Range;
use tcn_npu_neural::{Node, NodeId};

#[derive(Debug, Clone, Default)]
pub struct NodePool {
    nodes: Vec<Node>,
    first: u32,
}

impl NodePool {
    /// `count` idle nodes with ids `0..count`.
    pub fn new(count: usize) -> Self {
        Self {
            nodes: vec![Node::new(); count],
            first: 0,
        }
    }

    /// Pool holding `nodes`, the first of which has id `first`.
    pub fn from_block(first: u32, nodes: Vec<Node>) -> Self {
        Self { nodes, first }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Global ids owned by this pool.
    #[inline]
    pub fn id_range(&self) -> Range<u32> {
        self.first..self.first + self.nodes.len() as u32
    }

    #[inline(always)]
    pub fn contains(&self, id: NodeId) -> bool {
        self.id_range().contains(&id.0)
    }

    #[inline(always)]
    fn local(&self, id: NodeId) -> usize {
        debug_assert!(self.contains(id), "{} not owned by pool {:?}", id, self.id_range());
        (id.0 - self.first) as usize
    }

    /// Panics if `id` is not owned by this pool.
    #[inline(always)]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[self.local(id)]
    }

    /// Panics if `id` is not owned by this pool.
    #[inline(always)]
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        let local = self.local(id);
        &mut self.nodes[local]
    }

    pub fn try_get(&self, id: NodeId) -> Option<&Node> {
        if self.contains(id) {
            Some(self.get(id))
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(move |(i, node)| (NodeId(self.first + i as u32), node))
    }

    /// Take the nodes out, leaving the pool empty.
    pub(crate) fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }
}
