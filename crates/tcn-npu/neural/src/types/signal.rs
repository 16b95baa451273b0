// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Pending-event record stored in the signal store
//!
//! A signal is identified by its slot. Slots are overwritten in place when the
//! store wraps, so a reader must check `owner` before trusting the content.

use super::ids::{ConnectionId, NodeId};
use super::Tick;

/// One pending signal.
///
/// `action_time` and `owner` are `None` only in never-written slots. Stimuli
/// injected from outside the network carry no `source_connection`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Signal {
    /// Absolute tick at which the signal becomes relevant
    pub action_time: Option<Tick>,
    /// Node the signal was generated for
    pub owner: Option<NodeId>,
    /// Originating connection (reserved for weight reinforcement)
    pub source_connection: Option<ConnectionId>,
    /// Signed magnitude contributed at delivery
    pub amplitude: i32,
}

impl Signal {
    /// Inert content used to pre-fill the store.
    pub const EMPTY: Signal = Signal {
        action_time: None,
        owner: None,
        source_connection: None,
        amplitude: 0,
    };

    pub fn new(
        action_time: Tick,
        owner: NodeId,
        source_connection: Option<ConnectionId>,
        amplitude: i32,
    ) -> Self {
        Self {
            action_time: Some(action_time),
            owner: Some(owner),
            source_connection,
            amplitude,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.action_time.is_none() || self.owner.is_none()
    }

    /// True if this content was written for `reader`.
    #[inline(always)]
    pub fn is_owned_by(&self, reader: NodeId) -> bool {
        self.owner == Some(reader)
    }

    /// Action time, but only when the slot content belongs to `reader`.
    #[inline(always)]
    pub fn action_time_for(&self, reader: NodeId) -> Option<Tick> {
        if self.is_owned_by(reader) {
            self.action_time
        } else {
            None
        }
    }
}

impl Default for Signal {
    fn default() -> Self {
        Self::EMPTY
    }
}
