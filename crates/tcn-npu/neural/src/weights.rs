// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! Emitted-amplitude hook
//!
//! The amplitude a connection puts on a new signal is the sum of its
//! short-term and long-term weights. Reinforcement and decay of those weights
//! plug in here; the shipped rule passes weights through unchanged.

use crate::types::{Connection, Tick};

/// Computes the amplitude of a signal emitted on `connection` at `now`, and
/// optionally updates the connection afterwards.
pub trait WeightRule: Send + Sync {
    /// Amplitude for a signal leaving `connection` at `now`.
    fn emitted_amplitude(&self, connection: &Connection, now: Tick) -> i32;

    /// Called after the connection was engaged by a cascade.
    fn on_emit(&self, _connection: &mut Connection, _now: Tick) {}

    /// Rule name for logging/debugging
    fn name(&self) -> &'static str {
        "custom"
    }
}

/// `short_term_weight + long_term_weight`, no mutation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughWeights;

impl WeightRule for PassThroughWeights {
    #[inline(always)]
    fn emitted_amplitude(&self, connection: &Connection, _now: Tick) -> i32 {
        connection.combined_weight()
    }

    fn name(&self) -> &'static str {
        "pass-through"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NodeId;

    #[test]
    fn test_pass_through_sums_weights() {
        let mut conn = Connection::new(NodeId(2), 4, 6000, 250).unwrap();
        let rule = PassThroughWeights;
        assert_eq!(rule.emitted_amplitude(&conn, 10), 6250);

        rule.on_emit(&mut conn, 10);
        assert_eq!(conn.short_term_weight, 6000);
        assert_eq!(conn.long_term_weight, 250);
    }
}
