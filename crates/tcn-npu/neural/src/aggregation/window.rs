// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Aggregation-window classification
//!
//! A retained signal is in exactly one phase relative to the tick being
//! evaluated. Future signals are kept, in-window signals contribute, expired
//! signals can be dropped.

use super::decay::DecayTable;
use crate::types::Tick;

/// Where a signal sits relative to `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalPhase {
    /// `action_time > now`: in flight, not yet due
    Future,
    /// Within `[now - W, now]`, `distance = now - action_time`
    InWindow { distance: u64 },
    /// Older than the aggregation window
    Expired,
}

/// Classify one signal's action time against `now`.
///
/// # Example
/// ```
/// use tcn_npu_neural::{classify_signal, DecayTable, SignalPhase};
///
/// let table = DecayTable::default(); // window of 5
/// assert_eq!(classify_signal(12, 10, &table), SignalPhase::Future);
/// assert_eq!(classify_signal(8, 10, &table), SignalPhase::InWindow { distance: 2 });
/// assert_eq!(classify_signal(4, 10, &table), SignalPhase::Expired);
/// ```
#[inline(always)]
pub fn classify_signal(action_time: Tick, now: Tick, table: &DecayTable) -> SignalPhase {
    if action_time > now {
        return SignalPhase::Future;
    }
    let distance = now - action_time;
    if distance <= u64::from(table.window()) {
        SignalPhase::InWindow { distance }
    } else {
        SignalPhase::Expired
    }
}

/// Decayed sum of every in-window `(action_time, amplitude)` pair.
///
/// Linear superposition under the decay table; future and expired entries
/// contribute nothing.
pub fn windowed_sum<I>(now: Tick, table: &DecayTable, signals: I) -> i64
where
    I: IntoIterator<Item = (Tick, i32)>,
{
    signals
        .into_iter()
        .filter_map(|(action_time, amplitude)| match classify_signal(action_time, now, table) {
            SignalPhase::InWindow { distance } => table.scale(amplitude, distance),
            SignalPhase::Future | SignalPhase::Expired => None,
        })
        .sum()
}
