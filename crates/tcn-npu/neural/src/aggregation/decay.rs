// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Decay table keyed on distance-from-now
//!
//! Entry `d` is the divisor applied to a signal that became due `d` ticks ago.
//! The table length fixes the aggregation window: a table with `W + 1` entries
//! covers `[now - W, now]`.

use crate::types::{NeuralError, Result};

/// Largest window [`DecayTable::halving`] can build without overflowing `u32`.
pub const MAX_HALVING_WINDOW: u32 = 31;

/// Divisors applied per distance, index 0 = due this tick.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecayTable {
    divisors: Vec<u32>,
}

impl DecayTable {
    /// Build a table from explicit divisors.
    ///
    /// # Errors
    /// Fails on an empty table or a zero divisor.
    pub fn new(divisors: Vec<u32>) -> Result<Self> {
        if divisors.is_empty() {
            return Err(NeuralError::InvalidDecayTable(
                "at least one divisor (distance 0) is required".to_string(),
            ));
        }
        if let Some(pos) = divisors.iter().position(|&d| d == 0) {
            return Err(NeuralError::InvalidDecayTable(format!(
                "divisor at distance {} is zero",
                pos
            )));
        }
        Ok(Self { divisors })
    }

    /// Halving table for a window of `window` ticks: 1, 2, 4, ... 2^window.
    ///
    /// # Example
    /// ```
    /// use tcn_npu_neural::DecayTable;
    ///
    /// let table = DecayTable::halving(5).unwrap();
    /// assert_eq!(table.divisors(), &[1, 2, 4, 8, 16, 32]);
    /// assert_eq!(table.window(), 5);
    /// assert!(DecayTable::halving(32).is_err());
    /// ```
    ///
    /// # Errors
    /// Fails when `window` exceeds [`MAX_HALVING_WINDOW`].
    pub fn halving(window: u32) -> Result<Self> {
        if window > MAX_HALVING_WINDOW {
            return Err(NeuralError::InvalidDecayTable(format!(
                "halving window of {} ticks exceeds {}; give explicit divisors",
                window, MAX_HALVING_WINDOW
            )));
        }
        Ok(Self::halving_unchecked(window))
    }

    fn halving_unchecked(window: u32) -> Self {
        let divisors = (0..=window).map(|d| 1u32 << d).collect();
        Self { divisors }
    }

    /// Aggregation window width in ticks (largest distance still counted).
    #[inline]
    pub fn window(&self) -> u32 {
        (self.divisors.len() - 1) as u32
    }

    pub fn divisors(&self) -> &[u32] {
        &self.divisors
    }

    #[inline(always)]
    pub fn divisor(&self, distance: u64) -> Option<u32> {
        usize::try_from(distance)
            .ok()
            .and_then(|d| self.divisors.get(d).copied())
    }

    /// Contribution of `amplitude` seen `distance` ticks after it became due.
    ///
    /// Integer division per signal, so `k` signals at the same distance sum to
    /// `k * (amplitude / divisor)`. Returns `None` outside the window.
    #[inline(always)]
    pub fn scale(&self, amplitude: i32, distance: u64) -> Option<i64> {
        self.divisor(distance)
            .map(|divisor| i64::from(amplitude) / i64::from(divisor))
    }
}

impl Default for DecayTable {
    fn default() -> Self {
        Self::halving_unchecked(5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let table = DecayTable::default();
        assert_eq!(table.divisors(), &[1, 2, 4, 8, 16, 32]);
        assert_eq!(table.window(), 5);
    }

    #[test]
    fn test_scale_follows_table() {
        let table = DecayTable::default();
        assert_eq!(table.scale(6000, 0), Some(6000));
        assert_eq!(table.scale(6000, 1), Some(3000));
        assert_eq!(table.scale(6000, 2), Some(1500));
        assert_eq!(table.scale(6000, 3), Some(750));
        assert_eq!(table.scale(6000, 4), Some(375));
        assert_eq!(table.scale(6000, 5), Some(187));
        assert_eq!(table.scale(6000, 6), None);
    }

    #[test]
    fn test_negative_amplitudes_truncate_toward_zero() {
        let table = DecayTable::default();
        assert_eq!(table.scale(-1001, 1), Some(-500));
    }

    #[test]
    fn test_rejects_bad_tables() {
        assert!(DecayTable::new(vec![]).is_err());
        assert!(DecayTable::new(vec![1, 0, 4]).is_err());
        assert_eq!(DecayTable::new(vec![1, 3]).unwrap().window(), 1);
    }

    #[test]
    fn test_halving_limit() {
        let widest = DecayTable::halving(MAX_HALVING_WINDOW).unwrap();
        assert_eq!(widest.divisor(31), Some(1 << 31));
        assert!(matches!(
            DecayTable::halving(MAX_HALVING_WINDOW + 1),
            Err(NeuralError::InvalidDecayTable(_))
        ));
    }

    #[test]
    fn test_narrow_window() {
        let table = DecayTable::halving(2).unwrap();
        assert_eq!(table.divisors(), &[1, 2, 4]);
        assert_eq!(table.scale(1000, 3), None);
    }
}
