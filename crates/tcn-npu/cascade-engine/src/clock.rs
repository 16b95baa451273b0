// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Global discrete clock
//!
//! The clock never ticks through idle time: after a sweep it jumps straight
//! to the earliest tick any node still cares about.

use crate::error::{EngineError, Result};
use tcn_npu_neural::Tick;

/// Running minimum of upcoming ticks. `None` means nothing is scheduled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NextTick(Option<Tick>);

impl NextTick {
    pub const INFINITE: NextTick = NextTick(None);

    #[inline(always)]
    pub fn tighten(&mut self, tick: Tick) {
        self.0 = Some(match self.0 {
            Some(current) => current.min(tick),
            None => tick,
        });
    }

    #[inline(always)]
    pub fn tighten_opt(&mut self, tick: Option<Tick>) {
        if let Some(tick) = tick {
            self.tighten(tick);
        }
    }

    #[inline]
    pub fn absorb(&mut self, other: NextTick) {
        self.tighten_opt(other.0);
    }

    #[inline]
    pub fn get(self) -> Option<Tick> {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct GlobalClock {
    current: Tick,
    next_global: NextTick,
    swept: bool,
}

impl GlobalClock {
    pub fn new(start: Tick) -> Self {
        Self {
            current: start,
            next_global: NextTick::INFINITE,
            swept: false,
        }
    }

    #[inline]
    pub fn current(&self) -> Tick {
        self.current
    }

    /// Earliest known upcoming tick.
    #[inline]
    pub fn next_global(&self) -> Option<Tick> {
        self.next_global.get()
    }

    /// True once the current tick has been swept.
    #[inline]
    pub fn is_swept(&self) -> bool {
        self.swept
    }

    /// Swept and nothing left to process.
    pub fn is_quiescent(&self) -> bool {
        self.swept && self.next_global.get().is_none()
    }

    /// Reset the tracker; the sweep rebuilds it from every node.
    pub(crate) fn begin_sweep(&mut self) {
        self.next_global = NextTick::INFINITE;
    }

    pub(crate) fn finish_sweep(&mut self) {
        self.swept = true;
    }

    pub(crate) fn tracker_mut(&mut self) -> &mut NextTick {
        &mut self.next_global
    }

    pub(crate) fn absorb(&mut self, next: NextTick) {
        self.next_global.absorb(next);
    }

    /// Jump to the tracked next tick.
    ///
    /// Returns `Ok(None)` when nothing is scheduled (quiescent).
    pub fn advance(&mut self) -> Result<Option<Tick>> {
        if !self.swept {
            return Err(EngineError::SweepPending { tick: self.current });
        }
        match self.next_global.get() {
            None => Ok(None),
            Some(next) if next > self.current => {
                self.current = next;
                self.swept = false;
                Ok(Some(next))
            }
            Some(next) => Err(EngineError::ClockRegression {
                current: self.current,
                requested: next,
            }),
        }
    }
}

impl Default for GlobalClock {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_tick_min() {
        let mut next = NextTick::INFINITE;
        assert_eq!(next.get(), None);
        next.tighten(9);
        next.tighten(12);
        next.tighten_opt(None);
        next.tighten(4);
        assert_eq!(next.get(), Some(4));
    }

    #[test]
    fn test_advance_jumps_to_minimum() {
        let mut clock = GlobalClock::new(10);
        clock.begin_sweep();
        clock.tracker_mut().tighten(40);
        clock.absorb(NextTick(Some(15)));
        clock.finish_sweep();
        assert_eq!(clock.advance().unwrap(), Some(15));
        assert_eq!(clock.current(), 15);
        assert!(!clock.is_swept());
    }

    #[test]
    fn test_advance_requires_sweep() {
        let mut clock = GlobalClock::new(0);
        assert_eq!(
            clock.advance(),
            Err(EngineError::SweepPending { tick: 0 })
        );
    }

    #[test]
    fn test_quiescent_when_nothing_scheduled() {
        let mut clock = GlobalClock::new(3);
        clock.begin_sweep();
        clock.finish_sweep();
        assert!(clock.is_quiescent());
        assert_eq!(clock.advance().unwrap(), None);
        assert_eq!(clock.current(), 3);
    }

    #[test]
    fn test_regression_rejected() {
        let mut clock = GlobalClock::new(8);
        clock.begin_sweep();
        clock.tracker_mut().tighten(8);
        clock.finish_sweep();
        assert_eq!(
            clock.advance(),
            Err(EngineError::ClockRegression {
                current: 8,
                requested: 8
            })
        );
    }
}
