// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Engine error types

use tcn_npu_neural::{NeuralError, Tick};

/// Errors surfaced by the engine's outer API.
///
/// The sweep itself never fails: malformed topology is rejected at build time
/// and internal inconsistencies are assertions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Neural(#[from] NeuralError),

    #[error("stimulus for tick {tick} arrives too late (clock at {current})")]
    InjectionInPast { tick: Tick, current: Tick },

    #[error("invalid partitioning: {0}")]
    InvalidPartitioning(String),

    #[error("clock cannot move from tick {current} to tick {requested}")]
    ClockRegression { current: Tick, requested: Tick },

    #[error("tick {tick} has not been swept yet")]
    SweepPending { tick: Tick },
}

pub type Result<T> = std::result::Result<T, EngineError>;
