// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # TCN Neural Types (Platform-Agnostic)
//!
//! Everything the cascade engine needs that does not own storage:
//! - **Types**: ids, ticks, signal/connection/node records, errors
//! - **Aggregation**: decay table and aggregation-window classification
//! - **Weights**: the emitted-amplitude hook (short-/long-term weights)
//!
//! Pools, the scanner and the clock live in `tcn-npu-cascade-engine`.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Core type definitions
pub mod types;

// Decay-window aggregation algorithms
pub mod aggregation;

// Emitted amplitude hook
pub mod weights;

// Re-export types
pub use types::{
    Connection, ConnectionId, NeuralError, Node, NodeId, Result, Signal, SignalSlot, Tick,
};

pub use aggregation::{
    classify_signal, windowed_sum, DecayTable, SignalPhase, MAX_HALVING_WINDOW,
};
pub use weights::{PassThroughWeights, WeightRule};
