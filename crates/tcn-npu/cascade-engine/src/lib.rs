// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # TCN Cascade Engine
//!
//! Event-driven propagation over a static network of passive nodes.
//!
//! ## Architecture
//! - **Pools**: fixed-capacity nodes, connections and a wrapping signal store
//! - **Scheduler**: one sweep per scheduled tick (refractory / idle / due)
//! - **Generator**: cascades emit time-stamped signals, never into the past
//! - **Clock**: jumps straight to the earliest tick any node cares about
//! - **Partitions**: contiguous node ranges swept in parallel, cross-shard
//!   signals exchanged at the barrier
//!
//! ## Example
//! ```
//! use tcn_npu_cascade_engine::{CascadeEngine, CascadeParameters, NetworkBuilder};
//! use tcn_npu_neural::NodeId;
//!
//! let mut builder = NetworkBuilder::new(2, 1).unwrap();
//! builder.connect(NodeId(0), NodeId(1), 3, 12_000, 0).unwrap();
//! let mut engine = CascadeEngine::new(builder.build(), CascadeParameters::default()).unwrap();
//!
//! engine.inject(NodeId(0), 12_000, 0).unwrap();
//! let summary = engine.run_until_quiescent(16).unwrap();
//! assert_eq!(summary.cascades, 2);
//! assert_eq!(engine.current_tick(), 3);
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod clock;
pub mod connection_pool;
pub mod engine;
pub mod error;
pub mod node_pool;
pub mod params;
pub mod partition;
pub mod scheduler;
pub mod shard;
pub mod signal_generator;
pub mod signal_store;
pub mod snapshot;
pub mod stats;
pub mod topology;

pub use clock::{GlobalClock, NextTick};
pub use connection_pool::ConnectionPool;
pub use engine::{CascadeEngine, EngineOptions, ExecutionMode, RunSummary, SweepReport};
pub use error::{EngineError, Result};
pub use node_pool::NodePool;
pub use params::CascadeParameters;
pub use partition::PartitionPlan;
pub use scheduler::SweepContext;
pub use shard::{HandOff, Shard};
pub use signal_store::SignalStore;
pub use snapshot::{EngineSnapshot, NodeSnapshot};
pub use stats::{EngineStats, SignalStoreStats};
pub use topology::{Network, NetworkBuilder};
