// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # TCN - Temporal Cascade Network
//!
//! Event-driven signal propagation over a static network of passive nodes
//! joined by weighted, time-delayed connections. A node cascades when the
//! decayed sum of its recent input reaches the threshold; the clock jumps
//! straight to the next tick any node cares about.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! tcn = "0.0.1-beta.1"  # Default: engine + config + observability
//! ```
//!
//! ## Feature Flags
//!
//! - **`full`** (default): All components
//! - **`cascade-engine`**: Pools, scheduler, clock, partitioned sweeps
//! - **`config`**: `tcn_configuration.toml` loader with env/CLI overrides
//! - **`observability`**: `tracing` subscriber setup and debug flags
//! - **`file-logging`**: JSON log file per run (implies `observability`)
//!
//! ## Usage
//!
//! ```rust
//! use tcn::prelude::*;
//!
//! let mut builder = NetworkBuilder::new(3, 2)?;
//! builder.connect(NodeId(0), NodeId(1), 2, 12_000, 0)?;
//! builder.connect(NodeId(1), NodeId(2), 4, 12_000, 0)?;
//!
//! let mut engine = CascadeEngine::new(builder.build(), CascadeParameters::default())?;
//! engine.inject(NodeId(0), 12_000, 0)?;
//!
//! let summary = engine.run_until_quiescent(100)?;
//! assert_eq!(summary.cascades, 3);
//! assert_eq!(engine.current_tick(), 6);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ### Driven by configuration
//!
//! ```rust,no_run
//! use tcn::config::load_config;
//! use tcn::setup::{engine_from_config, network_builder_from_config, run_from_config};
//!
//! let config = load_config(None, None)?;
//! let builder = network_builder_from_config(&config)?;
//! // ... connect nodes ...
//! let mut engine = engine_from_config(&config, builder.build())?;
//! let summary = run_from_config(&mut engine, &config)?;
//! println!("{} cascades over {} sweeps", summary.cascades, summary.sweeps);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Foundation: tcn-npu-neural                             │
//! │  (Signal, Connection, Node, DecayTable, WeightRule)     │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Engine: tcn-npu-cascade-engine                         │
//! │  (Signal store, scheduler, clock, shards)               │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Infrastructure: tcn-config, tcn-observability          │
//! │  (TOML configuration, tracing setup)                    │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## License
//!
//! Apache-2.0

// Re-export foundation
pub use tcn_npu_neural as neural;

// Re-export engine
#[cfg(feature = "cascade-engine")]
pub use tcn_npu_cascade_engine as cascade_engine;

// Re-export infrastructure
#[cfg(feature = "config")]
pub use tcn_config as config;

#[cfg(feature = "observability")]
pub use tcn_observability as observability;

#[cfg(all(feature = "cascade-engine", feature = "config"))]
pub mod setup;

/// Prelude - commonly used types and traits
pub mod prelude {
    pub use crate::neural::{
        Connection, ConnectionId, DecayTable, Node, NodeId, PassThroughWeights, Signal,
        SignalSlot, Tick, WeightRule,
    };

    #[cfg(feature = "cascade-engine")]
    pub use crate::cascade_engine::{
        CascadeEngine, CascadeParameters, EngineError, EngineOptions, EngineStats,
        ExecutionMode, Network, NetworkBuilder, RunSummary, SweepReport,
    };

    #[cfg(feature = "config")]
    pub use crate::config::{load_config, validate_config, TcnConfig};

    #[cfg(feature = "observability")]
    pub use crate::observability::{init_logging, CrateDebugFlags, LoggingOptions};
}
