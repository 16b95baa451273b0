// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! Each struct maps to a section of `tcn_configuration.toml`. Every field has
//! a default, so a partial (or empty) file is valid.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Signal-store slots reserved per node when `signal_capacity` is unset.
pub const SIGNALS_PER_NODE: usize = 10;
/// Connection slots reserved per node when `connection_count` is unset.
pub const CONNECTIONS_PER_NODE: usize = 30;
/// Widest `aggregation_window` the default halving table supports.
pub const MAX_HALVING_WINDOW: u32 = 31;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TcnConfig {
    pub engine: EngineConfig,
    pub capacity: CapacityConfig,
    pub plasticity: PlasticityConfig,
    pub partitioning: PartitioningConfig,
    pub logging: LoggingConfig,
}

/// Propagation parameters
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    pub cascade_threshold: i64,
    pub refractory_width: u64,
    /// Largest distance-from-now still aggregated
    pub aggregation_window: u32,
    /// Explicit divisors, `aggregation_window + 1` entries; halving table if unset
    pub decay_divisors: Option<Vec<u32>>,
    pub purge_threshold: usize,
    /// Last tick to sweep; run until quiescence if unset
    pub tick_budget: Option<u64>,
    /// Hard cap on sweeps for quiescence runs
    pub max_sweeps: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cascade_threshold: 12_000,
            refractory_width: 5,
            aggregation_window: 5,
            decay_divisors: None,
            purge_threshold: 32,
            tick_budget: None,
            max_sweeps: 1_000_000,
        }
    }
}

impl EngineConfig {
    /// Configured divisors, or `1, 2, 4, ... 2^aggregation_window`.
    ///
    /// The halving table stops at [`MAX_HALVING_WINDOW`]; wider windows
    /// without explicit divisors fail [`crate::validate_config`].
    pub fn effective_decay_divisors(&self) -> Vec<u32> {
        match &self.decay_divisors {
            Some(divisors) => divisors.clone(),
            None => (0..=self.aggregation_window.min(MAX_HALVING_WINDOW))
                .map(|d| 1u32 << d)
                .collect(),
        }
    }
}

/// Pool sizing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CapacityConfig {
    pub node_count: usize,
    pub connection_count: Option<usize>,
    pub signal_capacity: Option<usize>,
}

impl Default for CapacityConfig {
    fn default() -> Self {
        Self {
            node_count: 10,
            connection_count: None,
            signal_capacity: None,
        }
    }
}

impl CapacityConfig {
    pub fn connections(&self) -> usize {
        self.connection_count
            .unwrap_or(self.node_count * CONNECTIONS_PER_NODE)
    }

    pub fn signals(&self) -> usize {
        self.signal_capacity
            .unwrap_or(self.node_count * SIGNALS_PER_NODE)
    }
}

/// Short-/long-term weight dynamics, consumed through the weight-rule hook.
///
/// All-zero growth and decay means weights pass through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PlasticityConfig {
    pub stp_growth: i32,
    /// Ticks between short-term decay steps (0 = no decay)
    pub stp_decay_interval: u64,
    pub ltp_growth: i32,
    /// Ticks between long-term decay steps (0 = no decay)
    pub ltp_decay_interval: u64,
    pub base_signal_size: i32,
    pub stp_limit_factor: u32,
    pub ltp_limit_factor: u32,
}

impl Default for PlasticityConfig {
    fn default() -> Self {
        Self {
            stp_growth: 0,
            stp_decay_interval: 0,
            ltp_growth: 0,
            ltp_decay_interval: 0,
            base_signal_size: 10_000,
            stp_limit_factor: 2,
            ltp_limit_factor: 3,
        }
    }
}

impl PlasticityConfig {
    pub fn is_pass_through(&self) -> bool {
        self.stp_growth == 0
            && self.ltp_growth == 0
            && self.stp_decay_interval == 0
            && self.ltp_decay_interval == 0
    }

    /// Upper bound for the short-term weight.
    pub fn stp_limit(&self) -> i64 {
        i64::from(self.base_signal_size) * i64::from(self.stp_limit_factor)
    }

    /// Upper bound for the long-term weight.
    pub fn ltp_limit(&self) -> i64 {
        i64::from(self.base_signal_size) * i64::from(self.ltp_limit_factor)
    }
}

/// Shard layout
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PartitioningConfig {
    pub partitions: usize,
    /// Sweep shards concurrently on the rayon pool
    pub parallel: bool,
}

impl Default for PartitioningConfig {
    fn default() -> Self {
        Self {
            partitions: 1,
            parallel: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    /// Base directory for per-run log folders
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
            log_dir: None,
        }
    }
}
