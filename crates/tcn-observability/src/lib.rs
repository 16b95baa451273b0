// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # tcn-observability
//!
//! Logging setup shared by TCN binaries and tests, with per-crate debug flags.
//!
//! ## Features
//! - `file-logging`: JSON log file per run under `logs/run_<timestamp>/`

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod config;
pub mod init;

// Re-export commonly used items
pub use cli::*;
pub use config::*;
pub use init::*;

/// Log targets that accept debug flags.
///
/// `tcn-npu` is the engine's target; `tcn-npu-trace` carries per-cascade
/// trace events (see `TCN_NPU_TRACE_CASCADE`).
pub const KNOWN_CRATES: &[&str] = &["tcn", "tcn-npu", "tcn-npu-trace"];
