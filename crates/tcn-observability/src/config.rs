// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Logging options

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Log format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingOptions {
    /// Default level (trace, debug, info, warn, error)
    pub level: String,
    /// Console format
    pub format: LogFormat,
    /// Base directory for per-run JSON logs (`file-logging` feature)
    pub log_dir: Option<PathBuf>,
    /// Keep the N most recent run folders
    pub retention_runs: usize,
    /// Remove run folders older than N days
    pub retention_days: u64,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
            log_dir: None,
            retention_runs: 10,
            retention_days: 30,
        }
    }
}
