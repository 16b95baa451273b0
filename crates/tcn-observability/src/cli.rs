// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! CLI argument parsing for per-crate debug flags
//!
//! Supports flags like `--debug-tcn-npu` or `--debug-all` to raise the log
//! level of individual targets.

use std::collections::BTreeMap;
use std::env;

use crate::KNOWN_CRATES;

/// Parse debug flags from command-line arguments
///
/// # Example
/// ```rust
/// use tcn_observability::CrateDebugFlags;
///
/// let flags = CrateDebugFlags::from_args(vec!["--debug-tcn-npu".to_string()]);
/// assert!(flags.is_enabled("tcn-npu"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CrateDebugFlags {
    pub enabled_crates: BTreeMap<String, bool>,
}

impl CrateDebugFlags {
    /// Parse debug flags from command-line arguments
    ///
    /// Looks for arguments matching `--debug-{crate-name}`.
    /// Also supports `--debug-all` to enable all crates.
    pub fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut enabled_crates = BTreeMap::new();
        let mut debug_all = false;

        for arg in args {
            if arg == "--debug-all" {
                debug_all = true;
                continue;
            }

            if let Some(crate_name) = arg.strip_prefix("--debug-") {
                enabled_crates.insert(crate_name.to_string(), true);
            }
        }

        if debug_all {
            for crate_name in KNOWN_CRATES {
                enabled_crates.insert(crate_name.to_string(), true);
            }
        }

        CrateDebugFlags { enabled_crates }
    }

    pub fn is_enabled(&self, crate_name: &str) -> bool {
        self.enabled_crates.contains_key(crate_name)
    }

    pub fn enabled_crates(&self) -> Vec<&String> {
        self.enabled_crates.keys().collect()
    }

    pub fn any_enabled(&self) -> bool {
        !self.enabled_crates.is_empty()
    }

    /// Level used for `crate_name`.
    ///
    /// `*-trace` targets go to TRACE when enabled, everything else to DEBUG.
    pub fn log_level(&self, crate_name: &str) -> tracing::Level {
        if !self.is_enabled(crate_name) {
            tracing::Level::INFO
        } else if crate_name.ends_with("-trace") {
            tracing::Level::TRACE
        } else {
            tracing::Level::DEBUG
        }
    }

    /// Filter string for `EnvFilter`, e.g. `"tcn-npu=debug,info"`.
    pub fn to_filter_string(&self) -> String {
        self.to_filter_string_with_base("info")
    }

    /// Same as [`Self::to_filter_string`] with a custom default level.
    pub fn to_filter_string_with_base(&self, base_level: &str) -> String {
        let mut filters: Vec<String> = self
            .enabled_crates
            .keys()
            .map(|crate_name| {
                let level = self.log_level(crate_name).to_string().to_lowercase();
                format!("{}={}", crate_name, level)
            })
            .collect();
        filters.push(base_level.to_lowercase());
        filters.join(",")
    }
}

/// Debug flags from command-line arguments plus the `TCN_DEBUG` environment variable.
///
/// Environment variable format: comma-separated crate names, e.g. "tcn-npu,tcn-npu-trace",
/// or "all".
pub fn parse_debug_flags() -> CrateDebugFlags {
    let mut flags = CrateDebugFlags::from_args(env::args());
    if let Ok(env_var) = env::var("TCN_DEBUG") {
        apply_debug_env(&mut flags, &env_var);
    }
    flags
}

fn apply_debug_env(flags: &mut CrateDebugFlags, env_var: &str) {
    if env_var == "all" {
        for crate_name in KNOWN_CRATES {
            flags.enabled_crates.insert(crate_name.to_string(), true);
        }
        return;
    }
    for crate_name in env_var.split(',') {
        let crate_name = crate_name.trim();
        if !crate_name.is_empty() {
            flags.enabled_crates.insert(crate_name.to_string(), true);
        }
    }
}

/// Generate help text for debug flags
pub fn debug_flags_help() -> String {
    format!(
        r#"Debug Flags:
  --debug-all                    Enable debug logging for all targets
  --debug-{{crate-name}}          Enable debug logging for one target

Available targets:
  {}

Environment Variables:
  TCN_DEBUG={{crate-name}}[,{{crate-name}}]  Enable debug for targets (comma-separated)
  TCN_DEBUG=all                             Enable debug for all targets
  TCN_NPU_TRACE_CASCADE=1                   Emit per-cascade trace events
  TCN_NPU_TRACE_NODE=<id>                   Restrict trace events to one node

Examples:
  --debug-tcn-npu
  --debug-tcn-npu --debug-tcn-npu-trace
  TCN_DEBUG=tcn-npu
"#,
        KNOWN_CRATES.join(", ")
    )
}
