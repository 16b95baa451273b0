// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Logging initialization
//!
//! Installs a console layer and, with the `file-logging` feature, a JSON file
//! layer writing to `<log_dir>/run_<timestamp>/tcn.log`.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::CrateDebugFlags;
use crate::config::{LogFormat, LoggingOptions};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

const RUN_PREFIX: &str = "run_";
const RUN_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Keeps background log writers alive; drop at shutdown to flush.
pub struct LoggingGuard {
    #[cfg(feature = "file-logging")]
    _file_guards: Vec<tracing_appender::non_blocking::WorkerGuard>,
    log_dir: Option<PathBuf>,
    started_at: DateTime<Utc>,
}

impl LoggingGuard {
    /// Run folder receiving the JSON log, if file logging is active.
    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

/// `EnvFilter` for the configured base level plus enabled debug flags.
pub fn build_filter(flags: &CrateDebugFlags, options: &LoggingOptions) -> Result<EnvFilter> {
    let directives = flags.to_filter_string_with_base(&options.level);
    EnvFilter::try_new(&directives)
        .with_context(|| format!("Invalid log filter directives: {}", directives))
}

/// Install the global subscriber.
///
/// # Errors
/// Fails on invalid filter directives, on an unwritable log directory, or
/// when a global subscriber is already installed.
pub fn init_logging(flags: &CrateDebugFlags, options: &LoggingOptions) -> Result<LoggingGuard> {
    let started_at = Utc::now();
    let mut layers: Vec<BoxedLayer> = Vec::new();

    let console = tracing_subscriber::fmt::layer().with_target(true);
    let console_layer = match options.format {
        LogFormat::Text => console.with_filter(build_filter(flags, options)?).boxed(),
        LogFormat::Json => console
            .json()
            .with_filter(build_filter(flags, options)?)
            .boxed(),
    };
    layers.push(console_layer);

    #[cfg(feature = "file-logging")]
    let (file_guards, log_dir) = match options.log_dir.as_deref() {
        Some(base) => {
            let (guard, run_folder, layer) = file_layer(base, started_at, flags, options)?;
            layers.push(layer);
            (vec![guard], Some(run_folder))
        }
        None => (Vec::new(), None),
    };
    #[cfg(not(feature = "file-logging"))]
    let log_dir: Option<PathBuf> = None;

    Registry::default()
        .with(layers)
        .try_init()
        .context("A global tracing subscriber is already installed")?;

    #[cfg(not(feature = "file-logging"))]
    if let Some(requested) = options.log_dir.as_deref() {
        tracing::warn!(
            target: "tcn",
            "Log directory {} ignored: built without the file-logging feature",
            requested.display()
        );
    }

    Ok(LoggingGuard {
        #[cfg(feature = "file-logging")]
        _file_guards: file_guards,
        log_dir,
        started_at,
    })
}

/// Console-only logging at `info`, honoring `TCN_DEBUG` and `--debug-*` flags.
pub fn init_logging_default() -> Result<LoggingGuard> {
    let flags = crate::cli::parse_debug_flags();
    init_logging(&flags, &LoggingOptions::default())
}

#[cfg(feature = "file-logging")]
fn file_layer(
    base: &Path,
    started_at: DateTime<Utc>,
    flags: &CrateDebugFlags,
    options: &LoggingOptions,
) -> Result<(
    tracing_appender::non_blocking::WorkerGuard,
    PathBuf,
    BoxedLayer,
)> {
    let run_folder = base.join(run_folder_name(started_at));
    fs::create_dir_all(&run_folder)
        .with_context(|| format!("Failed to create log directory {}", run_folder.display()))?;

    cleanup_old_runs(base, options.retention_runs, options.retention_days, started_at)?;

    let appender = tracing_appender::rolling::never(&run_folder, "tcn.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .json()
        .with_filter(build_filter(flags, options)?)
        .boxed();

    Ok((guard, run_folder, layer))
}

fn run_folder_name(started_at: DateTime<Utc>) -> String {
    format!("{}{}", RUN_PREFIX, started_at.format(RUN_TIMESTAMP_FORMAT))
}

fn parse_run_folder(name: &str) -> Option<NaiveDateTime> {
    let timestamp = name.strip_prefix(RUN_PREFIX)?;
    NaiveDateTime::parse_from_str(timestamp, RUN_TIMESTAMP_FORMAT).ok()
}

/// Remove run folders beyond the `retention_runs` most recent, and any older
/// than `retention_days`. Returns the number removed.
#[cfg_attr(not(feature = "file-logging"), allow(dead_code))]
pub(crate) fn cleanup_old_runs(
    base: &Path,
    retention_runs: usize,
    retention_days: u64,
    now: DateTime<Utc>,
) -> Result<usize> {
    let mut runs: Vec<(NaiveDateTime, PathBuf)> = fs::read_dir(base)
        .with_context(|| format!("Failed to read log directory {}", base.display()))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| {
            let name = entry.file_name();
            parse_run_folder(name.to_str()?).map(|ts| (ts, entry.path()))
        })
        .collect();

    // Newest first
    runs.sort_by(|a, b| b.0.cmp(&a.0));

    // Out-of-range retention means no age limit
    let oldest_kept = i64::try_from(retention_days)
        .ok()
        .and_then(Duration::try_days)
        .and_then(|age| now.naive_utc().checked_sub_signed(age));

    let mut removed = 0;
    for (index, (timestamp, path)) in runs.iter().enumerate() {
        if index >= retention_runs || oldest_kept.is_some_and(|cutoff| *timestamp < cutoff) {
            fs::remove_dir_all(path)
                .with_context(|| format!("Failed to remove old log run {}", path.display()))?;
            removed += 1;
        }
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_run_folder_name_round_trip() {
        let at = Utc.with_ymd_and_hms(2025, 3, 4, 5, 6, 7).unwrap();
        let name = run_folder_name(at);
        assert_eq!(name, "run_20250304_050607");
        assert_eq!(parse_run_folder(&name), Some(at.naive_utc()));
        assert_eq!(parse_run_folder("notes"), None);
    }

    #[test]
    fn test_cleanup_keeps_most_recent_runs() {
        let dir = tempfile::tempdir().unwrap();
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap();
        for day in 5..=9 {
            let at = Utc.with_ymd_and_hms(2025, 3, day, 12, 0, 0).unwrap();
            fs::create_dir(dir.path().join(run_folder_name(at))).unwrap();
        }
        fs::create_dir(dir.path().join("keep_me")).unwrap();

        let removed = cleanup_old_runs(dir.path(), 3, 30, now).unwrap();
        assert_eq!(removed, 2);
        assert!(dir.path().join("run_20250309_120000").exists());
        assert!(dir.path().join("run_20250307_120000").exists());
        assert!(!dir.path().join("run_20250306_120000").exists());
        assert!(dir.path().join("keep_me").exists());
    }

    #[test]
    fn test_cleanup_drops_runs_past_retention_days() {
        let dir = tempfile::tempdir().unwrap();
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap();
        let old = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        fs::create_dir(dir.path().join(run_folder_name(old))).unwrap();
        fs::create_dir(dir.path().join(run_folder_name(now))).unwrap();

        assert_eq!(cleanup_old_runs(dir.path(), 10, 7, now).unwrap(), 1);
        assert!(dir.path().join(run_folder_name(now)).exists());
    }

    #[test]
    fn test_build_filter_rejects_garbage() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-tcn-npu".to_string()]);
        assert!(build_filter(&flags, &LoggingOptions::default()).is_ok());

        let options = LoggingOptions {
            level: "tcn=notalevel".to_string(),
            ..LoggingOptions::default()
        };
        assert!(build_filter(&flags, &options).is_err());
    }
}
