// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! 3-tier configuration loading:
//! 1. TOML file (base defaults)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{ConfigError, ConfigResult, LogFormat, TcnConfig};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const CONFIG_FILE_NAME: &str = "tcn_configuration.toml";

/// Find the TCN configuration file
///
/// Search order:
/// 1. `TCN_CONFIG_PATH` environment variable
/// 2. Current working directory: `./tcn_configuration.toml`
/// 3. Parent directory: `../tcn_configuration.toml`
/// 4. Workspace root (searches up to 5 levels)
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("TCN_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by TCN_CONFIG_PATH not found: {}",
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));

        let mut current = cwd.clone();
        for _ in 0..5 {
            if let Some(parent) = current.parent() {
                search_paths.push(parent.join(CONFIG_FILE_NAME));
                current = parent.to_path_buf();
            }
        }
    }

    if let Some(path) = search_paths.iter().find(|p| p.exists()) {
        return Ok(path.clone());
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "TCN configuration file '{}' not found in any of these locations:\n{}\n\nSet TCN_CONFIG_PATH environment variable to specify custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if config file is not found or contains invalid TOML.
/// Validation is a separate step ([`crate::validate_config`]).
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<TcnConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: TcnConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }

    Ok(config)
}

/// Parse `value` into `slot`; unparsable values leave `slot` unchanged.
fn set_parsed<T: FromStr>(slot: &mut T, value: &str) {
    if let Ok(parsed) = value.trim().parse::<T>() {
        *slot = parsed;
    }
}

fn set_parsed_opt<T: FromStr>(slot: &mut Option<T>, value: &str) {
    if let Ok(parsed) = value.trim().parse::<T>() {
        *slot = Some(parsed);
    }
}

fn parse_flag(value: &str) -> bool {
    let value = value.to_lowercase();
    value == "true" || value == "1" || value == "yes"
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `TCN_CASCADE_THRESHOLD` -> `engine.cascade_threshold`
/// - `TCN_REFRACTORY_WIDTH` -> `engine.refractory_width`
/// - `TCN_AGGREGATION_WINDOW` -> `engine.aggregation_window`
/// - `TCN_PURGE_THRESHOLD` -> `engine.purge_threshold`
/// - `TCN_TICK_BUDGET` -> `engine.tick_budget`
/// - `TCN_NODE_COUNT` -> `capacity.node_count`
/// - `TCN_CONNECTION_COUNT` -> `capacity.connection_count`
/// - `TCN_SIGNAL_CAPACITY` -> `capacity.signal_capacity`
/// - `TCN_PARTITIONS` -> `partitioning.partitions`
/// - `TCN_PARALLEL` -> `partitioning.parallel`
/// - `TCN_LOG_LEVEL` -> `logging.level`
/// - `TCN_LOG_FORMAT` -> `logging.format`
pub fn apply_environment_overrides(config: &mut TcnConfig) {
    // Engine settings
    if let Ok(value) = env::var("TCN_CASCADE_THRESHOLD") {
        set_parsed(&mut config.engine.cascade_threshold, &value);
    }
    if let Ok(value) = env::var("TCN_REFRACTORY_WIDTH") {
        set_parsed(&mut config.engine.refractory_width, &value);
    }
    if let Ok(value) = env::var("TCN_AGGREGATION_WINDOW") {
        set_parsed(&mut config.engine.aggregation_window, &value);
    }
    if let Ok(value) = env::var("TCN_PURGE_THRESHOLD") {
        set_parsed(&mut config.engine.purge_threshold, &value);
    }
    if let Ok(value) = env::var("TCN_TICK_BUDGET") {
        set_parsed_opt(&mut config.engine.tick_budget, &value);
    }

    // Capacity settings
    if let Ok(value) = env::var("TCN_NODE_COUNT") {
        set_parsed(&mut config.capacity.node_count, &value);
    }
    if let Ok(value) = env::var("TCN_CONNECTION_COUNT") {
        set_parsed_opt(&mut config.capacity.connection_count, &value);
    }
    if let Ok(value) = env::var("TCN_SIGNAL_CAPACITY") {
        set_parsed_opt(&mut config.capacity.signal_capacity, &value);
    }

    // Partitioning
    if let Ok(value) = env::var("TCN_PARTITIONS") {
        set_parsed(&mut config.partitioning.partitions, &value);
    }
    if let Ok(value) = env::var("TCN_PARALLEL") {
        config.partitioning.parallel = parse_flag(&value);
    }

    // Logging
    if let Ok(value) = env::var("TCN_LOG_LEVEL") {
        config.logging.level = value;
    }
    if let Ok(value) = env::var("TCN_LOG_FORMAT") {
        if let Ok(format) = LogFormat::from_str(&value) {
            config.logging.format = format;
        }
    }
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - HashMap of CLI arguments (e.g., `{"cascade_threshold": "9000", "partitions": "4"}`)
pub fn apply_cli_overrides(config: &mut TcnConfig, cli_args: &HashMap<String, String>) {
    // Engine settings
    if let Some(value) = cli_args.get("cascade_threshold") {
        set_parsed(&mut config.engine.cascade_threshold, value);
    }
    if let Some(value) = cli_args.get("refractory_width") {
        set_parsed(&mut config.engine.refractory_width, value);
    }
    if let Some(value) = cli_args.get("aggregation_window") {
        set_parsed(&mut config.engine.aggregation_window, value);
    }
    if let Some(value) = cli_args.get("purge_threshold") {
        set_parsed(&mut config.engine.purge_threshold, value);
    }
    if let Some(value) = cli_args.get("tick_budget") {
        set_parsed_opt(&mut config.engine.tick_budget, value);
    }
    if let Some(value) = cli_args.get("max_sweeps") {
        set_parsed(&mut config.engine.max_sweeps, value);
    }

    // Capacity settings
    if let Some(value) = cli_args.get("node_count") {
        set_parsed(&mut config.capacity.node_count, value);
    }
    if let Some(value) = cli_args.get("connection_count") {
        set_parsed_opt(&mut config.capacity.connection_count, value);
    }
    if let Some(value) = cli_args.get("signal_capacity") {
        set_parsed_opt(&mut config.capacity.signal_capacity, value);
    }

    // Partitioning
    if let Some(value) = cli_args.get("partitions") {
        set_parsed(&mut config.partitioning.partitions, value);
    }
    if let Some(value) = cli_args.get("parallel") {
        config.partitioning.parallel = parse_flag(value);
    }

    // Logging
    if let Some(value) = cli_args.get("log_level") {
        config.logging.level = value.clone();
    }
    if let Some(value) = cli_args.get("log_format") {
        if let Ok(format) = LogFormat::from_str(value) {
            config.logging.format = format;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::tempdir;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_find_config_file_env_var() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("custom_config.toml");
        File::create(&config_path).unwrap();

        env::set_var("TCN_CONFIG_PATH", config_path.to_str().unwrap());
        let result = find_config_file();
        env::remove_var("TCN_CONFIG_PATH");

        assert_eq!(result.unwrap(), config_path);
    }

    #[test]
    fn test_missing_env_path_reported() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        env::set_var("TCN_CONFIG_PATH", "/definitely/not/here/tcn.toml");
        let result = find_config_file();
        env::remove_var("TCN_CONFIG_PATH");

        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_minimal_config() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[engine]").unwrap();
        writeln!(file, "refractory_width = 2").unwrap();
        writeln!(file, "[capacity]").unwrap();
        writeln!(file, "node_count = 4").unwrap();

        let config = load_config(Some(&config_path), None).unwrap();

        assert_eq!(config.engine.refractory_width, 2);
        assert_eq!(config.engine.cascade_threshold, 12_000);
        assert_eq!(config.capacity.node_count, 4);
        assert_eq!(config.capacity.signals(), 40);
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "[engine\ncascade_threshold = ").unwrap();

        let result = load_config(Some(&config_path), None);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_environment_overrides() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let mut config = TcnConfig::default();

        env::set_var("TCN_CASCADE_THRESHOLD", "9000");
        env::set_var("TCN_PARALLEL", "false");
        env::set_var("TCN_TICK_BUDGET", "250");
        env::set_var("TCN_LOG_FORMAT", "json");

        apply_environment_overrides(&mut config);

        env::remove_var("TCN_CASCADE_THRESHOLD");
        env::remove_var("TCN_PARALLEL");
        env::remove_var("TCN_TICK_BUDGET");
        env::remove_var("TCN_LOG_FORMAT");

        assert_eq!(config.engine.cascade_threshold, 9000);
        assert!(!config.partitioning.parallel);
        assert_eq!(config.engine.tick_budget, Some(250));
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = TcnConfig::default();
        let mut cli_args = HashMap::new();
        cli_args.insert("partitions".to_string(), "4".to_string());
        cli_args.insert("signal_capacity".to_string(), "512".to_string());
        cli_args.insert("refractory_width".to_string(), "not-a-number".to_string());

        apply_cli_overrides(&mut config, &cli_args);

        assert_eq!(config.partitioning.partitions, 4);
        assert_eq!(config.capacity.signal_capacity, Some(512));
        // Unparsable value ignored
        assert_eq!(config.engine.refractory_width, 5);
    }

    #[test]
    fn test_override_precedence() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        // CLI overrides take precedence over environment variables
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[engine]").unwrap();
        writeln!(file, "cascade_threshold = 1000").unwrap();
        writeln!(file, "purge_threshold = 8").unwrap();

        env::set_var("TCN_CASCADE_THRESHOLD", "2000");
        env::set_var("TCN_PURGE_THRESHOLD", "16");

        let mut cli_args = HashMap::new();
        cli_args.insert("cascade_threshold".to_string(), "3000".to_string());

        let config = load_config(Some(&config_path), Some(&cli_args)).unwrap();

        env::remove_var("TCN_CASCADE_THRESHOLD");
        env::remove_var("TCN_PURGE_THRESHOLD");

        // CLI wins for threshold, env wins for purge threshold (no CLI override)
        assert_eq!(config.engine.cascade_threshold, 3000);
        assert_eq!(config.engine.purge_threshold, 16);
    }
}
