// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Build an engine from `tcn_configuration.toml`
//!
//! Capacities size the topology builder, `[engine]` becomes
//! [`CascadeParameters`], `[partitioning]` becomes [`EngineOptions`].

use tcn_config::{validate_config, ConfigError, TcnConfig};
use tcn_npu_cascade_engine::{
    CascadeEngine, CascadeParameters, EngineError, EngineOptions, ExecutionMode, Network,
    NetworkBuilder, RunSummary,
};
use tcn_npu_neural::DecayTable;
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

pub type SetupResult<T> = Result<T, SetupError>;

/// `[engine]` section as engine parameters.
pub fn parameters_from_config(config: &TcnConfig) -> SetupResult<CascadeParameters> {
    let engine = &config.engine;
    let decay = match &engine.decay_divisors {
        Some(divisors) => DecayTable::new(divisors.clone()),
        None => DecayTable::halving(engine.aggregation_window),
    }
    .map_err(EngineError::from)?;
    if decay.window() != engine.aggregation_window {
        return Err(ConfigError::InvalidValue(format!(
            "engine.decay_divisors covers a window of {} ticks, aggregation_window is {}",
            decay.window(),
            engine.aggregation_window
        ))
        .into());
    }
    let params = CascadeParameters::new(
        engine.cascade_threshold,
        engine.refractory_width,
        decay,
        engine.purge_threshold,
    )
    .map_err(EngineError::from)?;
    Ok(params)
}

/// Topology builder sized by `[capacity]`.
pub fn network_builder_from_config(config: &TcnConfig) -> SetupResult<NetworkBuilder> {
    let builder =
        NetworkBuilder::new(config.capacity.node_count, config.capacity.connections())?;
    Ok(builder)
}

/// Signal capacity and shard layout for `network`.
///
/// Without an explicit `signal_capacity` the store is sized from the
/// network's actual node count.
pub fn engine_options_from_config(config: &TcnConfig, network: &Network) -> EngineOptions {
    let execution = if config.partitioning.parallel {
        ExecutionMode::Parallel
    } else {
        ExecutionMode::Sequential
    };
    let mut options = EngineOptions::for_network(network)
        .with_partitions(config.partitioning.partitions, execution);
    if let Some(signal_capacity) = config.capacity.signal_capacity {
        options = options.with_signal_capacity(signal_capacity);
    }
    options
}

/// Validate `config` and build an engine over `network`.
pub fn engine_from_config(config: &TcnConfig, network: Network) -> SetupResult<CascadeEngine> {
    validate_config(config)?;

    if network.node_count() != config.capacity.node_count {
        warn!(
            target: "tcn",
            "Network has {} nodes, configuration expects {}",
            network.node_count(),
            config.capacity.node_count
        );
    }
    if !config.plasticity.is_pass_through() {
        // Only the pass-through rule ships; custom rules go in via with_weight_rule
        warn!(
            target: "tcn",
            "Plasticity rates are set but the engine uses pass-through weights"
        );
    }

    let params = parameters_from_config(config)?;
    let options = engine_options_from_config(config, &network);
    let engine = CascadeEngine::with_options(network, params, options)?;
    Ok(engine)
}

/// Run to `engine.tick_budget`, or until quiescence capped at `engine.max_sweeps`.
pub fn run_from_config(engine: &mut CascadeEngine, config: &TcnConfig) -> SetupResult<RunSummary> {
    let summary = match config.engine.tick_budget {
        Some(last_tick) => engine.run_until(last_tick)?,
        None => engine.run_until_quiescent(config.engine.max_sweeps)?,
    };
    if !summary.quiescent && config.engine.tick_budget.is_none() {
        info!(
            target: "tcn",
            "Stopped after max_sweeps ({}) with work still scheduled at tick {:?}",
            config.engine.max_sweeps,
            engine.next_global_tick()
        );
    }
    Ok(summary)
}

/// `[logging]` section as subscriber options.
#[cfg(feature = "observability")]
pub fn logging_options_from_config(config: &TcnConfig) -> tcn_observability::LoggingOptions {
    let format = match config.logging.format {
        tcn_config::LogFormat::Text => tcn_observability::LogFormat::Text,
        tcn_config::LogFormat::Json => tcn_observability::LogFormat::Json,
    };
    tcn_observability::LoggingOptions {
        level: config.logging.level.clone(),
        format,
        log_dir: config.logging.log_dir.clone(),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tcn_npu_neural::{NeuralError, NodeId};

    #[test]
    fn test_default_parameters_match_engine_defaults() {
        let params = parameters_from_config(&TcnConfig::default()).unwrap();
        assert_eq!(params, CascadeParameters::default());
    }

    #[test]
    fn test_explicit_divisors() {
        let mut config = TcnConfig::default();
        config.engine.aggregation_window = 2;
        config.engine.decay_divisors = Some(vec![1, 3, 9]);
        let params = parameters_from_config(&config).unwrap();
        assert_eq!(params.decay.divisors(), &[1, 3, 9]);
        assert_eq!(params.aggregation_window(), 2);
    }

    #[test]
    fn test_window_mismatch_rejected() {
        let mut config = TcnConfig::default();
        config.engine.decay_divisors = Some(vec![1, 2]);
        assert!(matches!(
            parameters_from_config(&config),
            Err(SetupError::Config(ConfigError::InvalidValue(_)))
        ));
    }

    #[test]
    fn test_oversized_halving_window_rejected() {
        let mut config = TcnConfig::default();
        config.engine.aggregation_window = 40;
        assert!(matches!(
            parameters_from_config(&config),
            Err(SetupError::Engine(EngineError::Neural(
                NeuralError::InvalidDecayTable(_)
            )))
        ));
    }

    #[test]
    fn test_invalid_config_blocks_engine() {
        let mut config = TcnConfig::default();
        config.engine.cascade_threshold = 0;
        let network = network_builder_from_config(&TcnConfig::default())
            .unwrap()
            .build();
        assert!(matches!(
            engine_from_config(&config, network),
            Err(SetupError::Config(ConfigError::ValidationError(_)))
        ));
    }

    #[test]
    fn test_options_follow_partitioning() {
        let mut config = TcnConfig::default();
        config.capacity.node_count = 8;
        config.capacity.signal_capacity = Some(64);
        config.partitioning.partitions = 2;
        config.partitioning.parallel = false;

        let network = network_builder_from_config(&config).unwrap().build();
        let options = engine_options_from_config(&config, &network);
        assert_eq!(options.signal_capacity, 64);
        assert_eq!(options.partitions, 2);
        assert_eq!(options.execution, ExecutionMode::Sequential);
    }

    #[test]
    fn test_run_respects_tick_budget() {
        let mut config = TcnConfig::default();
        config.capacity.node_count = 2;
        config.engine.refractory_width = 0;
        config.engine.tick_budget = Some(9);

        let mut builder = network_builder_from_config(&config).unwrap();
        builder.connect(NodeId(0), NodeId(1), 3, 12_000, 0).unwrap();
        builder.connect(NodeId(1), NodeId(0), 3, 12_000, 0).unwrap();
        let mut engine = engine_from_config(&config, builder.build()).unwrap();
        engine.inject(NodeId(0), 12_000, 0).unwrap();

        let summary = run_from_config(&mut engine, &config).unwrap();
        // Ping-pong every 3 ticks: 0, 3, 6, 9
        assert_eq!(summary.sweeps, 4);
        assert_eq!(summary.cascades, 4);
        assert!(!summary.quiescent);
        assert_eq!(engine.next_global_tick(), Some(12));
    }

    #[cfg(feature = "observability")]
    #[test]
    fn test_logging_options_mapping() {
        let mut config = TcnConfig::default();
        config.logging.format = tcn_config::LogFormat::Json;
        config.logging.level = "debug".to_string();
        let options = logging_options_from_config(&config);
        assert_eq!(options.format, tcn_observability::LogFormat::Json);
        assert_eq!(options.level, "debug");
        assert_eq!(options.log_dir, None);
    }
}
