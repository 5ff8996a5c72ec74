//! `run` command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use aggregator::{build_summary, Collector};
use config_loader::ConfigLoader;
use contracts::NodeConfig;
use dispatcher::SummaryEmitter;
use ingestion::UdpBeaconSource;

use crate::cli::RunArgs;

/// Execute the `run` command
///
/// Binds the beacon endpoint, collects one window, and emits exactly one
/// summary. Bind failure and invalid configuration are fatal before any
/// collection starts.
pub async fn run_collect(args: &RunArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    apply_overrides(&mut config, args);
    ConfigLoader::validate(&config).context("Invalid configuration")?;

    let addr = config
        .listen
        .socket_addr()
        .context("Invalid listen address")?;

    info!(
        addr = %addr,
        window_ms = config.collection.window_ms,
        idle_timeout_ms = config.collection.idle_timeout_ms,
        sinks = config.sinks.len(),
        "Configuration loaded"
    );

    let emitter = SummaryEmitter::from_configs(&config.sinks)
        .await
        .context("Failed to open summary sinks")?;

    let source = UdpBeaconSource::bind(addr, config.collection.max_datagram_bytes)
        .await
        .with_context(|| format!("Failed to bind beacon endpoint {addr}"))?;

    let report = Collector::new(config.collection.clone())
        .run(source)
        .await
        .context("Beacon collection failed")?;

    let summary = build_summary(&config.summary.topic, &report.table);
    emitter
        .emit(&summary)
        .await
        .context("Failed to emit summary")?;

    info!(
        vehicles = summary.count,
        reason = report.reason.as_str(),
        rejected = report.metrics.rejected(),
        "V2X neighbor node finished"
    );
    Ok(())
}

/// Load the config file, or fall back to built-in defaults when none is given
fn load_config(path: Option<&Path>) -> Result<NodeConfig> {
    let Some(path) = path else {
        info!("No configuration file given, using defaults");
        return Ok(NodeConfig::default());
    };

    info!(config = %path.display(), "Loading configuration");
    if !path.exists() {
        anyhow::bail!("Configuration file not found: {}", path.display());
    }
    ConfigLoader::load_from_path(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}

/// Apply CLI overrides on top of the loaded configuration
fn apply_overrides(config: &mut NodeConfig, args: &RunArgs) {
    if let Some(ref host) = args.host {
        info!(host = %host, "Overriding listen host from CLI");
        config.listen.host = host.clone();
    }
    if let Some(port) = args.port {
        info!(port, "Overriding listen port from CLI");
        config.listen.port = port;
    }
    if let Some(window_ms) = args.window_ms {
        config.collection.window_ms = window_ms;
    }
    if let Some(idle_timeout_ms) = args.idle_timeout_ms {
        config.collection.idle_timeout_ms = idle_timeout_ms;
    }
}
