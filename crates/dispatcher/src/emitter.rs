//! SummaryEmitter - writes the run's single summary to every configured sink

use std::collections::HashSet;

use tokio::io::Stdout;
use tracing::{debug, info, instrument, warn};

use contracts::{ContractError, NeighborSummary, SinkConfig, SinkType, SummarySink};

use crate::error::DispatcherError;
use crate::sinks::{FileSink, JsonLineSink, LogSink};

/// A sink built from `SinkConfig`
pub enum ConfiguredSink {
    Stdout(JsonLineSink<Stdout>),
    Log(LogSink),
    File(FileSink),
}

impl SummarySink for ConfiguredSink {
    fn name(&self) -> &str {
        match self {
            Self::Stdout(sink) => sink.name(),
            Self::Log(sink) => sink.name(),
            Self::File(sink) => sink.name(),
        }
    }

    async fn write(&mut self, summary: &NeighborSummary) -> Result<(), ContractError> {
        match self {
            Self::Stdout(sink) => sink.write(summary).await,
            Self::Log(sink) => sink.write(summary).await,
            Self::File(sink) => sink.write(summary).await,
        }
    }

    async fn flush(&mut self) -> Result<(), ContractError> {
        match self {
            Self::Stdout(sink) => sink.flush().await,
            Self::Log(sink) => sink.flush().await,
            Self::File(sink) => sink.flush().await,
        }
    }

    async fn close(&mut self) -> Result<(), ContractError> {
        match self {
            Self::Stdout(sink) => sink.close().await,
            Self::Log(sink) => sink.close().await,
            Self::File(sink) => sink.close().await,
        }
    }
}

/// Create a sink from configuration
#[instrument(
    name = "emitter_create_sink",
    skip(config),
    fields(sink = %config.name, sink_type = ?config.sink_type)
)]
pub async fn create_sink(config: &SinkConfig) -> Result<ConfiguredSink, DispatcherError> {
    match config.sink_type {
        SinkType::Stdout => Ok(ConfiguredSink::Stdout(JsonLineSink::stdout(&config.name))),
        SinkType::Log => Ok(ConfiguredSink::Log(LogSink::new(&config.name))),
        SinkType::File => {
            let sink = FileSink::from_params(&config.name, &config.params)
                .await
                .map_err(|e| DispatcherError::sink_creation(&config.name, e.to_string()))?;
            Ok(ConfiguredSink::File(sink))
        }
    }
}

/// Per-sink outcome of one emission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitReport {
    /// Sinks that wrote, flushed and closed cleanly
    pub succeeded: Vec<String>,
    /// Sinks that failed, with the error message
    pub failed: Vec<(String, String)>,
}

/// Fan-out of one summary to a fixed set of sinks
///
/// `emit` consumes the emitter: each sink receives exactly one record and
/// is closed afterwards. A failure of a required sink fails the emission
/// even if other sinks succeeded.
pub struct SummaryEmitter<S = ConfiguredSink> {
    sinks: Vec<S>,
    required: HashSet<String>,
}

impl SummaryEmitter<ConfiguredSink> {
    /// Build every configured sink; fails on the first sink that cannot open.
    ///
    /// Stdout sinks are required.
    #[instrument(
        name = "emitter_from_configs",
        skip(configs),
        fields(sink_count = configs.len())
    )]
    pub async fn from_configs(configs: &[SinkConfig]) -> Result<Self, DispatcherError> {
        let mut sinks = Vec::with_capacity(configs.len());
        let mut required = HashSet::new();
        for config in configs {
            if config.sink_type == SinkType::Stdout {
                required.insert(config.name.clone());
            }
            sinks.push(create_sink(config).await?);
        }
        Ok(Self { sinks, required })
    }
}

impl<S: SummarySink> SummaryEmitter<S> {
    /// Create an emitter with custom sinks (for testing)
    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self {
            sinks,
            required: HashSet::new(),
        }
    }

    /// Mark the sink called `name` as required
    pub fn require(mut self, name: impl Into<String>) -> Self {
        self.required.insert(name.into());
        self
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.contains(name)
    }

    pub fn sink_names(&self) -> Vec<&str> {
        self.sinks.iter().map(|s| s.name()).collect()
    }

    /// Write `summary` to every sink, then flush and close each.
    ///
    /// A failing sink is logged and counted without affecting the others.
    ///
    /// # Errors
    /// `RequiredSinkFailed` when a required sink failed, otherwise
    /// `AllSinksFailed` when no sink succeeded.
    #[instrument(
        name = "emitter_emit",
        skip(self, summary),
        fields(sinks = self.sinks.len(), count = summary.count)
    )]
    pub async fn emit(self, summary: &NeighborSummary) -> Result<EmitReport, DispatcherError> {
        observability::record_summary(summary);

        let mut report = EmitReport::default();
        let mut required_failure = None;
        for mut sink in self.sinks {
            let name = sink.name().to_string();
            match Self::deliver(&mut sink, summary).await {
                Ok(()) => {
                    debug!(sink = %name, "summary delivered");
                    observability::record_summary_emitted(&name, true);
                    report.succeeded.push(name);
                }
                Err(e) => {
                    warn!(sink = %name, error = %e, "summary delivery failed");
                    observability::record_summary_emitted(&name, false);
                    if required_failure.is_none() && self.required.contains(&name) {
                        required_failure = Some((name.clone(), e.to_string()));
                    }
                    report.failed.push((name, e.to_string()));
                }
            }
        }

        if let Some((name, message)) = required_failure {
            return Err(DispatcherError::RequiredSinkFailed { name, message });
        }

        if report.succeeded.is_empty() && !report.failed.is_empty() {
            return Err(DispatcherError::AllSinksFailed {
                count: report.failed.len(),
            });
        }

        info!(
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            "summary emitted"
        );
        Ok(report)
    }

    async fn deliver(sink: &mut S, summary: &NeighborSummary) -> Result<(), ContractError> {
        let written = match sink.write(summary).await {
            Ok(()) => sink.flush().await,
            Err(e) => Err(e),
        };
        // Close even after a failed write; the first error wins.
        let closed = sink.close().await;
        written.and(closed)
    }
}
