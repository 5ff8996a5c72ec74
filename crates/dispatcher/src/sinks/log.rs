//! LogSink - emits the summary as a tracing event

use contracts::{ContractError, NeighborSummary, SummarySink};
use tracing::{info, instrument};

/// Sink that logs summaries for debugging
pub struct LogSink {
    name: String,
}

impl LogSink {
    /// Create a new LogSink with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    fn log_summary(&self, summary: &NeighborSummary) {
        let (nearest_id, nearest_dist) = match &summary.nearest {
            Some(nearest) => (Some(nearest.id.as_str()), Some(nearest.dist)),
            None => (None, None),
        };

        info!(
            sink = %self.name,
            topic = %summary.topic,
            count = summary.count,
            nearest_id,
            nearest_dist,
            ts = summary.ts,
            "NeighborSummary emitted"
        );
    }
}

impl SummarySink for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "log_sink_write",
        skip(self, summary),
        fields(sink = %self.name)
    )]
    async fn write(&mut self, summary: &NeighborSummary) -> Result<(), ContractError> {
        self.log_summary(summary);
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), ContractError> {
        Ok(())
    }

    async fn close(&mut self) -> Result<(), ContractError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{NearestNeighbor, SUMMARY_TOPIC};

    #[tokio::test]
    async fn test_log_sink_write() {
        let mut sink = LogSink::new("test_log");
        let summary = NeighborSummary {
            topic: SUMMARY_TOPIC.to_string(),
            count: 2,
            nearest: Some(NearestNeighbor {
                id: "veh_2".into(),
                dist: 1.41,
            }),
            ts: 1,
        };

        assert!(sink.write(&summary).await.is_ok());
        assert!(sink.close().await.is_ok());
    }

    #[tokio::test]
    async fn test_log_sink_name() {
        let sink = LogSink::new("my_logger");
        assert_eq!(sink.name(), "my_logger");
    }
}
