//! FileSink - appends summaries to a JSON-lines file

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use contracts::{ContractError, NeighborSummary, SummarySink};
use tokio::fs::{File, OpenOptions};
use tracing::{debug, instrument};

use super::JsonLineSink;

/// Configuration for FileSink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSinkConfig {
    /// Output file; created if missing, appended to otherwise
    pub path: PathBuf,
}

impl FileSinkConfig {
    /// Create config from params map (`path` is required)
    pub fn from_params(
        name: &str,
        params: &HashMap<String, String>,
    ) -> Result<Self, ContractError> {
        let path = params
            .get("path")
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| ContractError::sink_open(name, "missing 'path' param"))?;

        Ok(Self {
            path: PathBuf::from(path),
        })
    }
}

/// Sink that appends one JSON line per summary to a file
pub struct FileSink {
    path: PathBuf,
    inner: JsonLineSink<File>,
}

impl FileSink {
    /// Open (or create) the target file in append mode
    #[instrument(name = "file_sink_open", skip(name), fields(path = %config.path.display()))]
    pub async fn open(name: impl Into<String>, config: FileSinkConfig) -> Result<Self, ContractError> {
        let name = name.into();

        if let Some(parent) = config.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ContractError::sink_open(&name, e.to_string()))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.path)
            .await
            .map_err(|e| ContractError::sink_open(&name, e.to_string()))?;

        debug!(sink = %name, "FileSink opened");
        Ok(Self {
            path: config.path,
            inner: JsonLineSink::new(name, file),
        })
    }

    /// Create from params map (for factory)
    pub async fn from_params(
        name: impl Into<String>,
        params: &HashMap<String, String>,
    ) -> Result<Self, ContractError> {
        let name = name.into();
        let config = FileSinkConfig::from_params(&name, params)?;
        Self::open(name, config).await
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SummarySink for FileSink {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn write(&mut self, summary: &NeighborSummary) -> Result<(), ContractError> {
        self.inner.write(summary).await
    }

    async fn flush(&mut self) -> Result<(), ContractError> {
        self.inner.flush().await
    }

    async fn close(&mut self) -> Result<(), ContractError> {
        self.inner.flush().await?;
        self.inner
            .get_ref()
            .sync_all()
            .await
            .map_err(|e| ContractError::sink_write(self.inner.name(), e.to_string()))?;
        debug!(sink = %self.inner.name(), path = %self.path.display(), "FileSink closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::SUMMARY_TOPIC;
    use tempfile::tempdir;

    fn summary(count: usize, ts: i64) -> NeighborSummary {
        NeighborSummary {
            topic: SUMMARY_TOPIC.to_string(),
            count,
            nearest: None,
            ts,
        }
    }

    #[tokio::test]
    async fn test_file_sink_appends() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("summaries.jsonl");

        for ts in [1, 2] {
            let mut sink = FileSink::open("file", FileSinkConfig { path: path.clone() })
                .await
                .unwrap();
            sink.write(&summary(0, ts)).await.unwrap();
            sink.close().await.unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        let second: NeighborSummary = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second.ts, 2);
    }

    #[test]
    fn test_missing_path_param() {
        let err = FileSinkConfig::from_params("file", &HashMap::new()).unwrap_err();
        assert!(matches!(err, ContractError::SinkOpen { .. }));
    }

    #[tokio::test]
    async fn test_from_params() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.jsonl");
        let params = HashMap::from([("path".to_string(), path.display().to_string())]);

        let sink = FileSink::from_params("file", &params).await.unwrap();
        assert_eq!(sink.path(), path.as_path());
        assert_eq!(sink.name(), "file");
    }
}
