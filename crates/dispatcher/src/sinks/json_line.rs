//! JsonLineSink - one JSON document per line on any async writer

use contracts::{ContractError, NeighborSummary, SummarySink};
use tokio::io::{AsyncWrite, AsyncWriteExt, Stdout};
use tracing::{debug, instrument};

/// Sink that writes each summary as a single newline-terminated JSON line
///
/// Backs both the stdout sink and the file sink.
pub struct JsonLineSink<W> {
    name: String,
    writer: W,
}

impl<W> JsonLineSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(name: impl Into<String>, writer: W) -> Self {
        Self {
            name: name.into(),
            writer,
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_error(&self, e: impl std::fmt::Display) -> ContractError {
        ContractError::sink_write(&self.name, e.to_string())
    }
}

impl JsonLineSink<Stdout> {
    /// Process stdout. The only writer of stdout in the node.
    pub fn stdout(name: impl Into<String>) -> Self {
        Self::new(name, tokio::io::stdout())
    }
}

impl<W> SummarySink for JsonLineSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "json_line_sink_write",
        skip(self, summary),
        fields(sink = %self.name, count = summary.count)
    )]
    async fn write(&mut self, summary: &NeighborSummary) -> Result<(), ContractError> {
        let mut line = summary.to_json_line().map_err(|e| self.write_error(e))?;
        line.push('\n');
        self.writer
            .write_all(line.as_bytes())
            .await
            .map_err(|e| self.write_error(e))
    }

    #[instrument(name = "json_line_sink_flush", skip(self))]
    async fn flush(&mut self) -> Result<(), ContractError> {
        self.writer.flush().await.map_err(|e| self.write_error(e))
    }

    #[instrument(name = "json_line_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), ContractError> {
        self.writer.flush().await.map_err(|e| self.write_error(e))?;
        debug!(sink = %self.name, "JsonLineSink closed");
        Ok(())
    }
}
