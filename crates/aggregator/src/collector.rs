//! Collection loop: drains a datagram source into a neighbor table.

use std::time::Duration;

use contracts::CollectionConfig;
use ingestion::{parse_beacon, DatagramSource, IngestionError, IngestionMetrics, MetricsSnapshot};
use tokio::time::{timeout, Instant};
use tracing::{debug, info, instrument, trace, warn};

use crate::table::NeighborTable;
use crate::window::{CloseReason, CollectionWindow};

/// Result of one collection window
#[derive(Debug, Clone)]
pub struct CollectionReport {
    /// Latest state per vehicle at close
    pub table: NeighborTable,
    pub reason: CloseReason,
    /// Anchor-to-close time; `None` if nothing was accepted
    pub open_for: Option<Duration>,
    pub metrics: MetricsSnapshot,
}

/// Single-window beacon collector
#[derive(Debug, Clone)]
pub struct Collector {
    config: CollectionConfig,
}

impl Collector {
    pub fn new(config: CollectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CollectionConfig {
        &self.config
    }

    /// Collect beacons from `source` until the window closes.
    ///
    /// Every receive is bounded by the idle timeout; an elapsed receive
    /// closes the window normally. Undecodable and invalid datagrams are
    /// dropped and the loop keeps listening. The source is consumed, so it
    /// is released on return whichever way the loop ends.
    ///
    /// # Errors
    /// Only transport failures from `source.recv()`.
    #[instrument(
        name = "collector_run",
        skip(self, source),
        fields(
            source = source.name(),
            window_ms = self.config.window_ms,
            idle_timeout_ms = self.config.idle_timeout_ms
        )
    )]
    pub async fn run<S: DatagramSource>(
        &self,
        mut source: S,
    ) -> Result<CollectionReport, IngestionError> {
        let idle_timeout = self.config.idle_timeout();
        let mut window = CollectionWindow::new(self.config.window());
        let mut table = NeighborTable::new();
        let metrics = IngestionMetrics::new();

        debug!("waiting for first beacon");

        while !window.is_closed() {
            let datagram = match timeout(idle_timeout, source.recv()).await {
                Ok(Ok(datagram)) => datagram,
                Ok(Err(e)) => {
                    warn!(error = %e, "beacon receive failed, aborting collection");
                    return Err(e);
                }
                Err(_) => {
                    debug!(
                        idle_timeout_ms = self.config.idle_timeout_ms,
                        "no datagram within idle timeout"
                    );
                    window.close(CloseReason::IdleTimeout);
                    break;
                }
            };

            metrics.record_received();
            observability::record_datagram_received(datagram.payload.len());

            match parse_beacon(&datagram.payload) {
                Ok(beacon) => {
                    trace!(id = %beacon.id, ts = beacon.ts, "beacon accepted");
                    table.upsert_beacon(beacon);
                    metrics.record_accepted();
                    observability::record_beacon_accepted(table.len());

                    let first = window.anchor().is_none();
                    window.on_accepted(Instant::now());
                    if first {
                        debug!("window anchored on first beacon");
                    }
                }
                Err(IngestionError::Schema(violation)) => {
                    debug!(
                        reason = violation.reason(),
                        error = %violation,
                        peer = ?datagram.peer,
                        "discarding invalid beacon"
                    );
                    metrics.record_schema_failure();
                    observability::record_beacon_rejected(violation.reason());
                }
                Err(e) => {
                    trace!(error = %e, peer = ?datagram.peer, "discarding undecodable datagram");
                    metrics.record_decode_failure();
                    observability::record_beacon_rejected("decode");
                }
            }
        }

        let reason = window
            .close_reason()
            .unwrap_or(CloseReason::WindowElapsed);
        let open_for = window.open_for();
        observability::record_window_closed(reason.as_str(), open_for);

        let metrics = metrics.snapshot();
        info!(
            reason = reason.as_str(),
            vehicles = table.len(),
            received = metrics.datagrams_received,
            rejected = metrics.rejected(),
            open_for_ms = open_for.map(|d| d.as_millis() as u64),
            "collection window closed"
        );

        Ok(CollectionReport {
            table,
            reason,
            open_for,
            metrics,
        })
    }
}
