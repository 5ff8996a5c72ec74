//! Summary construction.

use chrono::Utc;
use contracts::NeighborSummary;

use crate::distance::nearest_neighbor;
use crate::table::NeighborTable;

/// Build the summary for a closed window, stamped with the current wall
/// clock in epoch milliseconds.
pub fn build_summary(topic: &str, table: &NeighborTable) -> NeighborSummary {
    build_summary_at(topic, table, Utc::now().timestamp_millis())
}

/// Same as [`build_summary`] with an explicit timestamp.
pub fn build_summary_at(topic: &str, table: &NeighborTable, ts: i64) -> NeighborSummary {
    NeighborSummary {
        topic: topic.to_string(),
        count: table.len(),
        nearest: nearest_neighbor(table),
        ts,
    }
}
