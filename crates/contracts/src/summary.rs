//! NeighborSummary - Summary Emitter input
//!
//! The single record a run produces.

use serde::{Deserialize, Serialize};

use crate::VehicleId;

/// Default topic stamped on the summary
pub const SUMMARY_TOPIC: &str = "/v2x/neighbor_summary";

/// Closest vehicle to the origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearestNeighbor {
    /// Vehicle id
    pub id: VehicleId,

    /// Distance to origin, truncated to two decimals
    pub dist: f64,
}

/// Summary of one collection window
///
/// Serialized field order is `topic, count, nearest, ts`; `nearest` is
/// `null` when no vehicle was heard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighborSummary {
    pub topic: String,

    /// Number of distinct vehicle ids heard
    pub count: usize,

    pub nearest: Option<NearestNeighbor>,

    /// Emission time (epoch milliseconds)
    pub ts: i64,
}

impl NeighborSummary {
    /// Encode as one JSON line (no trailing newline)
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
