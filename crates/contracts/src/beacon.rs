//! BeaconMessage / NeighborRecord - Ingestion output and table state
//!
//! A `BeaconMessage` only exists after the payload passed validation;
//! the raw wire form is an untrusted JSON object.

use serde::{Deserialize, Serialize};

use crate::VehicleId;

/// Planar position in meters, relative to the origin.
///
/// Encoded on the wire as a two-element array `[x, y]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for Position {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Position> for [f64; 2] {
    fn from(pos: Position) -> Self {
        [pos.x, pos.y]
    }
}

/// A validated vehicle beacon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeaconMessage {
    /// Sender identity
    pub id: VehicleId,

    /// Reported position
    pub pos: Position,

    /// Speed (m/s), never negative
    pub speed: f64,

    /// Sender timestamp (epoch milliseconds)
    pub ts: i64,
}

/// Latest known state of one vehicle.
///
/// Overwritten whole by every accepted beacon from the same id.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NeighborRecord {
    pub pos: Position,
    pub speed: f64,
    pub last_ts: i64,
}

impl From<&BeaconMessage> for NeighborRecord {
    fn from(beacon: &BeaconMessage) -> Self {
        Self {
            pos: beacon.pos,
            speed: beacon.speed,
            last_ts: beacon.ts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_wire_form() {
        let pos = Position::new(3.0, -4.5);
        assert_eq!(serde_json::to_string(&pos).unwrap(), "[3.0,-4.5]");

        let parsed: Position = serde_json::from_str("[1, 2]").unwrap();
        assert_eq!(parsed, Position::new(1.0, 2.0));
    }

    #[test]
    fn test_beacon_serializes_in_wire_shape() {
        let beacon = BeaconMessage {
            id: "veh_1".into(),
            pos: Position::new(3.0, 4.0),
            speed: 10.0,
            ts: 1000,
        };
        let value = serde_json::to_value(&beacon).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"id": "veh_1", "pos": [3.0, 4.0], "speed": 10.0, "ts": 1000})
        );
    }

    #[test]
    fn test_record_from_beacon() {
        let beacon = BeaconMessage {
            id: "veh_1".into(),
            pos: Position::new(1.0, 1.0),
            speed: 2.5,
            ts: 42,
        };
        let record = NeighborRecord::from(&beacon);
        assert_eq!(record.pos, beacon.pos);
        assert_eq!(record.speed, 2.5);
        assert_eq!(record.last_ts, 42);
    }
}
