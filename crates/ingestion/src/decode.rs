//! Datagram payload decoding

use contracts::BeaconMessage;
use serde_json::Value;

use crate::error::{IngestionError, Result};
use crate::validator::validate_beacon;

/// Decode a raw payload as UTF-8 JSON.
///
/// Invalid UTF-8, malformed JSON and trailing garbage are all decode failures.
pub fn decode_payload(payload: &[u8]) -> Result<Value> {
    serde_json::from_slice(payload).map_err(|e| IngestionError::Decode {
        message: e.to_string(),
    })
}

/// Decode and validate a raw payload in one step.
pub fn parse_beacon(payload: &[u8]) -> Result<BeaconMessage> {
    let value = decode_payload(payload)?;
    Ok(validate_beacon(&value)?)
}
