//! Beacon schema validation
//!
//! Checks a decoded JSON value against the beacon shape
//! `{"id": str, "pos": [num, num], "speed": num >= 0, "ts": int}`.
//! The checks run in a fixed order and stop at the first failure. Nothing is
//! coerced or defaulted; unknown extra keys are ignored.

use contracts::{BeaconMessage, Position, VehicleId};
use serde_json::{Map, Value};
use thiserror::Error;

/// Reason a decoded payload is not a beacon
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaViolation {
    #[error("payload is not an object (got {0})")]
    NotAnObject(&'static str),

    #[error("missing field '{0}'")]
    MissingField(&'static str),

    #[error("field '{field}' must be {expected}, got {found}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("pos must have exactly 2 elements, got {0}")]
    PosArity(usize),

    #[error("speed must be >= 0, got {0}")]
    NegativeSpeed(f64),

    #[error("ts {0} does not fit in a signed 64-bit integer")]
    TsOutOfRange(u64),
}

impl SchemaViolation {
    /// Short label for metrics
    pub fn reason(&self) -> &'static str {
        match self {
            Self::NotAnObject(_) => "not_an_object",
            Self::MissingField(_) => "missing_field",
            Self::WrongType { .. } => "wrong_type",
            Self::PosArity(_) => "pos_arity",
            Self::NegativeSpeed(_) => "negative_speed",
            Self::TsOutOfRange(_) => "ts_out_of_range",
        }
    }
}

/// Validate a decoded value and build the beacon it describes.
pub fn validate_beacon(value: &Value) -> Result<BeaconMessage, SchemaViolation> {
    let obj = value
        .as_object()
        .ok_or_else(|| SchemaViolation::NotAnObject(kind(value)))?;

    let id_value = require(obj, "id")?;
    let id = id_value
        .as_str()
        .ok_or_else(|| wrong_type("id", "a string", id_value))?;

    let pos = parse_pos(require(obj, "pos")?)?;

    let speed_value = require(obj, "speed")?;
    let speed = speed_value
        .as_f64()
        .ok_or_else(|| wrong_type("speed", "a number", speed_value))?;
    if speed < 0.0 {
        return Err(SchemaViolation::NegativeSpeed(speed));
    }

    let ts = parse_ts(require(obj, "ts")?)?;

    Ok(BeaconMessage {
        id: VehicleId::from(id),
        pos,
        speed,
        ts,
    })
}

/// `true` when `value` is a well-formed beacon
pub fn is_valid_beacon(value: &Value) -> bool {
    validate_beacon(value).is_ok()
}

fn require<'a>(obj: &'a Map<String, Value>, field: &'static str) -> Result<&'a Value, SchemaViolation> {
    obj.get(field).ok_or(SchemaViolation::MissingField(field))
}

fn parse_pos(value: &Value) -> Result<Position, SchemaViolation> {
    let items = value
        .as_array()
        .ok_or_else(|| wrong_type("pos", "an array", value))?;

    let [x, y] = items.as_slice() else {
        return Err(SchemaViolation::PosArity(items.len()));
    };

    let x = x.as_f64().ok_or_else(|| wrong_type("pos", "numeric elements", x))?;
    let y = y.as_f64().ok_or_else(|| wrong_type("pos", "numeric elements", y))?;
    Ok(Position::new(x, y))
}

// JSON floats (even `1000.0`) are not integers here.
fn parse_ts(value: &Value) -> Result<i64, SchemaViolation> {
    let Value::Number(n) = value else {
        return Err(wrong_type("ts", "an integer", value));
    };
    if let Some(ts) = n.as_i64() {
        return Ok(ts);
    }
    match n.as_u64() {
        Some(big) => Err(SchemaViolation::TsOutOfRange(big)),
        None => Err(wrong_type("ts", "an integer", value)),
    }
}

fn wrong_type(field: &'static str, expected: &'static str, found: &Value) -> SchemaViolation {
    SchemaViolation::WrongType {
        field,
        expected,
        found: kind(found),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
