//! # Ingestion
//!
//! Beacon ingestion module.
//!
//! Responsibilities:
//! - Own the beacon channel (`UdpBeaconSource`, or `MockDatagramSource` in tests)
//! - Decode untrusted datagram payloads as JSON
//! - Validate decoded values into `BeaconMessage`
//! - Count what was received, rejected and accepted
//!
//! ## Usage Example
//!
//! ```ignore
//! use ingestion::{parse_beacon, DatagramSource, UdpBeaconSource};
//!
//! let mut source = UdpBeaconSource::bind("127.0.0.1:5005".parse()?, 4096).await?;
//! let datagram = source.recv().await?;
//! match parse_beacon(&datagram.payload) {
//!     Ok(beacon) => println!("{} at {:?}", beacon.id, beacon.pos),
//!     Err(e) if e.is_discardable() => {} // skip and keep listening
//!     Err(e) => return Err(e.into()),
//! }
//! ```

mod decode;
mod error;
mod metrics;
mod mock;
mod source;
mod udp;
mod validator;

// Re-exports
pub use contracts::BeaconMessage;
pub use decode::{decode_payload, parse_beacon};
pub use error::{IngestionError, Result};
pub use metrics::{IngestionMetrics, MetricsSnapshot};
pub use mock::MockDatagramSource;
pub use source::{Datagram, DatagramSource, LocalDatagramSource};
pub use udp::UdpBeaconSource;
pub use validator::{is_valid_beacon, validate_beacon, SchemaViolation};
