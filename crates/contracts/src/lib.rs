//! # Contracts
//!
//! Interface contracts shared by every crate of the neighbor node: beacon and
//! table types, the summary record, node configuration, the sink trait and the
//! common error type. Business crates depend on this crate, never the other
//! way round.
//!
//! ## Time Model
//! - Beacon `ts` is the sender's clock (epoch ms) and is stored, never trusted
//! - Summary `ts` is the node's wall clock (epoch ms) at emission

mod beacon;
mod config;
mod error;
mod sink;
mod summary;
mod vehicle_id;

pub use beacon::*;
pub use config::*;
pub use error::*;
pub use sink::*;
pub use summary::*;
pub use vehicle_id::VehicleId;
