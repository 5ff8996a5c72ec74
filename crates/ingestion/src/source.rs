//! DatagramSource trait - beacon channel abstraction
//!
//! The collection loop only sees this trait, so the real UDP endpoint and
//! the scripted mock are interchangeable. A source is released when it is
//! dropped.

use std::net::SocketAddr;

use bytes::Bytes;

use crate::error::Result;

/// One raw datagram as read from the channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Datagram {
    /// Untrusted payload bytes
    pub payload: Bytes,

    /// Sender address, when the transport knows it
    pub peer: Option<SocketAddr>,
}

impl Datagram {
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
            peer: None,
        }
    }
}

/// Beacon channel
#[trait_variant::make(DatagramSource: Send)]
pub trait LocalDatagramSource {
    /// Source name (used for logging)
    fn name(&self) -> &str;

    /// Wait for the next datagram
    ///
    /// Must be cancel-safe: the loop bounds every call with a timeout and
    /// drops the future when it elapses.
    ///
    /// # Errors
    /// Transport failures only; payload content is never inspected here.
    async fn recv(&mut self) -> Result<Datagram>;
}
