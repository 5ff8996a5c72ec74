//! UdpBeaconSource - the loopback beacon endpoint

use std::net::SocketAddr;

use bytes::Bytes;
use tokio::net::UdpSocket;
use tracing::{debug, instrument, trace};

use crate::error::{IngestionError, Result};
use crate::source::{Datagram, DatagramSource};

/// UDP beacon endpoint
///
/// Holds the only socket the node binds. Dropping the source closes it.
pub struct UdpBeaconSource {
    socket: UdpSocket,
    local_addr: SocketAddr,
    buf: Vec<u8>,
}

impl UdpBeaconSource {
    /// Bind the endpoint
    ///
    /// Datagrams longer than `max_datagram_bytes` are truncated by the
    /// kernel and will fail to decode downstream.
    ///
    /// # Errors
    /// `IngestionError::Bind` when the address is taken or not local.
    #[instrument(name = "udp_beacon_source_bind", skip(max_datagram_bytes))]
    pub async fn bind(addr: SocketAddr, max_datagram_bytes: usize) -> Result<Self> {
        let socket = UdpSocket::bind(addr)
            .await
            .map_err(|source| IngestionError::Bind { addr, source })?;
        let local_addr = socket
            .local_addr()
            .map_err(|source| IngestionError::Bind { addr, source })?;

        debug!(addr = %local_addr, max_datagram_bytes, "beacon endpoint bound");

        Ok(Self {
            socket,
            local_addr,
            buf: vec![0u8; max_datagram_bytes],
        })
    }

    /// Actual bound address (resolves port 0)
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

impl DatagramSource for UdpBeaconSource {
    fn name(&self) -> &str {
        "udp"
    }

    async fn recv(&mut self) -> Result<Datagram> {
        let (len, peer) = self
            .socket
            .recv_from(&mut self.buf)
            .await
            .map_err(IngestionError::Receive)?;

        trace!(peer = %peer, bytes = len, "datagram received");

        Ok(Datagram {
            payload: Bytes::copy_from_slice(&self.buf[..len]),
            peer: Some(peer),
        })
    }
}

impl Drop for UdpBeaconSource {
    fn drop(&mut self) {
        debug!(addr = %self.local_addr, "beacon endpoint released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn bind_ephemeral(max: usize) -> UdpBeaconSource {
        UdpBeaconSource::bind("127.0.0.1:0".parse().unwrap(), max)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_receive_datagram() {
        let mut source = bind_ephemeral(4096).await;
        let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        sender
            .send_to(br#"{"id":"veh_1"}"#, source.local_addr())
            .await
            .unwrap();

        let datagram = source.recv().await.unwrap();
        assert_eq!(&datagram.payload[..], br#"{"id":"veh_1"}"#);
        assert_eq!(datagram.peer, Some(sender.local_addr().unwrap()));
    }

    #[tokio::test]
    async fn test_oversized_datagram_is_truncated() {
        let mut source = bind_ephemeral(8).await;
        let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        sender
            .send_to(b"0123456789abcdef", source.local_addr())
            .await
            .unwrap();

        let datagram = source.recv().await.unwrap();
        assert_eq!(&datagram.payload[..], b"01234567");
    }

    #[tokio::test]
    async fn test_bind_conflict_reports_address() {
        let first = bind_ephemeral(16).await;
        let addr = first.local_addr();

        let err = UdpBeaconSource::bind(addr, 16).await.err().unwrap();
        match err {
            IngestionError::Bind { addr: reported, .. } => assert_eq!(reported, addr),
            other => panic!("expected bind error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_drop_releases_port() {
        let source = bind_ephemeral(16).await;
        let addr = source.local_addr();
        drop(source);

        let rebound = UdpBeaconSource::bind(addr, 16).await;
        assert!(rebound.is_ok());
    }
}
