//! NodeConfig - Config Loader output
//!
//! Describes the listening endpoint, the collection window, the summary topic
//! and the output routing. Every field has a default, so an empty document is
//! a complete configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::{AddrParseError, IpAddr, SocketAddr};
use std::time::Duration;

use crate::SUMMARY_TOPIC;

/// Full node configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Beacon endpoint
    pub listen: ListenConfig,

    /// Window and receive bounds
    pub collection: CollectionConfig,

    /// Summary record settings
    pub summary: SummaryConfig,

    /// Output routing
    pub sinks: Vec<SinkConfig>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            listen: ListenConfig::default(),
            collection: CollectionConfig::default(),
            summary: SummaryConfig::default(),
            sinks: vec![SinkConfig::stdout()],
        }
    }
}

/// Beacon endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenConfig {
    /// Bind address (loopback by default)
    pub host: String,

    /// Beacon port
    pub port: u16,

    /// Port reserved for tick signals; never bound, only checked against `port`
    pub tick_port: u16,
}

impl ListenConfig {
    /// Socket address to bind; fails when `host` is not an IP literal
    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        let ip: IpAddr = self.host.parse()?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5005,
            tick_port: 5006,
        }
    }
}

/// Collection window configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    /// Window length, anchored at the first accepted beacon (ms)
    pub window_ms: u64,

    /// Maximum wait for any datagram before the loop gives up (ms)
    pub idle_timeout_ms: u64,

    /// Receive buffer size; longer datagrams are truncated
    pub max_datagram_bytes: usize,
}

impl CollectionConfig {
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            window_ms: 1000,
            idle_timeout_ms: 1500,
            max_datagram_bytes: 4096,
        }
    }
}

/// Summary record configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    pub topic: String,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            topic: SUMMARY_TOPIC.to_string(),
        }
    }
}

/// Sink configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Sink name (used in logs/metrics)
    pub name: String,

    /// Sink type
    pub sink_type: SinkType,

    /// Sink-specific parameters (e.g. `path` for file sinks)
    #[serde(default)]
    pub params: HashMap<String, String>,
}

impl SinkConfig {
    pub fn stdout() -> Self {
        Self {
            name: "stdout".to_string(),
            sink_type: SinkType::Stdout,
            params: HashMap::new(),
        }
    }
}

/// Sink type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkType {
    /// One JSON line on stdout
    Stdout,
    /// Structured tracing event
    Log,
    /// Appended JSON line in a file
    File,
}
