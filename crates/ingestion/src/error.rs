//! Ingestion 错误类型

use std::net::SocketAddr;

use thiserror::Error;

use crate::validator::SchemaViolation;

/// Ingestion 错误
#[derive(Debug, Error)]
pub enum IngestionError {
    /// 载荷不是合法的 UTF-8 JSON
    #[error("failed to decode datagram: {message}")]
    Decode {
        /// 错误消息
        message: String,
    },

    /// 载荷可解码但不符合 beacon 结构
    #[error("beacon rejected: {0}")]
    Schema(#[from] SchemaViolation),

    /// 无法绑定监听端点
    #[error("failed to bind beacon endpoint {addr}: {source}")]
    Bind {
        /// 监听地址
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// 接收失败 (非超时)
    #[error("failed to receive datagram: {0}")]
    Receive(#[source] std::io::Error),
}

impl IngestionError {
    /// Whether the loop should drop this datagram and keep listening
    pub fn is_discardable(&self) -> bool {
        matches!(self, Self::Decode { .. } | Self::Schema(_))
    }
}

/// Ingestion Result 类型别名
pub type Result<T> = std::result::Result<T, IngestionError>;
