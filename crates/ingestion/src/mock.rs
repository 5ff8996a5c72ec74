//! Mock 数据报源
//!
//! 按脚本投递数据报，用于无网络环境的测试。

use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use serde_json::Value;
use tracing::{debug, trace};

use crate::error::{IngestionError, Result};
use crate::source::{Datagram, DatagramSource};

#[derive(Debug)]
enum Step {
    Payload(Bytes),
    Fail(io::ErrorKind),
}

#[derive(Debug)]
struct ScriptedStep {
    delay: Duration,
    step: Step,
}

/// Mock 数据报源
///
/// Each step waits its delay (measured from the previous `recv` returning)
/// and then yields its datagram. Once the script is exhausted the source goes
/// silent forever. A step whose delay exceeds the caller's timeout is
/// consumed without being delivered.
#[derive(Debug, Default)]
pub struct MockDatagramSource {
    script: VecDeque<ScriptedStep>,
    released: Arc<AtomicBool>,
}

impl MockDatagramSource {
    /// 创建空脚本 (立即静默)
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加原始字节载荷
    pub fn then(mut self, delay: Duration, payload: impl Into<Bytes>) -> Self {
        self.script.push_back(ScriptedStep {
            delay,
            step: Step::Payload(payload.into()),
        });
        self
    }

    /// 追加 JSON 载荷
    pub fn then_json(self, delay: Duration, value: &Value) -> Self {
        self.then(delay, value.to_string())
    }

    /// 追加一次接收失败
    pub fn then_fail(mut self, delay: Duration, kind: io::ErrorKind) -> Self {
        self.script.push_back(ScriptedStep {
            delay,
            step: Step::Fail(kind),
        });
        self
    }

    /// 剩余脚本步数
    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    /// 释放标志：源被 drop 后置为 true
    pub fn release_flag(&self) -> Arc<AtomicBool> {
        self.released.clone()
    }
}

impl DatagramSource for MockDatagramSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn recv(&mut self) -> Result<Datagram> {
        let Some(next) = self.script.pop_front() else {
            trace!("mock script exhausted, staying silent");
            return std::future::pending::<Result<Datagram>>().await;
        };

        tokio::time::sleep(next.delay).await;

        match next.step {
            Step::Payload(payload) => Ok(Datagram::new(payload)),
            Step::Fail(kind) => Err(IngestionError::Receive(io::Error::new(
                kind,
                "scripted receive failure",
            ))),
        }
    }
}

impl Drop for MockDatagramSource {
    fn drop(&mut self) {
        self.released.store(true, Ordering::SeqCst);
        debug!(remaining = self.script.len(), "mock datagram source released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test(start_paused = true)]
    async fn test_delivers_in_order_with_delays() {
        let mut source = MockDatagramSource::new()
            .then(Duration::from_millis(10), "first")
            .then_json(Duration::from_millis(20), &json!({"id": "veh_1"}));

        let start = tokio::time::Instant::now();
        assert_eq!(&source.recv().await.unwrap().payload[..], b"first");
        assert_eq!(start.elapsed(), Duration::from_millis(10));

        let second = source.recv().await.unwrap();
        assert_eq!(&second.payload[..], br#"{"id":"veh_1"}"#);
        assert_eq!(start.elapsed(), Duration::from_millis(30));
        assert_eq!(source.remaining(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_silent_after_script() {
        let mut source = MockDatagramSource::new();
        let result = tokio::time::timeout(Duration::from_secs(5), source.recv()).await;
        assert!(result.is_err(), "exhausted source must never yield");
    }

    #[tokio::test(start_paused = true)]
    async fn test_scripted_failure() {
        let mut source =
            MockDatagramSource::new().then_fail(Duration::ZERO, io::ErrorKind::ConnectionReset);
        let err = source.recv().await.unwrap_err();
        assert!(matches!(err, IngestionError::Receive(_)));
        assert!(!err.is_discardable());
    }

    #[test]
    fn test_release_flag_set_on_drop() {
        let source = MockDatagramSource::new();
        let flag = source.release_flag();
        assert!(!flag.load(Ordering::SeqCst));
        drop(source);
        assert!(flag.load(Ordering::SeqCst));
    }
}
