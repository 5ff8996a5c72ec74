//! # Dispatcher
//!
//! 摘要分发模块。
//!
//! 负责：
//! - 按 `SinkConfig` 构建 sinks (stdout / log / file)
//! - 将唯一一条 `NeighborSummary` 写入每个 sink，随后 flush 并关闭
//! - 单个 sink 失败只记录，不影响其他 sink

pub mod emitter;
pub mod error;
pub mod sinks;

pub use contracts::{NeighborSummary, SummarySink};
pub use emitter::{create_sink, ConfiguredSink, EmitReport, SummaryEmitter};
pub use error::DispatcherError;
pub use sinks::{FileSink, FileSinkConfig, JsonLineSink, LogSink};
