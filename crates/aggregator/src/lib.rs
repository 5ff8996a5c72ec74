//! # Aggregator
//!
//! 单窗口邻居聚合：从数据报源收集 beacon，保留每辆车的最新状态，
//! 窗口关闭后计算最近邻并生成摘要。
//!
//! 负责：
//! - 采集窗口状态机 (首条有效 beacon 锚定，窗口时长 / 空闲超时关闭)
//! - 邻居表 (按 id 最后写入为准)
//! - 最近邻计算 (距离截断到两位小数，并列取最小 id)
//! - 构造 `NeighborSummary`
//!
//! ## 使用示例
//!
//! ```ignore
//! use aggregator::{build_summary, Collector};
//!
//! let source = UdpBeaconSource::bind(addr, config.collection.max_datagram_bytes).await?;
//! let report = Collector::new(config.collection.clone()).run(source).await?;
//! let summary = build_summary(&config.summary.topic, &report.table);
//! ```

mod collector;
mod distance;
mod summary;
mod table;
mod window;

// Re-exports
pub use collector::{CollectionReport, Collector};
pub use distance::{distance_to_origin, nearest_neighbor, truncate_hundredths};
pub use summary::{build_summary, build_summary_at};
pub use table::NeighborTable;
pub use window::{CloseReason, CollectionWindow};

// Re-export contracts types
pub use contracts::{CollectionConfig, NearestNeighbor, NeighborRecord, NeighborSummary};
