//! 邻居节点指标模块
//!
//! 通过 `metrics` facade 记录采集窗口与摘要输出的运行指标。
//! 未安装 recorder 时所有调用均为空操作。

use std::time::Duration;

use contracts::NeighborSummary;
use metrics::{counter, gauge, histogram};

/// 记录收到的数据报 (任意内容)
pub fn record_datagram_received(bytes: usize) {
    counter!("v2x_neighbor_datagrams_total").increment(1);
    histogram!("v2x_neighbor_datagram_bytes").record(bytes as f64);
}

/// 记录被丢弃的数据报
///
/// `reason` 为 `decode` 或校验失败的具体原因标签。
pub fn record_beacon_rejected(reason: &'static str) {
    counter!("v2x_neighbor_beacons_rejected_total", "reason" => reason).increment(1);
}

/// 记录写入邻居表的 beacon
pub fn record_beacon_accepted(table_size: usize) {
    counter!("v2x_neighbor_beacons_accepted_total").increment(1);
    gauge!("v2x_neighbor_table_size").set(table_size as f64);
}

/// 记录采集窗口关闭
///
/// `open_for` 为从首条有效 beacon 到关闭的时长；未收到有效 beacon 时为 None。
pub fn record_window_closed(reason: &'static str, open_for: Option<Duration>) {
    counter!("v2x_neighbor_windows_closed_total", "reason" => reason).increment(1);
    if let Some(open_for) = open_for {
        histogram!("v2x_neighbor_window_open_ms").record(open_for.as_secs_f64() * 1000.0);
    }
}

/// 记录摘要内容
pub fn record_summary(summary: &NeighborSummary) {
    gauge!("v2x_neighbor_summary_count").set(summary.count as f64);
    match &summary.nearest {
        Some(nearest) => gauge!("v2x_neighbor_nearest_dist").set(nearest.dist),
        None => counter!("v2x_neighbor_empty_summaries_total").increment(1),
    }
}

/// 记录摘要写入 sink 的结果
pub fn record_summary_emitted(sink_name: &str, success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "v2x_neighbor_summaries_emitted_total",
        "sink" => sink_name.to_string(),
        "status" => status
    )
    .increment(1);
}
