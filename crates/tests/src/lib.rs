//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - 真实 UDP 端到端测试 (临时端口)
//! - 配置文件往返

#[cfg(test)]
mod contract_tests {
    use contracts::{NodeConfig, SinkType, SUMMARY_TOPIC};

    #[test]
    fn test_default_node_contract() {
        let config = NodeConfig::default();
        assert_eq!(config.listen.host, "127.0.0.1");
        assert_eq!(config.listen.port, 5005);
        assert_eq!(config.listen.tick_port, 5006);
        assert_eq!(config.collection.window_ms, 1000);
        assert_eq!(config.collection.idle_timeout_ms, 1500);
        assert_eq!(config.summary.topic, SUMMARY_TOPIC);
        assert_eq!(config.sinks.len(), 1);
        assert_eq!(config.sinks[0].sink_type, SinkType::Stdout);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::collections::HashMap;
    use std::net::SocketAddr;
    use std::time::Duration;

    use aggregator::{build_summary, CloseReason, CollectionReport, Collector};
    use contracts::{CollectionConfig, NeighborSummary, SinkConfig, SinkType, SUMMARY_TOPIC};
    use dispatcher::SummaryEmitter;
    use ingestion::UdpBeaconSource;
    use serde_json::{json, Value};
    use tokio::net::UdpSocket;

    fn fast_config() -> CollectionConfig {
        CollectionConfig {
            window_ms: 300,
            idle_timeout_ms: 200,
            ..Default::default()
        }
    }

    fn localhost() -> SocketAddr {
        "127.0.0.1:0".parse().unwrap()
    }

    /// Bind an ephemeral endpoint, send `payloads` to it (`gap` apart, after
    /// `lead`), and collect one window.
    async fn collect_over_udp(
        payloads: Vec<Vec<u8>>,
        lead: Duration,
        gap: Duration,
        config: CollectionConfig,
    ) -> (CollectionReport, SocketAddr) {
        let source = UdpBeaconSource::bind(localhost(), config.max_datagram_bytes)
            .await
            .unwrap();
        let target = source.local_addr();

        let sender = tokio::spawn(async move {
            let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
            tokio::time::sleep(lead).await;
            for payload in payloads {
                // The endpoint may already be closed for late sends.
                let _ = socket.send_to(&payload, target).await;
                tokio::time::sleep(gap).await;
            }
        });

        let report = Collector::new(config).run(source).await.unwrap();
        sender.await.unwrap();
        (report, target)
    }

    fn bytes(value: Value) -> Vec<u8> {
        value.to_string().into_bytes()
    }

    /// Emit through a file sink and read the single line back.
    async fn emit_to_file(summary: &NeighborSummary) -> (String, NeighborSummary) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.jsonl");
        let sinks = vec![SinkConfig {
            name: "file".to_string(),
            sink_type: SinkType::File,
            params: HashMap::from([("path".to_string(), path.display().to_string())]),
        }];

        let emitter = SummaryEmitter::from_configs(&sinks).await.unwrap();
        emitter.emit(summary).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        let line = lines.next().unwrap().to_string();
        assert!(lines.next().is_none(), "exactly one summary line");
        let parsed = serde_json::from_str(&line).unwrap();
        (line, parsed)
    }

    #[tokio::test]
    async fn test_no_traffic_reports_zero() {
        let (report, _) =
            collect_over_udp(Vec::new(), Duration::ZERO, Duration::ZERO, fast_config()).await;
        assert_eq!(report.reason, CloseReason::IdleTimeout);

        let summary = build_summary(SUMMARY_TOPIC, &report.table);
        let (line, parsed) = emit_to_file(&summary).await;
        assert_eq!(parsed.count, 0);
        assert!(parsed.nearest.is_none());
        assert!(line.starts_with(r#"{"topic":"/v2x/neighbor_summary","count":0,"nearest":null,"ts":"#));
    }

    #[tokio::test]
    async fn test_single_vehicle() {
        let payloads = vec![bytes(json!({"id": "veh_1", "pos": [3, 4], "speed": 10, "ts": 1000}))];
        let (report, _) =
            collect_over_udp(payloads, Duration::ZERO, Duration::ZERO, fast_config()).await;

        let summary = build_summary(SUMMARY_TOPIC, &report.table);
        let (line, _) = emit_to_file(&summary).await;
        assert!(line.contains(r#""count":1,"nearest":{"id":"veh_1","dist":5.0}"#));
    }

    #[tokio::test]
    async fn test_two_vehicles_nearest_truncated() {
        let payloads = vec![
            bytes(json!({"id": "veh_1", "pos": [3, 4], "speed": 10, "ts": 1000})),
            bytes(json!({"id": "veh_2", "pos": [1, 1], "speed": 5, "ts": 1000})),
        ];
        let (report, _) = collect_over_udp(
            payloads,
            Duration::ZERO,
            Duration::from_millis(10),
            fast_config(),
        )
        .await;

        let summary = build_summary(SUMMARY_TOPIC, &report.table);
        let (line, _) = emit_to_file(&summary).await;
        assert!(line.contains(r#""count":2,"nearest":{"id":"veh_2","dist":1.41}"#));
    }

    #[tokio::test]
    async fn test_malformed_then_valid() {
        let payloads = vec![
            b"\xff\xfe not json".to_vec(),
            bytes(json!({"id": "veh_1", "pos": [3, 4, 5], "speed": 10, "ts": 1000})),
            bytes(json!({"id": "veh_1", "pos": [1, 1], "speed": -1, "ts": 1000})),
            bytes(json!({"id": "veh_1", "pos": [1, 1], "speed": 1, "ts": 1000.5})),
            bytes(json!(["veh_1", [1, 1], 1, 1000])),
            bytes(json!({"id": "veh_1", "pos": [6, 8], "speed": 10, "ts": 1000})),
        ];
        let (report, _) = collect_over_udp(
            payloads,
            Duration::ZERO,
            Duration::from_millis(5),
            fast_config(),
        )
        .await;

        assert_eq!(report.metrics.datagrams_received, 6);
        assert_eq!(report.metrics.rejected(), 5);

        let summary = build_summary(SUMMARY_TOPIC, &report.table);
        let (_, parsed) = emit_to_file(&summary).await;
        assert_eq!(parsed.count, 1);
        let nearest = parsed.nearest.unwrap();
        assert_eq!(nearest.id, "veh_1");
        assert_eq!(nearest.dist, 10.0);
    }

    #[tokio::test]
    async fn test_window_anchored_on_first_accepted_beacon() {
        let config = CollectionConfig {
            window_ms: 400,
            idle_timeout_ms: 1000,
            ..Default::default()
        };
        let payloads = (0..15)
            .map(|i| bytes(json!({"id": format!("veh_{i:02}"), "pos": [i, 0], "speed": 1, "ts": i})))
            .collect();

        let (report, _) = collect_over_udp(
            payloads,
            Duration::from_millis(300),
            Duration::from_millis(100),
            config,
        )
        .await;

        assert_eq!(report.reason, CloseReason::WindowElapsed);
        let open_for = report.open_for.unwrap();
        assert!(open_for >= Duration::from_millis(400));
        assert!(open_for < Duration::from_millis(1000));
        // Anchored at process start the window would have closed after ~2 beacons.
        assert!(report.table.len() >= 4);
        assert!(report.table.len() < 15);
    }

    #[tokio::test]
    async fn test_endpoint_released_after_run() {
        let (_, addr) =
            collect_over_udp(Vec::new(), Duration::ZERO, Duration::ZERO, fast_config()).await;
        let rebound = UdpBeaconSource::bind(addr, 4096).await;
        assert!(rebound.is_ok(), "endpoint should be free after the window");
    }
}

#[cfg(test)]
mod config_tests {
    use std::io::Write;

    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::SinkType;

    #[test]
    fn test_config_file_round_trip() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            file,
            r#"
[listen]
host = "127.0.0.1"
port = 6005

[collection]
window_ms = 750

[[sinks]]
name = "stdout"
sink_type = "stdout"

[[sinks]]
name = "archive"
sink_type = "file"
params = {{ path = "/tmp/v2x/summary.jsonl" }}
"#
        )
        .unwrap();

        let config = ConfigLoader::load_from_path(file.path()).unwrap();
        assert_eq!(config.listen.port, 6005);
        assert_eq!(config.collection.window_ms, 750);
        assert_eq!(config.collection.idle_timeout_ms, 1500);
        assert_eq!(config.sinks[1].sink_type, SinkType::File);

        let toml = ConfigLoader::to_toml(&config).unwrap();
        let reloaded = ConfigLoader::load_from_str(&toml, ConfigFormat::Toml).unwrap();
        assert_eq!(reloaded, config);

        let json = ConfigLoader::to_json(&config).unwrap();
        let reloaded = ConfigLoader::load_from_str(&json, ConfigFormat::Json).unwrap();
        assert_eq!(reloaded, config);
    }
}
