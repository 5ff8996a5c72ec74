//! 配置校验模块
//!
//! 校验规则：
//! - listen.host 为合法 IP 地址
//! - listen.port 不得占用 tick 端口
//! - window_ms / idle_timeout_ms > 0
//! - max_datagram_bytes 在 UDP 载荷上限内
//! - summary.topic 以 '/' 开头
//! - sink 名称唯一且必填字段齐全
//! - 恰好一个 stdout sink

use std::collections::HashSet;

use contracts::{ContractError, NodeConfig, SinkType};

/// Largest UDP payload over IPv4
const MAX_UDP_PAYLOAD: usize = 65_507;

/// 校验 NodeConfig 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(config: &NodeConfig) -> Result<(), ContractError> {
    validate_listen(config)?;
    validate_collection(config)?;
    validate_summary(config)?;
    validate_sinks(config)?;
    Ok(())
}

/// 校验监听端点
fn validate_listen(config: &NodeConfig) -> Result<(), ContractError> {
    let listen = &config.listen;

    if let Err(e) = listen.socket_addr() {
        return Err(ContractError::config_validation(
            "listen.host",
            format!("'{}' is not an IP address: {e}", listen.host),
        ));
    }

    if listen.port == listen.tick_port {
        return Err(ContractError::config_validation(
            "listen.port",
            format!(
                "port {} is reserved for tick signals and must not be bound",
                listen.tick_port
            ),
        ));
    }

    Ok(())
}

/// 校验采集窗口
fn validate_collection(config: &NodeConfig) -> Result<(), ContractError> {
    let collection = &config.collection;

    if collection.window_ms == 0 {
        return Err(ContractError::config_validation(
            "collection.window_ms",
            "window_ms must be > 0",
        ));
    }

    if collection.idle_timeout_ms == 0 {
        return Err(ContractError::config_validation(
            "collection.idle_timeout_ms",
            "idle_timeout_ms must be > 0",
        ));
    }

    if collection.max_datagram_bytes == 0 || collection.max_datagram_bytes > MAX_UDP_PAYLOAD {
        return Err(ContractError::config_validation(
            "collection.max_datagram_bytes",
            format!(
                "max_datagram_bytes must be within 1..={MAX_UDP_PAYLOAD}, got {}",
                collection.max_datagram_bytes
            ),
        ));
    }

    Ok(())
}

fn validate_summary(config: &NodeConfig) -> Result<(), ContractError> {
    if !config.summary.topic.starts_with('/') {
        return Err(ContractError::config_validation(
            "summary.topic",
            format!("topic must start with '/', got '{}'", config.summary.topic),
        ));
    }
    Ok(())
}

/// 校验 sink 配置
fn validate_sinks(config: &NodeConfig) -> Result<(), ContractError> {
    if config.sinks.is_empty() {
        return Err(ContractError::config_validation(
            "sinks",
            "at least one sink is required",
        ));
    }

    let mut seen = HashSet::new();
    for (idx, sink) in config.sinks.iter().enumerate() {
        if sink.name.is_empty() {
            return Err(ContractError::config_validation(
                format!("sinks[{}].name", idx),
                "sink name cannot be empty",
            ));
        }
        if !seen.insert(sink.name.as_str()) {
            return Err(ContractError::config_validation(
                format!("sinks[name={}]", sink.name),
                "duplicate sink name",
            ));
        }
        if sink.sink_type == SinkType::File && !sink.params.contains_key("path") {
            return Err(ContractError::config_validation(
                format!("sinks[{}].params.path", sink.name),
                "file sink requires a 'path' parameter",
            ));
        }
    }

    // The summary goes to stdout exactly once.
    let stdout_sinks = config
        .sinks
        .iter()
        .filter(|s| s.sink_type == SinkType::Stdout)
        .count();
    if stdout_sinks != 1 {
        return Err(ContractError::config_validation(
            "sinks",
            format!("exactly one stdout sink is required, found {stdout_sinks}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::SinkConfig;
    use std::collections::HashMap;

    fn assert_invalid(config: &NodeConfig, needle: &str) {
        let result = validate(config);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains(needle), "got: {err}");
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&NodeConfig::default()).is_ok());
    }

    #[test]
    fn test_hostname_rejected() {
        let mut config = NodeConfig::default();
        config.listen.host = "beacons.local".into();
        assert_invalid(&config, "not an IP address");
    }

    #[test]
    fn test_tick_port_rejected() {
        let mut config = NodeConfig::default();
        config.listen.port = 5006;
        assert_invalid(&config, "reserved for tick signals");
    }

    #[test]
    fn test_zero_window() {
        let mut config = NodeConfig::default();
        config.collection.window_ms = 0;
        assert_invalid(&config, "window_ms must be > 0");
    }

    #[test]
    fn test_zero_idle_timeout() {
        let mut config = NodeConfig::default();
        config.collection.idle_timeout_ms = 0;
        assert_invalid(&config, "idle_timeout_ms must be > 0");
    }

    #[test]
    fn test_oversized_datagram_buffer() {
        let mut config = NodeConfig::default();
        config.collection.max_datagram_bytes = 70_000;
        assert_invalid(&config, "max_datagram_bytes");
    }

    #[test]
    fn test_topic_must_be_absolute() {
        let mut config = NodeConfig::default();
        config.summary.topic = "v2x/neighbor_summary".into();
        assert_invalid(&config, "must start with '/'");
    }

    #[test]
    fn test_no_sinks() {
        let mut config = NodeConfig::default();
        config.sinks.clear();
        assert_invalid(&config, "at least one sink");
    }

    #[test]
    fn test_duplicate_sink_name() {
        let mut config = NodeConfig::default();
        config.sinks.push(SinkConfig::stdout());
        assert_invalid(&config, "duplicate sink name");
    }

    #[test]
    fn test_second_stdout_sink_rejected() {
        let mut config = NodeConfig::default();
        config.sinks.push(SinkConfig {
            name: "console".into(),
            ..SinkConfig::stdout()
        });
        assert_invalid(&config, "exactly one stdout sink is required, found 2");
    }

    #[test]
    fn test_missing_stdout_sink_rejected() {
        let mut config = NodeConfig::default();
        config.sinks = vec![SinkConfig {
            name: "log".into(),
            sink_type: SinkType::Log,
            params: HashMap::new(),
        }];
        assert_invalid(&config, "exactly one stdout sink is required, found 0");
    }

    #[test]
    fn test_stdout_alongside_other_sinks() {
        let mut config = NodeConfig::default();
        config.sinks.push(SinkConfig {
            name: "archive".into(),
            sink_type: SinkType::File,
            params: HashMap::from([("path".to_string(), "/tmp/summary.jsonl".to_string())]),
        });
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_empty_sink_name() {
        let mut config = NodeConfig::default();
        config.sinks[0].name = String::new();
        assert_invalid(&config, "cannot be empty");
    }

    #[test]
    fn test_file_sink_needs_path() {
        let mut config = NodeConfig::default();
        config.sinks.push(SinkConfig {
            name: "archive".into(),
            sink_type: SinkType::File,
            params: HashMap::new(),
        });
        assert_invalid(&config, "requires a 'path'");
    }
}
