//! # V2X Neighbor CLI
//!
//! 命令行接口入口点。
//!
//! 提供：
//! - 配置加载与验证
//! - 单窗口邻居采集与摘要输出
//!
//! stdout 只输出摘要 (或 `validate` 结果)，日志写入 stderr。

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_collect, run_validate};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let command = cli.command.clone().unwrap_or(Commands::Run(cli.run.clone()));

    // Initialize logging (and metrics exporter for `run`)
    let metrics_port = match &command {
        Commands::Run(args) => args.metrics_port(),
        Commands::Validate(_) => None,
    };
    init_observability(&cli, metrics_port)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "V2X neighbor node starting"
    );

    // Execute command
    let result = match &command {
        Commands::Run(args) => run_collect(args).await,
        Commands::Validate(args) => run_validate(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}

/// Initialize logging based on CLI options
fn init_observability(cli: &Cli, metrics_port: Option<u16>) -> Result<()> {
    let default_log_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    observability::init_with_config(observability::ObservabilityConfig {
        log_format: cli.log_format.into(),
        metrics_port,
        default_log_level: default_log_level.to_string(),
    })
}
