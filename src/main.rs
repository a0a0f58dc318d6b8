//! Site Monitor 主程序入口
//!
//! 由外部调度器（cron、systemd timer 等）周期性调用，每次执行一轮检测

use anyhow::{Context, Result};
use clap::Parser;
use site_monitor::cli::commands::{Command, HistoryCommand, RunCommand, TestNotificationCommand};
use site_monitor::cli::{Args, Commands};
use site_monitor::config::{self, EnvConfigLoader};
use site_monitor::logging::{LogConfig, LoggingSystem};
use tracing::{debug, error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 先加载 .env，命令行参数的 env 默认值才能生效
    if let Err(e) = config::load_env_file(None) {
        eprintln!("Warning: {}", e);
    }

    let args = Args::parse();

    if let Some(env_file) = &args.env_file {
        config::load_env_file(Some(env_file.as_path())).context("加载环境文件失败")?;
    }

    // 初始化日志系统
    let log_config = LogConfig {
        level: args.log_level.clone().into(),
        file_path: Some(args.log_file.clone()),
        console: args.verbose,
        ..Default::default()
    };
    let logging_system = LoggingSystem::setup_logging(log_config).context("初始化日志系统失败")?;

    info!("{} v{} 启动", site_monitor::APP_NAME, site_monitor::VERSION);
    debug!("日志级别: {}", logging_system.config().level);

    if let Err(e) = execute_command(&args).await {
        error!("命令执行失败: {}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// 执行CLI命令
async fn execute_command(args: &Args) -> Result<()> {
    let email = EnvConfigLoader::from_process_env().load_email_config();
    let monitor_config = args.to_config(email);
    config::validate_config(&monitor_config).map_err(|e| anyhow::anyhow!(e))?;

    match args.command() {
        Commands::Run => RunCommand.execute(&monitor_config).await?,
        Commands::History { limit, format } => {
            HistoryCommand { limit, format }
                .execute(&monitor_config)
                .await?
        }
        Commands::TestNotification => TestNotificationCommand.execute(&monitor_config).await?,
    }

    Ok(())
}
