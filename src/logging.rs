//! 日志初始化
//!
//! 终端被 TUI 占用，日志写入数据目录下的文件。`RUST_LOG` 优先于配置中的级别。

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::error::AppError;

/// 初始化文件日志，返回的 guard 必须存活到程序结束
pub fn init(config: &LoggingConfig, log_dir: &Path) -> Result<WorkerGuard, AppError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| AppError::Logging(e.to_string()))?;

    let appender = tracing_appender::rolling::never(log_dir, &config.file);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| AppError::Logging(e.to_string()))?;

    Ok(guard)
}
