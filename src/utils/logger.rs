//! 日志系统
//!
//! 提供统一的日志记录功能。标准输出用于进程列表，日志一律写到标准错误。

use crate::config::DEFAULT_LOG_FILTER;
use anyhow::Result;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// 初始化日志系统
///
/// # Arguments
/// * `log_level` - 日志过滤器 (trace, debug, info, warn, error)，如果为 None 则使用环境变量 RUST_LOG
/// * `log_file` - 日志文件路径，如果为 None 则只输出到标准错误
///
/// # Examples
/// ```no_run
/// use proctable::utils::logger::init_logger;
///
/// // 使用默认配置（从环境变量读取）
/// init_logger(None, None).unwrap();
/// ```
pub fn init_logger(log_level: Option<&str>, log_file: Option<PathBuf>) -> Result<()> {
    // 优先使用参数指定的级别，其次使用 RUST_LOG 环境变量
    let env_filter = if let Some(level) = log_level {
        EnvFilter::try_new(level)?
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    };

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .compact();

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer);

    if let Some(log_path) = log_file {
        // 确保日志文件的父目录存在
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        // 文件中不使用 ANSI 颜色
        let file_layer = fmt::layer()
            .with_writer(std::sync::Arc::new(file))
            .with_target(true)
            .with_ansi(false)
            .with_level(true);

        registry.with(file_layer).try_init()?;
    } else {
        registry.try_init()?;
    }

    tracing::debug!("Logger initialized");
    Ok(())
}
