//! 配置路径管理
//!
//! 管理配置文件与日志文件的路径
//!
//! 设计原则:
//! - 持久化配置保存在 ~/.proctable/config.toml
//! - 运行时数据（日志）保存在 <临时目录>/.proctable/

use crate::config::{CONFIG_DIRECTORY, CONFIG_FILE_NAME, LOG_FILE_NAME};
use crate::error::{errors, PcbResult};
use crate::render::OutputFormat;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 用户配置（从 config.toml 读取，所有字段可选）
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct UserConfig {
    /// 进程表槽位数量
    #[serde(default)]
    pub capacity: Option<usize>,
    /// 输出格式 (text | table | json)
    #[serde(default)]
    pub format: Option<OutputFormat>,
    /// 对被忽略的命令输出诊断
    #[serde(default)]
    pub strict: Option<bool>,
    /// 日志过滤器
    #[serde(default)]
    pub log_level: Option<String>,
    /// 写入运行时目录下的日志文件
    #[serde(default)]
    pub log_to_file: Option<bool>,
}

impl UserConfig {
    /// 从配置文件加载；文件不存在时返回默认配置，格式错误时报错
    pub fn load(config_file: &Path) -> PcbResult<Self> {
        if !config_file.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_file)?;
        toml::from_str(&content).map_err(|err| {
            errors::config_error_with_source(
                format!("cannot parse {}", config_file.display()),
                err,
            )
        })
    }
}

/// 配置文件路径集合
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    /// 持久化配置目录（~/.proctable/）
    pub config_dir: PathBuf,
    /// 运行时数据目录（/tmp/.proctable/）
    pub runtime_dir: PathBuf,
    /// 主配置文件
    pub config_file: PathBuf,
    /// 日志文件（保存在运行时目录）
    pub log_file: PathBuf,
}

impl ConfigPaths {
    /// 创建配置路径
    pub fn new() -> Result<Self> {
        let home_dir =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?;
        Ok(Self::with_home(&home_dir))
    }

    /// 以指定目录作为 home 构建路径
    pub fn with_home(home_dir: &Path) -> Self {
        let config_dir = home_dir.join(CONFIG_DIRECTORY);

        // Linux/macOS: /tmp/.proctable/
        // Windows: %TEMP%\.proctable\
        let runtime_dir = std::env::temp_dir().join(CONFIG_DIRECTORY);

        Self {
            config_file: config_dir.join(CONFIG_FILE_NAME),
            log_file: runtime_dir.join(LOG_FILE_NAME),
            config_dir,
            runtime_dir,
        }
    }

    /// 确保配置目录存在
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.runtime_dir)?;
        Ok(())
    }
}
