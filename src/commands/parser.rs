//! CLI 命令行参数解析
//!
//! 使用 clap 定义命令行接口

use crate::render::OutputFormat;
use clap::{Args, Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "proctable",
    version,
    about = "Simulated process control block table with fork/exit style bookkeeping"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// 全局选项（命令行优先于环境变量和配置文件）
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalArgs {
    /// 进程表槽位数量
    #[arg(long, global = true, value_name = "N")]
    pub capacity: Option<usize>,

    /// 配置文件路径（默认 ~/.proctable/config.toml）
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// 进程列表输出格式
    #[arg(long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    /// 对被忽略的命令输出诊断信息
    #[arg(long, global = true)]
    pub strict: bool,

    /// 日志过滤器 (trace, debug, info, warn, error 或 EnvFilter 语法)
    #[arg(long = "log-level", global = true, value_name = "FILTER")]
    pub log_level: Option<String>,

    /// 同时写入日志文件
    #[arg(long = "log-file", global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// 交互式菜单（无子命令时的默认行为）
    Shell,

    /// 显示生效的配置 (TOML)
    Config,

    /// 显示版本信息
    Version,
}

impl Cli {
    /// 解析进程参数（失败时由 clap 处理错误输出和退出）
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// 尝试解析命令行参数（用于测试或自定义 argv）
    pub fn try_parse_from_args<I, T>(iter: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::try_parse_from(iter)
    }

    /// 最终命令（默认 Shell）
    pub fn command_or_default(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Shell)
    }
}
