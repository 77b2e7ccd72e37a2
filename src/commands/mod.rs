//! CLI 命令处理模块
//!
//! 命令行解析与交互式菜单循环

pub mod menu;
pub mod parser;

// Re-exports (used by main.rs)
pub use menu::{MenuCommand, Session, SessionOptions, SessionSummary};
pub use parser::*;
