//! 核心业务逻辑模块
//!
//! 包含进程表、进程树操作与线程安全包装

pub mod models;
pub mod process_table;
pub mod process_tree;
pub mod shared_table;
