//! 统一数据模型定义
//!
//! 进程表中使用的核心数据结构：进程标识、PCB 记录与只读快照

use serde::{Deserialize, Serialize};
use std::fmt;

/// 进程唯一标识符（即表中的槽位下标）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessId(usize);

impl ProcessId {
    /// 初始化时创建的根进程
    pub const ROOT: ProcessId = ProcessId(0);

    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// 槽位下标
    pub const fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for ProcessId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 进程控制块
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pcb {
    /// 父进程；仅根进程为 None
    pub parent: Option<ProcessId>,
    /// 直接子进程，按创建顺序排列
    pub children: Vec<ProcessId>,
}

impl Pcb {
    /// 根进程记录
    pub fn root() -> Self {
        Self::default()
    }

    /// 以 `parent` 为父进程的新记录
    pub fn child_of(parent: ProcessId) -> Self {
        Self {
            parent: Some(parent),
            children: Vec::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// 单个已占用槽位的只读视图
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessEntry {
    pub pid: ProcessId,
    #[serde(default)]
    pub parent: Option<ProcessId>,
    #[serde(default)]
    pub children: Vec<ProcessId>,
}

/// 进程表快照，按 id 升序
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub capacity: usize,
    pub processes: Vec<ProcessEntry>,
}

impl TableSnapshot {
    /// 已占用的 id 列表
    pub fn pids(&self) -> Vec<ProcessId> {
        self.processes.iter().map(|entry| entry.pid).collect()
    }

    pub fn entry(&self, pid: ProcessId) -> Option<&ProcessEntry> {
        self.processes.iter().find(|entry| entry.pid == pid)
    }
}
