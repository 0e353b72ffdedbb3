//! 场景绘制接口

use serde::Serialize;
use thiserror::Error;
use zmeasure_core::present::DrawItem;

/// 场景对象句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DrawHandle(pub u64);

/// 场景操作错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DrawError {
    #[error("Scene rejected object {name}: {reason}")]
    Rejected { name: String, reason: String },

    #[error("Unknown scene object {0:?}")]
    UnknownHandle(DrawHandle),

    #[error("Unknown group {0}")]
    UnknownGroup(String),
}

/// 场景绘制接收方
pub trait DrawSink {
    /// 创建对象，`group` 为 `None` 时放在文档根部
    fn create(&mut self, group: Option<&str>, item: &DrawItem) -> Result<DrawHandle, DrawError>;

    fn remove(&mut self, handle: DrawHandle) -> Result<(), DrawError>;

    /// 删除分组及其中剩余对象
    fn remove_group(&mut self, group: &str) -> Result<(), DrawError>;
}
