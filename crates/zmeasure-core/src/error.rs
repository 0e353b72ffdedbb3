//! 测量错误定义
//!
//! 所有错误都会转成报告文本显示给用户，不会向界面层抛出。

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum MeasureError {
    #[error("Invalid shape\n{0}")]
    InvalidShape(String),

    #[error("Can't measure\n{0}")]
    UnclassifiableShape(String),

    #[error("Invalid directions")]
    UndefinedDirection,

    #[error("Internal error: unexpected selection\n{first}\n{second}")]
    AmbiguousSelection { first: String, second: String },

    #[error("No snap point found\n{0}")]
    SnapFailure(String),

    #[error("Invalid selection\n{0}")]
    InvalidSelection(String),

    #[error("No closest points found between\n{first}\n{second}")]
    NoClosestPoints { first: String, second: String },
}

impl MeasureError {
    pub fn ambiguous(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self::AmbiguousSelection {
            first: first.into(),
            second: second.into(),
        }
    }
}
