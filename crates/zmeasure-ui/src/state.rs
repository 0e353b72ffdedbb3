//! 测量会话状态

use serde::{Deserialize, Serialize};
use zmeasure_core::math::Point3;
use zmeasure_core::shape::Shape;

/// 测量类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasureMode {
    /// 单实体：坐标、面积、半径、长度
    #[serde(alias = "single")]
    SingleEntity,
    #[default]
    Distance,
    Angle,
}

impl MeasureMode {
    pub fn name(&self) -> &'static str {
        match self {
            MeasureMode::SingleEntity => "Single entity",
            MeasureMode::Distance => "Distance",
            MeasureMode::Angle => "Angle",
        }
    }

    /// 是否需要两次拾取
    pub fn needs_two_picks(&self) -> bool {
        !matches!(self, MeasureMode::SingleEntity)
    }
}

/// 拾取方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMethod {
    /// 归约为顶点、圆心或包围盒中心
    Snap,
    /// 保留完整子形状
    #[default]
    Shape,
}

impl SelectionMethod {
    pub fn name(&self) -> &'static str {
        match self {
            SelectionMethod::Snap => "Snap",
            SelectionMethod::Shape => "Shape",
        }
    }
}

/// 选择按钮的图标状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum SlotStatus {
    #[default]
    None,
    /// 等待拾取
    Select,
    /// 已拾取
    Valid,
}

/// 状态机状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum SelectionState {
    #[default]
    Idle,
    /// 第一个槽已填，等待第二次拾取
    AwaitingSecond,
}

/// 选择槽
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionSlot<S> {
    Empty,
    Point(Point3),
    Shape(S),
}

impl<S> Default for SelectionSlot<S> {
    fn default() -> Self {
        SelectionSlot::Empty
    }
}

impl<S: Shape> SelectionSlot<S> {
    pub fn is_empty(&self) -> bool {
        matches!(self, SelectionSlot::Empty)
    }

    pub fn is_point(&self) -> bool {
        matches!(self, SelectionSlot::Point(_))
    }

    /// 转为形状，点转成零尺寸顶点
    pub fn to_shape(&self) -> Option<S> {
        match self {
            SelectionSlot::Empty => None,
            SelectionSlot::Point(p) => Some(S::vertex(*p)),
            SelectionSlot::Shape(shape) => Some(shape.clone()),
        }
    }

    pub fn description(&self) -> String {
        match self {
            SelectionSlot::Empty => "Empty".to_string(),
            SelectionSlot::Point(p) => format!("Point ({}, {}, {})", p.x, p.y, p.z),
            SelectionSlot::Shape(shape) => shape.description(),
        }
    }
}
