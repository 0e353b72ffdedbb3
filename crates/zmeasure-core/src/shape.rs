//! 几何内核边界
//!
//! 宿主几何内核的形状对象通过 [`Shape`] trait 接入。测量核心只读取形状，
//! 从不修改。子形状类型由适配层一次性给出（[`ShapeKind`]），
//! 核心其余部分只对枚举做穷尽匹配，不再探测字符串或属性。

use crate::math::{BoundingBox3, Placement, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// 子形状的拓扑类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Vertex,
    Edge,
    Face,
    Solid,
    /// 空形状或复合体等其他类型
    Other,
}

impl ShapeKind {
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Vertex => "Vertex",
            ShapeKind::Edge => "Edge",
            ShapeKind::Face => "Face",
            ShapeKind::Solid => "Solid",
            ShapeKind::Other => "Shape",
        }
    }

    /// 只有顶点、边、面可以参与测量
    pub fn is_selectable(&self) -> bool {
        matches!(self, ShapeKind::Vertex | ShapeKind::Edge | ShapeKind::Face)
    }
}

/// 边的底层曲线
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Curve {
    /// 直线（线段或无限基准线）
    Line,
    /// 圆或圆弧
    Circle {
        center: Point3,
        radius: f64,
        axis: Vector3,
    },
    /// 其他曲线（样条、椭圆等），保留类型名
    Other(String),
}

/// `dist_to_shape` 的结果
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeDistance {
    /// 最小距离
    pub distance: f64,
    /// 最近点对：(自身上的点, 另一形状上的点)
    pub pairs: Vec<(Point3, Point3)>,
}

impl ShapeDistance {
    pub fn closest_pair(&self) -> Option<(Point3, Point3)> {
        self.pairs.first().copied()
    }
}

/// 宿主几何内核提供的形状能力
///
/// 不具备某项能力的形状返回 `None`。
pub trait Shape: Clone + std::fmt::Debug {
    /// 由一个点构造零尺寸的顶点形状
    fn vertex(point: Point3) -> Self;

    fn is_valid(&self) -> bool;

    fn kind(&self) -> ShapeKind;

    /// 有序顶点坐标
    fn vertexes(&self) -> Vec<Point3>;

    fn curve(&self) -> Option<Curve>;

    fn length(&self) -> Option<f64>;

    fn bound_box(&self) -> BoundingBox3;

    fn area(&self) -> Option<f64>;

    fn volume(&self) -> Option<f64>;

    fn placement(&self) -> Option<Placement>;

    /// 曲面在参数 (u, v) 处的法向
    fn normal_at(&self, u: f64, v: f64) -> Option<Vector3>;

    /// 到另一形状的最小距离及最近点对
    fn dist_to_shape(&self, other: &Self) -> Option<ShapeDistance>;

    /// 形状的文本描述，用于报告
    fn description(&self) -> String;
}
