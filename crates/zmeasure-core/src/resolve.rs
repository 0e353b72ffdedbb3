//! 参考点与方向解析
//!
//! 为已分类的形状求出用于距离/角度计算的参考点和单位方向。

use crate::classify::{classify, Classification};
use crate::math::{normalize, Direction, Point3, Vector3};
use crate::shape::{Curve, Shape};

/// 包围盒对角线超过该值时视为无限大的基准对象
pub const DATUM_DIAGONAL_THRESHOLD: f64 = 1e10;

/// 是否为基准对象（包围盒退化为极大值）
pub fn is_datum<S: Shape>(shape: &S) -> bool {
    shape.bound_box().diagonal_length() > DATUM_DIAGONAL_THRESHOLD
}

/// 形状的参考点
///
/// - 圆：圆心
/// - 点：顶点坐标
/// - 基准对象：放置原点（无限大包围盒没有有意义的中心）
/// - 其他：包围盒中心
pub fn reference_point<S: Shape>(shape: &S) -> Point3 {
    match classify(shape) {
        Classification::Circle => {
            if let Some(Curve::Circle { center, .. }) = shape.curve() {
                return center;
            }
        }
        Classification::Point => {
            if let Some(p) = shape.vertexes().first() {
                return *p;
            }
        }
        _ => {}
    }

    if is_datum(shape) {
        if let Some(placement) = shape.placement() {
            return Point3::from(placement.translation.vector);
        }
    }
    shape.bound_box().center()
}

/// 形状的单位方向，无法定义时返回 `None`
///
/// - 线段：起点指向终点
/// - 无限直线：放置旋转作用于 Z 轴
/// - 圆：圆的轴线
/// - 平面：参数原点处的法向
pub fn direction<S: Shape>(shape: &S) -> Option<Direction> {
    match classify(shape) {
        Classification::Segment => {
            let vertexes = shape.vertexes();
            normalize(vertexes[1] - vertexes[0])
        }
        Classification::Line => {
            let placement = shape.placement()?;
            normalize(placement.rotation * Vector3::z())
        }
        Classification::Circle => match shape.curve()? {
            Curve::Circle { axis, .. } => normalize(axis),
            _ => None,
        },
        Classification::FlatFace => normalize(shape.normal_at(0.0, 0.0)?),
        Classification::Point | Classification::Unclassified => None,
    }
}
