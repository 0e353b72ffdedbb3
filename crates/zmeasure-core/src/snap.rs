//! 捕捉点解析
//!
//! 捕捉模式下，任意拾取的子形状都被归约为一个标准点：
//! - 顶点 (Vertex)
//! - 圆心 (Center)
//! - 基准对象的放置原点 (PlacementBase)
//! - 包围盒中心 (BoundingBoxCenter)

use crate::error::MeasureError;
use crate::math::Point3;
use crate::resolve::is_datum;
use crate::shape::{Curve, Shape, ShapeKind};
use serde::{Deserialize, Serialize};

/// 捕捉类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SnapType {
    Vertex,
    Center,
    PlacementBase,
    BoundingBoxCenter,
}

impl SnapType {
    pub fn name(&self) -> &'static str {
        match self {
            SnapType::Vertex => "Vertex",
            SnapType::Center => "Center",
            SnapType::PlacementBase => "Placement base",
            SnapType::BoundingBoxCenter => "Bounding box center",
        }
    }
}

/// 捕捉点
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapPoint {
    pub point: Point3,
    pub snap_type: SnapType,
}

impl SnapPoint {
    pub fn new(point: Point3, snap_type: SnapType) -> Self {
        Self { point, snap_type }
    }
}

/// 求形状的捕捉点
///
/// 基准对象的包围盒没有有意义的中心，取放置原点，与参考点一致。
/// 无效形状返回 `InvalidShape`；找不到可用点（顶点缺坐标、
/// 空包围盒）返回 `SnapFailure`。
pub fn snap_point<S: Shape>(shape: &S) -> Result<SnapPoint, MeasureError> {
    if !shape.is_valid() {
        return Err(MeasureError::InvalidShape(shape.description()));
    }

    match shape.kind() {
        ShapeKind::Vertex => {
            return shape
                .vertexes()
                .first()
                .map(|p| SnapPoint::new(*p, SnapType::Vertex))
                .ok_or_else(|| MeasureError::SnapFailure(shape.description()));
        }
        ShapeKind::Edge => {
            if let Some(Curve::Circle { center, .. }) = shape.curve() {
                return Ok(SnapPoint::new(center, SnapType::Center));
            }
        }
        _ => {}
    }

    if is_datum(shape) {
        return shape
            .placement()
            .map(|placement| {
                SnapPoint::new(Point3::from(placement.translation.vector), SnapType::PlacementBase)
            })
            .ok_or_else(|| MeasureError::SnapFailure(shape.description()));
    }

    let bbox = shape.bound_box();
    if bbox.is_empty() {
        return Err(MeasureError::SnapFailure(shape.description()));
    }
    let center = bbox.center();
    if !(center.x.is_finite() && center.y.is_finite() && center.z.is_finite()) {
        return Err(MeasureError::SnapFailure(shape.description()));
    }
    Ok(SnapPoint::new(center, SnapType::BoundingBoxCenter))
}
