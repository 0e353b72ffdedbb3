//! 实体分类
//!
//! 按固定优先级判断形状属于哪一类，第一个命中的规则生效：
//! 圆 > 线段 > 无限直线 > 平面 > 点 > 未分类。
//! 圆弧边在粗略检查下也像线段，所以必须先看曲线类型。

use crate::shape::{Curve, Shape, ShapeKind};
use serde::{Deserialize, Serialize};

/// 平面判定的最小面积
pub const AREA_EPSILON: f64 = 1e-6;

/// 平面判定的最大体积
pub const VOLUME_EPSILON: f64 = 1e-9;

/// 形状分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    Point,
    /// 两个顶点的直线边
    Segment,
    /// 无限基准线，只用于求方向
    Line,
    Circle,
    /// 零体积的平面区域
    FlatFace,
    Unclassified,
}

impl Classification {
    pub fn name(&self) -> &'static str {
        match self {
            Classification::Point => "Point",
            Classification::Segment => "Segment",
            Classification::Line => "Line",
            Classification::Circle => "Circle",
            Classification::FlatFace => "Flat face",
            Classification::Unclassified => "Unclassified",
        }
    }
}

/// 对形状分类（纯函数）
pub fn classify<S: Shape>(shape: &S) -> Classification {
    if is_circle(shape) {
        Classification::Circle
    } else if is_segment(shape) {
        Classification::Segment
    } else if is_line(shape) {
        Classification::Line
    } else if is_flat_face(shape) {
        Classification::FlatFace
    } else if shape.kind() == ShapeKind::Vertex {
        Classification::Point
    } else {
        Classification::Unclassified
    }
}

pub fn is_circle<S: Shape>(shape: &S) -> bool {
    shape.is_valid() && matches!(shape.curve(), Some(Curve::Circle { .. }))
}

pub fn is_segment<S: Shape>(shape: &S) -> bool {
    shape.is_valid()
        && matches!(shape.curve(), Some(Curve::Line))
        && shape.length().is_some()
        && shape.vertexes().len() == 2
}

pub fn is_line<S: Shape>(shape: &S) -> bool {
    shape.is_valid() && matches!(shape.curve(), Some(Curve::Line)) && shape.placement().is_some()
}

pub fn is_flat_face<S: Shape>(shape: &S) -> bool {
    if !shape.is_valid() {
        return false;
    }
    match (shape.area(), shape.volume()) {
        (Some(area), Some(volume)) => area > AREA_EPSILON && volume < VOLUME_EPSILON,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{ArcEdge, Primitive};
    use crate::math::{Placement, Point3, Vector3};

    #[test]
    fn test_classify_primitives() {
        let segment = Primitive::segment(Point3::origin(), Point3::new(3.0, 4.0, 0.0));
        assert_eq!(classify(&segment), Classification::Segment);

        let circle = Primitive::Arc(ArcEdge::circle(Point3::origin(), 2.0, Vector3::z()));
        assert_eq!(classify(&circle), Classification::Circle);

        let face = Primitive::rectangle(Point3::origin(), 2.0, 3.0);
        assert_eq!(classify(&face), Classification::FlatFace);

        let vertex = Primitive::Vertex(Point3::new(1.0, 2.0, 3.0));
        assert_eq!(classify(&vertex), Classification::Point);

        let datum = Primitive::DatumLine(Placement::identity());
        assert_eq!(classify(&datum), Classification::Line);

        let solid = Primitive::cuboid(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        assert_eq!(classify(&solid), Classification::Unclassified);

        assert_eq!(classify(&Primitive::Null), Classification::Unclassified);
    }

    #[test]
    fn test_classify_is_deterministic() {
        let arc = Primitive::Arc(ArcEdge::new(
            Point3::origin(),
            1.0,
            Vector3::z(),
            0.0,
            std::f64::consts::FRAC_PI_2,
        ));
        let first = classify(&arc);
        for _ in 0..5 {
            assert_eq!(classify(&arc), first);
        }
        assert_eq!(first, Classification::Circle);
    }

    #[test]
    fn test_degenerate_segment_is_still_segment() {
        let p = Point3::new(1.0, 1.0, 1.0);
        let segment = Primitive::segment(p, p);
        assert_eq!(classify(&segment), Classification::Segment);
    }

    #[test]
    fn test_zero_area_face_is_not_flat() {
        let sliver = Primitive::polygon(vec![
            Point3::origin(),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ]);
        assert!(!is_flat_face(&sliver));
    }
}
