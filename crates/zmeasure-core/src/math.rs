//! 数学类型与常量
//!
//! 三维测量统一使用 `f64` 精度的 nalgebra 类型。

use serde::{Deserialize, Serialize};

pub type Point3 = nalgebra::Point3<f64>;
pub type Vector3 = nalgebra::Vector3<f64>;

/// 单位方向向量（模长为 1）
pub type Direction = nalgebra::UnitVector3<f64>;

/// 放置（位置 + 旋转），对应宿主对象的 Placement
pub type Placement = nalgebra::Isometry3<f64>;

/// 通用浮点容差
pub const EPSILON: f64 = 1e-10;

/// 两点视为重合的距离
pub const COINCIDENT_TOLERANCE: f64 = 1e-9;

/// 归一化向量，零长度时返回 `None`
pub fn normalize(v: Vector3) -> Option<Direction> {
    Direction::try_new(v, EPSILON)
}

/// 两向量夹角（弧度，范围 [0, π]）
///
/// 用 atan2 计算，在接近平行或反向时比 acos 精确。
pub fn angle_between(a: &Vector3, b: &Vector3) -> f64 {
    a.cross(b).norm().atan2(a.dot(b))
}

/// 与给定向量垂直的单位向量
pub fn perpendicular(v: &Vector3) -> Vector3 {
    let n = v.normalize();
    let helper = if n.x.abs() < 0.9 { Vector3::x() } else { Vector3::y() };
    (helper - n * n.dot(&helper)).normalize()
}

/// 两点中点
pub fn midpoint(a: &Point3, b: &Point3) -> Point3 {
    nalgebra::center(a, b)
}

/// 两点是否重合
pub fn coincident(a: &Point3, b: &Point3) -> bool {
    (b - a).norm() < COINCIDENT_TOLERANCE
}

/// 三维轴对齐包围盒
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox3 {
    pub min: Point3,
    pub max: Point3,
}

impl BoundingBox3 {
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// 空包围盒（min > max）
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn from_points(points: impl IntoIterator<Item = Point3>) -> Self {
        let mut bbox = Self::empty();
        for p in points {
            bbox.expand_to_include(&p);
        }
        bbox
    }

    /// 以中心点和半尺寸构造
    pub fn from_center(center: Point3, half_extents: Vector3) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn expand_to_include(&mut self, point: &Point3) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }

    pub fn center(&self) -> Point3 {
        midpoint(&self.min, &self.max)
    }

    /// 对角线长度，空包围盒为 0
    pub fn diagonal_length(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        (self.max - self.min).norm()
    }

    pub fn contains(&self, point: &Point3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_zero_vector() {
        assert!(normalize(Vector3::zeros()).is_none());
        let dir = normalize(Vector3::new(0.0, 3.0, 4.0)).unwrap();
        assert!((dir.norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_angle_between_parallel() {
        let z = Vector3::z();
        assert_eq!(angle_between(&z, &z), 0.0);
        assert_eq!(angle_between(&z, &-z), std::f64::consts::PI);
        let a = angle_between(&Vector3::x(), &Vector3::y());
        assert!((a - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_perpendicular() {
        for v in [Vector3::x(), Vector3::z(), Vector3::new(1.0, 2.0, -3.0)] {
            let p = perpendicular(&v);
            assert!(p.dot(&v).abs() < 1e-12);
            assert!((p.norm() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_bounding_box() {
        let bbox = BoundingBox3::from_points([
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 4.0, 4.0),
        ]);
        assert_eq!(bbox.center(), Point3::new(1.0, 2.0, 2.0));
        assert!((bbox.diagonal_length() - 6.0).abs() < EPSILON);
        assert!(bbox.contains(&Point3::new(1.0, 1.0, 1.0)));
        assert!(BoundingBox3::empty().is_empty());
        assert_eq!(BoundingBox3::empty().diagonal_length(), 0.0);
    }
}
