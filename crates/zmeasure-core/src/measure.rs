//! 测量引擎
//!
//! 单实体测量（坐标、面积、圆、线段）与双实体测量（距离、角度、两点）。
//! 几何上的退化情况不返回 `Err`，而是产生 [`MeasurementResult::Invalid`]，
//! 保证每次拾取后都有可显示的结果。

use crate::classify::{classify, is_circle, is_flat_face, is_segment, Classification};
use crate::error::MeasureError;
use crate::math::{angle_between, perpendicular, Point3, Vector3};
use crate::resolve::{direction, reference_point};
use crate::shape::{Curve, Shape, ShapeKind};
use serde::Serialize;

/// 最小距离低于该值时视为接触，不画连线
pub const TOUCH_TOLERANCE: f64 = 1e-9;

/// 角度（度）接近 0 或 180 的容差，用于平行判定
pub const PARALLEL_TOLERANCE: f64 = 1e-6;

/// 结果类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ResultKind {
    Length,
    Distance,
    Radius,
    Angle,
    Coordinates,
    Area,
    Invalid,
}

/// 测量结果
///
/// 所有分量差均按 `second - first` 计算（线段为终点减起点）。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MeasurementResult {
    Coordinates {
        point: Point3,
    },
    Area {
        area: f64,
        /// 是否为平面
        flat: bool,
    },
    Radius {
        radius: f64,
        center: Point3,
        axis: Vector3,
        /// 圆上一点，半径线的终点
        rim: Point3,
    },
    Length {
        length: f64,
        start: Point3,
        end: Point3,
        delta: Vector3,
        /// 标注位置
        anchor: Point3,
    },
    Distance {
        distance: f64,
        from: Point3,
        to: Point3,
        delta: Vector3,
    },
    Angle {
        /// 角度（度），范围 [0, 90]
        angle: f64,
        /// 平行时两参考点的垂直距离
        distance: Option<f64>,
        from: Point3,
        to: Point3,
    },
    Invalid(MeasureError),
}

impl MeasurementResult {
    pub fn kind(&self) -> ResultKind {
        match self {
            MeasurementResult::Coordinates { .. } => ResultKind::Coordinates,
            MeasurementResult::Area { .. } => ResultKind::Area,
            MeasurementResult::Radius { .. } => ResultKind::Radius,
            MeasurementResult::Length { .. } => ResultKind::Length,
            MeasurementResult::Distance { .. } => ResultKind::Distance,
            MeasurementResult::Angle { .. } => ResultKind::Angle,
            MeasurementResult::Invalid(_) => ResultKind::Invalid,
        }
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, MeasurementResult::Invalid(_))
    }

    pub fn error(&self) -> Option<&MeasureError> {
        match self {
            MeasurementResult::Invalid(err) => Some(err),
            _ => None,
        }
    }

    /// 两形状是否接触（距离结果且距离低于接触容差）
    pub fn is_touching(&self) -> bool {
        matches!(self, MeasurementResult::Distance { distance, .. } if *distance <= TOUCH_TOLERANCE)
    }
}

impl From<MeasureError> for MeasurementResult {
    fn from(err: MeasureError) -> Self {
        MeasurementResult::Invalid(err)
    }
}

fn check_valid<S: Shape>(shape: &S) -> Result<(), MeasureError> {
    if shape.is_valid() {
        Ok(())
    } else {
        Err(MeasureError::InvalidShape(shape.description()))
    }
}

/// 单实体测量
///
/// 面 → 面积，顶点 → 坐标，圆 → 半径，线段 → 长度，其余 → 无法测量。
pub fn measure_single<S: Shape>(shape: &S) -> MeasurementResult {
    if let Err(err) = check_valid(shape) {
        return err.into();
    }
    match shape.kind() {
        ShapeKind::Face => return measure_area(shape),
        ShapeKind::Vertex => {
            if let Some(point) = shape.vertexes().first() {
                return measure_coordinates(*point);
            }
        }
        _ => {}
    }
    if is_circle(shape) {
        measure_circle(shape)
    } else if is_segment(shape) {
        measure_segment(shape)
    } else {
        MeasureError::UnclassifiableShape(shape.description()).into()
    }
}

pub fn measure_coordinates(point: Point3) -> MeasurementResult {
    MeasurementResult::Coordinates { point }
}

pub fn measure_area<S: Shape>(face: &S) -> MeasurementResult {
    if let Err(err) = check_valid(face) {
        return err.into();
    }
    match face.area() {
        Some(area) => MeasurementResult::Area {
            area,
            flat: is_flat_face(face),
        },
        None => MeasureError::InvalidShape(face.description()).into(),
    }
}

pub fn measure_circle<S: Shape>(edge: &S) -> MeasurementResult {
    if let Err(err) = check_valid(edge) {
        return err.into();
    }
    let Some(Curve::Circle {
        center,
        radius,
        axis,
    }) = edge.curve()
    else {
        return MeasureError::UnclassifiableShape(edge.description()).into();
    };

    // 圆弧取起点，否则在圆上任取一点
    let rim = edge
        .vertexes()
        .first()
        .copied()
        .unwrap_or_else(|| center + perpendicular(&axis) * radius);

    MeasurementResult::Radius {
        radius,
        center,
        axis,
        rim,
    }
}

pub fn measure_segment<S: Shape>(edge: &S) -> MeasurementResult {
    if !is_segment(edge) {
        return MeasureError::UnclassifiableShape(edge.description()).into();
    }
    let vertexes = edge.vertexes();
    let (start, end) = (vertexes[0], vertexes[1]);
    let delta = end - start;
    MeasurementResult::Length {
        length: edge.length().unwrap_or_else(|| delta.norm()),
        start,
        end,
        delta,
        anchor: edge.bound_box().center(),
    }
}

/// 两点距离
pub fn measure_points(first: Point3, second: Point3) -> MeasurementResult {
    let delta = second - first;
    MeasurementResult::Distance {
        distance: delta.norm(),
        from: first,
        to: second,
        delta,
    }
}

/// 两形状的最小距离，由几何内核计算
pub fn measure_distance<S: Shape>(first: &S, second: &S) -> MeasurementResult {
    for shape in [first, second] {
        if let Err(err) = check_valid(shape) {
            return err.into();
        }
    }

    let closest = first
        .dist_to_shape(second)
        .and_then(|result| result.closest_pair().map(|pair| (result.distance, pair)));
    let Some((distance, (from, to))) = closest else {
        return MeasureError::NoClosestPoints {
            first: first.description(),
            second: second.description(),
        }
        .into();
    };

    if distance > TOUCH_TOLERANCE {
        measure_points(from, to)
    } else {
        MeasurementResult::Distance {
            distance: distance.max(0.0),
            from,
            to,
            delta: to - from,
        }
    }
}

/// 折叠到 [0, 90] 度
pub fn fold_angle(angle: f64) -> f64 {
    let angle = angle.abs();
    if angle > 90.0 {
        180.0 - angle
    } else {
        angle
    }
}

pub fn is_parallel(angle: f64) -> bool {
    angle.abs() < PARALLEL_TOLERANCE || (180.0 - angle).abs() < PARALLEL_TOLERANCE
}

/// 两形状夹角
///
/// 两平面取二面角（法向夹角的补角），平面与直线取线面角（90° 减法向夹角），
/// 其余取方向夹角。结果折叠到 [0, 90]，平行时附带参考点的垂直距离。
pub fn measure_angle<S: Shape>(first: &S, second: &S) -> MeasurementResult {
    for shape in [first, second] {
        if let Err(err) = check_valid(shape) {
            return err.into();
        }
    }

    let (Some(d1), Some(d2)) = (direction(first), direction(second)) else {
        return MeasureError::UndefinedDirection.into();
    };
    let from = reference_point(first);
    let to = reference_point(second);

    let raw = angle_between(&d1, &d2).to_degrees();
    let face1 = classify(first) == Classification::FlatFace;
    let face2 = classify(second) == Classification::FlatFace;
    let angle = fold_angle(match (face1, face2) {
        (true, true) => 180.0 - raw,
        (true, false) | (false, true) => 90.0 - raw,
        (false, false) => raw,
    });

    let offset = to - from;
    let distance = is_parallel(angle).then(|| {
        if face1 {
            offset.dot(&*d1).abs()
        } else if face2 {
            offset.dot(&*d2).abs()
        } else {
            offset.cross(&*d1).norm()
        }
    });

    MeasurementResult::Angle {
        angle,
        distance,
        from,
        to,
    }
}
