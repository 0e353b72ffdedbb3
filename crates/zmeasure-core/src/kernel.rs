//! 参考几何内核
//!
//! 用于测试和命令行演示的 [`Shape`] 实现。支持的图元：
//! - 顶点 (Vertex)
//! - 线段 (Segment)
//! - 圆 / 圆弧 (Arc)
//! - 基准线 / 基准面 (DatumLine / DatumPlane)
//! - 平面多边形 (Polygon)
//! - 长方体 (Cuboid)
//!
//! 最小距离由 parry 计算：每个图元拆成凸块（零半径球、线段、三角形、长方体），
//! 取所有凸块对之间的最小值。圆弧先按折线求近似解，
//! 再在真实圆弧与对方形状之间交替投影修正。

use crate::math::{midpoint, perpendicular, BoundingBox3, Placement, Point3, Vector3, EPSILON};
use crate::shape::{Curve, Shape, ShapeDistance, ShapeKind};
use parry3d_f64::query::{self, ClosestPoints};
use parry3d_f64::shape::SharedShape;
use std::f64::consts::TAU;
use tracing::debug;

/// 基准对象包围盒的半尺寸，模拟宿主中"无限大"的基准线/面
pub const DATUM_EXTENT: f64 = 1e10;

/// 基准对象参与距离计算时的有限半尺寸
const DATUM_QUERY_EXTENT: f64 = 1e6;

/// 整圆离散化的段数
const SEGMENTS_PER_TURN: f64 = 360.0;

/// 圆弧最近点修正的最大迭代次数
const REFINE_ITERATIONS: usize = 32;

/// 圆弧边（整圆时扫掠角为 2π）
#[derive(Debug, Clone, PartialEq)]
pub struct ArcEdge {
    pub center: Point3,
    pub radius: f64,
    pub axis: Vector3,
    /// 起始角度（弧度），0 对应参考方向
    pub start_angle: f64,
    /// 终止角度（弧度）
    pub end_angle: f64,
}

impl ArcEdge {
    pub fn new(center: Point3, radius: f64, axis: Vector3, start_angle: f64, end_angle: f64) -> Self {
        Self {
            center,
            radius,
            axis,
            start_angle,
            end_angle,
        }
    }

    pub fn circle(center: Point3, radius: f64, axis: Vector3) -> Self {
        Self::new(center, radius, axis, 0.0, TAU)
    }

    /// 扫掠角，范围 (0, 2π]
    pub fn sweep_angle(&self) -> f64 {
        let sweep = self.end_angle - self.start_angle;
        if sweep.abs() >= TAU - EPSILON {
            return TAU;
        }
        let sweep = sweep.rem_euclid(TAU);
        if sweep < EPSILON {
            TAU
        } else {
            sweep
        }
    }

    pub fn is_closed(&self) -> bool {
        self.sweep_angle() >= TAU - EPSILON
    }

    /// 圆所在平面的正交基 (u, v)，u 为 0 角方向
    fn basis(&self) -> (Vector3, Vector3) {
        let axis = self.axis.normalize();
        let u = perpendicular(&axis);
        let v = axis.cross(&u);
        (u, v)
    }

    pub fn point_at_angle(&self, angle: f64) -> Point3 {
        let (u, v) = self.basis();
        self.center + (u * angle.cos() + v * angle.sin()) * self.radius
    }

    pub fn start_point(&self) -> Point3 {
        self.point_at_angle(self.start_angle)
    }

    pub fn end_point(&self) -> Point3 {
        self.point_at_angle(self.start_angle + self.sweep_angle())
    }

    pub fn length(&self) -> f64 {
        self.sweep_angle() * self.radius
    }

    /// 沿弧均匀采样（含两端）
    fn sample_points(&self) -> Vec<Point3> {
        let sweep = self.sweep_angle();
        let count = ((sweep / TAU) * SEGMENTS_PER_TURN).ceil().max(1.0) as usize;
        (0..=count)
            .map(|i| self.point_at_angle(self.start_angle + sweep * i as f64 / count as f64))
            .collect()
    }

    /// 弧上离 `point` 最近的点
    ///
    /// 先投影到圆所在平面再沿径向放大到半径；落在弧外时取较近的端点。
    /// 点位于轴线上时圆上各点等距，取起点。
    pub fn closest_point(&self, point: &Point3) -> Point3 {
        let (u, v) = self.basis();
        let offset = point - self.center;
        let (x, y) = (offset.dot(&u), offset.dot(&v));
        if x.hypot(y) < EPSILON {
            return self.start_point();
        }

        let sweep = self.sweep_angle();
        let along = (y.atan2(x) - self.start_angle).rem_euclid(TAU);
        if self.is_closed() || along <= sweep {
            return self.point_at_angle(self.start_angle + along);
        }
        let (start, end) = (self.start_point(), self.end_point());
        if (point - start).norm() <= (point - end).norm() {
            start
        } else {
            end
        }
    }

    fn is_valid(&self) -> bool {
        self.radius > EPSILON && self.axis.norm() > EPSILON
    }
}

/// 参考内核的形状
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Vertex(Point3),
    Segment { start: Point3, end: Point3 },
    Arc(ArcEdge),
    /// 沿放置 Z 轴的无限基准线
    DatumLine(Placement),
    /// 放置 XY 平面上的无限基准面
    DatumPlane(Placement),
    /// 平面多边形面，顶点逆时针排列（从法向一侧看）
    Polygon(Vec<Point3>),
    /// 轴对齐长方体
    Cuboid { min: Point3, max: Point3 },
    /// 空形状（无效）
    Null,
}

impl Primitive {
    pub fn segment(start: Point3, end: Point3) -> Self {
        Primitive::Segment { start, end }
    }

    pub fn polygon(vertices: Vec<Point3>) -> Self {
        Primitive::Polygon(vertices)
    }

    /// XY 平面上的矩形面，法向 +Z
    pub fn rectangle(origin: Point3, width: f64, height: f64) -> Self {
        Primitive::Polygon(vec![
            origin,
            origin + Vector3::new(width, 0.0, 0.0),
            origin + Vector3::new(width, height, 0.0),
            origin + Vector3::new(0.0, height, 0.0),
        ])
    }

    pub fn cuboid(min: Point3, max: Point3) -> Self {
        Primitive::Cuboid { min, max }
    }

    /// 长方体的六个面，法向朝外，顺序为 -X, +X, -Y, +Y, -Z, +Z
    pub fn cuboid_faces(min: Point3, max: Point3) -> [Primitive; 6] {
        let p = |x: f64, y: f64, z: f64| Point3::new(x, y, z);
        let (x0, y0, z0) = (min.x, min.y, min.z);
        let (x1, y1, z1) = (max.x, max.y, max.z);
        [
            Primitive::Polygon(vec![p(x0, y0, z0), p(x0, y0, z1), p(x0, y1, z1), p(x0, y1, z0)]),
            Primitive::Polygon(vec![p(x1, y0, z0), p(x1, y1, z0), p(x1, y1, z1), p(x1, y0, z1)]),
            Primitive::Polygon(vec![p(x0, y0, z0), p(x1, y0, z0), p(x1, y0, z1), p(x0, y0, z1)]),
            Primitive::Polygon(vec![p(x0, y1, z0), p(x0, y1, z1), p(x1, y1, z1), p(x1, y1, z0)]),
            Primitive::Polygon(vec![p(x0, y0, z0), p(x0, y1, z0), p(x1, y1, z0), p(x1, y0, z0)]),
            Primitive::Polygon(vec![p(x0, y0, z1), p(x1, y0, z1), p(x1, y1, z1), p(x0, y1, z1)]),
        ]
    }

    /// 多边形的面积向量（Newell 法），模长为面积，方向为法向
    fn polygon_area_vector(vertices: &[Point3]) -> Vector3 {
        let Some(first) = vertices.first() else {
            return Vector3::zeros();
        };
        let mut sum = Vector3::zeros();
        for pair in vertices[1..].windows(2) {
            sum += (pair[0] - first).cross(&(pair[1] - first));
        }
        sum * 0.5
    }

    fn datum_half_extents() -> Vector3 {
        Vector3::repeat(DATUM_EXTENT)
    }

    /// 形状上离 `point` 最近的点，圆弧精确求解，其余由 parry 投影
    fn project_point(&self, point: &Point3) -> Option<Point3> {
        if let Primitive::Arc(arc) = self {
            return Some(arc.closest_point(point));
        }
        self.convex_parts()
            .iter()
            .map(|(pos, part)| part.project_point(pos, point, true).point)
            .min_by(|a, b| (a - point).norm().total_cmp(&(b - point).norm()))
    }

    /// 在两形状之间交替投影，直到最近点对稳定
    fn refine_pair(&self, other: &Self, mut a: Point3, mut b: Point3) -> (Point3, Point3) {
        for _ in 0..REFINE_ITERATIONS {
            let Some(next_a) = self.project_point(&b) else {
                break;
            };
            let Some(next_b) = other.project_point(&next_a) else {
                break;
            };
            let moved = (next_a - a).norm() + (next_b - b).norm();
            a = next_a;
            b = next_b;
            if moved < EPSILON {
                break;
            }
        }
        (a, b)
    }

    /// 拆分为 parry 凸块
    fn convex_parts(&self) -> Vec<(Placement, SharedShape)> {
        match self {
            Primitive::Vertex(p) => vec![(translation(p), SharedShape::ball(0.0))],
            Primitive::Segment { start, end } => {
                if (end - start).norm() < EPSILON {
                    vec![(translation(start), SharedShape::ball(0.0))]
                } else {
                    vec![(Placement::identity(), SharedShape::segment(*start, *end))]
                }
            }
            Primitive::Arc(arc) => arc
                .sample_points()
                .windows(2)
                .map(|w| (Placement::identity(), SharedShape::segment(w[0], w[1])))
                .collect(),
            Primitive::DatumLine(placement) => {
                let base = Point3::from(placement.translation.vector);
                let dir = placement.rotation * Vector3::z() * DATUM_QUERY_EXTENT;
                vec![(Placement::identity(), SharedShape::segment(base - dir, base + dir))]
            }
            Primitive::DatumPlane(placement) => {
                let e = DATUM_QUERY_EXTENT;
                let corners = [(-e, -e), (e, -e), (e, e), (-e, e)]
                    .map(|(x, y)| placement * Point3::new(x, y, 0.0));
                vec![
                    (
                        Placement::identity(),
                        SharedShape::triangle(corners[0], corners[1], corners[2]),
                    ),
                    (
                        Placement::identity(),
                        SharedShape::triangle(corners[0], corners[2], corners[3]),
                    ),
                ]
            }
            Primitive::Polygon(vertices) => match vertices.first() {
                Some(first) => vertices[1..]
                    .windows(2)
                    .map(|w| (Placement::identity(), SharedShape::triangle(*first, w[0], w[1])))
                    .collect(),
                None => Vec::new(),
            },
            Primitive::Cuboid { min, max } => {
                let half = (max - min) * 0.5;
                vec![(
                    translation(&midpoint(min, max)),
                    SharedShape::cuboid(half.x, half.y, half.z),
                )]
            }
            Primitive::Null => Vec::new(),
        }
    }
}

fn translation(p: &Point3) -> Placement {
    Placement::translation(p.x, p.y, p.z)
}

fn fmt_point(p: &Point3) -> String {
    format!("({}, {}, {})", p.x, p.y, p.z)
}

/// 两个凸块之间的最近点
fn closest_pair(
    pos1: &Placement,
    part1: &SharedShape,
    pos2: &Placement,
    part2: &SharedShape,
) -> Option<(f64, Point3, Point3)> {
    match query::closest_points(pos1, &**part1, pos2, &**part2, f64::MAX) {
        Ok(ClosestPoints::WithinMargin(a, b)) => Some(((b - a).norm(), a, b)),
        Ok(ClosestPoints::Intersecting) => {
            match query::contact(pos1, &**part1, pos2, &**part2, 0.0) {
                Ok(Some(contact)) => {
                    let touch = midpoint(&contact.point1, &contact.point2);
                    Some((0.0, touch, touch))
                }
                Ok(None) => None,
                Err(err) => {
                    debug!("contact query unsupported: {:?}", err);
                    None
                }
            }
        }
        Ok(ClosestPoints::Disjoint) => None,
        Err(err) => {
            debug!("closest points query unsupported: {:?}", err);
            None
        }
    }
}

impl Shape for Primitive {
    fn vertex(point: Point3) -> Self {
        Primitive::Vertex(point)
    }

    fn is_valid(&self) -> bool {
        match self {
            Primitive::Arc(arc) => arc.is_valid(),
            Primitive::Polygon(vertices) => vertices.len() >= 3,
            Primitive::Cuboid { min, max } => min.x <= max.x && min.y <= max.y && min.z <= max.z,
            Primitive::Null => false,
            _ => true,
        }
    }

    fn kind(&self) -> ShapeKind {
        match self {
            Primitive::Vertex(_) => ShapeKind::Vertex,
            Primitive::Segment { .. } | Primitive::Arc(_) | Primitive::DatumLine(_) => {
                ShapeKind::Edge
            }
            Primitive::DatumPlane(_) | Primitive::Polygon(_) => ShapeKind::Face,
            Primitive::Cuboid { .. } => ShapeKind::Solid,
            Primitive::Null => ShapeKind::Other,
        }
    }

    fn vertexes(&self) -> Vec<Point3> {
        match self {
            Primitive::Vertex(p) => vec![*p],
            Primitive::Segment { start, end } => vec![*start, *end],
            Primitive::Arc(arc) => {
                if arc.is_closed() {
                    vec![arc.start_point()]
                } else {
                    vec![arc.start_point(), arc.end_point()]
                }
            }
            Primitive::Polygon(vertices) => vertices.clone(),
            Primitive::Cuboid { min, max } => {
                let mut corners = Vec::with_capacity(8);
                for x in [min.x, max.x] {
                    for y in [min.y, max.y] {
                        for z in [min.z, max.z] {
                            corners.push(Point3::new(x, y, z));
                        }
                    }
                }
                corners
            }
            Primitive::DatumLine(_) | Primitive::DatumPlane(_) | Primitive::Null => Vec::new(),
        }
    }

    fn curve(&self) -> Option<Curve> {
        match self {
            Primitive::Segment { .. } | Primitive::DatumLine(_) => Some(Curve::Line),
            Primitive::Arc(arc) => Some(Curve::Circle {
                center: arc.center,
                radius: arc.radius,
                axis: arc.axis.normalize(),
            }),
            _ => None,
        }
    }

    fn length(&self) -> Option<f64> {
        match self {
            Primitive::Segment { start, end } => Some((end - start).norm()),
            Primitive::Arc(arc) => Some(arc.length()),
            _ => None,
        }
    }

    fn bound_box(&self) -> BoundingBox3 {
        match self {
            Primitive::Vertex(p) => BoundingBox3::new(*p, *p),
            Primitive::Segment { start, end } => BoundingBox3::from_points([*start, *end]),
            Primitive::Arc(arc) => BoundingBox3::from_points(arc.sample_points()),
            Primitive::DatumLine(placement) | Primitive::DatumPlane(placement) => {
                BoundingBox3::from_center(
                    Point3::from(placement.translation.vector),
                    Self::datum_half_extents(),
                )
            }
            Primitive::Polygon(vertices) => BoundingBox3::from_points(vertices.iter().copied()),
            Primitive::Cuboid { min, max } => BoundingBox3::new(*min, *max),
            Primitive::Null => BoundingBox3::empty(),
        }
    }

    fn area(&self) -> Option<f64> {
        match self {
            Primitive::Polygon(vertices) => Some(Self::polygon_area_vector(vertices).norm()),
            Primitive::DatumPlane(_) => Some(4.0 * DATUM_EXTENT * DATUM_EXTENT),
            Primitive::Cuboid { min, max } => {
                let d = max - min;
                Some(2.0 * (d.x * d.y + d.y * d.z + d.z * d.x))
            }
            _ => None,
        }
    }

    fn volume(&self) -> Option<f64> {
        match self {
            Primitive::Polygon(_) | Primitive::DatumPlane(_) => Some(0.0),
            Primitive::Cuboid { min, max } => {
                let d = max - min;
                Some(d.x * d.y * d.z)
            }
            _ => None,
        }
    }

    fn placement(&self) -> Option<Placement> {
        match self {
            Primitive::Vertex(p) => Some(translation(p)),
            Primitive::DatumLine(placement) | Primitive::DatumPlane(placement) => Some(*placement),
            Primitive::Null => None,
            _ => Some(Placement::identity()),
        }
    }

    // 平面上各处法向相同，参数被忽略
    fn normal_at(&self, _u: f64, _v: f64) -> Option<Vector3> {
        match self {
            Primitive::Polygon(vertices) => {
                let n = Self::polygon_area_vector(vertices);
                (n.norm() > EPSILON).then(|| n.normalize())
            }
            Primitive::DatumPlane(placement) => Some(placement.rotation * Vector3::z()),
            _ => None,
        }
    }

    fn dist_to_shape(&self, other: &Self) -> Option<ShapeDistance> {
        let mine = self.convex_parts();
        let theirs = other.convex_parts();

        let mut best: Option<(f64, Point3, Point3)> = None;
        for (pos1, part1) in &mine {
            for (pos2, part2) in &theirs {
                let Some(candidate) = closest_pair(pos1, part1, pos2, part2) else {
                    continue;
                };
                if best.map_or(true, |(d, _, _)| candidate.0 < d) {
                    best = Some(candidate);
                }
            }
        }

        let (distance, a, b) = best?;
        let is_arc = |shape: &Self| matches!(shape, Primitive::Arc(_));
        let (distance, a, b) = if distance > 0.0 && (is_arc(self) || is_arc(other)) {
            let (a, b) = self.refine_pair(other, a, b);
            ((b - a).norm(), a, b)
        } else {
            (distance, a, b)
        };
        Some(ShapeDistance {
            distance,
            pairs: vec![(a, b)],
        })
    }

    fn description(&self) -> String {
        match self {
            Primitive::Vertex(p) => format!("Vertex {}", fmt_point(p)),
            Primitive::Segment { start, end } => {
                format!("Edge (line) {} - {}", fmt_point(start), fmt_point(end))
            }
            Primitive::Arc(arc) => format!(
                "Edge (circle) center {} radius {}",
                fmt_point(&arc.center),
                arc.radius
            ),
            Primitive::DatumLine(placement) => format!(
                "Edge (datum line) at {}",
                fmt_point(&Point3::from(placement.translation.vector))
            ),
            Primitive::DatumPlane(placement) => format!(
                "Face (datum plane) at {}",
                fmt_point(&Point3::from(placement.translation.vector))
            ),
            Primitive::Polygon(vertices) => format!("Face ({} vertices)", vertices.len()),
            Primitive::Cuboid { min, max } => {
                format!("Solid (box) {} - {}", fmt_point(min), fmt_point(max))
            }
            Primitive::Null => "Null shape".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-6;

    #[test]
    fn test_vertex_vertex_distance() {
        let a = Primitive::Vertex(Point3::origin());
        let b = Primitive::Vertex(Point3::new(1.0, 0.0, 0.0));
        let d = a.dist_to_shape(&b).unwrap();
        assert!((d.distance - 1.0).abs() < TOL);
        let (pa, pb) = d.closest_pair().unwrap();
        assert!((pa - Point3::origin()).norm() < TOL);
        assert!((pb - Point3::new(1.0, 0.0, 0.0)).norm() < TOL);
    }

    #[test]
    fn test_vertex_face_distance() {
        let face = Primitive::rectangle(Point3::origin(), 10.0, 10.0);
        let v = Primitive::Vertex(Point3::new(5.0, 5.0, 3.0));
        let d = v.dist_to_shape(&face).unwrap();
        assert!((d.distance - 3.0).abs() < TOL);
        let (_, on_face) = d.closest_pair().unwrap();
        assert!((on_face - Point3::new(5.0, 5.0, 0.0)).norm() < TOL);
    }

    #[test]
    fn test_crossing_segments_touch() {
        let a = Primitive::segment(Point3::new(-1.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0));
        let b = Primitive::segment(Point3::new(0.0, -1.0, 0.0), Point3::new(0.0, 1.0, 0.0));
        let d = a.dist_to_shape(&b).unwrap();
        assert!(d.distance < TOL);
    }

    #[test]
    fn test_circle_distance_is_exact() {
        let circle = Primitive::Arc(ArcEdge::circle(Point3::origin(), 2.0, Vector3::z()));

        let d = Primitive::Vertex(Point3::origin()).dist_to_shape(&circle).unwrap();
        assert!((d.distance - 2.0).abs() < 1e-12);
        let (_, on_circle) = d.closest_pair().unwrap();
        assert!(((on_circle - Point3::origin()).norm() - 2.0).abs() < 1e-12);

        // 点在圆平面外、两弦之间
        let angle = 0.5_f64.to_radians();
        let off = Point3::new(5.0 * angle.cos(), 5.0 * angle.sin(), 4.0);
        let d = Primitive::Vertex(off).dist_to_shape(&circle).unwrap();
        assert!((d.distance - 5.0).abs() < TOL);
        let (_, on_circle) = d.closest_pair().unwrap();
        assert!((on_circle - Point3::new(2.0 * angle.cos(), 2.0 * angle.sin(), 0.0)).norm() < TOL);
    }

    #[test]
    fn test_arc_closest_point_clamps_to_ends() {
        let quarter = ArcEdge::new(Point3::origin(), 1.0, Vector3::z(), 0.0, std::f64::consts::FRAC_PI_2);
        let p = quarter.closest_point(&Point3::new(-1.0, -0.1, 0.0));
        assert!((p - Point3::new(0.0, 1.0, 0.0)).norm() < TOL);
        let p = quarter.closest_point(&Point3::new(0.2, -3.0, 0.0));
        assert!((p - Point3::new(1.0, 0.0, 0.0)).norm() < TOL);
        let p = quarter.closest_point(&Point3::new(3.0, 3.0, 7.0));
        let h = std::f64::consts::FRAC_1_SQRT_2;
        assert!((p - Point3::new(h, h, 0.0)).norm() < TOL);
    }

    #[test]
    fn test_segment_to_circle_distance() {
        let circle = Primitive::Arc(ArcEdge::circle(Point3::origin(), 2.0, Vector3::z()));
        let segment = Primitive::segment(Point3::new(-5.0, 3.0, 0.0), Point3::new(5.0, 3.0, 0.0));
        let d = segment.dist_to_shape(&circle).unwrap();
        assert!((d.distance - 1.0).abs() < TOL);
        let (on_segment, on_circle) = d.closest_pair().unwrap();
        assert!((on_segment - Point3::new(0.0, 3.0, 0.0)).norm() < 1e-4);
        assert!(((on_circle - Point3::origin()).norm() - 2.0).abs() < TOL);
    }

    #[test]
    fn test_null_has_no_distance() {
        let v = Primitive::Vertex(Point3::origin());
        assert!(v.dist_to_shape(&Primitive::Null).is_none());
        assert!(!Primitive::Null.is_valid());
    }

    #[test]
    fn test_arc_geometry() {
        let circle = ArcEdge::circle(Point3::origin(), 2.0, Vector3::z());
        assert!(circle.is_closed());
        assert!((circle.start_point() - Point3::new(2.0, 0.0, 0.0)).norm() < TOL);
        assert!((circle.length() - 4.0 * std::f64::consts::PI).abs() < TOL);

        let quarter = ArcEdge::new(Point3::origin(), 1.0, Vector3::z(), 0.0, std::f64::consts::FRAC_PI_2);
        assert!(!quarter.is_closed());
        assert!((quarter.end_point() - Point3::new(0.0, 1.0, 0.0)).norm() < TOL);
        assert_eq!(Primitive::Arc(quarter).vertexes().len(), 2);
    }

    #[test]
    fn test_cuboid_faces_point_outwards() {
        let faces = Primitive::cuboid_faces(Point3::origin(), Point3::new(1.0, 2.0, 3.0));
        let expected = [
            -Vector3::x(),
            Vector3::x(),
            -Vector3::y(),
            Vector3::y(),
            -Vector3::z(),
            Vector3::z(),
        ];
        for (face, normal) in faces.iter().zip(expected) {
            let n = face.normal_at(0.0, 0.0).unwrap();
            assert!((n - normal).norm() < TOL, "{:?} vs {:?}", n, normal);
        }
        assert!((faces[4].area().unwrap() - 2.0).abs() < TOL);
    }

    #[test]
    fn test_datum_bound_box_is_huge() {
        let datum = Primitive::DatumPlane(Placement::translation(1.0, 2.0, 3.0));
        assert!(datum.bound_box().diagonal_length() > 1e10);
        assert_eq!(datum.kind(), ShapeKind::Face);
    }
}
