//! 结果呈现
//!
//! 把 [`MeasurementResult`] 转成报告面板文本和绘制请求。
//! 报告使用全精度数值，三维标注使用截断后的数值。
//! 纯格式化，不会失败。

use crate::config::MeasureConfig;
use crate::math::{coincident, midpoint, Point3, Vector3};
use crate::measure::MeasurementResult;
use serde::Serialize;

/// 测量图形所在的分组
pub const MEASURES_GROUP: &str = "Measures";

/// 场景对象名称
pub mod names {
    pub const LENGTH: &str = "Length";
    pub const DIST_POINTS: &str = "DistPoints";
    pub const RADIUS: &str = "Radius";
    pub const ANGLE: &str = "Angle";
    pub const CIRCLE: &str = "aCircle";
    /// 两端重合的线退化成的点
    pub const POINT: &str = "aPoint";
    pub const MEASURE_LABEL: &str = "MeasureLbl";
    pub const ANGLE_LABEL: &str = "AngleLbl";
    /// 临时捕捉点标记
    pub const SNAP_MARKER: &str = "PtS";
}

/// RGB 颜色，分量范围 [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);
    pub const BLUE: Color = Color::new(0.0, 0.0, 1.0);
    pub const ORANGE: Color = Color::new(1.0, 0.667, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

/// 绘制样式
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DrawStyle {
    pub line_width: f32,
    pub line_color: Color,
    pub point_size: f32,
    pub point_color: Color,
}

impl DrawStyle {
    /// 测量线
    pub const MEASURE: DrawStyle = DrawStyle {
        line_width: 3.0,
        line_color: Color::WHITE,
        point_size: 10.0,
        point_color: Color::BLUE,
    };

    /// 被测圆
    pub const CIRCLE: DrawStyle = DrawStyle {
        line_width: 5.0,
        ..DrawStyle::MEASURE
    };

    pub const SNAP_MARKER: DrawStyle = DrawStyle {
        point_color: Color::ORANGE,
        ..DrawStyle::MEASURE
    };
}

/// 绘制几何
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawGeometry {
    Line {
        from: Point3,
        to: Point3,
    },
    Circle {
        radius: f64,
        center: Point3,
        axis: Vector3,
    },
    Point(Point3),
    /// 多行文字标注
    Annotation {
        position: Point3,
        lines: Vec<String>,
        font_size: f64,
    },
}

/// 单个待创建的场景对象
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawItem {
    pub name: String,
    pub geometry: DrawGeometry,
    pub style: DrawStyle,
}

impl DrawItem {
    pub fn new(name: &str, geometry: DrawGeometry, style: DrawStyle) -> Self {
        Self {
            name: name.to_string(),
            geometry,
            style,
        }
    }

    /// 两点连线，两点重合时退化为点
    pub fn line_or_point(name: &str, from: Point3, to: Point3) -> Self {
        if coincident(&from, &to) {
            Self::new(names::POINT, DrawGeometry::Point(from), DrawStyle::MEASURE)
        } else {
            Self::new(name, DrawGeometry::Line { from, to }, DrawStyle::MEASURE)
        }
    }

    pub fn annotation(name: &str, position: Point3, lines: Vec<String>, font_size: f64) -> Self {
        Self::new(
            name,
            DrawGeometry::Annotation {
                position,
                lines,
                font_size,
            },
            DrawStyle::MEASURE,
        )
    }

    /// 临时捕捉点标记
    pub fn snap_marker(point: Point3) -> Self {
        Self::new(names::SNAP_MARKER, DrawGeometry::Point(point), DrawStyle::SNAP_MARKER)
    }
}

/// 一次测量的绘制请求，所有对象放入 [`MEASURES_GROUP`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DrawRequest {
    pub items: Vec<DrawItem>,
}

impl DrawRequest {
    pub fn push(&mut self, item: DrawItem) {
        self.items.push(item);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// 呈现结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Presentation {
    /// 报告面板文本
    pub report: String,
    /// 需要提交到场景的图形
    pub draw: Option<DrawRequest>,
    /// 需要放置临时标记的位置（关闭标注时的圆心）
    pub marker: Option<Point3>,
}

impl Presentation {
    fn text(report: String) -> Self {
        Self {
            report,
            draw: None,
            marker: None,
        }
    }

    fn with_draw(report: String, draw: DrawRequest) -> Self {
        Self {
            report,
            draw: (!draw.is_empty()).then_some(draw),
            marker: None,
        }
    }
}

fn triple(x: f64, y: f64, z: f64) -> String {
    format!("( {}, {}, {} )", x + 0.0, y + 0.0, z + 0.0)
}

/// 报告中的 ΔX/ΔY/ΔZ 行
fn delta_lines(delta: &Vector3, separator: &str, config: &MeasureConfig) -> String {
    format!(
        "ΔX {sep} {}\nΔY {sep} {}\nΔZ {sep} {}",
        config.length(delta.x),
        config.length(delta.y),
        config.length(delta.z),
        sep = separator
    )
}

/// 标注文字：只显示主值，或附带各轴分量
fn label_lines(headline: &str, value: f64, delta: &Vector3, config: &MeasureConfig) -> Vec<String> {
    if config.show_components {
        vec![
            format!("{}  = {}", headline, config.length_rounded(value)),
            format!("ΔX = {}", config.length_rounded(delta.x)),
            format!("ΔY = {}", config.length_rounded(delta.y)),
            format!("ΔZ = {}", config.length_rounded(delta.z)),
        ]
    } else {
        vec![format!("{} = {}", headline, config.length_rounded(value))]
    }
}

/// 生成报告文本和绘制请求
pub fn present(result: &MeasurementResult, config: &MeasureConfig) -> Presentation {
    match result {
        MeasurementResult::Invalid(err) => Presentation::text(err.to_string()),

        MeasurementResult::Coordinates { point } => {
            let report = format!(
                "Coordinates :\nX : {}\nY : {}\nZ : {}",
                config.length(point.x),
                config.length(point.y),
                config.length(point.z)
            );
            let mut draw = DrawRequest::default();
            if config.show_label {
                draw.push(DrawItem::annotation(
                    names::MEASURE_LABEL,
                    *point,
                    vec![
                        "Coordinates :".to_string(),
                        format!("X : {}", config.length_rounded(point.x)),
                        format!("Y : {}", config.length_rounded(point.y)),
                        format!("Z : {}", config.length_rounded(point.z)),
                    ],
                    config.font_size,
                ));
            }
            Presentation::with_draw(report, draw)
        }

        MeasurementResult::Area { area, flat } => {
            let area = format!("Area : {}", config.unit.render_area(*area));
            let report = if *flat {
                format!("Flat face\n{}", area)
            } else {
                area
            };
            Presentation::text(report)
        }

        MeasurementResult::Radius {
            radius,
            center,
            axis,
            rim,
        } => {
            let c = center.map(|v| config.unit.convert(v));
            let report = format!(
                "Radius : {}\nDiameter : {}\nCenter :\n  {}\nAxis :\n  {}",
                config.length(*radius),
                config.length(radius * 2.0),
                triple(c.x, c.y, c.z),
                triple(axis.x, axis.y, axis.z)
            );
            let mut draw = DrawRequest::default();
            draw.push(DrawItem::new(
                names::CIRCLE,
                DrawGeometry::Circle {
                    radius: *radius,
                    center: *center,
                    axis: *axis,
                },
                DrawStyle::CIRCLE,
            ));
            if config.show_label {
                draw.push(DrawItem::line_or_point(names::RADIUS, *center, *rim));
                draw.push(DrawItem::annotation(
                    names::MEASURE_LABEL,
                    *rim,
                    vec![format!("R = {}", config.length_rounded(*radius))],
                    config.font_size,
                ));
                Presentation::with_draw(report, draw)
            } else {
                Presentation {
                    marker: Some(*center),
                    ..Presentation::with_draw(report, draw)
                }
            }
        }

        MeasurementResult::Length {
            length,
            start,
            end,
            delta,
            anchor,
        } => {
            let report = format!(
                "Length = {}\n{}",
                config.length(*length),
                delta_lines(delta, "=", config)
            );
            let mut draw = DrawRequest::default();
            draw.push(DrawItem::line_or_point(names::LENGTH, *start, *end));
            if config.show_label {
                draw.push(DrawItem::annotation(
                    names::MEASURE_LABEL,
                    *anchor,
                    label_lines("L", *length, delta, config),
                    config.font_size,
                ));
            }
            Presentation::with_draw(report, draw)
        }

        MeasurementResult::Distance {
            distance,
            from,
            to,
            delta,
        } => {
            if result.is_touching() {
                let report = format!(
                    "Minimum Distance : {}\nThe shapes touch or intersect",
                    config.length(0.0)
                );
                return Presentation::text(report);
            }
            let report = format!(
                "Distance = {}\n{}",
                config.length(*distance),
                delta_lines(delta, ":", config)
            );
            let mut draw = DrawRequest::default();
            draw.push(DrawItem::line_or_point(names::DIST_POINTS, *from, *to));
            if config.show_label {
                draw.push(DrawItem::annotation(
                    names::MEASURE_LABEL,
                    midpoint(from, to),
                    label_lines("D", *distance, delta, config),
                    config.font_size,
                ));
            }
            Presentation::with_draw(report, draw)
        }

        MeasurementResult::Angle {
            angle,
            distance,
            from,
            to,
        } => {
            let mut report = format!("Angle : {}°", angle + 0.0);
            if let Some(d) = distance {
                report.push_str(&format!("\nDistance // {}", config.length(*d)));
            }
            let mut draw = DrawRequest::default();
            draw.push(DrawItem::line_or_point(names::ANGLE, *from, *to));
            if config.show_label {
                let lines = match distance {
                    Some(d) if config.show_components => vec![
                        format!("Angle: {}°", config.rounded(*angle)),
                        format!("Distance // {}", config.length_rounded(*d)),
                    ],
                    _ => vec![format!("{}°", config.rounded(*angle))],
                };
                draw.push(DrawItem::annotation(
                    names::ANGLE_LABEL,
                    midpoint(from, to),
                    lines,
                    config.font_size,
                ));
            }
            Presentation::with_draw(report, draw)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MeasureError;
    use crate::kernel::{ArcEdge, Primitive};
    use crate::measure::{measure_angle, measure_distance, measure_single};

    fn annotation_lines(draw: &DrawRequest) -> Vec<String> {
        draw.items
            .iter()
            .find_map(|item| match &item.geometry {
                DrawGeometry::Annotation { lines, .. } => Some(lines.clone()),
                _ => None,
            })
            .unwrap_or_default()
    }

    #[test]
    fn test_segment_presentation() {
        let segment = Primitive::segment(Point3::origin(), Point3::new(3.0, 4.0, 0.0));
        let presentation = present(&measure_single(&segment), &MeasureConfig::default());
        assert_eq!(
            presentation.report,
            "Length = 5 mm\nΔX = 3 mm\nΔY = 4 mm\nΔZ = 0 mm"
        );

        let draw = presentation.draw.unwrap();
        assert_eq!(draw.items[0].name, names::LENGTH);
        assert_eq!(
            draw.items[0].geometry,
            DrawGeometry::Line {
                from: Point3::origin(),
                to: Point3::new(3.0, 4.0, 0.0)
            }
        );
        assert_eq!(annotation_lines(&draw), vec!["L = 5.000 mm"]);
    }

    #[test]
    fn test_segment_components_label() {
        let segment = Primitive::segment(Point3::origin(), Point3::new(3.0, 4.0, 0.0));
        let config = MeasureConfig {
            show_components: true,
            ..MeasureConfig::default()
        };
        let draw = present(&measure_single(&segment), &config).draw.unwrap();
        assert_eq!(
            annotation_lines(&draw),
            vec!["L  = 5.000 mm", "ΔX = 3.000 mm", "ΔY = 4.000 mm", "ΔZ = 0.000 mm"]
        );
    }

    #[test]
    fn test_circle_presentation() {
        let circle = Primitive::Arc(ArcEdge::circle(Point3::origin(), 2.0, Vector3::z()));
        let presentation = present(&measure_single(&circle), &MeasureConfig::default());
        assert_eq!(
            presentation.report,
            "Radius : 2 mm\nDiameter : 4 mm\nCenter :\n  ( 0, 0, 0 )\nAxis :\n  ( 0, 0, 1 )"
        );
        assert!(presentation.marker.is_none());

        let draw = presentation.draw.unwrap();
        let item_names: Vec<_> = draw.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(item_names, vec![names::CIRCLE, names::RADIUS, names::MEASURE_LABEL]);
        assert_eq!(draw.items[0].style.line_width, 5.0);
        assert_eq!(annotation_lines(&draw), vec!["R = 2.000 mm"]);
    }

    #[test]
    fn test_circle_without_label_places_marker() {
        let circle = Primitive::Arc(ArcEdge::circle(Point3::new(1.0, 2.0, 3.0), 2.0, Vector3::z()));
        let config = MeasureConfig {
            show_label: false,
            ..MeasureConfig::default()
        };
        let presentation = present(&measure_single(&circle), &config);
        assert_eq!(presentation.marker, Some(Point3::new(1.0, 2.0, 3.0)));
        assert_eq!(presentation.draw.unwrap().items.len(), 1);
    }

    #[test]
    fn test_distance_presentation() {
        let a = Primitive::Vertex(Point3::origin());
        let b = Primitive::Vertex(Point3::new(1.0, 0.0, 0.0));
        let presentation = present(&measure_distance(&a, &b), &MeasureConfig::default());
        assert!(presentation.report.starts_with("Distance = "));
        assert!(presentation.report.contains("ΔY : 0 mm"));

        let draw = presentation.draw.unwrap();
        assert_eq!(draw.items[0].name, names::DIST_POINTS);
        assert!(matches!(draw.items[0].geometry, DrawGeometry::Line { .. }));
        assert_eq!(annotation_lines(&draw), vec!["D = 1.000 mm"]);
    }

    #[test]
    fn test_distance_to_circle_label() {
        let center = Primitive::Vertex(Point3::origin());
        let circle = Primitive::Arc(ArcEdge::circle(Point3::origin(), 2.0, Vector3::z()));
        let result = measure_distance(&center, &circle);
        let MeasurementResult::Distance { distance, .. } = &result else {
            panic!("expected distance");
        };
        assert!((distance - 2.0).abs() < 1e-12);

        let draw = present(&result, &MeasureConfig::default()).draw.unwrap();
        assert_eq!(annotation_lines(&draw), vec!["D = 2.000 mm"]);
    }

    #[test]
    fn test_coordinates_label() {
        let vertex = Primitive::Vertex(Point3::new(1.0, -2.5, 3.0));
        let presentation = present(&measure_single(&vertex), &MeasureConfig::default());
        assert_eq!(presentation.report, "Coordinates :\nX : 1 mm\nY : -2.5 mm\nZ : 3 mm");

        let draw = presentation.draw.unwrap();
        assert_eq!(draw.items.len(), 1);
        assert_eq!(draw.items[0].name, names::MEASURE_LABEL);
        assert_eq!(
            annotation_lines(&draw),
            vec!["Coordinates :", "X : 1.000 mm", "Y : -2.500 mm", "Z : 3.000 mm"]
        );
    }

    #[test]
    fn test_area_reports() {
        let face = Primitive::rectangle(Point3::origin(), 2.0, 3.0);
        let flat = present(&measure_single(&face), &MeasureConfig::default());
        assert_eq!(flat.report, "Flat face\nArea : 6 mm²");
        assert!(flat.draw.is_none());

        let curved = MeasurementResult::Area {
            area: 12.5,
            flat: false,
        };
        let presentation = present(&curved, &MeasureConfig::default());
        assert_eq!(presentation.report, "Area : 12.5 mm²");
        assert!(presentation.draw.is_none());
    }

    #[test]
    fn test_touching_shapes_draw_nothing() {
        let a = Primitive::segment(Point3::new(-1.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0));
        let b = Primitive::segment(Point3::new(0.0, -1.0, 0.0), Point3::new(0.0, 1.0, 0.0));
        let presentation = present(&measure_distance(&a, &b), &MeasureConfig::default());
        assert!(presentation.report.starts_with("Minimum Distance : 0 mm"));
        assert!(presentation.draw.is_none());
    }

    #[test]
    fn test_angle_presentation() {
        let faces = Primitive::cuboid_faces(Point3::origin(), Point3::new(1.0, 1.0, 2.0));
        let result = measure_angle(&faces[4], &faces[5]);
        let config = MeasureConfig {
            show_components: true,
            ..MeasureConfig::default()
        };
        let presentation = present(&result, &config);
        assert!(presentation.report.starts_with("Angle : "));
        assert!(presentation.report.ends_with("\nDistance // 2 mm"));
        let draw = presentation.draw.unwrap();
        assert_eq!(
            annotation_lines(&draw),
            vec!["Angle: 0.000°", "Distance // 2.000 mm"]
        );

        let plain = present(&result, &MeasureConfig::default()).draw.unwrap();
        assert_eq!(annotation_lines(&plain), vec!["0.000°"]);
    }

    #[test]
    fn test_hidden_labels() {
        let config = MeasureConfig {
            show_label: false,
            ..MeasureConfig::default()
        };
        let vertex = Primitive::Vertex(Point3::new(1.0, 2.0, 3.0));
        let presentation = present(&measure_single(&vertex), &config);
        assert_eq!(presentation.report, "Coordinates :\nX : 1 mm\nY : 2 mm\nZ : 3 mm");
        assert!(presentation.draw.is_none());
    }

    #[test]
    fn test_invalid_has_no_draw() {
        let presentation = present(
            &MeasurementResult::Invalid(MeasureError::UndefinedDirection),
            &MeasureConfig::default(),
        );
        assert_eq!(presentation.report, "Invalid directions");
        assert!(presentation.draw.is_none());
        assert!(presentation.marker.is_none());
    }

    #[test]
    fn test_coincident_line_becomes_point() {
        let item = DrawItem::line_or_point(names::LENGTH, Point3::origin(), Point3::origin());
        assert_eq!(item.name, names::POINT);
        assert_eq!(item.geometry, DrawGeometry::Point(Point3::origin()));
    }
}
