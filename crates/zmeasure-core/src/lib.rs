//! ZMEASURE 测量核心
//!
//! 装配工作台的三维测量引擎：对拾取的子形状分类、求参考点与方向，
//! 计算长度、距离、半径、角度、坐标和面积，并生成报告文本与绘制请求。
//!
//! # 架构设计
//!
//! - `Shape`: 宿主几何内核的只读形状接口
//! - `classify` / `resolve` / `snap`: 分类、参考点与方向、捕捉点
//! - `measure`: 测量引擎，几何退化情况转为可显示的结果
//! - `present`: 报告文本与绘制请求
//!
//! # 示例
//!
//! ```rust
//! use zmeasure_core::prelude::*;
//!
//! let segment = Primitive::segment(Point3::origin(), Point3::new(3.0, 4.0, 0.0));
//! let result = measure_single(&segment);
//! let presentation = present(&result, &MeasureConfig::default());
//! assert!(presentation.report.starts_with("Length = 5 mm"));
//! ```

pub mod classify;
pub mod config;
pub mod error;
pub mod format;
pub mod kernel;
pub mod math;
pub mod measure;
pub mod present;
pub mod resolve;
pub mod shape;
pub mod snap;

pub mod prelude {
    //! 常用类型的便捷导入
    pub use crate::classify::{classify, Classification};
    pub use crate::config::{ConfigError, MeasureConfig};
    pub use crate::error::MeasureError;
    pub use crate::format::{round_display, LengthUnit};
    pub use crate::kernel::{ArcEdge, Primitive};
    pub use crate::math::{BoundingBox3, Direction, Placement, Point3, Vector3};
    pub use crate::measure::{
        measure_angle, measure_area, measure_circle, measure_coordinates, measure_distance,
        measure_points, measure_segment, measure_single, MeasurementResult, ResultKind,
    };
    pub use crate::present::{present, DrawGeometry, DrawItem, DrawRequest, DrawStyle, Presentation};
    pub use crate::resolve::{direction, reference_point};
    pub use crate::shape::{Curve, Shape, ShapeDistance, ShapeKind};
    pub use crate::snap::{snap_point, SnapPoint, SnapType};
}
