//! 数值显示格式
//!
//! 报告面板显示全精度数值，三维标注显示按精度截断后的数值。

use serde::{Deserialize, Serialize};

/// 默认标注精度
pub const DEFAULT_PRECISION: f64 = 0.001;

/// 长度单位（内部数据统一为毫米）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    #[default]
    Millimeter,
    Centimeter,
    Meter,
    Inch,
}

impl LengthUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            LengthUnit::Millimeter => "mm",
            LengthUnit::Centimeter => "cm",
            LengthUnit::Meter => "m",
            LengthUnit::Inch => "in",
        }
    }

    /// 每单位对应的毫米数
    pub fn millimeters(&self) -> f64 {
        match self {
            LengthUnit::Millimeter => 1.0,
            LengthUnit::Centimeter => 10.0,
            LengthUnit::Meter => 1000.0,
            LengthUnit::Inch => 25.4,
        }
    }

    /// 从毫米换算
    pub fn convert(&self, millimeters: f64) -> f64 {
        millimeters / self.millimeters()
    }

    /// 全精度长度文本，如 `5 mm`
    pub fn render(&self, millimeters: f64) -> String {
        format!("{} {}", self.convert(millimeters) + 0.0, self.symbol())
    }

    /// 全精度面积文本，如 `6 mm²`
    pub fn render_area(&self, square_millimeters: f64) -> String {
        let scale = self.millimeters() * self.millimeters();
        format!("{} {}²", square_millimeters / scale + 0.0, self.symbol())
    }

    /// 截断后的长度文本，如 `5.000 mm`
    pub fn render_rounded(&self, millimeters: f64, precision: f64) -> String {
        format!("{} {}", round_display(self.convert(millimeters), precision), self.symbol())
    }
}

/// 按精度截断并格式化为三位小数
///
/// 沿数值符号方向加一个很小的偏置再向零截断，避免 1.9999999 显示成 1.999。
/// 结果为零时不会出现 `-0.000`。精度不是正数时退回 [`DEFAULT_PRECISION`]。
pub fn round_display(value: f64, precision: f64) -> String {
    let precision = if precision.is_finite() && precision > 0.0 {
        precision
    } else {
        DEFAULT_PRECISION
    };
    let bias = precision * 0.1 * value.signum();
    let approx = (value / precision + bias).trunc() * precision;
    format!("{:.3}", approx + 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_display() {
        assert_eq!(round_display(5.0, DEFAULT_PRECISION), "5.000");
        assert_eq!(round_display(2.0, DEFAULT_PRECISION), "2.000");
        assert_eq!(round_display(1.23456, DEFAULT_PRECISION), "1.234");
        assert_eq!(round_display(1.9999999999, DEFAULT_PRECISION), "2.000");
        assert_eq!(round_display(-3.0, DEFAULT_PRECISION), "-3.000");
        assert_eq!(round_display(-1.9999999999, DEFAULT_PRECISION), "-2.000");
    }

    #[test]
    fn test_round_display_never_negative_zero() {
        assert_eq!(round_display(-0.0, DEFAULT_PRECISION), "0.000");
        assert_eq!(round_display(-0.0004, DEFAULT_PRECISION), "0.000");
        assert_eq!(round_display(-1e-12, DEFAULT_PRECISION), "0.000");
    }

    #[test]
    fn test_round_display_bad_precision() {
        assert_eq!(round_display(2.0, 0.0), "2.000");
        assert_eq!(round_display(1.23456, -1.0), "1.234");
        assert_eq!(round_display(1.5, f64::NAN), "1.500");
    }

    #[test]
    fn test_unit_render() {
        assert_eq!(LengthUnit::Millimeter.render(5.0), "5 mm");
        assert_eq!(LengthUnit::Centimeter.render(25.0), "2.5 cm");
        assert_eq!(LengthUnit::Millimeter.render_rounded(4.0, DEFAULT_PRECISION), "4.000 mm");
        assert_eq!(LengthUnit::Meter.render_rounded(1500.0, DEFAULT_PRECISION), "1.500 m");
        assert_eq!(LengthUnit::Centimeter.render_area(250.0), "2.5 cm²");
    }
}
