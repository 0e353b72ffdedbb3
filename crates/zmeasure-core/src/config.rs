//! 测量显示配置

use crate::format::{LengthUnit, DEFAULT_PRECISION};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// 标注默认字号
pub const DEFAULT_FONT_SIZE: f64 = 12.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("precision must be a positive number, got {0}")]
    InvalidPrecision(f64),

    #[error("font size must be a positive number, got {0}")]
    InvalidFontSize(f64),
}

fn check_precision(precision: f64) -> Result<f64, ConfigError> {
    if precision.is_finite() && precision > 0.0 {
        Ok(precision)
    } else {
        Err(ConfigError::InvalidPrecision(precision))
    }
}

fn deserialize_precision<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let precision = f64::deserialize(deserializer)?;
    check_precision(precision).map_err(serde::de::Error::custom)
}

/// 测量配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasureConfig {
    /// 三维标注的截断精度，必须为正
    #[serde(deserialize_with = "deserialize_precision")]
    pub precision: f64,
    /// 三维标注字号
    pub font_size: f64,
    /// 长度显示单位
    pub unit: LengthUnit,
    /// 是否在三维视图中显示标注
    pub show_label: bool,
    /// 标注中是否显示 ΔX/ΔY/ΔZ 分量
    pub show_components: bool,
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            font_size: DEFAULT_FONT_SIZE,
            unit: LengthUnit::Millimeter,
            show_label: true,
            show_components: false,
        }
    }
}

impl MeasureConfig {
    /// 检查字段取值，直接构造或修改配置后调用
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_precision(self.precision)?;
        if !(self.font_size.is_finite() && self.font_size > 0.0) {
            return Err(ConfigError::InvalidFontSize(self.font_size));
        }
        Ok(())
    }

    /// 截断显示
    pub fn rounded(&self, value: f64) -> String {
        crate::format::round_display(value, self.precision)
    }

    /// 全精度长度
    pub fn length(&self, millimeters: f64) -> String {
        self.unit.render(millimeters)
    }

    /// 截断后的长度
    pub fn length_rounded(&self, millimeters: f64) -> String {
        self.unit.render_rounded(millimeters, self.precision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: MeasureConfig =
            serde_json::from_str(r#"{ "show_components": true, "unit": "inch" }"#).unwrap();
        assert!(config.show_components);
        assert!(config.show_label);
        assert_eq!(config.unit, LengthUnit::Inch);
        assert_eq!(config.precision, DEFAULT_PRECISION);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_non_positive_precision_is_rejected() {
        for text in [r#"{ "precision": 0 }"#, r#"{ "precision": -0.01 }"#] {
            let err = serde_json::from_str::<MeasureConfig>(text).unwrap_err();
            assert!(err.to_string().contains("precision must be a positive number"));
        }
        let config: MeasureConfig = serde_json::from_str(r#"{ "precision": 0.01 }"#).unwrap();
        assert_eq!(config.rounded(1.2345), "1.230");

        let config = MeasureConfig {
            precision: 0.0,
            ..MeasureConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidPrecision(0.0)));
        assert_eq!(config.rounded(2.5), "2.500");

        let config = MeasureConfig {
            font_size: -1.0,
            ..MeasureConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidFontSize(-1.0)));
    }
}
