//! 宿主选择接口

use serde::{Deserialize, Serialize};
use std::fmt;
use zmeasure_core::shape::Shape;

/// 一次拾取：文档、对象、子元素路径（如 `Face1`、`Edge3`）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pick {
    pub document: String,
    pub object: String,
    pub sub_element: String,
}

impl Pick {
    pub fn new(
        document: impl Into<String>,
        object: impl Into<String>,
        sub_element: impl Into<String>,
    ) -> Self {
        Self {
            document: document.into(),
            object: object.into(),
            sub_element: sub_element.into(),
        }
    }

    /// 解析 `Object.SubElement` 形式的拾取
    pub fn parse(document: &str, text: &str) -> Option<Self> {
        let (object, sub_element) = text.trim().rsplit_once('.')?;
        if object.is_empty() || sub_element.is_empty() {
            return None;
        }
        Some(Self::new(document, object, sub_element))
    }
}

impl fmt::Display for Pick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.object, self.sub_element)
    }
}

/// 宿主选择源
///
/// 负责把拾取解析成子形状，并维护宿主的选择高亮。
pub trait SelectionSource {
    type Shape: Shape;

    /// 解析拾取对应的子形状，找不到时返回 `None`
    fn resolve(&self, pick: &Pick) -> Option<Self::Shape>;

    fn clear_selection(&mut self);

    fn add_selection(&mut self, pick: &Pick);

    fn remove_selection(&mut self, pick: &Pick);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pick() {
        let pick = Pick::parse("Doc", "Box.Face1").unwrap();
        assert_eq!(pick, Pick::new("Doc", "Box", "Face1"));
        assert_eq!(pick.to_string(), "Box.Face1");

        let nested = Pick::parse("Doc", "Part.Body.Edge2").unwrap();
        assert_eq!(nested.object, "Part.Body");
        assert_eq!(nested.sub_element, "Edge2");

        assert!(Pick::parse("Doc", "Box").is_none());
        assert!(Pick::parse("Doc", ".Face1").is_none());
    }
}
