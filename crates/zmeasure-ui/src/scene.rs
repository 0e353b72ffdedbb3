//! 内存场景
//!
//! [`SceneSelection`] 与 [`RecordingSink`] 是选择源和绘制接收方的内存实现，
//! 供命令行程序和测试使用。

use crate::selection::{Pick, SelectionSource};
use crate::sink::{DrawError, DrawHandle, DrawSink};
use std::collections::{BTreeSet, HashMap, HashSet};
use zmeasure_core::present::DrawItem;
use zmeasure_core::shape::Shape;

/// 按 `(对象, 子元素)` 索引子形状的选择源
#[derive(Debug, Clone)]
pub struct SceneSelection<S> {
    document: String,
    shapes: HashMap<(String, String), S>,
    selected: Vec<Pick>,
}

impl<S: Shape> SceneSelection<S> {
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            shapes: HashMap::new(),
            selected: Vec::new(),
        }
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn insert(&mut self, object: &str, sub_element: &str, shape: S) {
        self.shapes
            .insert((object.to_string(), sub_element.to_string()), shape);
    }

    /// 本文档中的拾取
    pub fn pick(&self, object: &str, sub_element: &str) -> Pick {
        Pick::new(self.document.clone(), object, sub_element)
    }

    /// 当前高亮的拾取
    pub fn selected(&self) -> &[Pick] {
        &self.selected
    }

    /// 所有可拾取的 `Object.SubElement`，已排序
    pub fn entries(&self) -> Vec<String> {
        let mut entries: Vec<String> = self
            .shapes
            .keys()
            .map(|(object, sub)| format!("{}.{}", object, sub))
            .collect();
        entries.sort();
        entries
    }
}

impl<S: Shape> SelectionSource for SceneSelection<S> {
    type Shape = S;

    fn resolve(&self, pick: &Pick) -> Option<S> {
        if pick.document != self.document {
            return None;
        }
        self.shapes
            .get(&(pick.object.clone(), pick.sub_element.clone()))
            .cloned()
    }

    fn clear_selection(&mut self) {
        self.selected.clear();
    }

    fn add_selection(&mut self, pick: &Pick) {
        if !self.selected.contains(pick) {
            self.selected.push(pick.clone());
        }
    }

    fn remove_selection(&mut self, pick: &Pick) {
        self.selected.retain(|p| p != pick);
    }
}

/// 场景中的一个对象
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub handle: DrawHandle,
    pub group: Option<String>,
    pub item: DrawItem,
}

/// 记录所有创建/删除操作的绘制接收方
#[derive(Debug, Default)]
pub struct RecordingSink {
    next_id: u64,
    objects: Vec<SceneObject>,
    groups: BTreeSet<String>,
    rejected: HashSet<String>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// 拒绝创建指定名称的对象，用于模拟场景失败
    pub fn reject(&mut self, name: &str) {
        self.rejected.insert(name.to_string());
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn names(&self) -> Vec<&str> {
        self.objects.iter().map(|o| o.item.name.as_str()).collect()
    }

    pub fn find(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.item.name == name)
    }

    pub fn has_group(&self, group: &str) -> bool {
        self.groups.contains(group)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl DrawSink for RecordingSink {
    fn create(&mut self, group: Option<&str>, item: &DrawItem) -> Result<DrawHandle, DrawError> {
        if self.rejected.contains(&item.name) {
            return Err(DrawError::Rejected {
                name: item.name.clone(),
                reason: "rejected by scene".to_string(),
            });
        }
        if let Some(group) = group {
            self.groups.insert(group.to_string());
        }
        self.next_id += 1;
        let handle = DrawHandle(self.next_id);
        self.objects.push(SceneObject {
            handle,
            group: group.map(str::to_string),
            item: item.clone(),
        });
        Ok(handle)
    }

    fn remove(&mut self, handle: DrawHandle) -> Result<(), DrawError> {
        let index = self
            .objects
            .iter()
            .position(|o| o.handle == handle)
            .ok_or(DrawError::UnknownHandle(handle))?;
        self.objects.remove(index);
        Ok(())
    }

    fn remove_group(&mut self, group: &str) -> Result<(), DrawError> {
        if !self.groups.remove(group) {
            return Err(DrawError::UnknownGroup(group.to_string()));
        }
        self.objects.retain(|o| o.group.as_deref() != Some(group));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zmeasure_core::kernel::Primitive;
    use zmeasure_core::math::Point3;

    #[test]
    fn test_scene_selection_resolve() {
        let mut scene = SceneSelection::new("Doc");
        scene.insert("Box", "Vertex1", Primitive::Vertex(Point3::origin()));

        let pick = scene.pick("Box", "Vertex1");
        assert!(scene.resolve(&pick).is_some());
        assert!(scene.resolve(&scene.pick("Box", "Face9")).is_none());
        assert!(scene.resolve(&Pick::new("Other", "Box", "Vertex1")).is_none());

        scene.add_selection(&pick);
        scene.add_selection(&pick);
        assert_eq!(scene.selected().len(), 1);
        scene.remove_selection(&pick);
        assert!(scene.selected().is_empty());
    }

    #[test]
    fn test_recording_sink() {
        let mut sink = RecordingSink::new();
        let marker = DrawItem::snap_marker(Point3::origin());
        let a = sink.create(Some("Measures"), &marker).unwrap();
        let b = sink.create(None, &marker).unwrap();
        assert_ne!(a, b);
        assert!(sink.has_group("Measures"));

        sink.remove_group("Measures").unwrap();
        assert_eq!(sink.len(), 1);
        assert!(sink.remove_group("Measures").is_err());

        sink.remove(b).unwrap();
        assert!(sink.is_empty());
        assert_eq!(sink.remove(b), Err(DrawError::UnknownHandle(b)));

        sink.reject("PtS");
        assert!(sink.create(None, &marker).is_err());
    }
}
