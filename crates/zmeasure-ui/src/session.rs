//! 测量会话 - 选择状态机
//!
//! 参考 Action 状态机设计：会话持有两个选择槽、临时捕捉标记和已提交的图形，
//! 每次拾取都同步处理完（分类 → 解析 → 测量 → 呈现 → 绘制）再返回。
//!
//! 状态转换：
//! - `Idle` 下拾取：单实体模式立即测量并保持 `Idle`；其余模式填入槽 1，
//!   进入 `AwaitingSecond`
//! - `AwaitingSecond` 下拾取：填入槽 2，执行距离/角度测量后回到 `Idle`；
//!   捕捉失败时保持等待
//! - 修改测量类型或拾取方式、清除第一个选择、重置：回到 `Idle`

use crate::selection::{Pick, SelectionSource};
use crate::sink::{DrawHandle, DrawSink};
use crate::state::{MeasureMode, SelectionMethod, SelectionSlot, SelectionState, SlotStatus};
use tracing::{debug, info, warn};
use zmeasure_core::config::MeasureConfig;
use zmeasure_core::error::MeasureError;
use zmeasure_core::math::Point3;
use zmeasure_core::measure::{
    measure_angle, measure_coordinates, measure_distance, measure_points, measure_single,
    MeasurementResult, ResultKind,
};
use zmeasure_core::present::{present, DrawItem, MEASURES_GROUP};
use zmeasure_core::shape::{Shape, ShapeKind};
use zmeasure_core::snap::snap_point;

/// 一次拾取的处理结果
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionOutcome {
    /// 会话未启动或已结束
    Inactive,
    /// 不是可测量的子形状，状态不变
    Ignored(MeasureError),
    /// 槽 1 已填，等待第二次拾取
    FirstSelected,
    /// 完成一次测量
    Measured(ResultKind),
    /// 解析失败（如找不到捕捉点），状态不变，需要重新拾取
    Failed(MeasureError),
}

/// 测量会话
pub struct MeasurementSession<Src: SelectionSource, K: DrawSink> {
    selection: Src,
    sink: K,
    config: MeasureConfig,
    mode: MeasureMode,
    method: SelectionMethod,
    state: SelectionState,
    active: bool,
    slots: [SelectionSlot<Src::Shape>; 2],
    labels: [String; 2],
    statuses: [SlotStatus; 2],
    /// 临时捕捉标记
    marker: Option<DrawHandle>,
    /// 本会话提交到 `Measures` 分组的图形
    drawings: Vec<DrawHandle>,
    group_created: bool,
    report: String,
    last_result: Option<MeasurementResult>,
}

impl<Src: SelectionSource, K: DrawSink> MeasurementSession<Src, K> {
    pub fn new(selection: Src, sink: K, config: MeasureConfig) -> Self {
        Self {
            selection,
            sink,
            config,
            mode: MeasureMode::default(),
            method: SelectionMethod::default(),
            state: SelectionState::Idle,
            active: false,
            slots: [SelectionSlot::Empty, SelectionSlot::Empty],
            labels: [String::new(), String::new()],
            statuses: [SlotStatus::None, SlotStatus::None],
            marker: None,
            drawings: Vec::new(),
            group_created: false,
            report: String::new(),
            last_result: None,
        }
    }

    // ========== 生命周期 ==========

    pub fn start(&mut self) {
        self.active = true;
        self.selection.clear_selection();
        self.reset_selection();
        info!(
            "Measurement session started: {} / {}",
            self.mode.name(),
            self.method.name()
        );
    }

    /// 清除所有选择和本会话创建的图形，可重复调用
    pub fn reset(&mut self) {
        self.reset_selection();
        self.remove_drawings();
        self.report.clear();
        self.last_result = None;
        self.labels = [String::new(), String::new()];
        debug!("Measurement session reset");
    }

    /// 取消：拆除本会话的所有图形后结束
    pub fn end(&mut self) {
        if !self.active {
            return;
        }
        self.reset();
        self.active = false;
        info!("Measurement session ended");
    }

    /// 确认：保留已提交的图形后结束
    pub fn accept(&mut self) {
        if !self.active {
            return;
        }
        self.reset_selection();
        self.active = false;
        info!(
            "Measurement session accepted with {} drawings",
            self.drawings.len()
        );
        self.drawings.clear();
        self.group_created = false;
    }

    // ========== 配置 ==========

    /// 修改测量类型并清除选择；角度测量不支持捕捉，自动切换为形状拾取
    pub fn set_mode(&mut self, mode: MeasureMode) {
        if mode == MeasureMode::Angle && self.method == SelectionMethod::Snap {
            self.method = SelectionMethod::Shape;
        }
        self.mode = mode;
        self.reset_selection();
        debug!("Measure mode: {} / {}", self.mode.name(), self.method.name());
    }

    /// 修改拾取方式并清除选择；角度测量下选捕捉会切回距离测量
    pub fn set_selection_method(&mut self, method: SelectionMethod) {
        if method == SelectionMethod::Snap && self.mode == MeasureMode::Angle {
            self.mode = MeasureMode::Distance;
        }
        self.method = method;
        self.reset_selection();
        debug!("Selection method: {} / {}", self.mode.name(), self.method.name());
    }

    pub fn set_show_label(&mut self, show: bool) {
        self.config.show_label = show;
    }

    pub fn set_show_components(&mut self, show: bool) {
        self.config.show_components = show;
    }

    /// 取消第一个选择（只在等待第二次拾取时有效）
    pub fn clear_first_selection(&mut self) {
        if self.state == SelectionState::AwaitingSecond {
            self.reset_selection();
            debug!("First selection cleared");
        }
    }

    // ========== 查询 ==========

    pub fn report_text(&self) -> &str {
        &self.report
    }

    pub fn last_result(&self) -> Option<&MeasurementResult> {
        self.last_result.as_ref()
    }

    pub fn mode(&self) -> MeasureMode {
        self.mode
    }

    pub fn selection_method(&self) -> SelectionMethod {
        self.method
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn config(&self) -> &MeasureConfig {
        &self.config
    }

    /// 选择槽（0 或 1）
    pub fn slot(&self, index: usize) -> &SelectionSlot<Src::Shape> {
        &self.slots[index.min(1)]
    }

    pub fn slot_label(&self, index: usize) -> &str {
        &self.labels[index.min(1)]
    }

    pub fn slot_status(&self, index: usize) -> SlotStatus {
        self.statuses[index.min(1)]
    }

    pub fn has_marker(&self) -> bool {
        self.marker.is_some()
    }

    pub fn selection(&self) -> &Src {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut Src {
        &mut self.selection
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    // ========== 拾取 ==========

    /// 处理一次拾取
    pub fn on_selection_event(&mut self, pick: &Pick) -> SelectionOutcome {
        if !self.active {
            return SelectionOutcome::Inactive;
        }

        let shape = match self.qualify(pick) {
            Ok(shape) => shape,
            Err(err) => {
                debug!("Ignored pick {}: {}", pick, err);
                self.selection.remove_selection(pick);
                self.report = err.to_string();
                return SelectionOutcome::Ignored(err);
            }
        };

        let first = self.state == SelectionState::Idle;
        let operand = match self.resolve_operand(shape.clone(), first) {
            Ok(operand) => operand,
            Err(err) => {
                warn!("Pick {} not usable: {}", pick, err);
                self.report = err.to_string();
                return SelectionOutcome::Failed(err);
            }
        };
        self.remove_marker();

        let slot = if first { 0 } else { 1 };
        self.labels[slot] = shape.kind().name().to_string();
        self.statuses[slot] = SlotStatus::Valid;

        if let SelectionSlot::Point(point) = &operand {
            if first {
                self.place_marker(*point);
            }
        }

        if !first {
            self.slots[1] = operand;
            return self.complete_pair();
        }

        if self.mode == MeasureMode::SingleEntity {
            let result = match &operand {
                SelectionSlot::Point(point) => measure_coordinates(*point),
                SelectionSlot::Shape(shape) => measure_single(shape),
                SelectionSlot::Empty => MeasureError::InvalidSelection(pick.to_string()).into(),
            };
            match result.kind() {
                ResultKind::Radius => self.labels[0] = "Circle".to_string(),
                ResultKind::Length => self.labels[0] = "Segment".to_string(),
                _ => {}
            }
            let kind = result.kind();
            self.publish(result);
            self.selection.clear_selection();
            return SelectionOutcome::Measured(kind);
        }

        self.slots[0] = operand;
        self.statuses[1] = SlotStatus::Select;
        self.state = SelectionState::AwaitingSecond;
        self.report = format!("Selection 1 : {}", self.labels[0]);
        debug!("First selection stored: {}", self.slots[0].description());
        SelectionOutcome::FirstSelected
    }

    /// 只接受有效的顶点、边、面
    fn qualify(&self, pick: &Pick) -> Result<Src::Shape, MeasureError> {
        let shape = self
            .selection
            .resolve(pick)
            .ok_or_else(|| MeasureError::InvalidSelection(pick.to_string()))?;
        if !shape.is_valid() || !shape.kind().is_selectable() {
            return Err(MeasureError::InvalidSelection(shape.description()));
        }
        Ok(shape)
    }

    /// 按拾取方式把子形状转成槽内容
    ///
    /// 形状拾取下，第一次拾取到的顶点按点保存。
    fn resolve_operand(
        &self,
        shape: Src::Shape,
        first: bool,
    ) -> Result<SelectionSlot<Src::Shape>, MeasureError> {
        match self.method {
            SelectionMethod::Snap => snap_point(&shape).map(|snap| SelectionSlot::Point(snap.point)),
            SelectionMethod::Shape => {
                if first && shape.kind() == ShapeKind::Vertex {
                    if let Some(point) = shape.vertexes().first() {
                        return Ok(SelectionSlot::Point(*point));
                    }
                }
                Ok(SelectionSlot::Shape(shape))
            }
        }
    }

    /// 两个槽都已填，执行双实体测量
    fn complete_pair(&mut self) -> SelectionOutcome {
        let [first, second] = std::mem::take(&mut self.slots);
        let result = match self.mode {
            MeasureMode::Distance => match (&first, &second) {
                (SelectionSlot::Point(a), SelectionSlot::Point(b)) => measure_points(*a, *b),
                _ => match (first.to_shape(), second.to_shape()) {
                    (Some(a), Some(b)) => measure_distance(&a, &b),
                    _ => MeasureError::ambiguous(first.description(), second.description()).into(),
                },
            },
            MeasureMode::Angle => match (&first, &second) {
                (SelectionSlot::Shape(a), SelectionSlot::Shape(b)) => measure_angle(a, b),
                _ => MeasureError::ambiguous(first.description(), second.description()).into(),
            },
            MeasureMode::SingleEntity => {
                MeasureError::ambiguous(first.description(), second.description()).into()
            }
        };

        let kind = result.kind();
        self.publish(result);
        self.state = SelectionState::Idle;
        self.statuses = [SlotStatus::Select, SlotStatus::None];
        self.selection.clear_selection();
        SelectionOutcome::Measured(kind)
    }

    // ========== 绘制 ==========

    /// 生成报告并提交绘制请求
    fn publish(&mut self, result: MeasurementResult) {
        let presentation = present(&result, &self.config);
        match &result {
            MeasurementResult::Invalid(err) => warn!("Measurement failed: {}", err),
            _ => info!("Measured {:?}", result.kind()),
        }

        if let Some(draw) = &presentation.draw {
            for item in &draw.items {
                match self.sink.create(Some(MEASURES_GROUP), item) {
                    Ok(handle) => {
                        self.drawings.push(handle);
                        self.group_created = true;
                    }
                    Err(err) => warn!("Failed to draw {}: {}", item.name, err),
                }
            }
        }
        if let Some(point) = presentation.marker {
            self.place_marker(point);
        }

        self.report = presentation.report;
        self.last_result = Some(result);
    }

    fn place_marker(&mut self, point: Point3) {
        self.remove_marker();
        match self.sink.create(None, &DrawItem::snap_marker(point)) {
            Ok(handle) => self.marker = Some(handle),
            Err(err) => warn!("Failed to place snap marker: {}", err),
        }
    }

    fn remove_marker(&mut self) {
        if let Some(handle) = self.marker.take() {
            if let Err(err) = self.sink.remove(handle) {
                warn!("Failed to remove snap marker: {}", err);
            }
        }
    }

    fn remove_drawings(&mut self) {
        for handle in std::mem::take(&mut self.drawings) {
            if let Err(err) = self.sink.remove(handle) {
                warn!("Failed to remove drawing: {}", err);
            }
        }
        if std::mem::take(&mut self.group_created) {
            if let Err(err) = self.sink.remove_group(MEASURES_GROUP) {
                warn!("Failed to remove group {}: {}", MEASURES_GROUP, err);
            }
        }
    }

    /// 回到 `Idle`：清空两个槽，移除临时标记
    fn reset_selection(&mut self) {
        self.slots = [SelectionSlot::Empty, SelectionSlot::Empty];
        self.state = SelectionState::Idle;
        self.statuses = [SlotStatus::Select, SlotStatus::None];
        self.remove_marker();
        self.selection.clear_selection();
    }
}
