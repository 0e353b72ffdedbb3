//! ZMEASURE 测量会话
//!
//! 选择状态机以及与宿主协作的接口：选择源 [`SelectionSource`]
//! 与场景绘制接收方 [`DrawSink`]。

pub mod scene;
pub mod selection;
pub mod session;
pub mod sink;
pub mod state;

pub use scene::{RecordingSink, SceneObject, SceneSelection};
pub use selection::{Pick, SelectionSource};
pub use session::{MeasurementSession, SelectionOutcome};
pub use sink::{DrawError, DrawHandle, DrawSink};
pub use state::{MeasureMode, SelectionMethod, SelectionSlot, SelectionState, SlotStatus};
