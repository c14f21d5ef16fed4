use crate::input::InputState;
use crate::memory::AppMemory;
use crate::render::RenderState;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
///
/// The application owns no platform resources. Its long-lived state lives in
/// `memory.persistent`, addressed through [`crate::memory::Block`] handles it
/// keeps between calls; `memory.transient` is scratch whose reset the
/// application controls.
pub trait App {
    /// Called once, after memory is partitioned and before the first frame.
    fn init(&mut self, memory: &mut AppMemory<'_>) {
        let _ = memory;
    }

    /// Called once per iteration. `input` is this frame's snapshot and must
    /// not be retained. Commands pushed into `render` are drawn this frame.
    fn update(
        &mut self,
        memory: &mut AppMemory<'_>,
        render: &mut RenderState<'_>,
        input: &InputState,
    ) -> AppControl;
}
