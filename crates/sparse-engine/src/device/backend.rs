use crate::render::RenderState;

/// Result of handing a frame's commands to the backend.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SubmitOutcome {
    Submitted,
    /// Nothing was rendered this frame; `present` has nothing to show.
    Skipped,
    /// The backend cannot continue; the loop should shut down.
    Fatal,
}

/// Rendering backend driven once per iteration by the frame loop.
///
/// Call order per frame is `submit` then `present`. `release` is called
/// exactly once, by [`super::GraphicsContext::destroy`].
pub trait GraphicsBackend {
    fn submit(&mut self, render: &RenderState<'_>) -> SubmitOutcome;

    fn present(&mut self);

    /// Zero sizes are recorded but defer reconfiguration.
    fn resize(&mut self, width: u32, height: u32);

    fn release(&mut self);
}
