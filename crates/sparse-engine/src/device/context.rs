use crate::render::RenderState;

use super::{GraphicsBackend, SubmitOutcome};

/// Owns the active rendering backend and guarantees it is released once.
///
/// After [`GraphicsContext::destroy`] every call is a no-op.
pub struct GraphicsContext<B: GraphicsBackend> {
    backend: Option<B>,
}

impl<B: GraphicsBackend> GraphicsContext<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    pub fn is_active(&self) -> bool {
        self.backend.is_some()
    }

    pub fn backend(&self) -> Option<&B> {
        self.backend.as_ref()
    }

    pub fn submit(&mut self, render: &RenderState<'_>) -> SubmitOutcome {
        match self.backend.as_mut() {
            Some(backend) => backend.submit(render),
            None => SubmitOutcome::Skipped,
        }
    }

    pub fn present(&mut self) {
        if let Some(backend) = self.backend.as_mut() {
            backend.present();
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if let Some(backend) = self.backend.as_mut() {
            backend.resize(width, height);
        }
    }

    /// Deactivates and releases the backend. Idempotent.
    pub fn destroy(&mut self) {
        if let Some(mut backend) = self.backend.take() {
            backend.release();
            log::debug!("graphics context destroyed");
        }
    }
}

impl<B: GraphicsBackend> Drop for GraphicsContext<B> {
    fn drop(&mut self) {
        self.destroy();
    }
}
