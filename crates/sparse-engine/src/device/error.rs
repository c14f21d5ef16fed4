/// What the frame does after a surface acquisition error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; this frame is skipped, rendering resumes next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Fatal error (commonly OOM); the loop should shut down.
    Fatal,
}

impl SurfaceErrorAction {
    pub fn from_error(err: &wgpu::SurfaceError) -> Self {
        match err {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => Self::Reconfigured,
            wgpu::SurfaceError::OutOfMemory => Self::Fatal,
            wgpu::SurfaceError::Timeout => Self::SkipFrame,
            wgpu::SurfaceError::Other => Self::SkipFrame,
        }
    }
}
