//! Startup failures.
//!
//! Everything that can go wrong before the first frame is collected here.
//! None of these are retried: the binary logs the chain and exits non-zero.

/// Unrecoverable failure during loop initialization.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to create the platform event loop")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create the main window")]
    WindowCreation(#[from] winit::error::OsError),

    #[error("window closed before initialization finished")]
    WindowUnavailable,

    #[error("failed to reserve {bytes} bytes of platform memory")]
    MemoryReservation { bytes: usize },

    #[error("failed to create the rendering surface")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible graphics adapter")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to acquire a graphics device")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface offers no 8-bit RGBA/BGRA format (found {found:?})")]
    NoPixelFormat { found: Vec<wgpu::TextureFormat> },

    #[error("adapter has no 24-bit depth format usable as a render attachment")]
    NoDepthFormat,
}
