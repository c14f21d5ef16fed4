//! Graphics context lifecycle.
//!
//! This module is responsible for:
//! - probing the window surface before committing to a configuration
//! - creating the wgpu instance/adapter/device/queue, surface and depth buffer
//! - submitting and presenting each frame's render commands
//! - releasing everything exactly once through [`GraphicsContext::destroy`]

mod backend;
mod config;
mod context;
mod error;
mod surface;
mod wgpu_backend;

pub use backend::{GraphicsBackend, SubmitOutcome};
pub use config::GraphicsConfig;
pub use context::GraphicsContext;
pub use error::SurfaceErrorAction;
pub use surface::{probe, SurfaceProbe};
pub use wgpu_backend::WgpuBackend;
