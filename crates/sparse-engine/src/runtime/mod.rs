//! Main loop orchestration.
//!
//! [`FrameLoop`] sequences one iteration against trait objects;
//! [`Runtime`] wires it to the winit platform and the wgpu backend.

mod frame_loop;
mod run;

pub use frame_loop::{FrameHost, FrameLoop, LoopPhase, LoopReport};
pub use run::Runtime;
