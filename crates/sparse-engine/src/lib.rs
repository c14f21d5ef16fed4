//! Sparse engine crate.
//!
//! The platform frame loop of a real-time editor: one pre-reserved memory
//! block split into arenas, double-buffered input with edge counting, a
//! non-blocking event pump, the graphics context lifecycle and fixed-rate
//! frame pacing, sequenced by [`runtime::FrameLoop`].

pub mod config;
pub mod coords;
pub mod core;
pub mod device;
pub mod error;
pub mod events;
pub mod input;
pub mod logging;
pub mod memory;
pub mod platform;
pub mod render;
pub mod runtime;
pub mod telemetry;
pub mod time;

pub use error::StartupError;
