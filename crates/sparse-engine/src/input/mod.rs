//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! The event pump translates platform events into [`Key`] and
//! [`MouseButton`] edges and records them with
//! [`ButtonState::record_transition`].

mod buffers;
mod state;
mod types;

pub use buffers::InputBuffers;
pub use state::{InputState, KeyboardState, MouseState};
pub use types::{ButtonState, FUNCTION_KEY_COUNT, FunctionKey, Key, MouseButton};
