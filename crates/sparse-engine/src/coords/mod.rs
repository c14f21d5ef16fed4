//! Geometry shared by input and rendering.
//!
//! Render space:
//! - pixels of the window client area
//! - origin bottom-left
//! - +X right, +Y up
//!
//! Window-space positions (top-left origin, +Y down) are converted with
//! `RenderState::unproject` before they reach the application.

mod color;
mod rect;
mod vec2;

pub use color::ColorRgba;
pub use rect::Rect;
pub use vec2::Vec2;
