//! Render command buffer and the rectangle renderer that executes it.
//!
//! The application fills a [`RenderState`] each frame; the graphics backend
//! submits every queued command and then presents.
//!
//! Convention:
//! - geometry is in render space (pixels, bottom-left origin, +Y up)
//! - the vertex shader converts to NDC using a viewport uniform

mod cmd;
mod rect;
mod state;

pub use cmd::{RenderCommand, RenderCommandKind};
pub use rect::RectRenderer;
pub use state::{RenderCommandOverflow, RenderState};
