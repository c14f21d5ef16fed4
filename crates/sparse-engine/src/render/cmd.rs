use bytemuck::{Pod, Zeroable};

use crate::coords::{ColorRgba, Rect};

/// What a [`RenderCommand`] draws.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[repr(u32)]
pub enum RenderCommandKind {
    /// Fill the whole target with `color`; `rect` is ignored.
    Clear = 1,
    /// Fill `rect` with `color`.
    Rect = 2,
}

/// One queued drawing operation.
///
/// Plain data so the command buffer can live in arena memory.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct RenderCommand {
    kind: u32,
    pub rect: Rect,
    pub color: ColorRgba,
}

impl RenderCommand {
    pub const fn clear(color: ColorRgba) -> Self {
        Self {
            kind: RenderCommandKind::Clear as u32,
            rect: Rect::new(0.0, 0.0, 0.0, 0.0),
            color,
        }
    }

    pub const fn rect(rect: Rect, color: ColorRgba) -> Self {
        Self {
            kind: RenderCommandKind::Rect as u32,
            rect,
            color,
        }
    }

    /// `None` for zeroed storage that was never written.
    pub fn kind(&self) -> Option<RenderCommandKind> {
        match self.kind {
            1 => Some(RenderCommandKind::Clear),
            2 => Some(RenderCommandKind::Rect),
            _ => None,
        }
    }
}
