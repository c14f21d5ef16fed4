use crate::coords::{ColorRgba, Rect, Vec2};
use crate::memory::{Arena, Block};

use super::RenderCommand;

/// Returned when a command is pushed into a full [`RenderState`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
#[error("render command buffer is full ({capacity} commands)")]
pub struct RenderCommandOverflow {
    pub capacity: usize,
}

/// Screen dimensions plus the frame's command buffer.
///
/// Command storage is carved out of the render arena once and reused every
/// frame; only the live count is reset after present.
pub struct RenderState<'m> {
    pub width: u32,
    pub height: u32,
    arena: Arena<'m>,
    commands: Block<RenderCommand>,
    count: usize,
    dropped: usize,
}

impl<'m> RenderState<'m> {
    /// Bytes of render arena needed for `capacity` commands.
    pub const fn storage_size(capacity: usize) -> usize {
        capacity * std::mem::size_of::<RenderCommand>()
    }

    /// Allocates room for `capacity` commands from `arena`.
    ///
    /// # Panics
    /// Panics if the arena cannot hold `capacity` commands.
    pub fn new(mut arena: Arena<'m>, capacity: usize) -> Self {
        let commands = arena.alloc::<RenderCommand>(capacity);
        Self {
            width: 0,
            height: 0,
            arena,
            commands,
            count: 0,
            dropped: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.commands.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Commands queued so far this frame, in submission order.
    pub fn commands(&self) -> &[RenderCommand] {
        &self.arena.get(self.commands)[..self.count]
    }

    /// Appends a command.
    ///
    /// A full buffer refuses the command instead of writing past capacity;
    /// the first refusal of a frame is logged.
    pub fn push(&mut self, command: RenderCommand) -> Result<(), RenderCommandOverflow> {
        let capacity = self.capacity();
        if self.count == capacity {
            if self.dropped == 0 {
                log::warn!("render command buffer full ({capacity}); dropping commands this frame");
            }
            self.dropped += 1;
            return Err(RenderCommandOverflow { capacity });
        }

        self.arena.get_mut(self.commands)[self.count] = command;
        self.count += 1;
        Ok(())
    }

    pub fn push_clear(&mut self, color: ColorRgba) -> Result<(), RenderCommandOverflow> {
        self.push(RenderCommand::clear(color))
    }

    pub fn push_rect(&mut self, rect: Rect, color: ColorRgba) -> Result<(), RenderCommandOverflow> {
        self.push(RenderCommand::rect(rect, color))
    }

    /// Commands refused since the last reset.
    #[inline]
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Empties the buffer after present. Storage is kept.
    pub fn reset(&mut self) {
        self.count = 0;
        self.dropped = 0;
    }

    pub fn set_screen_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Converts a window-space pixel position (top-left origin, +Y down) into
    /// render space (bottom-left origin, +Y up).
    pub fn unproject(&self, x: f64, y: f64) -> Vec2 {
        let top = self.height.saturating_sub(1) as f64;
        Vec2::new(x as f32, (top - y) as f32)
    }
}

impl std::fmt::Debug for RenderState<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderState")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("count", &self.count)
            .field("capacity", &self.capacity())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(capacity: usize) -> Vec<u32> {
        vec![0u32; RenderState::storage_size(capacity) / 4]
    }

    #[test]
    fn push_until_full_then_refuse() {
        let mut words = region(2);
        let mut render = RenderState::new(Arena::new(bytemuck::cast_slice_mut(&mut words[..])), 2);

        assert!(render.push_clear(ColorRgba::black()).is_ok());
        assert!(render.push_rect(Rect::new(0.0, 0.0, 1.0, 1.0), ColorRgba::white()).is_ok());
        assert_eq!(
            render.push_clear(ColorRgba::white()),
            Err(RenderCommandOverflow { capacity: 2 })
        );

        assert_eq!(render.len(), 2);
        assert_eq!(render.dropped(), 1);
        assert_eq!(render.commands()[0], RenderCommand::clear(ColorRgba::black()));
    }

    #[test]
    fn reset_keeps_capacity() {
        let mut words = region(4);
        let mut render = RenderState::new(Arena::new(bytemuck::cast_slice_mut(&mut words[..])), 4);
        render.push_clear(ColorRgba::black()).unwrap();
        render.reset();

        assert!(render.is_empty());
        assert!(render.commands().is_empty());
        assert_eq!(render.capacity(), 4);
        assert_eq!(render.dropped(), 0);
    }

    #[test]
    fn unproject_flips_y_around_the_last_row() {
        let mut words = region(1);
        let mut render = RenderState::new(Arena::new(bytemuck::cast_slice_mut(&mut words[..])), 1);
        render.set_screen_size(1280, 720);

        assert_eq!(render.unproject(0.0, 0.0), Vec2::new(0.0, 719.0));
        assert_eq!(render.unproject(10.0, 719.0), Vec2::new(10.0, 0.0));
    }
}
