use std::alloc::Layout;

use crate::config::MemoryLayout;
use crate::error::StartupError;

use super::Arena;

/// The single block reserved for the whole session.
///
/// Backed by `u128` words so the region base satisfies every alignment the
/// arenas hand out. The allocation is requested zeroed from the allocator, so
/// pages are only committed as the arenas touch them. It is never grown or
/// moved, and it is released as one unit on drop.
pub struct PlatformMemory {
    layout: MemoryLayout,
    words: Box<[u128]>,
}

/// The three sub-regions of [`PlatformMemory`], in address order.
#[derive(Debug)]
pub struct Partitions<'m> {
    pub render: Arena<'m>,
    pub persistent: Arena<'m>,
    pub transient: Arena<'m>,
}

/// Memory handed to the application: everything except the render region.
#[derive(Debug)]
pub struct AppMemory<'m> {
    pub persistent: Arena<'m>,
    pub transient: Arena<'m>,
}

impl PlatformMemory {
    /// Reserves the whole block, zeroed.
    ///
    /// Sizes no allocation can satisfy are reported as
    /// [`StartupError::MemoryReservation`]; a refusal from the allocator
    /// itself aborts the process.
    pub fn reserve(layout: MemoryLayout) -> Result<Self, StartupError> {
        let count = layout.total().div_ceil(std::mem::size_of::<u128>());
        log::debug!(
            "reserving {} bytes (render {}, persistent {}, transient {})",
            layout.total(),
            layout.render,
            layout.persistent,
            layout.transient
        );

        // A zeroed `vec!` is served by the allocator's zeroed path, which
        // leaves pages uncommitted until the arenas write them.
        Layout::array::<u128>(count).map_err(|_| StartupError::MemoryReservation {
            bytes: layout.total(),
        })?;
        let words = vec![0u128; count].into_boxed_slice();

        Ok(Self { layout, words })
    }

    pub fn layout(&self) -> MemoryLayout {
        self.layout
    }

    /// Splits the reserved block into render, persistent and transient arenas.
    pub fn partition(&mut self) -> Partitions<'_> {
        let MemoryLayout {
            render,
            persistent,
            transient,
        } = self.layout;

        let bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut self.words[..]);
        let (render_bytes, rest) = bytes.split_at_mut(render);
        let (persistent_bytes, rest) = rest.split_at_mut(persistent);
        let (transient_bytes, _slack) = rest.split_at_mut(transient);

        Partitions {
            render: Arena::new(render_bytes),
            persistent: Arena::new(persistent_bytes),
            transient: Arena::new(transient_bytes),
        }
    }
}

impl<'m> Partitions<'m> {
    /// Separates the render arena from the application's share.
    pub fn split(self) -> (Arena<'m>, AppMemory<'m>) {
        (
            self.render,
            AppMemory {
                persistent: self.persistent,
                transient: self.transient,
            },
        )
    }
}

impl Drop for PlatformMemory {
    fn drop(&mut self) {
        log::debug!("releasing {} bytes of platform memory", self.layout.total());
    }
}
