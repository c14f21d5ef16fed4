//! Startup configuration.
//!
//! Every size the loop depends on is fixed before the first frame. The
//! constants below are the defaults; binaries adjust the structs in code
//! before handing them to [`crate::runtime::Runtime::run`].

use crate::device::GraphicsConfig;

/// Maximum number of render commands queued per frame.
pub const RENDER_MAX_COMMAND_COUNT: usize = 4096;

/// Size of the persistent application region.
pub const PERSISTENT_STORAGE_SIZE: usize = megabytes(500);

/// Size of the transient (per-frame scratch) application region.
pub const TRANSIENT_STORAGE_SIZE: usize = megabytes(32);

pub const DEFAULT_SCREEN_WIDTH: u32 = 1280;
pub const DEFAULT_SCREEN_HEIGHT: u32 = 720;

/// Refresh rate assumed when the monitor query is missing or implausible.
pub const DEFAULT_REFRESH_HZ: u32 = 60;

pub const APP_NAME: &str = "SparseEditor";

pub const fn kilobytes(n: usize) -> usize {
    n * 1024
}

pub const fn megabytes(n: usize) -> usize {
    kilobytes(n) * 1024
}

/// Byte sizes of the three sub-regions carved out of the reserved block.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct MemoryLayout {
    pub render: usize,
    pub persistent: usize,
    pub transient: usize,
}

impl MemoryLayout {
    /// Layout whose render region holds exactly `command_capacity` commands.
    pub fn for_commands(command_capacity: usize, persistent: usize, transient: usize) -> Self {
        Self {
            render: crate::render::RenderState::storage_size(command_capacity),
            persistent,
            transient,
        }
    }

    pub fn total(&self) -> usize {
        self.render + self.persistent + self.transient
    }
}

impl Default for MemoryLayout {
    fn default() -> Self {
        Self::for_commands(
            RENDER_MAX_COMMAND_COUNT,
            PERSISTENT_STORAGE_SIZE,
            TRANSIENT_STORAGE_SIZE,
        )
    }
}

/// Top-level runtime configuration.
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub command_capacity: usize,
    pub memory: MemoryLayout,
    pub graphics: GraphicsConfig,
    pub default_refresh_hz: u32,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            title: APP_NAME.to_string(),
            width: DEFAULT_SCREEN_WIDTH,
            height: DEFAULT_SCREEN_HEIGHT,
            command_capacity: RENDER_MAX_COMMAND_COUNT,
            memory: MemoryLayout::default(),
            graphics: GraphicsConfig::default(),
            default_refresh_hz: DEFAULT_REFRESH_HZ,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_fits_command_capacity() {
        let layout = MemoryLayout::default();
        assert_eq!(
            layout.render,
            RENDER_MAX_COMMAND_COUNT * std::mem::size_of::<crate::render::RenderCommand>()
        );
        assert_eq!(
            layout.total(),
            layout.render + PERSISTENT_STORAGE_SIZE + TRANSIENT_STORAGE_SIZE
        );
    }

    #[test]
    fn size_helpers() {
        assert_eq!(kilobytes(2), 2048);
        assert_eq!(megabytes(1), 1 << 20);
    }
}
