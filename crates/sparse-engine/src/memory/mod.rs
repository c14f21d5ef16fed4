//! Memory arenas.
//!
//! One region is reserved at startup and split into fixed sub-regions:
//! - render: backing storage for the render command buffer
//! - persistent: application state that lives for the whole session
//! - transient: scratch space the application may reset each frame
//!
//! Allocation is a bump of the arena offset. Nothing is freed individually;
//! the whole region goes away when [`PlatformMemory`] is dropped.

mod arena;
mod region;

pub use arena::{Arena, ArenaError, ArenaMark, Block};
pub use region::{AppMemory, Partitions, PlatformMemory};
