//! Event pump.
//!
//! The platform layer drains its queue into [`RawEvent`]s through an
//! [`EventSource`]; [`EventPump`] turns them into input edges, loop signals
//! and a pending resize.

mod keymap;
mod pump;
mod raw;

pub use keymap::translate_key;
pub use pump::{EventPump, EventSource, WHEEL_NOTCH_PIXELS};
pub use raw::{RawEvent, RawKey, WheelDelta};
