//! Frame pacing.
//!
//! A [`Timer`] supplies the clock; the [`FramePacer`] holds each loop
//! iteration to the monitor's frame time. Both are independent of the
//! platform layer so pacing can be tested with a fake clock.

mod pacer;
mod timer;

#[cfg(test)]
pub(crate) mod fake;

pub use pacer::{target_seconds_per_frame, FramePacer, PaceOutcome};
pub use timer::{SystemTimer, Timer, GRANULAR_SLEEP_TOLERANCE};
