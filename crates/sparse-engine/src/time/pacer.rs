use crate::telemetry::Telemetry;

use super::Timer;

/// Seconds per frame for a monitor refresh rate reported in millihertz.
///
/// Missing or implausible rates (1 Hz or less) fall back to `default_hz`.
pub fn target_seconds_per_frame(refresh_millihertz: Option<u32>, default_hz: u32) -> f64 {
    let hz = refresh_millihertz
        .map(|mhz| mhz as f64 / 1000.0)
        .filter(|&hz| hz > 1.0)
        .unwrap_or(default_hz.max(1) as f64);
    1.0 / hz
}

/// What [`FramePacer::pace`] did this frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PaceOutcome {
    /// Waited until the target; `elapsed` is the final measurement.
    OnTime { elapsed: f64 },
    /// The frame's work already exceeded the target.
    Missed { elapsed: f64 },
}

/// Holds each loop iteration to a fixed wall-clock duration.
///
/// The baseline is the start of the current frame. [`FramePacer::pace`] waits
/// out the remainder of the target; [`FramePacer::end_frame`] closes the frame
/// and starts the next one.
#[derive(Debug)]
pub struct FramePacer<T: Timer> {
    timer: T,
    target_seconds: f64,
    last_counter: u64,
    missed_frames: u64,
}

impl<T: Timer> FramePacer<T> {
    pub fn new(timer: T, target_seconds: f64) -> Self {
        let last_counter = timer.counter();
        Self {
            timer,
            target_seconds,
            last_counter,
            missed_frames: 0,
        }
    }

    #[inline]
    pub fn target_seconds(&self) -> f64 {
        self.target_seconds
    }

    pub fn missed_frames(&self) -> u64 {
        self.missed_frames
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    /// Seconds since the frame baseline.
    pub fn seconds_elapsed(&self) -> f64 {
        self.timer.seconds_between(self.last_counter, self.timer.counter())
    }

    /// Moves the baseline to now without closing a frame.
    pub fn reset_baseline(&mut self) {
        self.last_counter = self.timer.counter();
    }

    /// Blocks until the frame has lasted at least the target.
    ///
    /// With granular sleep the remaining whole milliseconds are slept, then
    /// the clock is read again; the final stretch spins. Never returns early.
    /// A frame already over target is recorded once as missed and returns
    /// immediately.
    pub fn pace<M: Telemetry + ?Sized>(&mut self, telemetry: &mut M) -> PaceOutcome {
        let target = self.target_seconds;
        let mut elapsed = self.seconds_elapsed();

        if elapsed >= target {
            self.missed_frames += 1;
            telemetry.missed_frame(elapsed, target);
            log::warn!(
                "missed frame: {:.2} ms of work against a {:.2} ms target",
                elapsed * 1000.0,
                target * 1000.0
            );
            return PaceOutcome::Missed { elapsed };
        }

        while elapsed < target {
            if self.timer.granular_sleep() {
                let sleep_ms = (1000.0 * (target - elapsed)) as u32;
                if sleep_ms > 0 {
                    self.timer.sleep_ms(sleep_ms);
                }
            }
            elapsed = self.seconds_elapsed();
        }

        PaceOutcome::OnTime { elapsed }
    }

    /// Closes the frame: returns its total seconds and moves the baseline.
    pub fn end_frame(&mut self) -> f64 {
        let end = self.timer.counter();
        let seconds = self.timer.seconds_between(self.last_counter, end);
        self.last_counter = end;
        seconds
    }
}
