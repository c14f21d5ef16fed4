use std::time::{Duration, Instant};

/// Slack a 1 ms sleep may overshoot by and still count as granular.
pub const GRANULAR_SLEEP_TOLERANCE: Duration = Duration::from_millis(1);

/// Number of 1 ms sleeps measured by the startup probe.
const PROBE_SAMPLES: u32 = 3;

/// Monotonic high-resolution clock plus a millisecond sleep.
pub trait Timer {
    /// Current tick count. Monotonic.
    fn counter(&self) -> u64;

    /// Ticks per second. Fixed for the life of the timer.
    fn frequency(&self) -> u64;

    fn sleep_ms(&mut self, ms: u32);

    /// Whether `sleep_ms` returns close enough to the requested time to be
    /// used for pacing. Without it the pacer spins.
    fn granular_sleep(&self) -> bool;

    fn seconds_between(&self, start: u64, end: u64) -> f64 {
        end.saturating_sub(start) as f64 / self.frequency() as f64
    }
}

/// [`Timer`] backed by `std::time::Instant`, counting nanoseconds.
#[derive(Debug, Clone)]
pub struct SystemTimer {
    origin: Instant,
    granular_sleep: bool,
}

impl SystemTimer {
    /// Captures the time origin and probes sleep granularity once.
    pub fn new() -> Self {
        let granular_sleep = probe_sleep_granularity();
        log::debug!("sleep granularity probe: granular={granular_sleep}");
        Self {
            origin: Instant::now(),
            granular_sleep,
        }
    }

    /// Timer with a caller-chosen granularity flag; no probe is run.
    pub fn with_granularity(granular_sleep: bool) -> Self {
        Self {
            origin: Instant::now(),
            granular_sleep,
        }
    }
}

impl Default for SystemTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer for SystemTimer {
    fn counter(&self) -> u64 {
        self.origin.elapsed().as_nanos() as u64
    }

    fn frequency(&self) -> u64 {
        1_000_000_000
    }

    fn sleep_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(ms as u64));
    }

    fn granular_sleep(&self) -> bool {
        self.granular_sleep
    }
}

fn probe_sleep_granularity() -> bool {
    let limit = Duration::from_millis(1) + GRANULAR_SLEEP_TOLERANCE;
    (0..PROBE_SAMPLES).all(|_| {
        let start = Instant::now();
        std::thread::sleep(Duration::from_millis(1));
        start.elapsed() <= limit
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_timer_is_monotonic() {
        let timer = SystemTimer::with_granularity(true);
        let a = timer.counter();
        let b = timer.counter();
        assert!(b >= a);
        assert_eq!(timer.frequency(), 1_000_000_000);
    }

    #[test]
    fn system_timer_sleep_is_at_least_requested() {
        let mut timer = SystemTimer::with_granularity(true);
        let start = timer.counter();
        timer.sleep_ms(2);
        assert!(timer.seconds_between(start, timer.counter()) >= 0.002);
    }

    #[test]
    fn seconds_between_never_goes_negative() {
        let timer = SystemTimer::with_granularity(false);
        assert_eq!(timer.seconds_between(10, 5), 0.0);
    }
}
