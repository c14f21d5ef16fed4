use super::Timer;

const FREQUENCY: u64 = 1_000_000;

/// Deterministic [`Timer`] for tests: time only moves when told to.
///
/// Sleeping advances the clock by the requested time plus an optional
/// overshoot. Reading the counter advances it by `tick_on_read`, which lets a
/// spinning pacer make progress.
#[derive(Debug, Clone)]
pub(crate) struct FakeTimer {
    now: std::cell::Cell<u64>,
    granular: bool,
    tick_on_read: u64,
    sleep_overshoot: u64,
    sleeps: u32,
}

impl FakeTimer {
    pub(crate) fn granular() -> Self {
        Self {
            now: std::cell::Cell::new(0),
            granular: true,
            tick_on_read: 1,
            sleep_overshoot: 0,
            sleeps: 0,
        }
    }

    /// No granular sleep; each counter read advances the clock by `step` seconds.
    pub(crate) fn coarse(step: f64) -> Self {
        Self {
            granular: false,
            tick_on_read: to_ticks(step).max(1),
            ..Self::granular()
        }
    }

    pub(crate) fn advance(&mut self, seconds: f64) {
        self.now.set(self.now.get() + to_ticks(seconds));
    }

    pub(crate) fn set_sleep_overshoot(&mut self, seconds: f64) {
        self.sleep_overshoot = to_ticks(seconds);
    }

    pub(crate) fn sleeps(&self) -> u32 {
        self.sleeps
    }
}

impl Timer for FakeTimer {
    fn counter(&self) -> u64 {
        let now = self.now.get();
        self.now.set(now + self.tick_on_read);
        now
    }

    fn frequency(&self) -> u64 {
        FREQUENCY
    }

    fn sleep_ms(&mut self, ms: u32) {
        self.sleeps += 1;
        let ticks = ms as u64 * FREQUENCY / 1000 + self.sleep_overshoot;
        self.now.set(self.now.get() + ticks);
    }

    fn granular_sleep(&self) -> bool {
        self.granular
    }
}

fn to_ticks(seconds: f64) -> u64 {
    (seconds * FREQUENCY as f64).round() as u64
}
