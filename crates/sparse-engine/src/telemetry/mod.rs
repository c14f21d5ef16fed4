//! Frame telemetry hooks.
//!
//! The frame loop reports a marker per frame, begin/end pairs around each
//! stage, and missed frames. What is done with them is up to the sink.

/// Stage names bracketing each part of an iteration.
pub mod stage {
    pub const INPUT: &str = "Input processing";
    pub const UPDATE: &str = "Game Update And Render";
    pub const RENDER: &str = "Render Commands";
    pub const SLEEP: &str = "FrameSleep";
    pub const PRESENT: &str = "Present Frame";
}

/// Sink for frame telemetry. All hooks default to no-ops.
pub trait Telemetry {
    /// End of a frame that lasted `seconds`.
    fn frame_marker(&mut self, seconds: f64) {
        let _ = seconds;
    }

    fn begin_block(&mut self, name: &'static str) {
        let _ = name;
    }

    fn end_block(&mut self, name: &'static str) {
        let _ = name;
    }

    fn missed_frame(&mut self, elapsed: f64, target: f64) {
        let _ = (elapsed, target);
    }
}

/// Discards everything.
#[derive(Debug, Default, Copy, Clone)]
pub struct NullTelemetry;

impl Telemetry for NullTelemetry {}

/// Writes every hook as a `trace` line.
#[derive(Debug, Default, Copy, Clone)]
pub struct LogTelemetry;

impl Telemetry for LogTelemetry {
    fn frame_marker(&mut self, seconds: f64) {
        log::trace!("frame {:.3} ms", seconds * 1000.0);
    }

    fn begin_block(&mut self, name: &'static str) {
        log::trace!("begin {name}");
    }

    fn end_block(&mut self, name: &'static str) {
        log::trace!("end {name}");
    }

    fn missed_frame(&mut self, elapsed: f64, target: f64) {
        log::trace!("missed frame {:.3} ms > {:.3} ms", elapsed * 1000.0, target * 1000.0);
    }
}

/// Running frame counters.
#[derive(Debug, Default, Clone)]
pub struct FrameStats {
    frames: u64,
    missed_frames: u64,
    total_seconds: f64,
    last_frame_seconds: f64,
    worst_frame_seconds: f64,
    open_blocks: usize,
    unbalanced_blocks: u64,
}

impl FrameStats {
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn missed_frames(&self) -> u64 {
        self.missed_frames
    }

    pub fn last_frame_seconds(&self) -> f64 {
        self.last_frame_seconds
    }

    pub fn worst_frame_seconds(&self) -> f64 {
        self.worst_frame_seconds
    }

    pub fn average_frame_seconds(&self) -> f64 {
        if self.frames == 0 {
            0.0
        } else {
            self.total_seconds / self.frames as f64
        }
    }

    /// Blocks still open, or closed without a matching begin.
    pub fn unbalanced_blocks(&self) -> u64 {
        self.unbalanced_blocks + self.open_blocks as u64
    }
}

impl Telemetry for FrameStats {
    fn frame_marker(&mut self, seconds: f64) {
        self.frames += 1;
        self.total_seconds += seconds;
        self.last_frame_seconds = seconds;
        self.worst_frame_seconds = self.worst_frame_seconds.max(seconds);
    }

    fn begin_block(&mut self, _name: &'static str) {
        self.open_blocks += 1;
    }

    fn end_block(&mut self, _name: &'static str) {
        match self.open_blocks.checked_sub(1) {
            Some(open) => self.open_blocks = open,
            None => self.unbalanced_blocks += 1,
        }
    }

    fn missed_frame(&mut self, _elapsed: f64, _target: f64) {
        self.missed_frames += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_stats_accumulate() {
        let mut stats = FrameStats::default();
        stats.frame_marker(0.010);
        stats.frame_marker(0.030);
        stats.missed_frame(0.030, 0.016);

        assert_eq!(stats.frames(), 2);
        assert_eq!(stats.missed_frames(), 1);
        assert_eq!(stats.last_frame_seconds(), 0.030);
        assert_eq!(stats.worst_frame_seconds(), 0.030);
        assert!((stats.average_frame_seconds() - 0.020).abs() < 1e-12);
    }

    #[test]
    fn frame_stats_track_block_balance() {
        let mut stats = FrameStats::default();
        stats.begin_block(stage::INPUT);
        stats.end_block(stage::INPUT);
        assert_eq!(stats.unbalanced_blocks(), 0);

        stats.end_block(stage::SLEEP);
        stats.begin_block(stage::PRESENT);
        assert_eq!(stats.unbalanced_blocks(), 2);
    }
}
