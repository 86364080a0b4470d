//! Frames-per-second counter reported once per elapsed second.

use web_time::{Duration, Instant};

const REPORT_INTERVAL: Duration = Duration::from_secs(1);

pub struct FpsCounter {
    frames: u32,
    window_start: Instant,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    fn starting_at(now: Instant) -> Self {
        Self {
            frames: 0,
            window_start: now,
        }
    }

    /// Counts a frame. Returns the rate once at least a second has passed since the
    /// last report.
    pub fn tick(&mut self) -> Option<f32> {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> Option<f32> {
        self.frames += 1;
        let elapsed = now.duration_since(self.window_start);
        if elapsed < REPORT_INTERVAL {
            return None;
        }
        let fps = self.frames as f32 / elapsed.as_secs_f32();
        self.frames = 0;
        self.window_start = now;
        Some(fps)
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_once_per_second() {
        let start = Instant::now();
        let mut counter = FpsCounter::starting_at(start);
        for i in 1..60 {
            assert_eq!(counter.tick_at(start + Duration::from_millis(i * 16)), None);
        }
        let fps = counter.tick_at(start + Duration::from_secs(1));
        assert_eq!(fps, Some(60.0));

        assert_eq!(counter.tick_at(start + Duration::from_millis(1500)), None);
    }
}
