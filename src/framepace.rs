use std::time::{Duration, Instant};

/// Spin for the last stretch of a frame budget instead of sleeping
const SPIN_MARGIN: Duration = Duration::from_micros(100);

pub struct FramePacer {
    frame_start: Instant,
    budget: Option<Duration>,
}

impl FramePacer {
    pub fn new(framerate: Option<u32>) -> Self {
        Self {
            frame_start: Instant::now(),
            budget: framerate
                .filter(|&fps| fps > 0)
                .map(|fps| Duration::from_secs_f64(1.0 / fps as f64)),
        }
    }

    pub fn frametime(&self) -> Duration {
        self.frame_start.elapsed()
    }

    pub fn begin_frame(&mut self) {
        self.frame_start = Instant::now();
    }

    /// Blocks until the frame budget is used up, if there is one.
    pub fn end_frame(&self) {
        let Some(budget) = self.budget else {
            return;
        };

        if let Some(sleep_time) = budget
            .checked_sub(self.frametime())
            .and_then(|left| left.checked_sub(SPIN_MARGIN))
        {
            std::thread::sleep(sleep_time);
        }

        while self.frametime() < budget {
            std::thread::yield_now();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlimited_does_not_block() {
        let mut pacer = FramePacer::new(None);
        pacer.begin_frame();
        pacer.end_frame();
        assert!(pacer.frametime() < Duration::from_millis(50));

        let pacer = FramePacer::new(Some(0));
        assert!(pacer.budget.is_none());
    }

    #[test]
    fn test_limited_frame_uses_budget() {
        let mut pacer = FramePacer::new(Some(50));
        pacer.begin_frame();
        pacer.end_frame();
        assert!(pacer.frametime() >= Duration::from_millis(20));
    }
}
