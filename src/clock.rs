use std::time::Instant;

/// Frame time of a 60 fps display, the baseline velocities are expressed in
pub const BASELINE_FRAME_MS: f64 = 16.67;

/// Frames further apart than this are dropped instead of integrated
pub const MAX_FRAME_DELTA_MS: f64 = 100.0;

/// Monotonic millisecond timestamps
pub trait Clock {
    fn now_ms(&self) -> f64;
}

pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Host facility that invokes the next frame, e.g. a window redraw request
pub trait FrameScheduler {
    fn schedule(&mut self);
    fn cancel(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameDelta {
    Step { delta_ms: f64, time_scale: f32 },
    /// Negative or oversized delta; the frame's physics must be skipped
    Anomaly { delta_ms: f64 },
}

pub struct FrameDriver<C: Clock> {
    clock: C,
    last_frame_ms: f64,
    running: bool,
}

impl<C: Clock> FrameDriver<C> {
    pub fn new(clock: C) -> Self {
        let last_frame_ms = clock.now_ms();
        Self {
            clock,
            last_frame_ms,
            running: true,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Reads the clock and classifies the time elapsed since the previous call.
    pub fn next_frame(&mut self) -> FrameDelta {
        let now = self.clock.now_ms();
        let delta_ms = now - self.last_frame_ms;
        self.last_frame_ms = now;

        if !(0.0..=MAX_FRAME_DELTA_MS).contains(&delta_ms) {
            return FrameDelta::Anomaly { delta_ms };
        }

        FrameDelta::Step {
            delta_ms,
            time_scale: (delta_ms / BASELINE_FRAME_MS) as f32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ManualClock;

    #[test]
    fn test_time_scale_is_relative_to_60fps() {
        let clock = ManualClock::new(1000.0);
        let mut driver = FrameDriver::new(clock.clone());

        clock.advance(16.67);
        match driver.next_frame() {
            FrameDelta::Step { time_scale, .. } => assert!((time_scale - 1.0).abs() < 1e-4),
            other => panic!("unexpected {other:?}"),
        }

        clock.advance(33.34);
        match driver.next_frame() {
            FrameDelta::Step { time_scale, .. } => assert!((time_scale - 2.0).abs() < 1e-4),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_anomalies() {
        let clock = ManualClock::new(500.0);
        let mut driver = FrameDriver::new(clock.clone());

        clock.advance(150.0);
        assert_eq!(driver.next_frame(), FrameDelta::Anomaly { delta_ms: 150.0 });

        // The anomalous frame still moves the reference point
        clock.advance(10.0);
        assert!(matches!(driver.next_frame(), FrameDelta::Step { delta_ms, .. } if delta_ms == 10.0));

        clock.set(400.0);
        assert!(matches!(driver.next_frame(), FrameDelta::Anomaly { .. }));
    }

    #[test]
    fn test_boundary_delta_is_accepted() {
        let clock = ManualClock::new(0.0);
        let mut driver = FrameDriver::new(clock.clone());

        clock.advance(MAX_FRAME_DELTA_MS);
        assert!(matches!(driver.next_frame(), FrameDelta::Step { .. }));
        assert!(matches!(driver.next_frame(), FrameDelta::Step { time_scale, .. } if time_scale == 0.0));
    }

    #[test]
    fn test_stop() {
        let mut driver = FrameDriver::new(SystemClock::new());
        assert!(driver.is_running());
        driver.stop();
        assert!(!driver.is_running());
    }
}
