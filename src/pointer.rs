use glam::Vec2;

use crate::config::DeviceClass;

/// Interval of the synthetic pointer's path updates
pub const SYNTHETIC_STEP_MS: f64 = 50.0;
/// Radians travelled per synthetic step
pub const SYNTHETIC_ANGLE_STEP: f32 = 0.01;
/// Path radius relative to the shorter viewport side
pub const SYNTHETIC_RADIUS_RATIO: f32 = 0.3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerMode {
    /// Follows real pointer movement inside the host bounds
    Tracked,
    /// Circles the viewport centre on its own, for touch-first devices
    Synthetic,
}

impl PointerMode {
    pub fn for_device(class: DeviceClass) -> Self {
        match class {
            DeviceClass::Desktop => PointerMode::Tracked,
            DeviceClass::Mobile => PointerMode::Synthetic,
        }
    }
}

/// Axis-aligned rectangle in window coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn from_size(size: Vec2) -> Self {
        Self {
            min: Vec2::ZERO,
            max: size,
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerState {
    pub position: Vec2,
    pub active: bool,
}

#[derive(Debug)]
pub struct PointerTracker {
    mode: PointerMode,
    state: PointerState,
    angle: f32,
    pending_ms: f64,
}

impl PointerTracker {
    pub fn new(mode: PointerMode) -> Self {
        Self {
            mode,
            state: PointerState {
                position: Vec2::ZERO,
                active: false,
            },
            angle: 0.0,
            pending_ms: 0.0,
        }
    }

    pub fn mode(&self) -> PointerMode {
        self.mode
    }

    pub fn state(&self) -> PointerState {
        self.state
    }

    /// `client` and `host` are in window coordinates, `canvas_origin` is the
    /// canvas' top-left corner in the same space.
    pub fn pointer_moved(&mut self, client: Vec2, host: Bounds, canvas_origin: Vec2) {
        if self.mode != PointerMode::Tracked {
            return;
        }

        if host.contains(client) {
            self.state = PointerState {
                position: client - canvas_origin,
                active: true,
            };
        } else {
            self.state.active = false;
        }
    }

    pub fn pointer_left(&mut self) {
        if self.mode == PointerMode::Tracked {
            self.state.active = false;
        }
    }

    /// Moves the synthetic pointer along its path; no-op when tracking.
    pub fn advance(&mut self, elapsed_ms: f64, viewport: Vec2) {
        if self.mode != PointerMode::Synthetic || elapsed_ms < 0.0 {
            return;
        }

        self.pending_ms += elapsed_ms;
        let steps = (self.pending_ms / SYNTHETIC_STEP_MS).floor();
        if steps < 1.0 {
            return;
        }
        self.pending_ms -= steps * SYNTHETIC_STEP_MS;
        self.angle = (self.angle + steps as f32 * SYNTHETIC_ANGLE_STEP) % std::f32::consts::TAU;

        let radius = viewport.min_element() * SYNTHETIC_RADIUS_RATIO;
        self.state = PointerState {
            position: viewport / 2.0 + Vec2::new(self.angle.cos(), self.angle.sin()) * radius,
            active: true,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracked_pointer_inside_and_outside() {
        let mut tracker = PointerTracker::new(PointerMode::Tracked);
        let host = Bounds {
            min: Vec2::new(0.0, 100.0),
            max: Vec2::new(800.0, 700.0),
        };
        let canvas_origin = Vec2::new(0.0, 100.0);

        tracker.pointer_moved(Vec2::new(400.0, 300.0), host, canvas_origin);
        assert_eq!(
            tracker.state(),
            PointerState {
                position: Vec2::new(400.0, 200.0),
                active: true
            }
        );

        // Edges are inside
        tracker.pointer_moved(Vec2::new(800.0, 700.0), host, canvas_origin);
        assert!(tracker.state().active);

        tracker.pointer_moved(Vec2::new(400.0, 50.0), host, canvas_origin);
        assert!(!tracker.state().active);
    }

    #[test]
    fn test_tracked_pointer_left() {
        let mut tracker = PointerTracker::new(PointerMode::Tracked);
        let host = Bounds::from_size(Vec2::new(100.0, 100.0));

        tracker.pointer_moved(Vec2::new(10.0, 10.0), host, Vec2::ZERO);
        tracker.pointer_left();
        assert!(!tracker.state().active);

        // Synthetic path is ignored while tracking
        tracker.advance(1000.0, Vec2::new(100.0, 100.0));
        assert!(!tracker.state().active);
    }

    #[test]
    fn test_synthetic_pointer_circles_centre() {
        let mut tracker = PointerTracker::new(PointerMode::Synthetic);
        let viewport = Vec2::new(400.0, 800.0);

        tracker.advance(49.0, viewport);
        assert!(!tracker.state().active);

        tracker.advance(1.0, viewport);
        let state = tracker.state();
        assert!(state.active);
        let offset = state.position - Vec2::new(200.0, 400.0);
        assert!((offset.length() - 120.0).abs() < 1e-3);
        assert!((offset.y.atan2(offset.x) - 0.01).abs() < 1e-5);

        tracker.advance(100.0, viewport);
        let offset = tracker.state().position - Vec2::new(200.0, 400.0);
        assert!((offset.y.atan2(offset.x) - 0.03).abs() < 1e-5);
    }

    #[test]
    fn test_synthetic_pointer_ignores_real_input() {
        let mut tracker = PointerTracker::new(PointerMode::Synthetic);
        let viewport = Vec2::new(300.0, 300.0);
        tracker.advance(50.0, viewport);
        let before = tracker.state();

        tracker.pointer_moved(Vec2::new(5.0, 5.0), Bounds::from_size(viewport), Vec2::ZERO);
        tracker.pointer_left();
        assert_eq!(tracker.state(), before);
    }
}
