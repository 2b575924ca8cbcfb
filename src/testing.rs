//! Test doubles for the host facilities the field depends on.

use std::{cell::Cell, rc::Rc};

use egui::Color32;
use glam::Vec2;

use crate::{
    clock::{Clock, FrameScheduler},
    render::Canvas,
};

/// Clock advanced by hand; clones share the same time.
#[derive(Clone)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

#[derive(Clone, Default)]
pub struct CountingScheduler {
    pub scheduled: Rc<Cell<usize>>,
    pub cancelled: Rc<Cell<bool>>,
}

impl FrameScheduler for CountingScheduler {
    fn schedule(&mut self) {
        self.scheduled.set(self.scheduled.get() + 1);
    }

    fn cancel(&mut self) {
        self.cancelled.set(true);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    Resize(u32, u32),
    Clear(f32, f32),
    Circle {
        center: Vec2,
        radius: f32,
        color: Color32,
    },
    Line {
        from: Vec2,
        to: Vec2,
        from_color: Color32,
        to_color: Color32,
        width: f32,
    },
    Glow {
        center: Vec2,
        radius: f32,
    },
}

#[derive(Default)]
pub struct RecordingCanvas {
    pub calls: Vec<DrawCall>,
}

impl RecordingCanvas {
    pub fn circles(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Circle { .. }))
            .count()
    }

    pub fn lines_to(&self, target: Vec2) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Line { to, .. } if *to == target))
            .count()
    }

    pub fn glows(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Glow { .. }))
            .count()
    }
}

impl Canvas for RecordingCanvas {
    fn resize(&mut self, width: u32, height: u32) {
        self.calls.push(DrawCall::Resize(width, height));
    }

    fn clear(&mut self, width: f32, height: f32) {
        self.calls.push(DrawCall::Clear(width, height));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color32) {
        self.calls.push(DrawCall::Circle {
            center,
            radius,
            color,
        });
    }

    fn stroke_gradient(
        &mut self,
        from: Vec2,
        to: Vec2,
        from_color: Color32,
        to_color: Color32,
        width: f32,
    ) {
        self.calls.push(DrawCall::Line {
            from,
            to,
            from_color,
            to_color,
            width,
        });
    }

    fn fill_radial_glow(&mut self, center: Vec2, radius: f32, _inner: Color32, _outer: Color32) {
        self.calls.push(DrawCall::Glow { center, radius });
    }
}
