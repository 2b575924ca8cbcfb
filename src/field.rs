//! The particle network: a bounded field of drifting particles linked to
//! their neighbours and to the pointer.
//!
//! [`ParticleField`] owns all animation state. The host feeds it viewport,
//! theme and pointer changes as they happen and calls [`ParticleField::tick`]
//! whenever the injected [`FrameScheduler`] fires.

use glam::Vec2;
use log::{debug, info, trace};
use rand::rngs::StdRng;

use crate::{
    clock::{Clock, FrameDelta, FrameDriver, FrameScheduler},
    config::{DeviceClass, FieldConfig, Overrides, Theme},
    grid::SpatialGrid,
    particle::{generate_particles, Particle},
    pointer::{Bounds, PointerMode, PointerTracker},
    render::{link_opacity, Canvas},
};

/// Height-only resizes smaller than this are browser-chrome noise
pub const RESIZE_HEIGHT_TOLERANCE: f32 = 20.0;

pub const PARTICLE_LINE_WIDTH: f32 = 1.0;
pub const POINTER_LINE_WIDTH: f32 = 1.2;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    NoSurface,
    ClockAnomaly,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub particles: usize,
    pub links: usize,
    pub pointer_links: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    Rendered(FrameStats),
    Skipped(SkipReason),
    /// The field was shut down; nothing was scheduled
    Stopped,
}

impl FrameOutcome {
    /// Whether the canvas holds a new frame. Anything else keeps showing
    /// the last presented one.
    pub fn presents(&self) -> bool {
        matches!(self, FrameOutcome::Rendered(_))
    }
}

pub struct ParticleField<C: Clock> {
    config: FieldConfig,
    overrides: Overrides,
    viewport: Viewport,
    particles: Vec<Particle>,
    grid: SpatialGrid,
    pointer: PointerTracker,
    driver: FrameDriver<C>,
    scheduler: Box<dyn FrameScheduler>,
    rng: StdRng,
    on_count_change: Option<Box<dyn FnMut(usize)>>,
    canvas_stale: bool,
}

impl<C: Clock> ParticleField<C> {
    pub fn new(
        theme: Theme,
        device_class: DeviceClass,
        overrides: Overrides,
        clock: C,
        mut scheduler: Box<dyn FrameScheduler>,
        rng: StdRng,
    ) -> Self {
        let config = FieldConfig::resolve(theme, device_class, &overrides);
        scheduler.schedule();

        Self {
            grid: SpatialGrid::new(config.device.cell_size),
            pointer: PointerTracker::new(PointerMode::for_device(device_class)),
            config,
            overrides,
            viewport: Viewport::default(),
            particles: Vec::new(),
            driver: FrameDriver::new(clock),
            scheduler,
            rng,
            on_count_change: None,
            canvas_stale: true,
        }
    }

    pub fn set_count_observer(&mut self, observer: impl FnMut(usize) + 'static) {
        self.on_count_change = Some(Box::new(observer));
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn pointer_mode(&self) -> PointerMode {
        self.pointer.mode()
    }

    /// Applies a new host size, returns whether the particles were rebuilt.
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        let resized = self.apply_viewport(width, height);
        if resized {
            self.reinitialize();
        }
        resized
    }

    /// Applies a host size together with the device class it implies, so a
    /// resize across the class breakpoint rebuilds the particles once.
    pub fn set_environment(
        &mut self,
        width: f32,
        height: f32,
        device_class: DeviceClass,
    ) -> bool {
        let reclassed = self.apply_device_class(device_class);
        let resized = self.apply_viewport(width, height);
        if reclassed || resized {
            self.reinitialize();
        }
        reclassed || resized
    }

    pub fn set_theme(&mut self, theme: Theme) {
        if theme == self.config.theme {
            return;
        }

        info!("Switching to {theme:?} theme");
        self.config = FieldConfig::resolve(theme, self.config.device_class, &self.overrides);
        self.reinitialize();
    }

    fn apply_viewport(&mut self, width: f32, height: f32) -> bool {
        let width = width.max(0.0);
        let height = height.max(0.0);
        if width == self.viewport.width
            && (height - self.viewport.height).abs() < RESIZE_HEIGHT_TOLERANCE
        {
            trace!("Ignoring resize to {width}x{height}");
            return false;
        }

        self.viewport = Viewport { width, height };
        self.canvas_stale = true;
        true
    }

    fn apply_device_class(&mut self, device_class: DeviceClass) -> bool {
        if device_class == self.config.device_class {
            return false;
        }

        info!("Switching to {device_class:?} device settings");
        self.config = FieldConfig::resolve(self.config.theme, device_class, &self.overrides);
        self.grid.set_cell_size(self.config.device.cell_size);
        self.pointer = PointerTracker::new(PointerMode::for_device(device_class));
        true
    }

    pub fn pointer_moved(&mut self, client: Vec2, host: Bounds, canvas_origin: Vec2) {
        self.pointer.pointer_moved(client, host, canvas_origin);
    }

    pub fn pointer_left(&mut self) {
        self.pointer.pointer_left();
    }

    /// Stops the frame loop for good.
    pub fn shutdown(&mut self) {
        if self.driver.is_running() {
            debug!("Shutting down particle field");
            self.driver.stop();
            self.scheduler.cancel();
        }
    }

    fn reinitialize(&mut self) {
        let Viewport { width, height } = self.viewport;
        self.particles = generate_particles(
            width,
            height,
            &self.config.device,
            &self.config.palette,
            &mut self.rng,
        );
        self.grid.rebuild(&mut self.particles);

        let count = self.particles.len();
        debug!("Initialized {count} particles for {width}x{height}");
        if let Some(observer) = self.on_count_change.as_mut() {
            observer(count);
        }
    }

    /// Runs one frame. `canvas` is `None` while the host has no surface.
    pub fn tick(&mut self, canvas: Option<&mut dyn Canvas>) -> FrameOutcome {
        if !self.driver.is_running() {
            return FrameOutcome::Stopped;
        }

        let outcome = self.frame(canvas);
        self.scheduler.schedule();
        outcome
    }

    fn frame(&mut self, canvas: Option<&mut dyn Canvas>) -> FrameOutcome {
        let Some(canvas) = canvas else {
            trace!("No drawing surface, skipping frame");
            return FrameOutcome::Skipped(SkipReason::NoSurface);
        };

        let time_scale = match self.driver.next_frame() {
            FrameDelta::Step {
                delta_ms,
                time_scale,
            } => {
                self.pointer.advance(delta_ms, self.viewport.size());
                time_scale
            }
            FrameDelta::Anomaly { delta_ms } => {
                trace!("Dropping frame after {delta_ms:.1}ms");
                self.pointer.advance(delta_ms, self.viewport.size());
                return FrameOutcome::Skipped(SkipReason::ClockAnomaly);
            }
        };

        self.step(time_scale);
        self.grid.rebuild(&mut self.particles);

        FrameOutcome::Rendered(self.draw(canvas))
    }

    fn step(&mut self, time_scale: f32) {
        let bounds = self.viewport.size();

        for p in &mut self.particles {
            p.position += p.velocity * time_scale;

            if p.position.x < 0.0 || p.position.x > bounds.x {
                p.velocity.x = -p.velocity.x;
            }
            if p.position.y < 0.0 || p.position.y > bounds.y {
                p.velocity.y = -p.velocity.y;
            }
            p.position = p.position.clamp(Vec2::ZERO, bounds);
        }
    }

    fn draw(&mut self, canvas: &mut dyn Canvas) -> FrameStats {
        let Viewport { width, height } = self.viewport;
        if self.canvas_stale {
            canvas.resize(width.round() as u32, height.round() as u32);
            self.canvas_stale = false;
        }
        canvas.clear(width, height);

        let device = &self.config.device;
        let palette = &self.config.palette;
        let pointer = self.pointer.state();
        let mut stats = FrameStats {
            particles: self.particles.len(),
            ..Default::default()
        };

        for (i, p) in self.particles.iter().enumerate() {
            canvas.fill_circle(p.position, p.radius, p.color);

            let Some(cell) = p.cell else {
                continue;
            };
            // Each unordered pair is measured once, from its lower index
            for j in self.grid.neighbors(cell) {
                if j <= i {
                    continue;
                }

                let other = &self.particles[j];
                let distance = p.position.distance(other.position);

                if let Some(opacity) = link_opacity(
                    distance,
                    device.connection_distance,
                    palette.line_opacity_multiplier,
                ) {
                    canvas.stroke_gradient(
                        p.position,
                        other.position,
                        p.color.gamma_multiply(opacity),
                        other.color.gamma_multiply(opacity),
                        PARTICLE_LINE_WIDTH,
                    );
                    stats.links += 1;
                }
            }

            if pointer.active {
                let distance = p.position.distance(pointer.position);
                if let Some(opacity) = link_opacity(
                    distance,
                    device.pointer_connection_distance,
                    palette.line_opacity_multiplier,
                ) {
                    canvas.stroke_gradient(
                        p.position,
                        pointer.position,
                        p.color.gamma_multiply(opacity),
                        palette.pointer_color.gamma_multiply(opacity),
                        POINTER_LINE_WIDTH,
                    );
                    stats.pointer_links += 1;
                }
            }
        }

        if pointer.active {
            canvas.fill_radial_glow(
                pointer.position,
                device.glow_radius,
                palette.glow_start,
                palette.glow_end,
            );
        }

        stats
    }
}

#[cfg(test)]
impl<C: Clock> ParticleField<C> {
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    pub fn pointer(&self) -> crate::pointer::PointerState {
        self.pointer.state()
    }
}
