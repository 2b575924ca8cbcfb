mod cli;
mod clock;
mod config;
mod field;
mod framepace;
mod gpu;
mod grid;
mod gui;
mod metrics;
mod particle;
mod pointer;
mod render;

#[cfg(test)]
mod testing;

use std::{cell::Cell, rc::Rc, sync::Arc};

use clap::Parser;
use clock::{Clock, FrameScheduler, SystemClock};
use config::Theme;
use field::{FrameOutcome, ParticleField};
use framepace::FramePacer;
use glam::Vec2;
use gpu::GpuContext;
use gui::EguiLayer;
use log::{debug, error, info, trace};
use metrics::FpsCounter;
use pointer::Bounds;
use rand::{rngs::StdRng, SeedableRng};
use render::PainterCanvas;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalPosition, LogicalSize, PhysicalPosition, PhysicalSize},
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    // Collect Arguments
    let args = cli::Args::parse();
    debug!("{args:?}");

    // Setup Winit, frames are requested by the particle field itself
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let clock = SystemClock::new();
    let mut app_state = AppState {
        tokio_rt: tokio::runtime::Runtime::new()?,
        gfx: None,
        pacer: FramePacer::new(args.framerate),
        fps: FpsCounter::new(clock.now_ms()),
        clock,
        particle_count: Rc::new(Cell::new(0)),

        theme: args.theme,
        show_metrics: args.show_metrics,
        occluded: false,
        args,
    };

    event_loop.run_app(&mut app_state)?;
    Ok(())
}

/// Requests redraws from the window, the host's per-frame callback.
struct WindowScheduler {
    window: Arc<Window>,
    cancelled: bool,
}

impl FrameScheduler for WindowScheduler {
    fn schedule(&mut self) {
        if !self.cancelled {
            self.window.request_redraw();
        }
    }

    fn cancel(&mut self) {
        self.cancelled = true;
    }
}

/// Window size in logical units, the space the field and egui draw in.
fn logical_size(size: PhysicalSize<u32>, scale_factor: f64) -> Vec2 {
    let size: LogicalSize<f32> = size.to_logical(scale_factor);
    Vec2::new(size.width, size.height)
}

fn logical_position(position: PhysicalPosition<f64>, scale_factor: f64) -> Vec2 {
    let position: LogicalPosition<f32> = position.to_logical(scale_factor);
    Vec2::new(position.x, position.y)
}

struct GfxState {
    window: Arc<Window>,
    gpu: GpuContext<'static>,
    egui: EguiLayer,
    canvas: PainterCanvas,
    field: ParticleField<SystemClock>,
}

impl GfxState {
    fn apply_size(
        &mut self,
        size: PhysicalSize<u32>,
        scale_factor: f64,
        device: cli::DeviceChoice,
    ) {
        self.gpu.resize(size.width, size.height);
        self.egui.resize(size.width, size.height, scale_factor);

        let viewport = logical_size(size, scale_factor);
        self.field
            .set_environment(viewport.x, viewport.y, device.resolve(viewport.x));
    }
}

struct AppState {
    tokio_rt: tokio::runtime::Runtime,
    args: cli::Args,
    gfx: Option<GfxState>,
    pacer: FramePacer,
    fps: FpsCounter,
    clock: SystemClock,
    particle_count: Rc<Cell<usize>>,

    theme: Theme,
    show_metrics: bool,
    occluded: bool,
}

impl AppState {
    fn create_gfx(&self, event_loop: &ActiveEventLoop) -> anyhow::Result<GfxState> {
        let window = Arc::new(
            event_loop.create_window(Window::default_attributes().with_title("Particle Network"))?,
        );
        let size = window.inner_size();
        let scale_factor = window.scale_factor();
        let viewport = logical_size(size, scale_factor);

        let gpu = self.tokio_rt.block_on(GpuContext::new(window.clone()))?;
        let mut egui = EguiLayer::new(&gpu.device, gpu.format());
        egui.resize(size.width, size.height, scale_factor);

        let device_class = self.args.device.resolve(viewport.x);
        let rng = match self.args.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let scheduler = WindowScheduler {
            window: window.clone(),
            cancelled: false,
        };

        let mut field = ParticleField::new(
            self.theme,
            device_class,
            self.args.overrides(),
            SystemClock::new(),
            Box::new(scheduler),
            rng,
        );
        let particle_count = self.particle_count.clone();
        field.set_count_observer(move |count| particle_count.set(count));
        field.resize(viewport.x, viewport.y);

        let canvas = PainterCanvas::new(&egui.ctx, field.config().palette.background);
        info!(
            "Started {}x{} field (scale {scale_factor}) with {:?} settings and {:?} pointer",
            viewport.x,
            viewport.y,
            device_class,
            field.pointer_mode()
        );

        Ok(GfxState {
            window,
            gpu,
            egui,
            canvas,
            field,
        })
    }

    fn redraw(&mut self) {
        let Some(gfx) = self.gfx.as_mut() else {
            return;
        };

        let delta_time = self.pacer.frametime().as_secs_f32();
        self.pacer.begin_frame();
        self.fps.frame(self.clock.now_ms());

        let Some(frame) = gfx.gpu.acquire() else {
            gfx.field.tick(None);
            return;
        };

        let GfxState {
            gpu,
            egui,
            canvas,
            field,
            ..
        } = gfx;
        let fps = self.fps.fps();
        let particle_count = self.particle_count.get();
        let show_metrics = self.show_metrics;

        let outcome = egui.run(delta_time, |ctx| {
            let outcome = field.tick(Some(canvas));
            if show_metrics {
                metrics::show_metrics_panel(ctx, fps, particle_count);
            }
            outcome
        });
        match outcome {
            FrameOutcome::Rendered(stats) => trace!(
                "Drew {} particles, {} links, {} pointer links",
                stats.particles,
                stats.links,
                stats.pointer_links
            ),
            FrameOutcome::Skipped(reason) => trace!("Frame skipped: {reason:?}"),
            FrameOutcome::Stopped => (),
        }

        // Dropping the frame unpresented leaves the last one on screen
        if !outcome.presents() {
            drop(frame);
            self.pacer.end_frame();
            return;
        }

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
        egui.prepare(&gpu.device, &gpu.queue, &mut encoder);

        // Render
        {
            let mut rpass = render::begin_clear_pass(
                &mut encoder,
                &view,
                field.config().palette.background,
            );
            egui.paint(&mut rpass);
        }

        gpu.queue.submit(Some(encoder.finish()));
        frame.present();
        egui.finish();

        self.pacer.end_frame();
    }

    fn teardown(&mut self) {
        if let Some(mut gfx) = self.gfx.take() {
            gfx.field.shutdown();
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gfx.is_some() {
            return;
        }

        match self.create_gfx(event_loop) {
            Ok(gfx) => self.gfx = Some(gfx),
            Err(e) => {
                error!("Failed to start: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(gfx) = self.gfx.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                self.teardown();
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                let scale_factor = gfx.window.scale_factor();
                gfx.apply_size(new_size, scale_factor, self.args.device);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                let size = gfx.window.inner_size();
                gfx.apply_size(size, scale_factor, self.args.device);
            }
            WindowEvent::CursorMoved { position, .. } => {
                let scale_factor = gfx.window.scale_factor();
                let position = logical_position(position, scale_factor);
                gfx.egui.pointer_moved(position);

                let host = Bounds::from_size(logical_size(gfx.window.inner_size(), scale_factor));
                gfx.field.pointer_moved(position, host, Vec2::ZERO);
            }
            WindowEvent::CursorLeft { .. } => {
                gfx.egui.pointer_gone();
                gfx.field.pointer_left();
            }
            WindowEvent::Focused(false) => {
                gfx.field.pointer_left();
            }
            WindowEvent::Occluded(occluded) => {
                self.occluded = occluded;
                if !occluded {
                    gfx.window.request_redraw();
                }
            }
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed && !event.repeat =>
            {
                match event.physical_key {
                    PhysicalKey::Code(KeyCode::KeyT) => {
                        self.theme = self.theme.toggled();
                        gfx.field.set_theme(self.theme);
                        gfx.canvas
                            .set_background(gfx.field.config().palette.background);
                    }
                    PhysicalKey::Code(KeyCode::KeyM) => {
                        self.show_metrics = !self.show_metrics;
                    }
                    PhysicalKey::Code(KeyCode::F11) => {
                        if gfx.window.fullscreen().is_none() {
                            gfx.window
                                .set_fullscreen(Some(winit::window::Fullscreen::Borderless(None)));
                        } else {
                            gfx.window.set_fullscreen(None);
                        }
                    }
                    PhysicalKey::Code(KeyCode::Escape) => {
                        self.teardown();
                        event_loop.exit();
                    }
                    _ => (),
                }
            }
            WindowEvent::RedrawRequested => {
                // Occluded windows get no frames until they are visible again
                if !self.occluded {
                    self.redraw();
                }
            }

            _ => (),
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.teardown();
    }
}
