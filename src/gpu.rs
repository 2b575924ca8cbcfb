use std::sync::Arc;

use anyhow::Context;
use log::{info, warn};
use winit::window::Window;

pub struct GpuContext<'a> {
    pub surface: wgpu::Surface<'a>,
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
}

impl GpuContext<'static> {
    pub async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let window_size = window.inner_size();

        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(window)
            .context("Failed to create a surface for the window")?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: Some(&surface),
                ..Default::default()
            })
            .await
            .context("Failed to find an appropriate adapter")?;
        info!("Using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                        .using_resolution(adapter.limits()),
                },
                None,
            )
            .await
            .context("Failed to create Device")?;

        let config = surface
            .get_default_config(
                &adapter,
                window_size.width.max(1),
                window_size.height.max(1),
            )
            .context("Surface is not supported by the adapter")?;
        surface.configure(&device, &config);

        Ok(Self {
            surface,
            adapter,
            device,
            queue,
            config,
        })
    }
}

impl<'a> GpuContext<'a> {
    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Reconfigures the surface; zero sizes are ignored since wgpu rejects them.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Next frame to draw into, `None` when the surface can't provide one
    /// right now.
    pub fn acquire(&mut self) -> Option<wgpu::SurfaceTexture> {
        match self.surface.get_current_texture() {
            Ok(frame) => Some(frame),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("Surface lost, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                None
            }
            Err(e) => {
                warn!("Failed to acquire frame: {e}");
                None
            }
        }
    }
}
