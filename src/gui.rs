use glam::Vec2;

/// egui context plus the wgpu renderer that draws its output.
pub struct EguiLayer {
    pub ctx: egui::Context,
    raw_input: egui::RawInput,
    size_in_pixels: [u32; 2],
    pixels_per_point: f32,

    renderer: egui_wgpu::Renderer,
    clipped_primitives: Vec<egui::ClippedPrimitive>,
    textures_delta: egui::TexturesDelta,
}

impl EguiLayer {
    pub fn new(device: &wgpu::Device, swapchain_format: wgpu::TextureFormat) -> Self {
        let renderer = egui_wgpu::Renderer::new(device, swapchain_format, None, 1);

        Self {
            ctx: egui::Context::default(),
            raw_input: egui::RawInput::default(),
            size_in_pixels: [0, 0],
            pixels_per_point: 1.0,

            renderer,
            clipped_primitives: Vec::new(),
            textures_delta: egui::TexturesDelta::default(),
        }
    }

    /// Sets the surface size in physical pixels and the window's scale
    /// factor; egui itself works in logical points.
    pub fn resize(&mut self, width: u32, height: u32, scale_factor: f64) {
        self.size_in_pixels = [width, height];
        self.pixels_per_point = scale_factor as f32;
        self.raw_input.screen_rect = Some(egui::Rect::from_min_size(
            Default::default(),
            egui::Vec2::new(width as f32, height as f32) / self.pixels_per_point,
        ));
    }

    /// `position` is in logical points.
    pub fn pointer_moved(&mut self, position: Vec2) {
        self.raw_input
            .events
            .push(egui::Event::PointerMoved(egui::Pos2::new(
                position.x, position.y,
            )));
    }

    pub fn pointer_gone(&mut self) {
        self.raw_input.events.push(egui::Event::PointerGone);
    }

    /// Runs one egui frame and tessellates everything painted during it.
    pub fn run<R>(&mut self, delta_time: f32, run_ui: impl FnOnce(&egui::Context) -> R) -> R {
        let mut raw_input = std::mem::take(&mut self.raw_input);
        raw_input.predicted_dt = delta_time;
        raw_input
            .viewports
            .entry(raw_input.viewport_id)
            .or_default()
            .native_pixels_per_point = Some(self.pixels_per_point);
        // Keep the last known size for the next frame
        self.raw_input.screen_rect = raw_input.screen_rect;

        self.ctx.begin_frame(raw_input);
        let result = run_ui(&self.ctx);
        let output = self.ctx.end_frame();

        self.clipped_primitives = self.ctx.tessellate(output.shapes, output.pixels_per_point);
        // Frames that are never presented still owe their texture updates
        self.textures_delta.append(output.textures_delta);
        result
    }

    fn screen_descriptor(&self) -> egui_wgpu::ScreenDescriptor {
        egui_wgpu::ScreenDescriptor {
            size_in_pixels: self.size_in_pixels,
            pixels_per_point: self.ctx.pixels_per_point(),
        }
    }

    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
    ) {
        let screen_descriptor = self.screen_descriptor();

        for (id, delta) in std::mem::take(&mut self.textures_delta.set) {
            self.renderer.update_texture(device, queue, id, &delta);
        }

        self.renderer.update_buffers(
            device,
            queue,
            encoder,
            &self.clipped_primitives,
            &screen_descriptor,
        );
    }

    pub fn paint<'a>(&'a mut self, rpass: &mut wgpu::RenderPass<'a>) {
        let screen_descriptor = self.screen_descriptor();

        self.renderer
            .render(rpass, &self.clipped_primitives, &screen_descriptor);
    }

    /// Frees textures egui released this frame; call after submitting.
    pub fn finish(&mut self) {
        for id in std::mem::take(&mut self.textures_delta.free) {
            self.renderer.free_texture(&id);
        }
    }
}
