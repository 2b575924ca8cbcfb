use egui::{epaint::Mesh, Color32, Pos2, Rect, Shape};
use glam::Vec2;

/// Segments used to approximate the glow disc
const GLOW_SEGMENTS: u32 = 48;
/// Thinnest line the painter will emit, in points
const MIN_LINE_WIDTH: f32 = 0.5;

/// 2D drawing surface the particle field renders into.
pub trait Canvas {
    /// Synchronizes the backing surface with the host's logical size.
    fn resize(&mut self, width: u32, height: u32);
    fn clear(&mut self, width: f32, height: f32);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color32);
    /// Line whose colour blends from `from_color` to `to_color`.
    fn stroke_gradient(
        &mut self,
        from: Vec2,
        to: Vec2,
        from_color: Color32,
        to_color: Color32,
        width: f32,
    );
    /// Disc fading from `inner` at the centre to `outer` at `radius`.
    fn fill_radial_glow(&mut self, center: Vec2, radius: f32, inner: Color32, outer: Color32);
}

/// Opacity of a link between two points `distance` apart, `None` when they
/// are too far apart to be linked.
pub fn link_opacity(distance: f32, threshold: f32, multiplier: f32) -> Option<f32> {
    if threshold <= 0.0 || distance >= threshold {
        return None;
    }

    Some((1.0 - distance / threshold) * multiplier)
}

/// Canvas backed by an egui painter on the background layer.
pub struct PainterCanvas {
    painter: egui::Painter,
    background: Color32,
}

impl PainterCanvas {
    pub fn new(ctx: &egui::Context, background: Color32) -> Self {
        let painter = egui::Painter::new(
            ctx.clone(),
            egui::LayerId::background(),
            Rect::from_min_size(Pos2::ZERO, egui::Vec2::ZERO),
        );

        Self {
            painter,
            background,
        }
    }

    pub fn set_background(&mut self, background: Color32) {
        self.background = background;
    }
}

fn pos(v: Vec2) -> Pos2 {
    Pos2::new(v.x, v.y)
}

impl Canvas for PainterCanvas {
    fn resize(&mut self, width: u32, height: u32) {
        self.painter.set_clip_rect(Rect::from_min_size(
            Pos2::ZERO,
            egui::Vec2::new(width as f32, height as f32),
        ));
    }

    fn clear(&mut self, width: f32, height: f32) {
        self.painter.rect_filled(
            Rect::from_min_size(Pos2::ZERO, egui::Vec2::new(width, height)),
            0.0,
            self.background,
        );
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color32) {
        self.painter.circle_filled(pos(center), radius, color);
    }

    fn stroke_gradient(
        &mut self,
        from: Vec2,
        to: Vec2,
        from_color: Color32,
        to_color: Color32,
        width: f32,
    ) {
        let direction = (to - from).normalize_or_zero();
        if direction == Vec2::ZERO {
            return;
        }
        let offset = direction.perp() * (width.max(MIN_LINE_WIDTH) / 2.0);

        let mut mesh = Mesh::default();
        mesh.colored_vertex(pos(from + offset), from_color);
        mesh.colored_vertex(pos(from - offset), from_color);
        mesh.colored_vertex(pos(to + offset), to_color);
        mesh.colored_vertex(pos(to - offset), to_color);
        mesh.add_triangle(0, 1, 2);
        mesh.add_triangle(1, 3, 2);

        self.painter.add(Shape::mesh(mesh));
    }

    fn fill_radial_glow(&mut self, center: Vec2, radius: f32, inner: Color32, outer: Color32) {
        if radius <= 0.0 {
            return;
        }

        let mut mesh = Mesh::default();
        mesh.colored_vertex(pos(center), inner);
        for i in 0..GLOW_SEGMENTS {
            let angle = i as f32 / GLOW_SEGMENTS as f32 * std::f32::consts::TAU;
            mesh.colored_vertex(pos(center + Vec2::from_angle(angle) * radius), outer);
        }
        for i in 0..GLOW_SEGMENTS {
            mesh.add_triangle(0, 1 + i, 1 + (i + 1) % GLOW_SEGMENTS);
        }

        self.painter.add(Shape::mesh(mesh));
    }
}

pub fn begin_clear_pass<'a>(
    encoder: &'a mut wgpu::CommandEncoder,
    view: &'a wgpu::TextureView,
    background: Color32,
) -> wgpu::RenderPass<'a> {
    let [r, g, b, a] = background.to_normalized_gamma_f32();

    encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("particle network"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(wgpu::Color {
                    r: r as f64,
                    g: g as f64,
                    b: b as f64,
                    a: a as f64,
                }),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    })
}
