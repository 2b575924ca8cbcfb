use egui::Color32;
use glam::Vec2;
use rand::{seq::SliceRandom, Rng};

use crate::config::{DeviceSettings, ThemePalette};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    /// Units per 16.67ms frame
    pub velocity: Vec2,
    pub radius: f32,
    pub color: Color32,
    /// Grid cell assigned by the last grid rebuild
    pub cell: Option<(i32, i32)>,
}

pub fn particle_count(width: f32, height: f32, settings: &DeviceSettings) -> usize {
    if width <= 0.0 || height <= 0.0 || settings.density_factor <= 0.0 {
        return 0;
    }

    let count = (width as f64 * height as f64 / settings.density_factor as f64).floor() as usize;
    count.min(settings.max_particles)
}

pub fn generate_particles<R: Rng>(
    width: f32,
    height: f32,
    settings: &DeviceSettings,
    palette: &ThemePalette,
    rng: &mut R,
) -> Vec<Particle> {
    let count = particle_count(width, height, settings);
    let half_speed = settings.speed / 2.0;

    (0..count)
        .map(|_| {
            let position = Vec2::new(rng.gen_range(0.0..width), rng.gen_range(0.0..height));
            let velocity = if half_speed > 0.0 {
                Vec2::new(
                    rng.gen_range(-half_speed..half_speed),
                    rng.gen_range(-half_speed..half_speed),
                )
            } else {
                Vec2::ZERO
            };

            Particle {
                position,
                velocity,
                radius: settings.min_radius + rng.gen::<f32>() * settings.radius_span,
                color: *palette
                    .particle_colors
                    .choose(rng)
                    .unwrap_or(&Color32::WHITE),
                cell: None,
            }
        })
        .collect()
}
