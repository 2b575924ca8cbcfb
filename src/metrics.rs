use egui::{Align2, Color32, RichText};

/// How often the displayed framerate is recomputed
pub const FPS_WINDOW_MS: f64 = 500.0;

/// Frames per second averaged over fixed windows
pub struct FpsCounter {
    window_start_ms: f64,
    frames: u32,
    fps: u32,
}

impl FpsCounter {
    pub fn new(now_ms: f64) -> Self {
        Self {
            window_start_ms: now_ms,
            frames: 0,
            fps: 0,
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn frame(&mut self, now_ms: f64) {
        self.frames += 1;

        let elapsed = now_ms - self.window_start_ms;
        if elapsed >= FPS_WINDOW_MS {
            self.fps = (self.frames as f64 * 1000.0 / elapsed).round() as u32;
            self.frames = 0;
            self.window_start_ms = now_ms;
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FpsTier {
    Smooth,
    Fair,
    Slow,
}

impl FpsTier {
    pub fn of(fps: u32) -> Self {
        match fps {
            55.. => FpsTier::Smooth,
            30.. => FpsTier::Fair,
            _ => FpsTier::Slow,
        }
    }

    pub fn color(self) -> Color32 {
        match self {
            FpsTier::Smooth => Color32::from_rgb(74, 222, 128),
            FpsTier::Fair => Color32::from_rgb(250, 204, 21),
            FpsTier::Slow => Color32::from_rgb(248, 113, 113),
        }
    }
}

pub fn show_metrics_panel(ctx: &egui::Context, fps: u32, particle_count: usize) {
    egui::Area::new(egui::Id::new("metrics"))
        .anchor(Align2::CENTER_BOTTOM, [0.0, -24.0])
        .interactable(false)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new(format!("{fps} FPS"))
                        .monospace()
                        .color(FpsTier::of(fps).color()),
                );
                ui.separator();
                ui.label(
                    RichText::new(format!("{particle_count} particles"))
                        .monospace()
                        .color(Color32::from_rgb(165, 180, 252)),
                );
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_published_per_window() {
        let mut counter = FpsCounter::new(0.0);

        for i in 1..30 {
            counter.frame(i as f64 * 16.0);
        }
        assert_eq!(counter.fps(), 0);

        // 32 frames over 512ms
        for i in 30..=32 {
            counter.frame(i as f64 * 16.0);
        }
        assert_eq!(counter.fps(), 63);

        counter.frame(32.0 * 16.0 + 600.0);
        assert_eq!(counter.fps(), 2);
    }

    #[test]
    fn test_fps_tiers() {
        assert_eq!(FpsTier::of(60), FpsTier::Smooth);
        assert_eq!(FpsTier::of(55), FpsTier::Smooth);
        assert_eq!(FpsTier::of(54), FpsTier::Fair);
        assert_eq!(FpsTier::of(30), FpsTier::Fair);
        assert_eq!(FpsTier::of(29), FpsTier::Slow);
        assert_eq!(FpsTier::of(0), FpsTier::Slow);
    }
}
