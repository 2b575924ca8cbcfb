use egui::Color32;

/// Viewport widths at or below this are treated as a phone-sized display
pub const MOBILE_MAX_WIDTH: f32 = 640.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceClass {
    Desktop,
    Mobile,
}

impl DeviceClass {
    pub fn for_viewport_width(width: f32) -> Self {
        if width <= MOBILE_MAX_WIDTH {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        }
    }
}

/// Constants that depend on the class of device the field runs on
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeviceSettings {
    pub connection_distance: f32,
    pub pointer_connection_distance: f32,
    pub glow_radius: f32,
    pub cell_size: f32,
    /// Viewport area (in square units) per particle
    pub density_factor: f32,
    pub max_particles: usize,
    pub speed: f32,
    pub min_radius: f32,
    pub radius_span: f32,
}

impl DeviceSettings {
    pub fn for_class(class: DeviceClass) -> Self {
        match class {
            DeviceClass::Desktop => Self {
                connection_distance: 150.0,
                pointer_connection_distance: 350.0,
                glow_radius: 60.0,
                cell_size: 150.0,
                density_factor: 12000.0,
                max_particles: 120,
                speed: 0.3,
                min_radius: 1.0,
                radius_span: 2.0,
            },
            DeviceClass::Mobile => Self {
                connection_distance: 100.0,
                pointer_connection_distance: 250.0,
                glow_radius: 40.0,
                cell_size: 100.0,
                density_factor: 15000.0,
                max_particles: 80,
                speed: 0.2,
                min_radius: 1.0,
                radius_span: 1.5,
            },
        }
    }

    pub fn with_overrides(mut self, overrides: &Overrides) -> Self {
        if let Some(max_particles) = overrides.max_particles {
            self.max_particles = max_particles;
        }
        if let Some(density_factor) = overrides.density_factor {
            self.density_factor = density_factor;
        }
        self
    }
}

/// Values supplied on the command line that replace the device defaults
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Overrides {
    pub max_particles: Option<usize>,
    pub density_factor: Option<f32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ThemePalette {
    pub particle_colors: [Color32; 3],
    pub pointer_color: Color32,
    pub glow_start: Color32,
    pub glow_end: Color32,
    pub line_opacity_multiplier: f32,
    pub background: Color32,
}

impl ThemePalette {
    pub fn for_theme(theme: Theme) -> Self {
        let pointer_color = rgba(239, 68, 68, 0.8);
        let glow_start = rgba(239, 68, 68, 0.3);

        match theme {
            Theme::Dark => Self {
                particle_colors: [
                    rgba(99, 113, 241, 0.8),
                    rgba(79, 79, 229, 0.8),
                    rgba(147, 197, 253, 0.8),
                ],
                pointer_color,
                glow_start,
                glow_end: Color32::TRANSPARENT,
                line_opacity_multiplier: 1.0,
                background: Color32::from_rgb(9, 9, 20),
            },
            Theme::Light => Self {
                particle_colors: [
                    rgba(79, 70, 229, 0.6),
                    rgba(102, 126, 234, 0.6),
                    rgba(165, 180, 252, 0.6),
                ],
                pointer_color,
                glow_start,
                glow_end: Color32::from_rgba_unmultiplied(255, 255, 255, 0),
                line_opacity_multiplier: 0.8,
                background: Color32::from_rgb(248, 250, 252),
            },
        }
    }
}

fn rgba(r: u8, g: u8, b: u8, alpha: f32) -> Color32 {
    Color32::from_rgba_unmultiplied(r, g, b, (alpha * 255.0).round() as u8)
}

/// Everything the field reads from its environment, resolved in one place
#[derive(Clone, Debug, PartialEq)]
pub struct FieldConfig {
    pub theme: Theme,
    pub device_class: DeviceClass,
    pub device: DeviceSettings,
    pub palette: ThemePalette,
}

impl FieldConfig {
    pub fn resolve(theme: Theme, device_class: DeviceClass, overrides: &Overrides) -> Self {
        Self {
            theme,
            device_class,
            device: DeviceSettings::for_class(device_class).with_overrides(overrides),
            palette: ThemePalette::for_theme(theme),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_class_breakpoint() {
        assert_eq!(DeviceClass::for_viewport_width(375.0), DeviceClass::Mobile);
        assert_eq!(DeviceClass::for_viewport_width(640.0), DeviceClass::Mobile);
        assert_eq!(DeviceClass::for_viewport_width(641.0), DeviceClass::Desktop);
    }

    #[test]
    fn test_overrides_replace_defaults() {
        let overrides = Overrides {
            max_particles: Some(500),
            density_factor: None,
        };
        let config = FieldConfig::resolve(Theme::Dark, DeviceClass::Mobile, &overrides);

        assert_eq!(config.device.max_particles, 500);
        assert_eq!(config.device.density_factor, 15000.0);
        assert_eq!(config.device.connection_distance, 100.0);
    }

    #[test]
    fn test_theme_palettes_differ() {
        let light = ThemePalette::for_theme(Theme::Light);
        let dark = ThemePalette::for_theme(Theme::Dark);

        assert_eq!(light.line_opacity_multiplier, 0.8);
        assert_eq!(dark.line_opacity_multiplier, 1.0);
        assert_ne!(light.particle_colors, dark.particle_colors);
        assert_eq!(light.pointer_color, dark.pointer_color);
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
    }
}
