use clap::{Parser, ValueEnum};

use crate::config::{DeviceClass, Overrides, Theme};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DeviceChoice {
    /// Pick from the window width, re-evaluated on every resize
    Auto,
    Desktop,
    Mobile,
}

impl DeviceChoice {
    pub fn resolve(self, viewport_width: f32) -> DeviceClass {
        match self {
            DeviceChoice::Auto => DeviceClass::for_viewport_width(viewport_width),
            DeviceChoice::Desktop => DeviceClass::Desktop,
            DeviceChoice::Mobile => DeviceClass::Mobile,
        }
    }
}

/// An animated particle network background
#[derive(Parser, Debug)]
#[command(version)]
pub struct Args {
    /// Colour theme, toggled at runtime with `T`
    #[arg(short, long, value_enum, default_value_t = Theme::Dark)]
    pub theme: Theme,

    /// Device class that selects density, speed and pointer behaviour
    #[arg(short, long, value_enum, default_value_t = DeviceChoice::Auto)]
    pub device: DeviceChoice,

    /// Cap the framerate
    ///
    /// if not given frames are presented as fast as the display allows
    #[arg(short, long)]
    pub framerate: Option<u32>,

    /// Seed for particle placement, random when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// Upper bound on the number of particles
    #[arg(long)]
    pub max_particles: Option<usize>,

    /// Viewport area per particle
    #[arg(long, value_parser = positive_f32)]
    pub density_factor: Option<f32>,

    /// Start with the FPS/particle overlay shown (toggle with `M`)
    #[arg(long)]
    pub show_metrics: bool,
}

impl Args {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            max_particles: self.max_particles,
            density_factor: self.density_factor,
        }
    }
}

fn positive_f32(s: &str) -> Result<f32, String> {
    let value: f32 = s.parse().map_err(|e| format!("{e}"))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("expected a positive number, got {value}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["particle_network"]).unwrap();
        assert_eq!(args.theme, Theme::Dark);
        assert_eq!(args.device, DeviceChoice::Auto);
        assert_eq!(args.overrides(), Overrides::default());
        assert!(!args.show_metrics);
    }

    #[test]
    fn test_metrics_overlay_is_opt_in() {
        let args = Args::try_parse_from(["particle_network", "--show-metrics"]).unwrap();
        assert!(args.show_metrics);
        assert!(Args::try_parse_from(["particle_network", "--hide-metrics"]).is_err());
    }

    #[test]
    fn test_overrides_and_validation() {
        let args = Args::try_parse_from([
            "particle_network",
            "--theme",
            "light",
            "--device",
            "mobile",
            "--max-particles",
            "300",
            "--density-factor",
            "8000",
        ])
        .unwrap();
        assert_eq!(args.theme, Theme::Light);
        assert_eq!(args.device.resolve(1920.0), DeviceClass::Mobile);
        assert_eq!(args.overrides().max_particles, Some(300));
        assert_eq!(args.overrides().density_factor, Some(8000.0));

        assert!(Args::try_parse_from(["particle_network", "--density-factor", "0"]).is_err());
        assert!(Args::try_parse_from(["particle_network", "--density-factor", "-5"]).is_err());
    }

    #[test]
    fn test_auto_device_follows_width() {
        assert_eq!(DeviceChoice::Auto.resolve(500.0), DeviceClass::Mobile);
        assert_eq!(DeviceChoice::Auto.resolve(1280.0), DeviceClass::Desktop);
        assert_eq!(DeviceChoice::Desktop.resolve(500.0), DeviceClass::Desktop);
    }
}
