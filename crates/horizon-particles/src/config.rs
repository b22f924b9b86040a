//! Particle cloud configuration (the `[disk]`, `[jets]` and `[ring]` TOML tables)

use horizon_core::{HorizonError, Result};
use serde::{Deserialize, Serialize};

/// Orbiting accretion disk
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiskConfig {
    /// Pool size at the highest quality tier
    pub capacity: usize,
    pub inner_radius: f32,
    pub outer_radius: f32,
    /// Angular speed at the inner edge, radians per second
    pub orbit_speed: f32,
    /// Inward drift at the inner edge, units per second
    pub spiral_in_rate: f32,
    /// Exponent of the `(inner / r)` falloff applied to orbit and spiral
    pub falloff_exponent: f32,
    /// Orbit and spiral speed-up at full pull intensity
    pub pull_boost: f32,
    /// Resampled radii follow `outer - band * u^outer_bias`; larger values hug the rim
    pub outer_bias: f32,
    pub speed_min: f32,
    pub speed_max: f32,
    /// Half-thickness of the disk
    pub thickness: f32,
    /// Disk plane tilt toward the viewer, radians
    pub tilt: f32,
    pub heat_gain: f32,
    pub cold_color: [f32; 3],
    pub hot_color: [f32; 3],
    pub size: f32,
    /// Opacity with the attractor idle
    pub idle_opacity: f32,
    /// Opacity at full pull intensity
    pub max_opacity: f32,
}

impl Default for DiskConfig {
    fn default() -> Self {
        Self {
            capacity: 2000,
            inner_radius: 7.5,
            outer_radius: 26.0,
            orbit_speed: 1.4,
            spiral_in_rate: 0.9,
            falloff_exponent: 1.5,
            pull_boost: 0.8,
            outer_bias: 2.0,
            speed_min: 0.8,
            speed_max: 1.25,
            thickness: 0.6,
            tilt: 0.35,
            heat_gain: 1.8,
            cold_color: [0.2, 0.85, 1.0],
            hot_color: [1.0, 0.8, 0.55],
            size: 0.18,
            idle_opacity: 0.15,
            max_opacity: 0.95,
        }
    }
}

impl DiskConfig {
    pub fn validate(&self) -> Result<()> {
        HorizonError::check_range("disk.inner_radius", self.inner_radius, 1e-3, f32::MAX)?;
        if self.inner_radius >= self.outer_radius {
            return Err(HorizonError::InvalidConfig(format!(
                "disk.inner_radius ({}) must be below disk.outer_radius ({})",
                self.inner_radius, self.outer_radius
            )));
        }
        HorizonError::check_range("disk.speed_min", self.speed_min, 0.0, self.speed_max)?;
        HorizonError::check_range("disk.outer_bias", self.outer_bias, 1e-3, f32::MAX)?;
        Ok(())
    }
}

/// Bipolar jets streaming along the spin axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JetConfig {
    pub capacity: usize,
    /// Axial distance at which a particle is resampled
    pub length: f32,
    /// Jet axis; normalized on use
    pub axis: [f32; 3],
    pub speed_min: f32,
    pub speed_max: f32,
    /// Lateral spread at the base of the jet
    pub base_spread: f32,
    /// Lateral spread gained per unit of axial distance
    pub spread_rate: f32,
    pub pulse_speed: f32,
    /// Minimum of the sinusoidal pulse
    pub pulse_floor: f32,
    /// Extra brightness at full shell stress
    pub stress_gain: f32,
    /// Brightness multiplier with the attractor idle
    pub pull_floor: f32,
    pub color: [f32; 3],
    pub size: f32,
}

impl Default for JetConfig {
    fn default() -> Self {
        Self {
            capacity: 600,
            length: 30.0,
            axis: [0.0, 1.0, -0.3],
            speed_min: 6.0,
            speed_max: 14.0,
            base_spread: 0.3,
            spread_rate: 0.08,
            pulse_speed: 3.0,
            pulse_floor: 0.55,
            stress_gain: 0.8,
            pull_floor: 0.2,
            color: [0.6, 0.75, 1.0],
            size: 0.14,
        }
    }
}

impl JetConfig {
    pub fn validate(&self) -> Result<()> {
        HorizonError::check_range("jets.length", self.length, 1e-3, f32::MAX)?;
        HorizonError::check_range("jets.speed_min", self.speed_min, 0.0, self.speed_max)?;
        HorizonError::check_range("jets.spread_rate", self.spread_rate, 0.0, f32::MAX)?;
        if self.axis.iter().all(|c| *c == 0.0) {
            return Err(HorizonError::InvalidConfig(
                "jets.axis must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Thin photon ring hugging the horizon
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingConfig {
    pub capacity: usize,
    /// Ring radius as a multiple of the attractor's horizon radius
    pub radius_factor: f32,
    pub angular_speed_min: f32,
    pub angular_speed_max: f32,
    /// Ring is hidden at or below this pull intensity
    pub visibility_threshold: f32,
    pub color: [f32; 3],
    pub size: f32,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            capacity: 400,
            radius_factor: 1.5,
            angular_speed_min: 2.0,
            angular_speed_max: 3.5,
            visibility_threshold: 0.1,
            color: [1.0, 0.92, 0.75],
            size: 0.1,
        }
    }
}

impl RingConfig {
    pub fn validate(&self) -> Result<()> {
        HorizonError::check_range("ring.radius_factor", self.radius_factor, 1e-3, f32::MAX)?;
        HorizonError::check_range(
            "ring.angular_speed_min",
            self.angular_speed_min,
            0.0,
            self.angular_speed_max,
        )?;
        HorizonError::check_range("ring.visibility_threshold", self.visibility_threshold, 0.0, 1.0)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        DiskConfig::default().validate().unwrap();
        JetConfig::default().validate().unwrap();
        RingConfig::default().validate().unwrap();
    }

    #[test]
    fn inverted_disk_band_rejected() {
        let config = DiskConfig {
            inner_radius: 30.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(HorizonError::InvalidConfig(_))
        ));
    }

    #[test]
    fn zero_length_jets_rejected() {
        let config = JetConfig {
            length: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_table_keeps_defaults() {
        let config: DiskConfig = toml::from_str("capacity = 120\nouter_radius = 40.0").unwrap();
        assert_eq!(config.capacity, 120);
        assert_eq!(config.outer_radius, 40.0);
        assert_eq!(config.inner_radius, DiskConfig::default().inner_radius);
    }
}
