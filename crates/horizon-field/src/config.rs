//! Attractor configuration (parsed from the `[attractor]` TOML table)

use horizon_core::{HorizonError, Result};
use serde::{Deserialize, Serialize};

/// Constants of the gravity well. Distances are in the units of whichever
/// frame the snapshot has been localized into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttractorConfig {
    pub mass: f32,
    pub spin: f32,
    pub drag: f32,
    pub max_accel: f32,
    pub softening_eps: f32,
    pub influence_radius: f32,
    pub tidal_radius: f32,
    pub horizon_radius: f32,
    pub absorb_radius: f32,
    /// Absorption gained per second at the absorb radius, full pull
    pub absorb_rate: f32,
    /// Upper bound on absorption gained in one tick
    pub absorb_frame_cap: f32,
    /// Absorption lost per second once a point leaves the horizon
    pub absorb_decay: f32,
    /// Absorption at which a point is treated as captured
    pub capture_threshold: f32,
    /// Rate at which absorbed nodes shrink toward the shell center
    pub shrink_rate: f32,
    /// How far behind the attractor the funnel target sinks at full absorption
    pub tunnel_depth: f32,
    /// Direct positional suction, units per second at full influence
    pub suction_speed: f32,
    /// Gain on the velocity component along the pull direction inside the tidal radius
    pub tidal_stretch: f32,
    /// Loss on the velocity components across the pull direction inside the tidal radius
    pub tidal_squeeze: f32,
    /// Pull intensity below which the field is treated as inactive
    pub activation_threshold: f32,
}

impl Default for AttractorConfig {
    fn default() -> Self {
        Self {
            mass: 900.0,
            spin: 6.0,
            drag: 0.9,
            max_accel: 60.0,
            softening_eps: 0.6,
            influence_radius: 95.0,
            tidal_radius: 18.0,
            horizon_radius: 6.0,
            absorb_radius: 1.5,
            absorb_rate: 0.35,
            absorb_frame_cap: 0.015,
            absorb_decay: 0.25,
            capture_threshold: 0.95,
            shrink_rate: 0.4,
            tunnel_depth: 3.0,
            suction_speed: 2.2,
            tidal_stretch: 0.6,
            tidal_squeeze: 0.5,
            activation_threshold: 0.01,
        }
    }
}

impl AttractorConfig {
    pub fn validate(&self) -> Result<()> {
        HorizonError::check_range("attractor.mass", self.mass, 0.0, f32::MAX)?;
        HorizonError::check_range("attractor.max_accel", self.max_accel, 0.0, f32::MAX)?;
        HorizonError::check_range("attractor.drag", self.drag, 0.0, 60.0)?;
        HorizonError::check_range("attractor.softening_eps", self.softening_eps, 1e-4, f32::MAX)?;
        HorizonError::check_range("attractor.influence_radius", self.influence_radius, 1e-3, f32::MAX)?;
        HorizonError::check_range("attractor.tidal_radius", self.tidal_radius, 1e-3, f32::MAX)?;
        HorizonError::check_range("attractor.absorb_radius", self.absorb_radius, 0.0, f32::MAX)?;
        HorizonError::check_range("attractor.absorb_frame_cap", self.absorb_frame_cap, 0.0, 1.0)?;
        HorizonError::check_range("attractor.capture_threshold", self.capture_threshold, 0.0, 1.0)?;
        HorizonError::check_range("attractor.tidal_squeeze", self.tidal_squeeze, 0.0, 1.0)?;
        if self.horizon_radius <= self.absorb_radius {
            return Err(HorizonError::InvalidConfig(format!(
                "attractor.horizon_radius ({}) must exceed absorb_radius ({})",
                self.horizon_radius, self.absorb_radius
            )));
        }
        Ok(())
    }
}
