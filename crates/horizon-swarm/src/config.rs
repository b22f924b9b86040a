//! Swarm configuration (parsed from the `[swarm]` TOML table)

use horizon_core::{HorizonError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwarmConfig {
    /// Drift speed, units per 1/60 s
    pub drift_speed: f32,
    /// Fraction of the attractor's suction speed applied to nodes
    pub suction: f32,
    /// Swirl speed around the attractor at full influence, units per second
    pub swirl_speed: f32,
    /// Pull intensity below which nodes ignore the attractor
    pub activation_pull: f32,
    /// Absorption band as a multiple of the horizon radius
    pub absorb_band: f32,
    /// Absorption gained per second inside the band
    pub absorb_rate: f32,
    /// Absorption lost per second while the attractor is inactive
    pub relax_rate: f32,
    /// Nodes stay within this fraction of the live shell radius
    pub containment_factor: f32,
    pub min_radius: f32,
    /// Fraction of normal velocity kept on a boundary bounce
    pub restitution: f32,
    /// Random velocity kick on a bounce
    pub jitter: f32,
    pub base_scale: f32,
    pub pulse_speed: f32,
    pub pulse_gain: f32,
    pub base_color: [f32; 3],
    pub absorbed_color: [f32; 3],
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            drift_speed: 0.02,
            suction: 0.35,
            swirl_speed: 0.8,
            activation_pull: 0.05,
            absorb_band: 1.6,
            absorb_rate: 0.12,
            relax_rate: 0.2,
            containment_factor: 0.85,
            min_radius: 0.6,
            restitution: 0.6,
            jitter: 0.004,
            base_scale: 0.35,
            pulse_speed: 2.0,
            pulse_gain: 0.35,
            base_color: [0.55, 0.85, 1.0],
            absorbed_color: [1.0, 0.15, 0.1],
        }
    }
}

impl SwarmConfig {
    pub fn validate(&self) -> Result<()> {
        HorizonError::check_range("swarm.containment_factor", self.containment_factor, 0.0, 1.0)?;
        HorizonError::check_range("swarm.restitution", self.restitution, 0.0, 0.999)?;
        HorizonError::check_range("swarm.min_radius", self.min_radius, 0.0, f32::MAX)?;
        HorizonError::check_range("swarm.drift_speed", self.drift_speed, 0.0, f32::MAX)?;
        Ok(())
    }
}
