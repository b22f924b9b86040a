//! Shell solver configuration (parsed from the `[shell]` TOML table)

use horizon_core::{HorizonError, Result};
use serde::{Deserialize, Serialize};

/// Tuning constants for [`crate::ShellDeformer`].
///
/// Force gains are per 1/60 s step: the integrator rescales them by the
/// actual substep length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Pull toward the breathing rest shape
    pub stiffness: f32,
    /// Velocity multiplier applied once per substep
    pub damping: f32,
    pub substeps: u32,

    /// Fractional amplitude of the rest-shape breathing
    pub breathing_amplitude: f32,
    /// Breathing angular speed, radians per second
    pub breathing_speed: f32,
    /// Pull intensity at which breathing is fully suppressed
    pub breathing_suppress_pull: f32,

    /// Fraction of spring stiffness removed at full pull
    pub spring_pull_relief: f32,
    /// Fraction of spring stiffness removed at full absorption
    pub spring_absorb_relief: f32,
    pub min_spring_scale: f32,

    pub node_touch_radius: f32,
    pub node_repulsion: f32,
    pub node_activity_gain: f32,

    /// Grab range as a multiple of the shell's rest radius
    pub touch_radius_factor: f32,
    pub grab_stiffness: f32,
    /// Upper bound on the anchor's per-step pull toward the actor
    pub grip_strength: f32,
    /// Rest-space radius around the anchor that follows its displacement
    pub grab_falloff_radius: f32,
    pub grab_falloff_exponent: f32,
    pub follow_gain: f32,

    pub push_range: f32,
    pub push_strength: f32,

    /// Stress that maps to the hot end of the color ramp
    pub stress_scale: f32,
    /// Per-tick decay of the mean stress moving average
    pub stress_decay: f32,
    /// Darkening at full absorption
    pub absorb_darken: f32,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            stiffness: 0.08,
            damping: 0.88,
            substeps: 2,
            breathing_amplitude: 0.025,
            breathing_speed: 0.8,
            breathing_suppress_pull: 0.35,
            spring_pull_relief: 0.85,
            spring_absorb_relief: 0.95,
            min_spring_scale: 0.02,
            node_touch_radius: 2.2,
            node_repulsion: 0.05,
            node_activity_gain: 0.15,
            touch_radius_factor: 2.5,
            grab_stiffness: 0.2,
            grip_strength: 0.8,
            grab_falloff_radius: 7.0,
            grab_falloff_exponent: 1.6,
            follow_gain: 0.25,
            push_range: 5.0,
            push_strength: 0.3,
            stress_scale: 2.5,
            stress_decay: 0.92,
            absorb_darken: 0.85,
        }
    }
}

impl ShellConfig {
    pub fn validate(&self) -> Result<()> {
        HorizonError::check_range("shell.stiffness", self.stiffness, 0.0, 1.0)?;
        HorizonError::check_range("shell.damping", self.damping, 1e-3, 1.0)?;
        HorizonError::check_range("shell.breathing_amplitude", self.breathing_amplitude, 0.0, 0.5)?;
        HorizonError::check_range("shell.spring_pull_relief", self.spring_pull_relief, 0.0, 1.0)?;
        HorizonError::check_range("shell.spring_absorb_relief", self.spring_absorb_relief, 0.0, 1.0)?;
        HorizonError::check_range("shell.stress_decay", self.stress_decay, 0.0, 1.0)?;
        HorizonError::check_range("shell.absorb_darken", self.absorb_darken, 0.0, 1.0)?;
        HorizonError::check_range("shell.stress_scale", self.stress_scale, 1e-4, f32::MAX)?;
        HorizonError::check_range("shell.touch_radius_factor", self.touch_radius_factor, 0.0, f32::MAX)?;
        if self.substeps == 0 {
            return Err(HorizonError::InvalidConfig(
                "shell.substeps must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        ShellConfig::default().validate().unwrap();
    }

    #[test]
    fn zero_substeps_rejected() {
        let config = ShellConfig {
            substeps: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn damping_above_one_rejected() {
        let config = ShellConfig {
            damping: 1.2,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(HorizonError::ValueOutOfRange { .. })
        ));
    }
}
