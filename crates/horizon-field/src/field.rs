//! Gravity field owner, per-tick snapshot, and the force model

use crate::config::AttractorConfig;
use horizon_core::{clamp01, smoothstep, Frame, Vec3};

/// Everything a caller needs to move one point under the attractor.
///
/// `accel` already includes the intensity ease. Drag, tidal stretch and
/// capture are left to the caller because each integrator applies them at a
/// different point of its step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityEffect {
    /// Acceleration toward the attractor plus swirl
    pub accel: Vec3,
    /// Multiply velocity by this after integrating `accel`
    pub drag_multiplier: f32,
    /// 0 outside the tidal radius, rising to 1 at the attractor
    pub tidal_compression: f32,
    /// Absorption to add this tick (already frame-capped)
    pub absorb_delta: f32,
    /// Caller must snap the point onto the attractor and zero its velocity
    pub captured: bool,
    /// Smoothstep weight of the influence radius, 0 beyond it
    pub influence: f32,
    /// Softened distance to the attractor
    pub distance: f32,
    /// Unit direction from the point toward the attractor
    pub direction: Vec3,
    /// Attractor position in the snapshot's frame
    pub attractor: Vec3,
}

impl GravityEffect {
    /// Stretch the velocity component along the pull direction and squeeze
    /// the components across it, proportional to `tidal_compression`.
    /// `step` is the integration step in 1/60 s units.
    pub fn apply_tidal(&self, velocity: Vec3, config: &AttractorConfig, step: f32) -> Vec3 {
        if self.tidal_compression <= 0.0 {
            return velocity;
        }
        let along = self.direction * velocity.dot(&self.direction);
        let across = velocity - along;
        let stretch = 1.0 + self.tidal_compression * config.tidal_stretch * step;
        let squeeze = 1.0 - (self.tidal_compression * config.tidal_squeeze * step).min(1.0);
        along * stretch + across * squeeze
    }
}

/// Immutable view of the attractor for the duration of one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSnapshot {
    pub config: AttractorConfig,
    pub position: Vec3,
    pub enabled: bool,
    pub pull_intensity: f32,
}

impl FieldSnapshot {
    pub fn is_active(&self) -> bool {
        self.enabled && self.pull_intensity > self.config.activation_threshold
    }

    /// Re-express the attractor position in `frame`'s local space.
    pub fn localized(&self, frame: &Frame) -> Self {
        Self {
            position: frame.to_local(self.position),
            ..*self
        }
    }

    /// Force model for a single point. Returns `None` while the field is inactive.
    ///
    /// `absorption` is the caller's current absorption of this point, used only
    /// for the capture test.
    pub fn compute_effect(
        &self,
        point: Vec3,
        _velocity: Vec3,
        dt: f32,
        absorption: f32,
    ) -> Option<GravityEffect> {
        if !self.is_active() {
            return None;
        }
        let c = &self.config;
        let pull = self.pull_intensity;

        let r_vec = self.position - point;
        let r = (r_vec.length_squared() + c.softening_eps * c.softening_eps).sqrt();
        let direction = r_vec.normalized();

        let influence = if r >= c.influence_radius {
            0.0
        } else {
            smoothstep(1.0 - r / c.influence_radius)
        };
        let ease = influence * pull * pull;

        let radial = (c.mass / (r * r)).min(c.max_accel) * ease;
        let swirl_dir = Vec3::UP.cross(&direction).normalized();
        let swirl = c.spin / (r + c.softening_eps) * ease;
        let accel = (direction * radial + swirl_dir * swirl).clamp_length(c.max_accel);

        let drag_multiplier = (1.0 - c.drag * dt * influence * pull).max(0.0);

        let tidal_compression = if r < c.tidal_radius {
            1.0 - r / c.tidal_radius
        } else {
            0.0
        };

        let absorb_delta = if r < c.horizon_radius {
            let depth = (c.horizon_radius - r) / (c.horizon_radius - c.absorb_radius);
            (c.absorb_rate * dt * pull * depth).min(c.absorb_frame_cap)
        } else {
            0.0
        };

        let captured = r < c.absorb_radius || absorption >= c.capture_threshold;

        Some(GravityEffect {
            accel,
            drag_multiplier,
            tidal_compression,
            absorb_delta,
            captured,
            influence,
            distance: r,
            direction,
            attractor: self.position,
        })
    }
}

/// Owner of the attractor state. Mutated once per tick from collaborator
/// input, then frozen into a [`FieldSnapshot`].
#[derive(Debug, Clone)]
pub struct GravityField {
    config: AttractorConfig,
    position: Vec3,
    enabled: bool,
    pull_intensity: f32,
}

impl GravityField {
    pub fn new(config: AttractorConfig) -> Self {
        Self {
            config,
            position: Vec3::ZERO,
            enabled: false,
            pull_intensity: 0.0,
        }
    }

    pub fn config(&self) -> &AttractorConfig {
        &self.config
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled != self.enabled {
            log::debug!("[field] attractor {}", if enabled { "enabled" } else { "disabled" });
        }
        self.enabled = enabled;
    }

    pub fn pull_intensity(&self) -> f32 {
        self.pull_intensity
    }

    /// Set the pull intensity, clamped to [0, 1]. Non-finite input reads as 0.
    pub fn set_pull_intensity(&mut self, pull: f32) {
        self.pull_intensity = if pull.is_finite() { clamp01(pull) } else { 0.0 };
    }

    pub fn is_active(&self) -> bool {
        self.snapshot().is_active()
    }

    pub fn snapshot(&self) -> FieldSnapshot {
        FieldSnapshot {
            config: self.config,
            position: self.position,
            enabled: self.enabled,
            pull_intensity: self.pull_intensity,
        }
    }

    /// Convenience for one-off queries outside a tick; tick code should
    /// take a snapshot once and reuse it.
    pub fn compute_effect(
        &self,
        point: Vec3,
        velocity: Vec3,
        dt: f32,
        absorption: f32,
    ) -> Option<GravityEffect> {
        self.snapshot().compute_effect(point, velocity, dt, absorption)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active_field() -> GravityField {
        let mut field = GravityField::new(AttractorConfig::default());
        field.set_enabled(true);
        field.set_pull_intensity(1.0);
        field
    }

    #[test]
    fn inactive_field_has_no_effect() {
        let mut field = GravityField::new(AttractorConfig::default());
        field.set_pull_intensity(1.0);
        assert!(field.compute_effect(Vec3::new(10.0, 0.0, 0.0), Vec3::ZERO, 0.016, 0.0).is_none());

        field.set_enabled(true);
        field.set_pull_intensity(0.005);
        assert!(!field.is_active());
        assert!(field.compute_effect(Vec3::new(10.0, 0.0, 0.0), Vec3::ZERO, 0.016, 0.0).is_none());
    }

    #[test]
    fn pull_intensity_is_clamped() {
        let mut field = GravityField::new(AttractorConfig::default());
        field.set_pull_intensity(3.0);
        assert_eq!(field.pull_intensity(), 1.0);
        field.set_pull_intensity(f32::NAN);
        assert_eq!(field.pull_intensity(), 0.0);
    }

    #[test]
    fn effect_at_singularity_is_finite() {
        let field = active_field();
        let effect = field
            .compute_effect(Vec3::ZERO, Vec3::ZERO, 0.016, 0.0)
            .unwrap();
        assert!(effect.accel.is_finite());
        assert!(effect.distance > 0.0);
        assert!(effect.tidal_compression.is_finite());
        assert!(effect.absorb_delta.is_finite());
        assert!(effect.drag_multiplier.is_finite());
        assert!(effect.captured);
    }

    #[test]
    fn accel_never_exceeds_max() {
        let field = active_field();
        let max = field.config().max_accel;
        for i in 0..200 {
            let d = i as f32 * 0.05;
            for point in [
                Vec3::new(d, 0.0, 0.0),
                Vec3::new(0.0, d, 0.0),
                Vec3::new(d * 0.3, -d, d * 0.7),
            ] {
                let effect = field.compute_effect(point, Vec3::ZERO, 0.016, 0.0).unwrap();
                assert!(effect.accel.length() <= max * (1.0 + 1e-5));
            }
        }
    }

    #[test]
    fn accel_pulls_toward_attractor() {
        let mut field = active_field();
        field.set_position(Vec3::new(5.0, 0.0, 0.0));
        let point = Vec3::new(5.0, 0.0, 40.0);
        let effect = field.compute_effect(point, Vec3::ZERO, 0.016, 0.0).unwrap();
        let to_attractor = (field.position() - point).normalized();
        assert!(effect.accel.dot(&to_attractor) > 0.0);
        assert!(effect.influence > 0.0);
    }

    #[test]
    fn swirl_is_perpendicular_to_pull() {
        let field = active_field();
        let point = Vec3::new(30.0, 0.0, 0.0);
        let effect = field.compute_effect(point, Vec3::ZERO, 0.016, 0.0).unwrap();
        let radial = effect.direction * effect.accel.dot(&effect.direction);
        let tangential = effect.accel - radial;
        assert!(tangential.length() > 0.0);
        assert!(tangential.dot(&effect.direction).abs() < 1e-5);
    }

    #[test]
    fn no_influence_beyond_radius() {
        let field = active_field();
        let effect = field
            .compute_effect(Vec3::new(200.0, 0.0, 0.0), Vec3::ZERO, 0.016, 0.0)
            .unwrap();
        assert_eq!(effect.influence, 0.0);
        assert_eq!(effect.accel, Vec3::ZERO);
        assert_eq!(effect.drag_multiplier, 1.0);
        assert_eq!(effect.absorb_delta, 0.0);
        assert!(!effect.captured);
    }

    #[test]
    fn pull_is_eased_quadratically() {
        let mut field = active_field();
        let point = Vec3::new(20.0, 0.0, 0.0);
        let full = field.compute_effect(point, Vec3::ZERO, 0.016, 0.0).unwrap();
        field.set_pull_intensity(0.5);
        let half = field.compute_effect(point, Vec3::ZERO, 0.016, 0.0).unwrap();
        let ratio = half.accel.length() / full.accel.length();
        assert!((ratio - 0.25).abs() < 1e-4);
    }

    #[test]
    fn absorption_only_inside_horizon_and_capped() {
        let field = active_field();
        let config = *field.config();
        let outside = field
            .compute_effect(Vec3::new(config.horizon_radius + 1.0, 0.0, 0.0), Vec3::ZERO, 0.033, 0.0)
            .unwrap();
        assert_eq!(outside.absorb_delta, 0.0);

        let inside = field
            .compute_effect(Vec3::new(config.absorb_radius + 0.5, 0.0, 0.0), Vec3::ZERO, 0.033, 0.0)
            .unwrap();
        assert!(inside.absorb_delta > 0.0);
        assert!(inside.absorb_delta <= config.absorb_frame_cap);
    }

    #[test]
    fn tidal_only_inside_tidal_radius() {
        let field = active_field();
        let config = *field.config();
        let far = field
            .compute_effect(Vec3::new(config.tidal_radius + 2.0, 0.0, 0.0), Vec3::ZERO, 0.016, 0.0)
            .unwrap();
        assert_eq!(far.tidal_compression, 0.0);

        let near = field
            .compute_effect(Vec3::new(config.tidal_radius * 0.5, 0.0, 0.0), Vec3::ZERO, 0.016, 0.0)
            .unwrap();
        assert!(near.tidal_compression > 0.0 && near.tidal_compression < 1.0);
    }

    #[test]
    fn tidal_stretches_along_and_squeezes_across() {
        let field = active_field();
        let config = *field.config();
        let effect = field
            .compute_effect(Vec3::new(5.0, 0.0, 0.0), Vec3::ZERO, 0.016, 0.0)
            .unwrap();
        let v = Vec3::new(-1.0, 1.0, 0.0);
        let out = effect.apply_tidal(v, &config, 1.0);
        assert!(out.x.abs() > 1.0);
        assert!(out.y.abs() < 1.0);
    }

    #[test]
    fn high_absorption_counts_as_captured() {
        let field = active_field();
        let effect = field
            .compute_effect(Vec3::new(4.0, 0.0, 0.0), Vec3::ZERO, 0.016, 0.96)
            .unwrap();
        assert!(effect.captured);
    }

    #[test]
    fn localized_snapshot_moves_attractor() {
        let mut field = active_field();
        field.set_position(Vec3::new(10.0, 0.0, 0.0));
        let frame = Frame::from_origin(Vec3::new(4.0, 0.0, 0.0));
        let local = field.snapshot().localized(&frame);
        assert_eq!(local.position, Vec3::new(6.0, 0.0, 0.0));
        assert_eq!(local.pull_intensity, 1.0);
    }
}
