//! Simulated frame clock

use horizon_core::clamp_dt;

/// Tracks simulated time. Every step goes through [`clamp_dt`], so a
/// stalled caller can never feed the integrators a huge step.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    /// Total simulated time in seconds
    pub total_time: f64,
    /// Step used by the last tick, after clamping
    pub delta_time: f32,
    /// Ticks since creation or the last reset
    pub ticks: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one tick, returning the clamped step.
    pub fn advance(&mut self, dt: f32) -> f32 {
        let dt = clamp_dt(dt);
        self.delta_time = dt;
        self.total_time += dt as f64;
        self.ticks += 1;
        dt
    }

    pub fn time(&self) -> f32 {
        self.total_time as f32
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_core::{DT_MAX, DT_MIN};

    #[test]
    fn test_clock_defaults() {
        let clock = FrameClock::new();
        assert_eq!(clock.total_time, 0.0);
        assert_eq!(clock.delta_time, 0.0);
        assert_eq!(clock.ticks, 0);
    }

    #[test]
    fn test_advance_clamps() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(0.25), DT_MAX);
        assert_eq!(clock.advance(0.0), DT_MIN);
        assert_eq!(clock.advance(f32::NAN), DT_MIN);
        assert_eq!(clock.ticks, 3);
        let expected = DT_MAX as f64 + 2.0 * DT_MIN as f64;
        assert!((clock.total_time - expected).abs() < 1e-9);
    }

    #[test]
    fn test_sixty_hz_accumulates() {
        let mut clock = FrameClock::new();
        for _ in 0..60 {
            clock.advance(1.0 / 60.0);
        }
        assert!((clock.total_time - 1.0).abs() < 1e-5);
        clock.reset();
        assert_eq!(clock.ticks, 0);
    }
}
