//! Scalar helpers shared by every simulation component

/// Smallest per-tick step accepted by the simulation, in seconds
pub const DT_MIN: f32 = 0.008;
/// Largest per-tick step accepted by the simulation, in seconds
pub const DT_MAX: f32 = 0.033;

/// Linear interpolation between two floats
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Linear interpolation between two RGB triples
pub fn lerp_color(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        lerp_f32(a[0], b[0], t),
        lerp_f32(a[1], b[1], t),
        lerp_f32(a[2], b[2], t),
    ]
}

pub fn clamp01(v: f32) -> f32 {
    v.clamp(0.0, 1.0)
}

/// Hermite ease of `t`, clamped to [0, 1] first
pub fn smoothstep(t: f32) -> f32 {
    let t = clamp01(t);
    t * t * (3.0 - 2.0 * t)
}

/// Clamp a frame delta into the range the integrators are tuned for.
/// Non-finite deltas collapse to the minimum step.
pub fn clamp_dt(dt: f32) -> f32 {
    if dt.is_finite() {
        dt.clamp(DT_MIN, DT_MAX)
    } else {
        DT_MIN
    }
}
