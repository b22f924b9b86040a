//! Cold-to-hot stress color ramp

use horizon_core::{clamp01, lerp_color};

const STOPS: [[f32; 3]; 5] = [
    [0.05, 0.15, 0.45], // deep blue
    [0.10, 0.75, 0.95], // cyan
    [1.00, 0.95, 0.60], // pale yellow
    [1.00, 0.55, 0.10], // orange
    [0.95, 0.15, 0.10], // red
];

/// Map a stress value through the 4-band ramp and darken by absorption.
pub fn stress_color(stress: f32, stress_scale: f32, absorption: f32, darken: f32) -> [f32; 3] {
    let t = clamp01(stress / stress_scale) * 4.0;
    let band = (t as usize).min(3);
    let c = lerp_color(STOPS[band], STOPS[band + 1], t - band as f32);
    let k = 1.0 - darken * clamp01(absorption);
    [c[0] * k, c[1] * k, c[2] * k]
}
