//! Flat output buffers and GPU instance packing

use bytemuck::{Pod, Zeroable};
use horizon_core::Vec3;

/// GPU instance data, one per particle.
/// 32 bytes (2 rows of vec4).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    /// xyz = position, w = size
    pub pos_size: [f32; 4],
    /// rgba
    pub color: [f32; 4],
}

/// Per-particle outputs rewritten every update.
///
/// Positions and colors are flat `3 * len` arrays ready for upload; size and
/// opacity are kept alongside for instance packing.
#[derive(Debug, Clone, Default)]
pub struct ParticleBuffers {
    positions: Vec<f32>,
    colors: Vec<f32>,
    sizes: Vec<f32>,
    opacity: Vec<f32>,
}

impl ParticleBuffers {
    pub fn with_len(len: usize) -> Self {
        let mut buffers = Self::default();
        buffers.resize(len);
        buffers
    }

    pub fn resize(&mut self, len: usize) {
        self.positions.clear();
        self.positions.resize(len * 3, 0.0);
        self.colors.clear();
        self.colors.resize(len * 3, 0.0);
        self.sizes.clear();
        self.sizes.resize(len, 0.0);
        self.opacity.clear();
        self.opacity.resize(len, 0.0);
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    pub fn write(&mut self, i: usize, position: Vec3, color: [f32; 3], size: f32, opacity: f32) {
        self.positions[i * 3..i * 3 + 3].copy_from_slice(&position.to_array());
        self.colors[i * 3..i * 3 + 3].copy_from_slice(&color);
        self.sizes[i] = size;
        self.opacity[i] = opacity;
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    pub fn opacity(&self) -> &[f32] {
        &self.opacity
    }

    pub fn position(&self, i: usize) -> Vec3 {
        Vec3::new(
            self.positions[i * 3],
            self.positions[i * 3 + 1],
            self.positions[i * 3 + 2],
        )
    }

    /// Append one instance per visible particle to `out`.
    pub fn pack_instances(&self, out: &mut Vec<ParticleInstance>) {
        out.reserve(self.len());
        for i in 0..self.len() {
            let alpha = self.opacity[i];
            if alpha <= 0.0 {
                continue;
            }
            let p = &self.positions[i * 3..i * 3 + 3];
            let c = &self.colors[i * 3..i * 3 + 3];
            out.push(ParticleInstance {
                pos_size: [p[0], p[1], p[2], self.sizes[i]],
                color: [c[0], c[1], c[2], alpha],
            });
        }
    }
}
