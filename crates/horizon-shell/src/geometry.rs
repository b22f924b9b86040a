//! Base geometry the shell is built from

use horizon_core::Vec3;
use std::collections::HashMap;

/// Rest positions plus optional triangle indices for the renderer
#[derive(Debug, Clone, Default)]
pub struct ShellGeometry {
    pub positions: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl ShellGeometry {
    /// Arbitrary rest points with no triangle list
    pub fn from_points(positions: Vec<Vec3>) -> Self {
        Self {
            positions,
            indices: Vec::new(),
        }
    }

    /// Subdivided icosahedron projected onto a sphere of `radius`.
    ///
    /// The 12 base vertices keep indices 0..12; each subdivision appends
    /// shared edge midpoints after them.
    pub fn icosphere(radius: f32, subdivisions: u32) -> Self {
        let t = (1.0 + 5.0f32.sqrt()) / 2.0;
        let mut positions: Vec<Vec3> = [
            [-1.0, t, 0.0],
            [1.0, t, 0.0],
            [-1.0, -t, 0.0],
            [1.0, -t, 0.0],
            [0.0, -1.0, t],
            [0.0, 1.0, t],
            [0.0, -1.0, -t],
            [0.0, 1.0, -t],
            [t, 0.0, -1.0],
            [t, 0.0, 1.0],
            [-t, 0.0, -1.0],
            [-t, 0.0, 1.0],
        ]
        .iter()
        .map(|p| Vec3::from_array(*p).normalized())
        .collect();

        let mut faces: Vec<[u32; 3]> = vec![
            [0, 11, 5],
            [0, 5, 1],
            [0, 1, 7],
            [0, 7, 10],
            [0, 10, 11],
            [1, 5, 9],
            [5, 11, 4],
            [11, 10, 2],
            [10, 7, 6],
            [7, 1, 8],
            [3, 9, 4],
            [3, 4, 2],
            [3, 2, 6],
            [3, 6, 8],
            [3, 8, 9],
            [4, 9, 5],
            [2, 4, 11],
            [6, 2, 10],
            [8, 6, 7],
            [9, 8, 1],
        ];

        for _ in 0..subdivisions {
            let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();
            let mut next = Vec::with_capacity(faces.len() * 4);
            for [a, b, c] in faces {
                let ab = midpoint(&mut positions, &mut midpoints, a, b);
                let bc = midpoint(&mut positions, &mut midpoints, b, c);
                let ca = midpoint(&mut positions, &mut midpoints, c, a);
                next.push([a, ab, ca]);
                next.push([b, bc, ab]);
                next.push([c, ca, bc]);
                next.push([ab, bc, ca]);
            }
            faces = next;
        }

        for p in &mut positions {
            *p *= radius;
        }

        Self {
            positions,
            indices: faces.into_iter().flatten().collect(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn centroid(&self) -> Vec3 {
        centroid(&self.positions)
    }

    /// Mean distance of the rest positions from their centroid
    pub fn mean_radius(&self) -> f32 {
        mean_radius(&self.positions, self.centroid())
    }
}

fn midpoint(
    positions: &mut Vec<Vec3>,
    cache: &mut HashMap<(u32, u32), u32>,
    a: u32,
    b: u32,
) -> u32 {
    let key = if a < b { (a, b) } else { (b, a) };
    if let Some(&idx) = cache.get(&key) {
        return idx;
    }
    let mid = ((positions[a as usize] + positions[b as usize]) * 0.5).normalized();
    let idx = positions.len() as u32;
    positions.push(mid);
    cache.insert(key, idx);
    idx
}

pub(crate) fn centroid(points: &[Vec3]) -> Vec3 {
    if points.is_empty() {
        return Vec3::ZERO;
    }
    let sum = points.iter().fold(Vec3::ZERO, |acc, p| acc + *p);
    sum / points.len() as f32
}

pub(crate) fn mean_radius(points: &[Vec3], center: Vec3) -> f32 {
    if points.is_empty() {
        return 0.0;
    }
    points.iter().map(|p| p.distance(&center)).sum::<f32>() / points.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icosahedron_base() {
        let geo = ShellGeometry::icosphere(8.0, 0);
        assert_eq!(geo.vertex_count(), 12);
        assert_eq!(geo.indices.len(), 60);
        for p in &geo.positions {
            assert!((p.length() - 8.0).abs() < 1e-4);
        }
    }

    #[test]
    fn subdivision_shares_midpoints() {
        // V = 10 * 4^n + 2
        assert_eq!(ShellGeometry::icosphere(1.0, 1).vertex_count(), 42);
        let geo = ShellGeometry::icosphere(1.0, 2);
        assert_eq!(geo.vertex_count(), 162);
        assert_eq!(geo.indices.len(), 320 * 3);
        assert!(geo.indices.iter().all(|&i| (i as usize) < geo.vertex_count()));
    }

    #[test]
    fn sphere_centroid_and_radius() {
        let geo = ShellGeometry::icosphere(8.0, 2);
        assert!(geo.centroid().length() < 1e-3);
        assert!((geo.mean_radius() - 8.0).abs() < 1e-3);
    }

    #[test]
    fn empty_points_are_harmless() {
        let geo = ShellGeometry::from_points(Vec::new());
        assert_eq!(geo.centroid(), Vec3::ZERO);
        assert_eq!(geo.mean_radius(), 0.0);
    }
}
