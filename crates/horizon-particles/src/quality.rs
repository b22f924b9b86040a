//! Quality tiers and their pool size fractions

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    #[default]
    High,
    Medium,
    Low,
}

impl QualityTier {
    /// Map a collaborator-supplied tier index; out-of-range values are clamped.
    pub fn from_index(index: i32) -> Self {
        match index.clamp(0, 2) {
            0 => QualityTier::High,
            1 => QualityTier::Medium,
            _ => QualityTier::Low,
        }
    }

    pub fn index(self) -> i32 {
        match self {
            QualityTier::High => 0,
            QualityTier::Medium => 1,
            QualityTier::Low => 2,
        }
    }

    /// Fraction of the base capacity allocated at this tier
    pub fn fraction(self) -> f32 {
        match self {
            QualityTier::High => 1.0,
            QualityTier::Medium => 0.7,
            QualityTier::Low => 0.4,
        }
    }

    pub fn capacity(self, base: usize) -> usize {
        (base as f32 * self.fraction()).round() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_index_clamps() {
        assert_eq!(QualityTier::from_index(-3), QualityTier::High);
        assert_eq!(QualityTier::from_index(1), QualityTier::Medium);
        assert_eq!(QualityTier::from_index(9), QualityTier::Low);
    }

    #[test]
    fn capacity_fractions() {
        assert_eq!(QualityTier::High.capacity(2000), 2000);
        assert_eq!(QualityTier::Medium.capacity(2000), 1400);
        assert_eq!(QualityTier::Low.capacity(2000), 800);
        assert_eq!(QualityTier::Low.capacity(0), 0);
    }
}
