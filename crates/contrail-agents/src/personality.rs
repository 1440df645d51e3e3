//! Per-personality adjustments applied by the decision cycle.
//!
//! Personality is a closed variant. Each step that cares about it asks for
//! its adjustment through [`PersonalityBias`] instead of branching on the
//! variant inline.

use contrail_types::Personality;
use rand::Rng;

use crate::weighted::weighted_pick;

/// Which third of the capacity-sorted candidate list an airline buys from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityBand {
    /// Smallest third.
    Lower,
    /// Middle third.
    Middle,
    /// Largest third.
    Upper,
}

/// Behavioural adjustments for one personality.
pub trait PersonalityBias {
    /// Multiplier applied to recomputed fares.
    fn fare_skew(self) -> f64;

    /// Multiplier applied to the expansion probability.
    fn expansion_appetite(self) -> f64;

    /// Preferred aircraft size when buying.
    fn capacity_band(self) -> CapacityBand;
}

impl PersonalityBias for Personality {
    fn fare_skew(self) -> f64 {
        match self {
            Self::Conservative => 1.05,
            Self::Balanced => 1.0,
            Self::Aggressive => 0.92,
        }
    }

    fn expansion_appetite(self) -> f64 {
        match self {
            Self::Conservative => 0.7,
            Self::Balanced => 1.0,
            Self::Aggressive => 1.4,
        }
    }

    fn capacity_band(self) -> CapacityBand {
        match self {
            Self::Conservative => CapacityBand::Lower,
            Self::Balanced => CapacityBand::Middle,
            Self::Aggressive => CapacityBand::Upper,
        }
    }
}

/// Draw a personality from difficulty weights, defaulting to balanced.
pub fn draw_personality(rng: &mut impl Rng, weights: &[(Personality, u32)]) -> Personality {
    weighted_pick(rng, weights)
        .copied()
        .unwrap_or(Personality::Balanced)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn aggressive_undercuts_and_buys_big() {
        assert!(Personality::Aggressive.fare_skew() < Personality::Balanced.fare_skew());
        assert!(Personality::Conservative.fare_skew() > Personality::Balanced.fare_skew());
        assert!(
            Personality::Aggressive.expansion_appetite()
                > Personality::Conservative.expansion_appetite()
        );
        assert_eq!(Personality::Aggressive.capacity_band(), CapacityBand::Upper);
        assert_eq!(Personality::Conservative.capacity_band(), CapacityBand::Lower);
    }

    #[test]
    fn draw_respects_zero_weights() {
        let mut rng = StdRng::seed_from_u64(4);
        let weights = [
            (Personality::Conservative, 0),
            (Personality::Balanced, 0),
            (Personality::Aggressive, 1),
        ];
        for _ in 0..50 {
            assert_eq!(draw_personality(&mut rng, &weights), Personality::Aggressive);
        }
        assert_eq!(draw_personality(&mut rng, &[]), Personality::Balanced);
    }
}
