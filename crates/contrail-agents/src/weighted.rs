//! Probability rolls and weighted categorical draws.

use contrail_types::{ServiceChoices, ServiceTier};
use rand::Rng;

/// Fixed service tier weights: basic 30, standard 50, premium 20.
pub const SERVICE_TIER_WEIGHTS: [(ServiceTier, u32); 3] = [
    (ServiceTier::Basic, 30),
    (ServiceTier::Standard, 50),
    (ServiceTier::Premium, 20),
];

/// Bernoulli roll that tolerates out-of-range or NaN probabilities.
pub fn roll(rng: &mut impl Rng, probability: f64) -> bool {
    if probability.is_nan() || probability <= 0.0 {
        false
    } else if probability >= 1.0 {
        true
    } else {
        rng.random_bool(probability)
    }
}

/// Draw one option with probability proportional to its weight.
///
/// Returns `None` when the options are empty or every weight is zero.
pub fn weighted_pick<'a, T>(rng: &mut impl Rng, options: &'a [(T, u32)]) -> Option<&'a T> {
    let total = options
        .iter()
        .fold(0u64, |acc, (_, w)| acc.saturating_add(u64::from(*w)));
    if total == 0 {
        return None;
    }

    let target = rng.random_range(0..total);
    let mut cumulative = 0u64;
    for (option, weight) in options {
        cumulative = cumulative.saturating_add(u64::from(*weight));
        if target < cumulative {
            return Some(option);
        }
    }
    None
}

/// Draw catering, seating, and cabin crew tiers independently.
pub fn draw_service(rng: &mut impl Rng) -> ServiceChoices {
    let mut tier = || {
        weighted_pick(rng, &SERVICE_TIER_WEIGHTS)
            .copied()
            .unwrap_or(ServiceTier::Standard)
    };
    ServiceChoices {
        catering: tier(),
        seating: tier(),
        cabin_crew: tier(),
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn zero_weights_are_never_drawn() {
        let mut rng = StdRng::seed_from_u64(1);
        let options = [("never", 0), ("always", 5)];
        for _ in 0..100 {
            assert_eq!(weighted_pick(&mut rng, &options), Some(&"always"));
        }
        assert_eq!(weighted_pick::<&str>(&mut rng, &[("x", 0)]), None);
        assert_eq!(weighted_pick::<&str>(&mut rng, &[]), None);
    }

    #[test]
    fn draws_follow_weights() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut standard = 0u32;
        for _ in 0..10_000 {
            if draw_service(&mut rng).seating == ServiceTier::Standard {
                standard = standard.saturating_add(1);
            }
        }
        assert!((4_500..5_500).contains(&standard), "standard drawn {standard} times");
    }

    #[test]
    fn roll_clamps_degenerate_probabilities() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!(!roll(&mut rng, f64::NAN));
        assert!(!roll(&mut rng, -0.5));
        assert!(roll(&mut rng, 1.5));
    }
}
