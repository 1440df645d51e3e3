//! Aircraft type choice for founding fleets and expansion purchases.

use std::collections::BTreeSet;

use contrail_types::AircraftType;
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::personality::CapacityBand;
use crate::weighted::roll;

/// Chance that a founding-fleet pick after the first reuses a chosen family.
pub const FAMILY_REUSE_PROBABILITY: f64 = 0.78;

/// Chance that an expansion purchase stays within an owned family.
pub const EXPANSION_FAMILY_BIAS: f64 = 0.75;

/// Keep only types no larger than `max_seats`.
pub fn within_capacity(types: &[AircraftType], max_seats: u32) -> Vec<AircraftType> {
    types
        .iter()
        .filter(|t| t.seats <= max_seats)
        .cloned()
        .collect()
}

/// Choose `count` aircraft for a new airline from pre-filtered candidates.
///
/// The first pick is uniform. Later picks reuse an already chosen family
/// with [`FAMILY_REUSE_PROBABILITY`]. Returns fewer than `count` only when
/// `candidates` is empty.
pub fn pick_initial_fleet(
    rng: &mut impl Rng,
    candidates: &[AircraftType],
    count: u32,
) -> Vec<AircraftType> {
    let mut picked: Vec<AircraftType> = Vec::new();
    for _ in 0..count {
        let reuse = !picked.is_empty() && roll(rng, FAMILY_REUSE_PROBABILITY);
        let choice = if reuse {
            let same_family: Vec<&AircraftType> = candidates
                .iter()
                .filter(|c| picked.iter().any(|p| p.family == c.family))
                .collect();
            same_family.choose(rng).copied()
        } else {
            candidates.choose(rng)
        };

        match choice.or_else(|| candidates.choose(rng)) {
            Some(aircraft) => picked.push(aircraft.clone()),
            None => break,
        }
    }
    picked
}

/// Choose one aircraft to buy from pre-filtered, affordable candidates.
///
/// With probability `family_bias` the pool narrows to families the airline
/// already flies. The pool is sorted by capacity and the pick is drawn from
/// the third selected by `band`.
pub fn pick_expansion_type(
    rng: &mut impl Rng,
    candidates: &[AircraftType],
    owned_families: &BTreeSet<String>,
    family_bias: f64,
    band: CapacityBand,
) -> Option<AircraftType> {
    let same_family: Vec<&AircraftType> = candidates
        .iter()
        .filter(|c| owned_families.contains(&c.family))
        .collect();
    let mut pool = if !same_family.is_empty() && roll(rng, family_bias) {
        same_family
    } else {
        candidates.iter().collect()
    };

    pool.sort_by(|a, b| {
        a.seats
            .cmp(&b.seats)
            .then_with(|| a.price.cmp(&b.price))
            .then_with(|| a.name.cmp(&b.name))
    });
    band_slice(&pool, band).choose(rng).map(|t| (*t).clone())
}

/// The lower, middle, or upper third of a sorted slice.
///
/// Thirds overlap on short slices so every band is non-empty whenever the
/// slice is.
fn band_slice<T>(items: &[T], band: CapacityBand) -> &[T] {
    let n = items.len();
    let outer = n.div_ceil(3);
    let inner = n / 3;
    let range = match band {
        CapacityBand::Lower => 0..outer,
        CapacityBand::Middle => inner..n.saturating_sub(inner),
        CapacityBand::Upper => n.saturating_sub(outer)..n,
    };
    items.get(range).unwrap_or(items)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use contrail_types::AircraftTypeId;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rust_decimal::Decimal;

    use super::*;

    fn aircraft(name: &str, family: &str, seats: u32) -> AircraftType {
        AircraftType {
            id: AircraftTypeId::new(),
            name: name.to_owned(),
            family: family.to_owned(),
            seats,
            range_km: 5_000,
            cruise_speed_kmh: 800,
            price: Decimal::from(seats),
            introduced_year: 1950,
            retired_year: None,
        }
    }

    fn six_sizes() -> Vec<AircraftType> {
        vec![
            aircraft("S1", "Small", 50),
            aircraft("S2", "Small", 100),
            aircraft("M1", "Mid", 150),
            aircraft("M2", "Mid", 200),
            aircraft("L1", "Large", 250),
            aircraft("L2", "Large", 300),
        ]
    }

    #[test]
    fn band_slices_cover_thirds() {
        let items = [1, 2, 3, 4, 5, 6];
        assert_eq!(band_slice(&items, CapacityBand::Lower), &[1, 2]);
        assert_eq!(band_slice(&items, CapacityBand::Middle), &[3, 4]);
        assert_eq!(band_slice(&items, CapacityBand::Upper), &[5, 6]);
        assert_eq!(band_slice(&[9], CapacityBand::Middle), &[9]);
        assert_eq!(band_slice(&[1, 2], CapacityBand::Upper), &[2]);
        assert!(band_slice::<u8>(&[], CapacityBand::Lower).is_empty());
    }

    #[test]
    fn expansion_pick_follows_capacity_band() {
        let mut rng = StdRng::seed_from_u64(21);
        let candidates = six_sizes();
        let none = BTreeSet::new();
        for _ in 0..50 {
            let big = pick_expansion_type(&mut rng, &candidates, &none, 0.0, CapacityBand::Upper)
                .unwrap();
            assert!(big.seats >= 250);
            let small = pick_expansion_type(&mut rng, &candidates, &none, 0.0, CapacityBand::Lower)
                .unwrap();
            assert!(small.seats <= 100);
        }
    }

    #[test]
    fn expansion_pick_stays_in_owned_family_when_biased() {
        let mut rng = StdRng::seed_from_u64(22);
        let candidates = six_sizes();
        let owned = BTreeSet::from([String::from("Mid")]);
        for _ in 0..50 {
            let pick =
                pick_expansion_type(&mut rng, &candidates, &owned, 1.0, CapacityBand::Upper)
                    .unwrap();
            assert_eq!(pick.family, "Mid");
        }
        assert!(pick_expansion_type(&mut rng, &[], &owned, 1.0, CapacityBand::Middle).is_none());
    }

    #[test]
    fn initial_fleet_mostly_reuses_families() {
        let mut rng = StdRng::seed_from_u64(23);
        let candidates = six_sizes();
        let mut reused = 0u32;
        let mut picks = 0u32;
        for _ in 0..200 {
            let fleet = pick_initial_fleet(&mut rng, &candidates, 6);
            assert_eq!(fleet.len(), 6);
            for (i, unit) in fleet.iter().enumerate().skip(1) {
                picks = picks.saturating_add(1);
                if fleet.iter().take(i).any(|p| p.family == unit.family) {
                    reused = reused.saturating_add(1);
                }
            }
        }
        let rate = f64::from(reused) / f64::from(picks);
        assert!(rate > 0.78, "reuse rate {rate}");
    }

    #[test]
    fn capacity_filter_drops_large_types() {
        let small = within_capacity(&six_sizes(), 150);
        assert_eq!(small.len(), 3);
        assert!(small.iter().all(|t| t.seats <= 150));
    }
}
