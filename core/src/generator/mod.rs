use alloc::vec::Vec;
use rand::rngs::SmallRng;

use crate::*;
pub use random::*;

mod random;

/// Source of the value sequence laid out on a fresh board.
pub trait PairingGenerator {
    /// Returns `2 * total_pairs` values where every value appears in pairs.
    fn generate(
        &mut self,
        total_pairs: CellCount,
        available_values: CellCount,
    ) -> Result<Vec<CardValue>>;
}

/// Cycles `0..available_values` to build `total_pairs` pairs, then shuffles them with Fisher-Yates.
///
/// When there are fewer faces than pairs, values are reused, each reuse contributing another full pair.
pub fn generate_pairing(
    total_pairs: CellCount,
    available_values: CellCount,
    rng: &mut SmallRng,
) -> Result<Vec<CardValue>> {
    use rand::prelude::*;

    if total_pairs == 0 {
        return Err(GameError::InvalidArgument("total pairs must be positive"));
    }
    if available_values == 0 {
        return Err(GameError::InvalidArgument("available values must be positive"));
    }
    if available_values < total_pairs {
        log::debug!(
            "Only {} faces for {} pairs, values will be reused",
            available_values,
            total_pairs
        );
    }

    let mut pairing = Vec::with_capacity(usize::from(total_pairs) * 2);
    for i in 0..total_pairs {
        let value = i % available_values;
        pairing.push(value);
        pairing.push(value);
    }

    for i in (1..pairing.len()).rev() {
        let j = rng.random_range(0..=i);
        pairing.swap(i, j);
    }

    Ok(pairing)
}

/// Always lays out the same values, for replays and tests.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedPairing {
    values: Vec<CardValue>,
}

impl FixedPairing {
    pub fn new(values: Vec<CardValue>) -> Self {
        Self { values }
    }
}

impl PairingGenerator for FixedPairing {
    fn generate(
        &mut self,
        total_pairs: CellCount,
        _available_values: CellCount,
    ) -> Result<Vec<CardValue>> {
        if self.values.len() != usize::from(total_pairs) * 2 {
            return Err(GameError::InvalidArgument(
                "fixed pairing does not fit the board",
            ));
        }
        Ok(self.values.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::collections::BTreeMap;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn counts(values: &[CardValue]) -> BTreeMap<CardValue, usize> {
        let mut counts = BTreeMap::new();
        for &value in values {
            *counts.entry(value).or_insert(0) += 1;
        }
        counts
    }

    #[test]
    fn every_value_appears_twice() {
        let mut rng = SmallRng::seed_from_u64(7);
        for (rows, columns) in [(2u16, 2u16), (2, 3), (3, 4), (4, 4), (5, 6), (6, 6)] {
            let total_pairs = rows * columns / 2;
            let pairing = generate_pairing(total_pairs, 32, &mut rng).unwrap();

            assert_eq!(pairing.len(), usize::from(rows * columns));
            assert!(counts(&pairing).values().all(|&count| count == 2));
        }
    }

    #[test]
    fn reused_values_still_come_in_pairs() {
        let mut rng = SmallRng::seed_from_u64(11);
        let pairing = generate_pairing(8, 3, &mut rng).unwrap();

        let counts = counts(&pairing);
        assert_eq!(counts.len(), 3);
        // 8 pairs over 3 faces: 0,1,2,0,1,2,0,1
        assert_eq!(counts.get(&0u16), Some(&6));
        assert_eq!(counts.get(&1u16), Some(&6));
        assert_eq!(counts.get(&2u16), Some(&4));
    }

    #[test]
    fn same_seed_same_layout() {
        let a = generate_pairing(10, 10, &mut SmallRng::seed_from_u64(42)).unwrap();
        let b = generate_pairing(10, 10, &mut SmallRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_empty_parameters() {
        let mut rng = SmallRng::seed_from_u64(0);
        assert!(matches!(
            generate_pairing(0, 4, &mut rng),
            Err(GameError::InvalidArgument(_))
        ));
        assert!(matches!(
            generate_pairing(4, 0, &mut rng),
            Err(GameError::InvalidArgument(_))
        ));
    }

    #[test]
    fn fixed_pairing_checks_length() {
        let mut fixed = FixedPairing::new(alloc::vec![1, 0, 0, 1]);
        assert_eq!(fixed.generate(2, 2).unwrap(), alloc::vec![1, 0, 0, 1]);
        assert!(fixed.generate(3, 2).is_err());
    }
}
