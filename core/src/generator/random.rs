use alloc::vec::Vec;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::*;

/// Purely random pairing, reproducible from its seed. Consecutive boards draw from the same stream.
#[derive(Clone, Debug)]
pub struct RandomPairingGenerator {
    rng: SmallRng,
}

impl RandomPairingGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl PairingGenerator for RandomPairingGenerator {
    fn generate(
        &mut self,
        total_pairs: CellCount,
        available_values: CellCount,
    ) -> Result<Vec<CardValue>> {
        let pairing = generate_pairing(total_pairs, available_values, &mut self.rng)?;
        log::trace!("Generated pairing {:?}", pairing);
        Ok(pairing)
    }
}
