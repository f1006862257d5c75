use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;

/// Builds a uniformly shuffled deal from a fixed seed, so the same seed and faces always give the
/// same layout.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomDealBuilder {
    seed: u64,
    config: DealConfig,
}

impl RandomDealBuilder {
    pub fn new(seed: u64, config: DealConfig) -> Self {
        Self { seed, config }
    }
}

impl DealBuilder for RandomDealBuilder {
    fn build(self, faces: &[CardFace]) -> Deal {
        let mut rng = StdRng::seed_from_u64(self.seed);
        build_deal(faces, &self.config, &mut rng)
    }
}
