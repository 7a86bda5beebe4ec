use rand::prelude::*;

use crate::engine::{Direction, Grid};

use super::Policy;

/// Picks one of the four directions uniformly, ignoring the grid.
pub struct UniformRandom {
    rng: StdRng,
}

impl UniformRandom {
    pub fn new() -> Self { Self { rng: StdRng::from_entropy() } }

    pub fn with_seed(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }
}

impl Default for UniformRandom {
    fn default() -> Self { Self::new() }
}

impl Policy for UniformRandom {
    fn decide(&mut self, _grid: Grid) -> Option<Direction> {
        Direction::ALL.choose(&mut self.rng).copied()
    }

    fn name(&self) -> &'static str { "random" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covers_every_direction() {
        let mut policy = UniformRandom::with_seed(42);
        let mut seen = [0u32; 4];
        for _ in 0..400 {
            let dir = policy.decide(Grid::EMPTY).unwrap();
            seen[dir.index() as usize] += 1;
        }
        assert!(seen.iter().all(|&n| n > 50), "skewed counts: {seen:?}");
    }

    #[test]
    fn seeded_policies_agree() {
        let mut a = UniformRandom::with_seed(5);
        let mut b = UniformRandom::with_seed(5);
        for _ in 0..32 {
            assert_eq!(a.decide(Grid::EMPTY), b.decide(Grid::EMPTY));
        }
    }
}
