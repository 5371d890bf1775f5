use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

/// Seeded RNG owned by one battle, so a seed fully determines its boards,
/// refills, enemy and enemy damage rolls.
pub struct SessionRng {
    rng: StdRng,
    seed: u64,
}

impl SessionRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn from_random() -> Self {
        let seed: u64 = rand::rng().random();
        Self::new(seed)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn random_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distr::uniform::SampleUniform,
        R: rand::distr::uniform::SampleRange<T>,
    {
        self.rng.random_range(range)
    }

    /// Uniform in `[0, 1)`.
    pub fn random_unit(&mut self) -> f64 {
        self.rng.random()
    }

    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut first = SessionRng::new(7);
        let mut second = SessionRng::new(7);

        let a: Vec<u32> = (0..16).map(|_| first.random_range(0..1000)).collect();
        let b: Vec<u32> = (0..16).map(|_| second.random_range(0..1000)).collect();

        assert_eq!(a, b);
        assert_eq!(first.seed(), 7);
    }

    #[test]
    fn test_choose_empty_slice_returns_none() {
        let mut rng = SessionRng::new(1);
        let empty: [u8; 0] = [];

        assert!(rng.choose(&empty).is_none());
        assert_eq!(rng.choose(&[42]), Some(&42));
    }

    #[test]
    fn test_random_unit_in_range() {
        let mut rng = SessionRng::new(3);
        for _ in 0..1000 {
            let value = rng.random_unit();
            assert!((0.0..1.0).contains(&value));
        }
    }
}
