//! Deterministic RNG plumbing and the small "applicator" combinators the
//! generators draw from. An applicator is a pure function of `(generator,
//! distribution)` — it carries its own configuration but no hidden state.

use rand::distr::uniform::{SampleRange, SampleUniform};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// The engine's pseudo-random source. A `ChaCha8Rng` stands in for the
/// spec's Mersenne-Twister-equivalent engine — a modern, reproducible
/// counter-based generator seeded once per run and logged, never reseeded
/// mid-game.
pub struct Generator {
    seed: u64,
    rng: ChaCha8Rng,
}

impl Generator {
    /// Seeds from a caller-supplied value (used for `--seed` and tests).
    pub fn from_seed(seed: u64) -> Generator {
        Generator {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Seeds from the OS entropy source; the seed is recovered so the
    /// caller can log it per spec (`seed is logged`).
    pub fn from_entropy() -> Generator {
        let seed = rand::rng().random::<u64>();
        Generator::from_seed(seed)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn inner(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }
}

impl RngCore for Generator {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        self.rng.fill_bytes(dst);
    }
}

/// Draws one of two values by a Bernoulli coin flip.
#[derive(Clone, Copy, Debug)]
pub struct BinaryApplicator<T> {
    pub true_value: T,
    pub false_value: T,
}

impl<T: Clone> BinaryApplicator<T> {
    pub fn new(true_value: T, false_value: T) -> BinaryApplicator<T> {
        BinaryApplicator { true_value, false_value }
    }

    /// Draws `true_value` with probability `p`, else `false_value`.
    pub fn draw(&self, rng: &mut impl RngCore, p: f64) -> T {
        if rng.random_bool(p.clamp(0.0, 1.0)) {
            self.true_value.clone()
        } else {
            self.false_value.clone()
        }
    }
}

/// Draws one of three values according to a supplied `{<, =, >}`
/// three-way split, e.g. comparing a rolled value against a threshold.
#[derive(Clone, Copy, Debug)]
pub struct TernaryApplicator<T> {
    pub less: T,
    pub equal: T,
    pub greater: T,
}

impl<T: Clone> TernaryApplicator<T> {
    pub fn new(less: T, equal: T, greater: T) -> TernaryApplicator<T> {
        TernaryApplicator { less, equal, greater }
    }

    /// Draws a uniform value in `0..bound` and compares it against
    /// `pivot`, selecting `less`/`equal`/`greater` accordingly.
    pub fn draw(&self, rng: &mut impl RngCore, bound: u32, pivot: u32) -> T {
        let roll = rng.random_range(0..bound.max(1));
        match roll.cmp(&pivot) {
            std::cmp::Ordering::Less => self.less.clone(),
            std::cmp::Ordering::Equal => self.equal.clone(),
            std::cmp::Ordering::Greater => self.greater.clone(),
        }
    }
}

/// Draws uniformly from a numeric range.
#[derive(Clone, Debug)]
pub struct NumericApplicator<T> {
    pub range: std::ops::Range<T>,
}

impl<T: SampleUniform + PartialOrd + Clone> NumericApplicator<T>
where
    std::ops::Range<T>: SampleRange<T>,
{
    pub fn new(range: std::ops::Range<T>) -> NumericApplicator<T> {
        NumericApplicator { range }
    }

    pub fn draw(&self, rng: &mut impl RngCore) -> T {
        rng.random_range(self.range.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_generators_agree() {
        let mut a = Generator::from_seed(7);
        let mut b = Generator::from_seed(7);
        for _ in 0..16 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn binary_applicator_is_pure_given_fixed_draws() {
        let applicator = BinaryApplicator::new("closed", "open");
        let mut rng = Generator::from_seed(1);
        let a = applicator.draw(&mut rng, 1.0);
        assert_eq!(a, "closed");
        let b = applicator.draw(&mut rng, 0.0);
        assert_eq!(b, "open");
    }

    #[test]
    fn ternary_applicator_picks_the_matching_branch() {
        let applicator = TernaryApplicator::new("less", "equal", "greater");
        let mut rng = Generator::from_seed(3);
        // bound 1 forces roll == 0, compared against pivot 0 -> equal.
        assert_eq!(applicator.draw(&mut rng, 1, 0), "equal");
    }

    #[test]
    fn numeric_applicator_stays_within_its_range() {
        let applicator = NumericApplicator::new(10..20);
        let mut rng = Generator::from_seed(5);
        for _ in 0..50 {
            let v = applicator.draw(&mut rng);
            assert!((10..20).contains(&v));
        }
    }
}
