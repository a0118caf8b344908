use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Where new panels come from. `pick` returns an index in `[0, bound)`.
pub trait PanelSource {
    fn pick(&mut self, bound: usize) -> usize;
}

/// Uniform draws from any `rand` generator.
pub struct RandomSource<R> {
    rng: R,
}

impl<R: Rng> RandomSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomSource<StdRng> {
    /// Seeded when a seed is given, otherwise drawn from OS entropy.
    pub fn seeded(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(rng)
    }
}

impl<R: Rng> PanelSource for RandomSource<R> {
    fn pick(&mut self, bound: usize) -> usize {
        self.rng.gen_range(0..bound)
    }
}

/// Replays a fixed list of picks, cycling when it runs out.
#[cfg(test)]
pub(crate) struct ScriptedSource {
    picks: Vec<usize>,
    next: usize,
}

#[cfg(test)]
impl ScriptedSource {
    pub(crate) fn new(picks: &[usize]) -> Self {
        Self {
            picks: picks.to_vec(),
            next: 0,
        }
    }
}

#[cfg(test)]
impl PanelSource for ScriptedSource {
    fn pick(&mut self, bound: usize) -> usize {
        let value = self.picks[self.next % self.picks.len()];
        self.next += 1;
        value % bound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_sources_repeat() {
        let mut a = RandomSource::seeded(Some(42));
        let mut b = RandomSource::seeded(Some(42));
        for _ in 0..100 {
            assert_eq!(a.pick(5), b.pick(5));
        }
    }

    #[test]
    fn test_random_picks_stay_in_bounds() {
        let mut source = RandomSource::seeded(Some(3));
        for bound in 1..10 {
            for _ in 0..50 {
                assert!(source.pick(bound) < bound);
            }
        }
    }

    #[test]
    fn test_scripted_source_cycles() {
        let mut source = ScriptedSource::new(&[0, 4, 2]);
        let picks: Vec<usize> = (0..6).map(|_| source.pick(3)).collect();
        assert_eq!(picks, vec![0, 1, 2, 0, 1, 2]);
    }
}
