use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::VecDeque;
use std::fmt;

/// Source of every random decision the engine makes: shuffles and tower dice.
pub trait RandomSource: fmt::Debug {
    /// Uniform integer in `0..bound`. `bound` is never zero.
    fn below(&mut self, bound: u32) -> u32;

    fn roll_d6(&mut self) -> u8 {
        self.below(6) as u8 + 1
    }
}

#[derive(Debug, Clone)]
pub struct RngState {
    seed: Option<u64>,
    rng: StdRng,
}

impl RngState {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            seed: None,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

impl RandomSource for RngState {
    fn below(&mut self, bound: u32) -> u32 {
        self.rng.gen_range(0..bound)
    }
}

/// Replays a fixed list of d6 faces, then falls back to a seeded generator.
/// Used to pin tower outcomes in tests and replays.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    faces: VecDeque<u8>,
    fallback: RngState,
}

impl ScriptedRandom {
    pub fn new(faces: impl IntoIterator<Item = u8>) -> Self {
        Self {
            faces: faces.into_iter().collect(),
            fallback: RngState::from_seed(0),
        }
    }

    pub fn push_faces(&mut self, faces: impl IntoIterator<Item = u8>) {
        self.faces.extend(faces);
    }

    pub fn remaining(&self) -> usize {
        self.faces.len()
    }
}

impl RandomSource for ScriptedRandom {
    fn below(&mut self, bound: u32) -> u32 {
        self.fallback.below(bound)
    }

    fn roll_d6(&mut self) -> u8 {
        match self.faces.pop_front() {
            Some(face) => face.clamp(1, 6),
            None => self.fallback.roll_d6(),
        }
    }
}

/// In-place Fisher-Yates: walk from the last index down, swapping each slot
/// with a uniformly chosen index in `0..=i`.
pub fn shuffle<T>(items: &mut [T], rng: &mut dyn RandomSource) {
    for i in (1..items.len()).rev() {
        let j = rng.below(i as u32 + 1) as usize;
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_shuffles_repeat() {
        let mut a: Vec<u32> = (0..52).collect();
        let mut b = a.clone();
        shuffle(&mut a, &mut RngState::from_seed(9));
        shuffle(&mut b, &mut RngState::from_seed(9));
        assert_eq!(a, b);
        let mut sorted = a.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..52).collect::<Vec<_>>());
    }

    #[test]
    fn scripted_faces_come_first() {
        let mut rng = ScriptedRandom::new([6, 1, 9]);
        assert_eq!(rng.roll_d6(), 6);
        assert_eq!(rng.roll_d6(), 1);
        assert_eq!(rng.roll_d6(), 6);
        assert_eq!(rng.remaining(), 0);
        let face = rng.roll_d6();
        assert!((1..=6).contains(&face));
    }
}
