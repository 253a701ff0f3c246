//! Deterministic random number generation for dice, shuffles, and
//! landmark assignment.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical sequence
//! - **Serializable**: O(1) state capture and restore, so a snapshot
//!   replays the same dice after it is restored
//! - **Pluggable dice**: the engine draws dice through [`DiceSource`], so a
//!   physical table or a test can supply the faces
//!
//! ```
//! use dice_tower::core::{DiceSource, GameRng};
//!
//! let mut rng = GameRng::new(42);
//! let face = rng.roll_die();
//! assert!((1..=6).contains(&face));
//! ```

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Number of faces on a die.
pub const DIE_FACES: u8 = 6;

/// Anything that can produce die faces in `1..=6`.
///
/// The engine validates every face it receives; a source that yields an
/// out-of-range value gets its roll rejected.
pub trait DiceSource {
    /// Roll a single die.
    fn roll_die(&mut self) -> u8;
}

/// Deterministic RNG for a single match.
///
/// Uses ChaCha8 for speed while keeping a reproducible, seekable stream.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(into = "GameRngState", from = "GameRngState")]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// The seed this stream was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Shuffle a slice in place (uniform permutation).
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

impl DiceSource for GameRng {
    fn roll_die(&mut self) -> u8 {
        self.inner.gen_range(1..=DIE_FACES)
    }
}

/// Pre-determined dice, consumed front to back.
///
/// Useful for replaying a recorded match or for a table that rolls real
/// dice. Yields `0` (an invalid face) once exhausted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadedDice {
    faces: VecDeque<u8>,
}

impl LoadedDice {
    /// Create a source that yields `faces` in order.
    pub fn new(faces: impl IntoIterator<Item = u8>) -> Self {
        Self {
            faces: faces.into_iter().collect(),
        }
    }

    /// Faces not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.faces.len()
    }
}

impl DiceSource for LoadedDice {
    fn roll_die(&mut self) -> u8 {
        self.faces.pop_front().unwrap_or(0)
    }
}

/// Serializable RNG state for snapshots.
///
/// Uses ChaCha8 word position for O(1) serialization regardless of
/// how many random numbers have been generated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
}

impl From<GameRng> for GameRngState {
    fn from(rng: GameRng) -> Self {
        rng.state()
    }
}

impl From<GameRngState> for GameRng {
    fn from(state: GameRngState) -> Self {
        GameRng::from_state(&state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.roll_die(), rng2.roll_die());
        }
    }

    #[test]
    fn test_different_seeds() {
        let mut rng1 = GameRng::new(1);
        let mut rng2 = GameRng::new(2);

        let seq1: Vec<_> = (0..20).map(|_| rng1.roll_die()).collect();
        let seq2: Vec<_> = (0..20).map(|_| rng2.roll_die()).collect();

        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_die_faces_in_range() {
        let mut rng = GameRng::new(7);
        let mut seen = [false; 6];

        for _ in 0..600 {
            let face = rng.roll_die();
            assert!((1..=6).contains(&face));
            seen[usize::from(face - 1)] = true;
        }

        assert!(seen.iter().all(|&s| s), "every face should appear in 600 rolls");
    }

    #[test]
    fn test_shuffle() {
        let mut rng = GameRng::new(42);
        let mut data = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
        let original = data.clone();

        rng.shuffle(&mut data);

        assert_eq!(data.len(), original.len());
        assert_ne!(data, original);

        data.sort();
        assert_eq!(data, original);
    }

    #[test]
    fn test_state_roundtrip() {
        let mut rng = GameRng::new(42);
        for _ in 0..100 {
            rng.roll_die();
        }

        let state = rng.state();
        let expected: Vec<_> = (0..10).map(|_| rng.roll_die()).collect();

        let mut restored = GameRng::from_state(&state);
        let actual: Vec<_> = (0..10).map(|_| restored.roll_die()).collect();

        assert_eq!(expected, actual);
    }

    #[test]
    fn test_rng_serde_preserves_position() {
        let mut rng = GameRng::new(9);
        rng.roll_die();
        rng.roll_die();

        let json = serde_json::to_string(&rng).unwrap();
        let mut restored: GameRng = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.seed(), 9);
        assert_eq!(rng.roll_die(), restored.roll_die());
    }

    #[test]
    fn test_loaded_dice() {
        let mut dice = LoadedDice::new([3, 4]);
        assert_eq!(dice.remaining(), 2);
        assert_eq!(dice.roll_die(), 3);
        assert_eq!(dice.roll_die(), 4);
        assert_eq!(dice.roll_die(), 0);
    }
}
