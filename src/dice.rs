//! Seeded dice.
//!
//! Each game owns one `Dice`; it is also the game's only source of shuffles,
//! so a seed reproduces the deck order, seating order and every roll.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Outcome of one roll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roll {
    /// Face values, one per die.
    pub dice: Vec<u8>,
    /// Sum of the face values.
    pub sum: u32,
    /// All dice show the same value.
    pub is_double: bool,
}

impl Roll {
    /// Build a roll from face values.
    #[must_use]
    pub fn new(dice: Vec<u8>) -> Self {
        let sum = dice.iter().map(|&d| u32::from(d)).sum();
        let is_double = dice.windows(2).all(|pair| pair[0] == pair[1]);
        Self { dice, sum, is_double }
    }
}

/// Deterministic dice and shuffler for one game.
#[derive(Debug, Clone)]
pub struct Dice {
    rng: ChaCha8Rng,
    count: u8,
    sides: u8,
}

impl Dice {
    /// Create dice seeded for one game.
    ///
    /// Callers validate the shape; `count` and `sides` must both be non-zero.
    #[must_use]
    pub fn new(seed: u64, count: u8, sides: u8) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            count,
            sides,
        }
    }

    /// Roll every die once.
    pub fn roll(&mut self) -> Roll {
        let dice = (0..self.count).map(|_| self.rng.gen_range(1..=self.sides)).collect();
        Roll::new(dice)
    }

    /// Shuffle a slice in place with this game's stream.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}
