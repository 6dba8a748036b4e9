//! 7-bag randomizer for piece generation
//!
//! All 7 pieces go into a bag and are drawn out at random one by one; the bag
//! is refilled only once it is empty. This prevents long droughts.

use crate::tetromino::TetrominoType;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// The 7-bag piece randomizer
#[derive(Debug, Clone)]
pub struct Bag {
    /// Shapes not yet drawn from the current bag
    remaining: Vec<TetrominoType>,
    rng: ChaCha8Rng,
}

impl Default for Bag {
    fn default() -> Self {
        Self::new()
    }
}

impl Bag {
    /// Create a bag with a random seed
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    /// Create a bag whose sequence is fully determined by `seed`
    pub fn with_seed(seed: u64) -> Self {
        Self {
            remaining: Vec::with_capacity(7),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Draw the next shape, refilling first if the bag is empty
    pub fn next_shape(&mut self) -> TetrominoType {
        if self.remaining.is_empty() {
            self.remaining.extend(TetrominoType::all());
        }
        let index = self.rng.gen_range(0..self.remaining.len());
        self.remaining.remove(index)
    }

    /// Shapes still in the current bag
    pub fn remaining(&self) -> &[TetrominoType] {
        &self.remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_bag_contains_all_pieces() {
        let mut bag = Bag::with_seed(7);
        for _ in 0..20 {
            let pieces: HashSet<_> = (0..7).map(|_| bag.next_shape()).collect();
            assert_eq!(pieces.len(), 7);
            assert!(bag.remaining().is_empty());
        }
    }

    #[test]
    fn test_no_shape_more_than_twice_in_any_window() {
        let mut bag = Bag::with_seed(42);
        let draws: Vec<_> = (0..700).map(|_| bag.next_shape()).collect();
        for window in draws.windows(7) {
            for shape in TetrominoType::all() {
                assert!(window.iter().filter(|&&s| s == shape).count() <= 2);
            }
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = Bag::with_seed(99);
        let mut b = Bag::with_seed(99);
        for _ in 0..50 {
            assert_eq!(a.next_shape(), b.next_shape());
        }
    }

    #[test]
    fn test_remaining_shrinks() {
        let mut bag = Bag::with_seed(1);
        let first = bag.next_shape();
        assert_eq!(bag.remaining().len(), 6);
        assert!(!bag.remaining().contains(&first));
    }
}
