use serde::{Deserialize, Serialize};
use std::fmt;

/// One roll of the pair. `(0, 0)` means no dice have been established
/// for the turn yet (cube-only decision requests use this).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiceRoll {
    pub first: u8,
    pub second: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DieOutOfRange(pub u8);

impl fmt::Display for DieOutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "die value {} is outside 0..=6", self.0)
    }
}

impl std::error::Error for DieOutOfRange {}

impl DiceRoll {
    pub fn new(first: u8, second: u8) -> Result<Self, DieOutOfRange> {
        for die in [first, second] {
            if die > 6 {
                return Err(DieOutOfRange(die));
            }
        }
        Ok(Self { first, second })
    }

    pub const fn unrolled() -> Self {
        Self { first: 0, second: 0 }
    }

    pub const fn is_rolled(&self) -> bool {
        self.first >= 1 && self.second >= 1
    }

    pub const fn is_double(&self) -> bool {
        self.is_rolled() && self.first == self.second
    }

    /// Usable move values, highest first. Doubles grant four moves.
    pub fn pool(&self) -> Vec<u8> {
        if !self.is_rolled() {
            return Vec::new();
        }
        let mut pool = if self.is_double() {
            vec![self.first; 4]
        } else {
            vec![self.first, self.second]
        };
        pool.sort_unstable_by(|a, b| b.cmp(a));
        pool
    }
}

#[cfg(test)]
mod tests {
    use super::{DiceRoll, DieOutOfRange};

    #[test]
    fn plain_roll_gives_two_moves() {
        let roll = DiceRoll::new(5, 6).unwrap();
        assert!(roll.is_rolled());
        assert!(!roll.is_double());
        assert_eq!(roll.pool(), vec![6, 5]);
    }

    #[test]
    fn doubles_give_four_moves() {
        let roll = DiceRoll::new(4, 4).unwrap();
        assert!(roll.is_double());
        assert_eq!(roll.pool(), vec![4, 4, 4, 4]);
    }

    #[test]
    fn unrolled_dice_have_no_pool() {
        let roll = DiceRoll::unrolled();
        assert!(!roll.is_rolled());
        assert!(roll.pool().is_empty());
    }

    #[test]
    fn out_of_range_die_is_rejected() {
        assert_eq!(DiceRoll::new(7, 1), Err(DieOutOfRange(7)));
    }
}
