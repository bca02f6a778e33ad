use serde::{Deserialize, Serialize};
use std::fmt;

/// Checkers each side starts with; `15 - checkers()` have been borne off.
pub const CHECKERS_PER_SIDE: u8 = 15;

/// One side's checkers, always from that side's own perspective.
/// Slot 0 is the bar, slots 1..=24 are the points. Accessors take slot
/// indices; notation's bar value (25) must be translated before indexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    slots: [u8; 25],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    TooManyCheckers { count: u8 },
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::TooManyCheckers { count } => {
                write!(f, "{count} checkers on one side exceeds {CHECKERS_PER_SIDE}")
            }
        }
    }
}

impl std::error::Error for BoardError {}

impl Board {
    pub const fn empty() -> Self {
        Self { slots: [0; 25] }
    }

    pub fn from_slots(slots: [u8; 25]) -> Result<Self, BoardError> {
        let board = Self { slots };
        board.validate()?;
        Ok(board)
    }

    /// Checker layout both sides have before the first roll.
    pub fn starting() -> Self {
        let mut slots = [0u8; 25];
        slots[6] = 5;
        slots[8] = 3;
        slots[13] = 5;
        slots[24] = 2;
        Self { slots }
    }

    pub fn validate(&self) -> Result<(), BoardError> {
        let count = self.checkers();
        if count > CHECKERS_PER_SIDE {
            return Err(BoardError::TooManyCheckers { count });
        }
        Ok(())
    }

    pub fn bar(&self) -> u8 {
        self.slots[0]
    }

    /// Count on `point`; the bar is point 0.
    pub fn point(&self, point: u8) -> u8 {
        self.slots[point as usize]
    }

    pub fn checkers(&self) -> u8 {
        self.slots.iter().sum()
    }

    pub fn borne_off(&self) -> u8 {
        CHECKERS_PER_SIDE.saturating_sub(self.checkers())
    }

    pub fn add_checker(&mut self, point: u8) {
        self.slots[point as usize] += 1;
    }

    pub fn remove_checker(&mut self, point: u8) {
        let slot = &mut self.slots[point as usize];
        *slot = slot.saturating_sub(1);
    }

    pub fn clear_point(&mut self, point: u8) {
        self.slots[point as usize] = 0;
    }
}

/// Point `p` seen from one side corresponds to `25 - p` seen from the other.
pub const fn mirror_point(point: u8) -> u8 {
    25 - point
}

/// Both boards of a decision snapshot, each from the mover's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub own: Board,
    pub opponent: Board,
}

impl Position {
    pub fn starting() -> Self {
        Self {
            own: Board::starting(),
            opponent: Board::starting(),
        }
    }

    /// The same position seen by the other side.
    pub fn swapped(&self) -> Self {
        Self {
            own: self.opponent,
            opponent: self.own,
        }
    }

    pub fn validate(&self) -> Result<(), BoardError> {
        self.own.validate()?;
        self.opponent.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::{Board, BoardError, Position, mirror_point};

    #[test]
    fn starting_board_has_all_checkers_on() {
        let board = Board::starting();
        assert_eq!(board.checkers(), 15);
        assert_eq!(board.borne_off(), 0);
        assert_eq!(board.point(6), 5);
        assert_eq!(board.point(24), 2);
        assert_eq!(board.bar(), 0);
        assert!(board.validate().is_ok());
    }

    #[test]
    fn overloaded_board_fails_validation() {
        let mut slots = [0u8; 25];
        slots[1] = 16;
        assert_eq!(
            Board::from_slots(slots),
            Err(BoardError::TooManyCheckers { count: 16 })
        );
    }

    #[test]
    fn borne_off_counts_missing_checkers() {
        let mut slots = [0u8; 25];
        slots[1] = 2;
        slots[2] = 3;
        let board = Board::from_slots(slots).unwrap();
        assert_eq!(board.borne_off(), 10);
    }

    #[test]
    fn bar_checkers_live_in_slot_zero() {
        let mut board = Board::starting();
        board.remove_checker(24);
        board.add_checker(0);
        assert_eq!(board.bar(), 1);
        assert_eq!(board.point(24), 1);
        assert_eq!(board.checkers(), 15);
    }

    #[test]
    fn mirror_point_maps_perspectives() {
        assert_eq!(mirror_point(1), 24);
        assert_eq!(mirror_point(24), 1);
        assert_eq!(mirror_point(13), 12);
    }

    #[test]
    fn swapped_position_flips_sides() {
        let mut own = Board::empty();
        own.add_checker(5);
        let position = Position {
            own,
            opponent: Board::starting(),
        };
        let swapped = position.swapped();
        assert_eq!(swapped.opponent.point(5), 1);
        assert_eq!(swapped.own.point(6), 5);
    }
}
