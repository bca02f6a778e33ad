use serde::{Deserialize, Serialize};

/// Which side currently owns the doubling cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CubeOwner {
    Own,
    Opponent,
    Centered,
}

impl CubeOwner {
    /// Wire code used by the decision identifier: 0 own, 1 opponent, 3 centered.
    pub const fn code(self) -> u8 {
        match self {
            CubeOwner::Own => 0,
            CubeOwner::Opponent => 1,
            CubeOwner::Centered => 3,
        }
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(CubeOwner::Own),
            1 => Some(CubeOwner::Opponent),
            3 => Some(CubeOwner::Centered),
            _ => None,
        }
    }

    pub const fn inverted(self) -> Self {
        match self {
            CubeOwner::Own => CubeOwner::Opponent,
            CubeOwner::Opponent => CubeOwner::Own,
            CubeOwner::Centered => CubeOwner::Centered,
        }
    }
}

/// Match-level context of a decision. `length == 0` is a money game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchInfo {
    pub length: u16,
    pub score_own: u16,
    pub score_opponent: u16,
    pub cube_value: u16,
    pub cube_owner: CubeOwner,
    pub crawford: bool,
    pub jacoby: bool,
}

impl MatchInfo {
    pub const fn money_game() -> Self {
        Self {
            length: 0,
            score_own: 0,
            score_opponent: 0,
            cube_value: 1,
            cube_owner: CubeOwner::Centered,
            crawford: false,
            jacoby: true,
        }
    }

    /// The same match seen from the other side: scores swapped, cube
    /// ownership inverted. Used when an incoming double flips perspective.
    pub const fn swapped(&self) -> Self {
        Self {
            length: self.length,
            score_own: self.score_opponent,
            score_opponent: self.score_own,
            cube_value: self.cube_value,
            cube_owner: self.cube_owner.inverted(),
            crawford: self.crawford,
            jacoby: self.jacoby,
        }
    }
}
