pub mod bits;
pub mod hint;
pub mod matchid;
pub mod position;

use crate::model::board::BoardError;
use std::fmt;

/// A corrupted identifier would make the oracle analyze the wrong position,
/// so out-of-range inputs are rejected instead of clamped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    Board(BoardError),
    ScoreTooLarge { value: u16 },
    LengthTooLarge { value: u16 },
    BadCubeValue { value: u16 },
    DieOutOfRange { value: u8 },
    Malformed { reason: String },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::Board(err) => write!(f, "invalid board: {err}"),
            CodecError::ScoreTooLarge { value } => {
                write!(f, "score {value} does not fit in 15 bits")
            }
            CodecError::LengthTooLarge { value } => {
                write!(f, "match length {value} does not fit in 15 bits")
            }
            CodecError::BadCubeValue { value } => {
                write!(f, "cube value {value} is not a power of two in range")
            }
            CodecError::DieOutOfRange { value } => {
                write!(f, "die value {value} is outside 0..=6")
            }
            CodecError::Malformed { reason } => write!(f, "malformed identifier: {reason}"),
        }
    }
}

impl std::error::Error for CodecError {}

impl From<BoardError> for CodecError {
    fn from(err: BoardError) -> Self {
        CodecError::Board(err)
    }
}
