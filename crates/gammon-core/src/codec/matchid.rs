//! Decision identifier: cube state, dice and scores packed into nine bytes
//! and base64'd without padding. Field order and widths follow the oracle's
//! match-id layout; the game-state, turn-owner and resignation fields are
//! constants because the engine only ever asks about live play from its own
//! seat.

use super::CodecError;
use super::bits::{BitReader, BitWriter};
use crate::model::cube::{CubeOwner, MatchInfo};
use crate::model::dice::DiceRoll;
use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD;

const MATCH_ID_BYTES: usize = 9;
const GAME_STATE_PLAYING: u32 = 1;

/// Encodes the decision identifier. Cube-only requests pass
/// [`DiceRoll::unrolled`]; `double_offered` marks a pending double.
pub fn match_id(
    info: &MatchInfo,
    dice: DiceRoll,
    double_offered: bool,
) -> Result<String, CodecError> {
    let cube_log2 = cube_exponent(info.cube_value)?;
    for value in [info.length, info.score_own, info.score_opponent] {
        if value >= 1 << 15 {
            return Err(score_error(info, value));
        }
    }
    for die in [dice.first, dice.second] {
        if die > 6 {
            return Err(CodecError::DieOutOfRange { value: die });
        }
    }

    let mut writer = BitWriter::new();
    writer.push_bits(cube_log2, 4);
    writer.push_bits(info.cube_owner.code() as u32, 2);
    writer.push_bits(double_offered as u32, 1);
    writer.push_bits(info.crawford as u32, 1);
    writer.push_bits(GAME_STATE_PLAYING, 3);
    writer.push_bits(0, 1); // turn owner: always the requesting side
    writer.push_bits(double_offered as u32, 1);
    writer.push_bits(0, 2); // resignation: never offered through this API
    writer.push_bits(dice.first as u32, 3);
    writer.push_bits(dice.second as u32, 3);
    writer.push_bits(info.length as u32, 15);
    writer.push_bits(info.score_own as u32, 15);
    writer.push_bits(info.score_opponent as u32, 15);
    writer.push_bits(!info.jacoby as u32, 1);

    Ok(STANDARD_NO_PAD.encode(writer.into_bytes(MATCH_ID_BYTES)))
}

/// Semantic fields recovered from an encoded identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedMatch {
    pub info: MatchInfo,
    pub dice: DiceRoll,
    pub double_offered: bool,
}

pub fn decode_match(id: &str) -> Result<DecodedMatch, CodecError> {
    let bytes = STANDARD_NO_PAD
        .decode(id)
        .map_err(|err| CodecError::Malformed {
            reason: err.to_string(),
        })?;
    if bytes.len() != MATCH_ID_BYTES {
        return Err(CodecError::Malformed {
            reason: format!("expected {MATCH_ID_BYTES} bytes, got {}", bytes.len()),
        });
    }

    let mut reader = BitReader::new(&bytes);
    let cube_log2 = reader.read_bits(4);
    let owner_code = reader.read_bits(2) as u8;
    let double_offered = reader.read_bits(1) == 1;
    let crawford = reader.read_bits(1) == 1;
    let _game_state = reader.read_bits(3);
    let _turn_owner = reader.read_bits(1);
    let _double_again = reader.read_bits(1);
    let _resignation = reader.read_bits(2);
    let first = reader.read_bits(3) as u8;
    let second = reader.read_bits(3) as u8;
    let length = reader.read_bits(15) as u16;
    let score_own = reader.read_bits(15) as u16;
    let score_opponent = reader.read_bits(15) as u16;
    let jacoby = reader.read_bits(1) == 0;

    let cube_owner = CubeOwner::from_code(owner_code).ok_or(CodecError::Malformed {
        reason: format!("cube owner code {owner_code}"),
    })?;
    let dice = DiceRoll::new(first, second).map_err(|err| CodecError::DieOutOfRange {
        value: err.0,
    })?;

    Ok(DecodedMatch {
        info: MatchInfo {
            length,
            score_own,
            score_opponent,
            cube_value: 1 << cube_log2,
            cube_owner,
            crawford,
            jacoby,
        },
        dice,
        double_offered,
    })
}

fn cube_exponent(cube_value: u16) -> Result<u32, CodecError> {
    if !cube_value.is_power_of_two() {
        return Err(CodecError::BadCubeValue { value: cube_value });
    }
    let exponent = cube_value.trailing_zeros();
    if exponent >= 16 {
        return Err(CodecError::BadCubeValue { value: cube_value });
    }
    Ok(exponent)
}

fn score_error(info: &MatchInfo, value: u16) -> CodecError {
    if value == info.length {
        CodecError::LengthTooLarge { value }
    } else {
        CodecError::ScoreTooLarge { value }
    }
}
