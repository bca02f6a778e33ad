//! Position identifier: a unary-run encoding of both boards packed into ten
//! bytes and base64'd without padding. The opponent's board is written first;
//! per board the order is points 1..=24 then the bar slot. Each point emits
//! `count` set bits followed by one clear bit, so a full side occupies at
//! most 15 + 25 = 40 bits and both sides fill the 80-bit buffer exactly.

use super::CodecError;
use super::bits::BitWriter;
use crate::model::board::{Board, Position};
use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD;

const POSITION_ID_BYTES: usize = 10;

pub fn position_id(position: &Position) -> Result<String, CodecError> {
    position.validate()?;

    let mut writer = BitWriter::new();
    for board in [&position.opponent, &position.own] {
        encode_board(&mut writer, board);
    }
    let bytes = writer.into_bytes(POSITION_ID_BYTES);
    Ok(STANDARD_NO_PAD.encode(bytes))
}

fn encode_board(writer: &mut BitWriter, board: &Board) {
    for point in 1..=24u8 {
        encode_run(writer, board.point(point));
    }
    encode_run(writer, board.bar());
}

fn encode_run(writer: &mut BitWriter, count: u8) {
    for _ in 0..count {
        writer.push_bit(true);
    }
    writer.push_bit(false);
}

#[cfg(test)]
mod tests {
    use super::position_id;
    use crate::codec::CodecError;
    use crate::model::board::{Board, BoardError, Position};

    #[test]
    fn starting_position_matches_known_identifier() {
        let id = position_id(&Position::starting()).unwrap();
        assert_eq!(id, "4HPwATDgc/ABMA");
    }

    #[test]
    fn identifier_has_no_padding() {
        let id = position_id(&Position::starting()).unwrap();
        assert!(!id.ends_with('='));
        assert_eq!(id.len(), 14);
    }

    #[test]
    fn empty_boards_encode_to_all_zero_runs() {
        let position = Position {
            own: Board::empty(),
            opponent: Board::empty(),
        };
        // 50 clear bits pack into ten zero bytes.
        assert_eq!(position_id(&position).unwrap(), "AAAAAAAAAAAAAA");
    }

    #[test]
    fn overloaded_side_is_rejected() {
        let mut own = Board::starting();
        own.add_checker(1);
        let position = Position {
            own,
            opponent: Board::starting(),
        };
        assert_eq!(
            position_id(&position),
            Err(CodecError::Board(BoardError::TooManyCheckers { count: 16 }))
        );
    }
}
