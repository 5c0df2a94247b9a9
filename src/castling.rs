// =============================================================================
// Castling eligibility
//
// Nothing about castling is stored on the board. Eligibility is recomputed
// from the current position each time:
//   1. the king stands on its home square: e1 for White, d8 for Black;
//   2. at least one rook of the same color stands on a corner square;
//   3. for each side, the squares between king and rook are empty.
//
// The two colors are not mirror images. Black's king is expected on d8, so its
// h-side clearance spans three squares and its a-side two, the reverse of
// White's. Whether the king is in check, or crosses an attacked square, is not
// considered.
// =============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::error::GameError;
use crate::piece::{Color, Piece, PieceKind};
use crate::square::Square;

/// Direction of a castle, named by the rook it uses: `Kingside` pairs with the
/// rook on the h-file, `Queenside` with the rook on the a-file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CastleSide {
    Kingside,
    Queenside,
}

impl CastleSide {
    fn step(self) -> i8 {
        match self {
            CastleSide::Kingside => 1,
            CastleSide::Queenside => -1,
        }
    }

    fn rook_file(self) -> u8 {
        match self {
            CastleSide::Kingside => 8,
            CastleSide::Queenside => 1,
        }
    }
}

/// Why no castle is available.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CastleBlock {
    KingNotHome,
    NoCornerRook,
    NoClearSide,
}

impl fmt::Display for CastleBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            CastleBlock::KingNotHome => "the king has left its home square",
            CastleBlock::NoCornerRook => "no rook stands on a corner square",
            CastleBlock::NoClearSide => "no side has both a clear path and a rook",
        };
        f.write_str(msg)
    }
}

/// One available castle: the king's destination and the rook that joins it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastleOption {
    pub side: CastleSide,
    pub king: Piece,
    pub rook: Piece,
    pub king_to: Square,
}

const CORNERS: [(i8, i8); 4] = [(1, 1), (1, 8), (8, 1), (8, 8)];

/// (file, rank) the king must stand on to castle.
fn king_home(color: Color) -> (u8, u8) {
    match color {
        Color::White => (5, 1),
        Color::Black => (4, 8),
    }
}

/// File offsets from the king, in the castling direction, that must be empty.
fn clearance(color: Color, side: CastleSide) -> &'static [i8] {
    match (color, side) {
        (Color::White, CastleSide::Kingside) => &[1, 2],
        (Color::White, CastleSide::Queenside) => &[1, 2, 3],
        (Color::Black, CastleSide::Kingside) => &[1, 2, 3],
        (Color::Black, CastleSide::Queenside) => &[1, 2],
    }
}

fn path_clear(board: &Board, king: Square, color: Color, side: CastleSide) -> bool {
    clearance(color, side).iter().all(|&n| match king.offset((side.step(), 0), n) {
        Some(sq) => !board.is_occupied(sq),
        None => false,
    })
}

/// Every castle `color` may make on `board`, kingside first.
///
/// A side's rook is the corner rook on that side's file, preferring the one
/// on the king's rank.
pub fn castle_options(board: &Board, color: Color) -> Result<Vec<CastleOption>, GameError> {
    let king = match board.find_king(color) {
        Some(k) if (k.position.file(), k.position.rank()) == king_home(color) => k,
        _ => return Err(GameError::CannotCastle(CastleBlock::KingNotHome)),
    };

    let rooks: Vec<Piece> = CORNERS
        .iter()
        .filter_map(|&(f, r)| Square::new(f, r))
        .filter_map(|sq| board.get(sq))
        .filter(|p| p.kind == PieceKind::Rook && p.color == color)
        .collect();
    if rooks.is_empty() {
        return Err(GameError::CannotCastle(CastleBlock::NoCornerRook));
    }

    let mut options = Vec::new();
    for side in [CastleSide::Kingside, CastleSide::Queenside] {
        if !path_clear(board, king.position, color, side) {
            continue;
        }
        let rook = rooks
            .iter()
            .filter(|r| r.position.file() == side.rook_file())
            .min_by_key(|r| r.position.rank() != king.position.rank());
        let king_to = king.position.offset((side.step(), 0), 2);
        if let (Some(&rook), Some(king_to)) = (rook, king_to) {
            options.push(CastleOption { side, king, rook, king_to });
        }
    }

    if options.is_empty() {
        return Err(GameError::CannotCastle(CastleBlock::NoClearSide));
    }
    Ok(options)
}
