// =============================================================================
// Move generation
//
// Every piece kind is a table of unit direction vectors plus a range of
// distances. Each (direction, distance) pair is tested on its own by
// `is_reachable`; sliding pieces stop at the first blocker because every
// longer distance in that direction fails the path-clearance test.
//
// The result is pseudo-legal: moves that leave the mover's own king attacked
// are not filtered out.
// =============================================================================

use std::collections::BTreeSet;

use crate::board::Board;
use crate::piece::{Color, Piece, PieceKind};
use crate::square::Square;

pub const ORTHOGONAL: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

pub const DIAGONAL: [(i8, i8); 4] = [(1, 1), (-1, 1), (1, -1), (-1, -1)];

pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-1, 2), (1, 2), (-2, 1), (2, 1),
    (-1, -2), (1, -2), (-2, -1), (2, -1),
];

/// Longest slide on an 8x8 board.
const MAX_DISTANCE: i8 = 7;

/// Rank direction a pawn of `color` advances in.
pub fn pawn_direction(color: Color) -> i8 {
    match color {
        Color::White => 1,
        Color::Black => -1,
    }
}

/// Rank the pawns of `color` start on; a pawn there may advance two squares.
pub fn pawn_home_rank(color: Color) -> u8 {
    match color {
        Color::White => 2,
        Color::Black => 7,
    }
}

/// True if every square strictly between the origin and `distance` steps
/// along `dir` is empty.
fn path_clear(board: &Board, origin: Square, dir: (i8, i8), distance: i8) -> bool {
    (1..distance).all(|i| match origin.offset(dir, i) {
        Some(sq) => !board.is_occupied(sq),
        None => false,
    })
}

/// Can `piece` reach the square `distance` steps along `dir` from where it stands?
///
/// Off-board targets and targets holding a piece of the same color are never
/// reachable. An enemy-occupied target is reachable by a pawn only diagonally,
/// by a slider only over a clear path, and always by a knight or king. An empty
/// target is reachable by a pawn only straight ahead over a clear path, by a
/// slider over a clear path, and always by a knight or king.
pub fn is_reachable(piece: &Piece, board: &Board, dir: (i8, i8), distance: i8) -> bool {
    let origin = piece.position;
    let target = match origin.offset(dir, distance) {
        Some(sq) => sq,
        None => return false,
    };

    match board.get(target) {
        Some(occupant) if occupant.color == piece.color => false,
        Some(_) => match piece.kind {
            PieceKind::Pawn => dir.0 != 0,
            PieceKind::Rook | PieceKind::Bishop | PieceKind::Queen => {
                path_clear(board, origin, dir, distance)
            }
            PieceKind::Knight | PieceKind::King => true,
        },
        None => match piece.kind {
            PieceKind::Pawn => dir.0 == 0 && path_clear(board, origin, dir, distance),
            PieceKind::Rook | PieceKind::Bishop | PieceKind::Queen => {
                path_clear(board, origin, dir, distance)
            }
            PieceKind::Knight | PieceKind::King => true,
        },
    }
}

fn collect(
    piece: &Piece,
    board: &Board,
    dirs: &[(i8, i8)],
    distances: std::ops::RangeInclusive<i8>,
    out: &mut BTreeSet<Square>,
) {
    for &dir in dirs {
        for distance in distances.clone() {
            if is_reachable(piece, board, dir, distance) {
                if let Some(sq) = piece.position.offset(dir, distance) {
                    out.insert(sq);
                }
            }
        }
    }
}

/// Every square `piece` can move to this turn, ignoring self-check.
pub fn reachable_squares(piece: &Piece, board: &Board) -> BTreeSet<Square> {
    let mut out = BTreeSet::new();

    match piece.kind {
        PieceKind::Pawn => {
            let fwd = pawn_direction(piece.color);
            let max = if piece.position.rank() == pawn_home_rank(piece.color) { 2 } else { 1 };
            collect(piece, board, &[(0, fwd)], 1..=max, &mut out);
            collect(piece, board, &[(-1, fwd), (1, fwd)], 1..=1, &mut out);
        }
        PieceKind::Rook => collect(piece, board, &ORTHOGONAL, 1..=MAX_DISTANCE, &mut out),
        PieceKind::Bishop => collect(piece, board, &DIAGONAL, 1..=MAX_DISTANCE, &mut out),
        PieceKind::Queen => {
            collect(piece, board, &ORTHOGONAL, 1..=MAX_DISTANCE, &mut out);
            collect(piece, board, &DIAGONAL, 1..=MAX_DISTANCE, &mut out);
        }
        PieceKind::Knight => collect(piece, board, &KNIGHT_OFFSETS, 1..=1, &mut out),
        PieceKind::King => {
            collect(piece, board, &ORTHOGONAL, 1..=1, &mut out);
            collect(piece, board, &DIAGONAL, 1..=1, &mut out);
        }
    }

    out
}
