// =============================================================================
// Check and checkmate
//
// Check: some piece of the attacking color has the enemy king's square among
// its reachable squares. Only the first attacker found (board order) is
// reported, so a double check looks like a single one.
//
// Checkmate is decided by three escape tests, tried in order. Any one that
// succeeds means "not mate":
//   1. capture:  a non-king defender can reach the attacker's square;
//   2. flight:   the king reaches a square no attacking piece reaches;
//   3. block:    (not for knight attacks) a non-king defender can reach the
//                shared file, the shared rank, or the diagonal between the
//                attacker and the king.
// These tests do not play the escape out, so a capture or block that
// exposes the king to another piece still counts. The detector can therefore
// miss a real mate; it never reports a position that has an escape as mate.
// =============================================================================

use std::collections::BTreeSet;

use log::{info, trace};
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::piece::{Color, Piece, PieceKind};
use crate::square::Square;

/// An established check: the attacking piece and the king it reaches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Check {
    pub attacker: Piece,
    pub king: Piece,
}

/// Does any piece of `color` reach the opposing king?
pub fn is_in_check(board: &Board, color: Color) -> Option<Check> {
    let king = board.find_king(color.opposite())?;
    let attacker = board
        .pieces_of(color)
        .find(|p| p.reachable_squares(board).contains(&king.position))?;
    info!("{} king on {} in check from {}", king.color, king.position, attacker);
    Some(Check { attacker, king })
}

/// Union of the reachable squares of every piece of `color`.
pub fn threatened_squares(board: &Board, color: Color) -> BTreeSet<Square> {
    board
        .pieces_of(color)
        .flat_map(|p| p.reachable_squares(board))
        .collect()
}

/// Squares strictly between `from` and `to` along a diagonal. Empty when the
/// two squares do not share a diagonal.
pub fn diagonal_between(from: Square, to: Square) -> Vec<Square> {
    let df = to.file() as i8 - from.file() as i8;
    let dr = to.rank() as i8 - from.rank() as i8;
    if df == 0 || df.abs() != dr.abs() {
        return Vec::new();
    }
    let dir = (df.signum(), dr.signum());
    (1..df.abs()).filter_map(|i| from.offset(dir, i)).collect()
}

/// Is the check described by `check`, delivered by `color`, a checkmate?
///
/// Only meaningful right after `is_in_check(board, color)` returned `check`.
pub fn is_checkmate(board: &Board, color: Color, check: &Check) -> bool {
    let Check { attacker, king } = *check;
    let defenders: Vec<Piece> = board
        .pieces_of(color.opposite())
        .filter(|p| p.kind != PieceKind::King)
        .collect();
    let defender_reach: Vec<BTreeSet<Square>> =
        defenders.iter().map(|p| p.reachable_squares(board)).collect();

    if let Some(i) = defender_reach.iter().position(|r| r.contains(&attacker.position)) {
        trace!("escape: {} captures {}", defenders[i], attacker);
        return false;
    }

    let threatened = threatened_squares(board, color);
    if let Some(flight) = king
        .reachable_squares(board)
        .into_iter()
        .find(|sq| !threatened.contains(sq))
    {
        trace!("escape: king flees to {flight}");
        return false;
    }

    if attacker.kind != PieceKind::Knight {
        let (from, to) = (attacker.position, king.position);
        let diagonal = diagonal_between(from, to);
        let on_line = |sq: &Square| {
            if from.file() == to.file() {
                sq.file() == to.file()
            } else if from.rank() == to.rank() {
                sq.rank() == to.rank()
            } else {
                diagonal.contains(sq)
            }
        };
        if let Some(i) = defender_reach.iter().position(|r| r.iter().any(|sq| on_line(sq))) {
            trace!("escape: {} blocks the line from {}", defenders[i], attacker);
            return false;
        }
    }

    info!("checkmate: {} wins", color);
    true
}
