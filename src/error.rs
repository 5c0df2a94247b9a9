use crate::castling::{CastleBlock, CastleOption};
use crate::piece::{Color, Piece, PieceKind};
use crate::square::Square;

/// Everything a turn can be refused for. None of these are fatal: the game is
/// unchanged and the caller may submit another intent.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GameError {
    #[error("no {kind} can move to {target}")]
    NoMatchingPiece { kind: PieceKind, target: Square },

    #[error("{} pieces can move there; name the origin square", candidates.len())]
    Ambiguous { candidates: Vec<Piece> },

    #[error("cannot castle: {0}")]
    CannotCastle(CastleBlock),

    #[error("the king can castle either way; choose a side")]
    AmbiguousCastle { options: Vec<CastleOption> },

    #[error("game is already over: {winner} won")]
    GameOver { winner: Color },

    #[error("invalid square: {0:?}")]
    InvalidSquare(String),

    #[error("no square for the rook beside a king castling to {king_to}")]
    RookOffBoard { king_to: Square },
}
