use std::collections::BTreeMap;
use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::piece::{Color, Piece, PieceKind};
use crate::square::Square;

/// Back rank order, files a through h, shared by both colors.
const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Which glyph set `render_board` draws pieces with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Glyphs {
    /// `KQRBNP` for White, `kqrbnp` for Black.
    #[default]
    Ascii,
    Figurine,
}

/// Sparse square -> piece map. Every stored piece's `position` equals its key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Piece>", into = "Vec<Piece>")]
pub struct Board {
    squares: BTreeMap<Square, Piece>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create an empty board with no pieces. Useful for setting up test positions.
    pub fn empty() -> Self {
        Board { squares: BTreeMap::new() }
    }

    /// The standard starting position.
    pub fn new() -> Self {
        let mut board = Board::empty();
        for file in 1..=8i8 {
            let kind = BACK_RANK[(file - 1) as usize];
            board.place_at(kind, Color::White, file, 1);
            board.place_at(PieceKind::Pawn, Color::White, file, 2);
            board.place_at(PieceKind::Pawn, Color::Black, file, 7);
            board.place_at(kind, Color::Black, file, 8);
        }
        board
    }

    fn place_at(&mut self, kind: PieceKind, color: Color, file: i8, rank: i8) {
        if let Some(sq) = Square::new(file, rank) {
            self.place(kind, color, sq);
        }
    }

    /// Put a new piece on `square`, returning whatever stood there before.
    pub fn place(&mut self, kind: PieceKind, color: Color, square: Square) -> Option<Piece> {
        self.squares.insert(square, Piece::new(kind, color, square))
    }

    pub fn remove(&mut self, square: Square) -> Option<Piece> {
        self.squares.remove(&square)
    }

    pub fn get(&self, square: Square) -> Option<Piece> {
        self.squares.get(&square).copied()
    }

    pub fn is_occupied(&self, square: Square) -> bool {
        self.squares.contains_key(&square)
    }

    pub fn len(&self) -> usize {
        self.squares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.squares.is_empty()
    }

    /// All pieces, ordered by square (file, then rank).
    pub fn pieces(&self) -> impl Iterator<Item = Piece> + '_ {
        self.squares.values().copied()
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = Piece> + '_ {
        self.pieces().filter(move |p| p.color == color)
    }

    /// Key/value pairs as stored, for invariant checks.
    pub fn entries(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.squares.iter().map(|(sq, p)| (*sq, *p))
    }

    pub fn find_king(&self, color: Color) -> Option<Piece> {
        self.pieces_of(color).find(|p| p.kind == PieceKind::King)
    }

    /// Move `piece` to `destination` without any legality check.
    ///
    /// The entry at the piece's current square is removed and a fresh piece of
    /// the same kind and color is written at `destination`, overwriting (and so
    /// capturing) anything there. Returns the captured piece.
    pub fn apply_move(&mut self, piece: &Piece, destination: Square) -> Option<Piece> {
        self.squares.remove(&piece.position);
        let captured = self.place(piece.kind, piece.color, destination);
        debug!("{piece} -> {destination}");
        captured
    }

    /// Castle `king` to `king_to` and bring `rook` to the square next to it.
    ///
    /// The rook lands one file inside the king's destination: file - 1 when it
    /// started on file 8, file + 1 otherwise. Both squares are computed before
    /// anything is written, so either both pieces move or the board is untouched.
    pub fn apply_castle(&mut self, king: &Piece, king_to: Square, rook: &Piece) -> Result<(), GameError> {
        let step = if rook.position.file() == 8 { -1 } else { 1 };
        let rook_to = king_to.offset((step, 0), 1).ok_or(GameError::RookOffBoard { king_to })?;

        self.squares.remove(&king.position);
        self.squares.remove(&rook.position);
        self.place(king.kind, king.color, king_to);
        self.place(rook.kind, rook.color, rook_to);
        debug!(
            "{} castles: king {} -> {}, rook {} -> {}",
            king.color, king.position, king_to, rook.position, rook_to
        );
        Ok(())
    }

    /// Text grid with files a-h along the top and bottom and ranks 8 to 1
    /// down both sides. Empty squares are `.`.
    pub fn render_board(&self, glyphs: Glyphs) -> String {
        let mut out = String::from("   a b c d e f g h\n");
        for rank in (1..=8i8).rev() {
            out.push_str(&format!("{rank}  "));
            for file in 1..=8i8 {
                let glyph = Square::new(file, rank)
                    .and_then(|sq| self.get(sq))
                    .map(|p| match glyphs {
                        Glyphs::Ascii => p.glyph(),
                        Glyphs::Figurine => p.figurine(),
                    })
                    .unwrap_or('.');
                out.push(glyph);
                out.push(' ');
            }
            out.push_str(&format!(" {rank}\n"));
        }
        out.push_str("   a b c d e f g h\n");
        out
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_board(Glyphs::Ascii))
    }
}

impl From<Vec<Piece>> for Board {
    fn from(pieces: Vec<Piece>) -> Self {
        let mut board = Board::empty();
        for p in pieces {
            board.place(p.kind, p.color, p.position);
        }
        board
    }
}

impl From<Board> for Vec<Piece> {
    fn from(board: Board) -> Self {
        board.squares.into_values().collect()
    }
}
