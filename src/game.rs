// =============================================================================
// Game orchestration
//
// A `Game` owns two players and one board and advances through an explicit
// turn state machine:
//
//   AwaitingIntent --play(intent)--> Applying --> CheckEvaluation
//        ^                                              |
//        +------------------ no mate -------------------+
//                                                       |
//   Terminal { winner } <-------- checkmate ------------+
//
// A refused intent (no piece, ambiguous, cannot castle) leaves the game in
// AwaitingIntent with the board untouched. Resolving ambiguity is up to the
// caller: every refusal carries the candidates, and a resubmitted intent can
// name the origin square or the castle side.
// =============================================================================

use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::castling::{castle_options, CastleBlock, CastleOption, CastleSide};
use crate::error::GameError;
use crate::piece::{Color, Piece, PieceKind};
use crate::rules::{is_checkmate, is_in_check, Check};
use crate::square::Square;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub color: Color,
    /// Carried for the interface layer; the engine never advances it.
    pub elapsed: Duration,
    /// Opposing pieces this player has taken, in capture order.
    pub captured: Vec<Piece>,
}

impl Player {
    pub fn new(name: impl Into<String>, color: Color) -> Self {
        Player {
            name: name.into(),
            color,
            elapsed: Duration::ZERO,
            captured: Vec::new(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    AwaitingIntent,
    Applying,
    CheckEvaluation,
    Terminal { winner: Color },
}

/// "Move a piece of this kind to this square", optionally pinned down to one
/// origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveIntent {
    pub kind: PieceKind,
    pub target: Square,
    /// Origin file (1..8), as in the pawn capture `exd5`.
    pub from_file: Option<u8>,
    /// Exact origin square, used to pick one of several candidates.
    pub from: Option<Square>,
}

impl MoveIntent {
    pub fn new(kind: PieceKind, target: Square) -> Self {
        MoveIntent { kind, target, from_file: None, from: None }
    }

    pub fn from_file(mut self, file: u8) -> Self {
        self.from_file = Some(file);
        self
    }

    pub fn from_square(mut self, square: Square) -> Self {
        self.from = Some(square);
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    Move(MoveIntent),
    /// Castle; `None` lets the engine pick when only one side is available.
    Castle(Option<CastleSide>),
}

/// What a completed turn did.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurnOutcome {
    pub mover: Color,
    pub captured: Option<Piece>,
    pub check: Option<Check>,
    pub checkmate: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub white: Player,
    pub black: Player,
    pub board: Board,
    turn: Color,
    state: GameState,
}

impl Game {
    /// Standard starting position; the first player plays White.
    pub fn new(white: impl Into<String>, black: impl Into<String>) -> Self {
        Game::from_board(Board::new(), white, black, Color::White)
    }

    /// Start from an arbitrary position with `turn` to move.
    pub fn from_board(board: Board, white: impl Into<String>, black: impl Into<String>, turn: Color) -> Self {
        Game {
            white: Player::new(white, Color::White),
            black: Player::new(black, Color::Black),
            board,
            turn,
            state: GameState::AwaitingIntent,
        }
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn winner(&self) -> Option<Color> {
        match self.state {
            GameState::Terminal { winner } => Some(winner),
            _ => None,
        }
    }

    pub fn player(&self, color: Color) -> &Player {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    fn player_mut(&mut self, color: Color) -> &mut Player {
        match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }

    fn set_state(&mut self, state: GameState) {
        debug!("state {:?} -> {:?}", self.state, state);
        self.state = state;
    }

    /// Pieces of the side to move that can reach `target`.
    pub fn candidates(&self, kind: PieceKind, target: Square) -> Vec<Piece> {
        self.board
            .pieces_of(self.turn)
            .filter(|p| p.kind == kind && p.reachable_squares(&self.board).contains(&target))
            .collect()
    }

    /// Castles open to the side to move.
    pub fn castle_options(&self) -> Result<Vec<CastleOption>, GameError> {
        castle_options(&self.board, self.turn)
    }

    /// Every fully resolved intent the side to move could play, moves first
    /// (by origin square, then target) followed by castles.
    pub fn available_intents(&self) -> Vec<Intent> {
        if self.winner().is_some() {
            return Vec::new();
        }
        let mut intents: Vec<Intent> = self
            .board
            .pieces_of(self.turn)
            .flat_map(|p| {
                p.reachable_squares(&self.board)
                    .into_iter()
                    .map(move |to| Intent::Move(MoveIntent::new(p.kind, to).from_square(p.position)))
            })
            .collect();
        if let Ok(options) = self.castle_options() {
            intents.extend(options.iter().map(|o| Intent::Castle(Some(o.side))));
        }
        intents
    }

    /// Pick the single piece `intent` refers to.
    fn resolve_move(&self, intent: &MoveIntent) -> Result<Piece, GameError> {
        let mut candidates = self.candidates(intent.kind, intent.target);
        if let Some(file) = intent.from_file {
            candidates.retain(|p| p.position.file() == file);
        }
        if let Some(from) = intent.from {
            candidates.retain(|p| p.position == from);
        }
        match candidates.len() {
            0 => Err(GameError::NoMatchingPiece { kind: intent.kind, target: intent.target }),
            1 => Ok(candidates[0]),
            _ => Err(GameError::Ambiguous { candidates }),
        }
    }

    fn resolve_castle(&self, side: Option<CastleSide>) -> Result<CastleOption, GameError> {
        let options = self.castle_options()?;
        match side {
            Some(side) => options
                .into_iter()
                .find(|o| o.side == side)
                .ok_or(GameError::CannotCastle(CastleBlock::NoClearSide)),
            None if options.len() == 1 => Ok(options[0]),
            None => Err(GameError::AmbiguousCastle { options }),
        }
    }

    /// Play one turn for the side to move.
    ///
    /// On error nothing changes. On success the move is on the board, the
    /// mover's captures are updated, and the game is either waiting on the
    /// other side or over.
    pub fn play(&mut self, intent: Intent) -> Result<TurnOutcome, GameError> {
        if let Some(winner) = self.winner() {
            return Err(GameError::GameOver { winner });
        }

        let mover = self.turn;
        let captured = match intent {
            Intent::Move(m) => {
                let piece = self.resolve_move(&m)?;
                self.set_state(GameState::Applying);
                self.board.apply_move(&piece, m.target)
            }
            Intent::Castle(side) => {
                let option = self.resolve_castle(side)?;
                self.set_state(GameState::Applying);
                if let Err(e) = self.board.apply_castle(&option.king, option.king_to, &option.rook) {
                    self.set_state(GameState::AwaitingIntent);
                    return Err(e);
                }
                None
            }
        };
        if let Some(p) = captured {
            self.player_mut(mover).captured.push(p);
        }

        self.set_state(GameState::CheckEvaluation);
        let check = is_in_check(&self.board, mover);
        let checkmate = check.as_ref().is_some_and(|c| is_checkmate(&self.board, mover, c));

        if checkmate {
            self.set_state(GameState::Terminal { winner: mover });
        } else {
            self.turn = mover.opposite();
            self.set_state(GameState::AwaitingIntent);
        }

        Ok(TurnOutcome { mover, captured, check, checkmate })
    }

    pub fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn mv(kind: PieceKind, to: &str) -> Intent {
        Intent::Move(MoveIntent::new(kind, sq(to)))
    }

    #[test]
    fn new_game_setup() {
        let game = Game::new("Ann", "Bo");
        assert_eq!(game.white.name, "Ann");
        assert_eq!(game.black.color, Color::Black);
        assert_eq!(game.turn(), Color::White);
        assert_eq!(game.state(), GameState::AwaitingIntent);
        assert_eq!(game.board.len(), 32);
        // 16 pawn moves + 4 knight moves.
        assert_eq!(game.available_intents().len(), 20);
    }

    #[test]
    fn turns_alternate() {
        let mut game = Game::new("w", "b");
        let out = game.play(mv(PieceKind::Pawn, "e4")).unwrap();
        assert_eq!(out.mover, Color::White);
        assert_eq!(out.captured, None);
        assert_eq!(game.turn(), Color::Black);

        // White's pieces are not the side to move any more.
        let err = game.play(mv(PieceKind::Knight, "f3")).unwrap_err();
        assert!(matches!(err, GameError::NoMatchingPiece { .. }));
        assert_eq!(game.turn(), Color::Black);

        game.play(mv(PieceKind::Knight, "f6")).unwrap();
        assert_eq!(game.turn(), Color::White);
    }

    #[test]
    fn ambiguous_move_lists_candidates() {
        let mut board = Board::empty();
        board.place(PieceKind::King, Color::White, sq("e1"));
        board.place(PieceKind::King, Color::Black, sq("e8"));
        board.place(PieceKind::Rook, Color::White, sq("a4"));
        board.place(PieceKind::Rook, Color::White, sq("h4"));
        let mut game = Game::from_board(board, "w", "b", Color::White);
        let before = game.clone();

        match game.play(mv(PieceKind::Rook, "d4")) {
            Err(GameError::Ambiguous { candidates }) => assert_eq!(candidates.len(), 2),
            other => panic!("expected ambiguity, got {other:?}"),
        }
        assert_eq!(game, before);

        let pick = MoveIntent::new(PieceKind::Rook, sq("d4")).from_square(sq("h4"));
        game.play(Intent::Move(pick)).unwrap();
        assert!(game.board.get(sq("h4")).is_none());
        assert_eq!(game.board.get(sq("d4")).unwrap().kind, PieceKind::Rook);
    }

    #[test]
    fn pawn_capture_by_origin_file() {
        let mut board = Board::empty();
        board.place(PieceKind::King, Color::White, sq("a1"));
        board.place(PieceKind::King, Color::Black, sq("a8"));
        board.place(PieceKind::Pawn, Color::White, sq("c4"));
        board.place(PieceKind::Pawn, Color::White, sq("e4"));
        board.place(PieceKind::Knight, Color::Black, sq("d5"));
        let mut game = Game::from_board(board, "w", "b", Color::White);

        let exd5 = MoveIntent::new(PieceKind::Pawn, sq("d5")).from_file(5);
        let out = game.play(Intent::Move(exd5)).unwrap();
        assert_eq!(out.captured.map(|p| p.kind), Some(PieceKind::Knight));
        assert!(game.board.get(sq("e4")).is_none());
        assert!(game.board.get(sq("c4")).is_some());
        assert_eq!(game.white.captured.len(), 1);
        assert!(game.black.captured.is_empty());
    }

    #[test]
    fn castle_requests() {
        let mut board = Board::empty();
        board.place(PieceKind::King, Color::White, sq("e1"));
        board.place(PieceKind::Rook, Color::White, sq("a1"));
        board.place(PieceKind::Rook, Color::White, sq("h1"));
        board.place(PieceKind::King, Color::Black, sq("e8"));
        let mut game = Game::from_board(board, "w", "b", Color::White);

        match game.play(Intent::Castle(None)) {
            Err(GameError::AmbiguousCastle { options }) => assert_eq!(options.len(), 2),
            other => panic!("expected castle ambiguity, got {other:?}"),
        }

        game.play(Intent::Castle(Some(CastleSide::Queenside))).unwrap();
        assert_eq!(game.board.get(sq("c1")).unwrap().kind, PieceKind::King);
        assert_eq!(game.board.get(sq("d1")).unwrap().kind, PieceKind::Rook);
        assert_eq!(game.board.get(sq("h1")).unwrap().kind, PieceKind::Rook);

        // Black's king is not on d8.
        let err = game.play(Intent::Castle(None)).unwrap_err();
        assert_eq!(err, GameError::CannotCastle(CastleBlock::KingNotHome));
        assert_eq!(game.turn(), Color::Black);
    }

    #[test]
    fn checkmate_ends_the_game() {
        // Fool's mate: 1. f3 e5 2. g4 Qh4#
        let mut game = Game::new("w", "b");
        game.play(mv(PieceKind::Pawn, "f3")).unwrap();
        game.play(mv(PieceKind::Pawn, "e5")).unwrap();
        game.play(mv(PieceKind::Pawn, "g4")).unwrap();
        let out = game.play(mv(PieceKind::Queen, "h4")).unwrap();

        assert!(out.checkmate);
        let check = out.check.unwrap();
        assert_eq!(check.attacker.position, sq("h4"));
        assert_eq!(check.king.position, sq("e1"));
        assert_eq!(game.state(), GameState::Terminal { winner: Color::Black });
        assert!(game.available_intents().is_empty());

        let err = game.play(mv(PieceKind::Pawn, "a3")).unwrap_err();
        assert_eq!(err, GameError::GameOver { winner: Color::Black });
    }

    #[test]
    fn check_without_mate_continues() {
        let mut game = Game::new("w", "b");
        game.play(mv(PieceKind::Pawn, "e4")).unwrap();
        game.play(mv(PieceKind::Pawn, "f6")).unwrap();
        let out = game.play(mv(PieceKind::Queen, "h5")).unwrap();
        assert!(out.check.is_some());
        assert!(!out.checkmate, "g6 blocks");
        assert_eq!(game.state(), GameState::AwaitingIntent);
        assert_eq!(game.turn(), Color::Black);
    }

    #[test]
    fn snapshot_round_trips() {
        let mut game = Game::new("w", "b");
        game.play(mv(PieceKind::Knight, "c3")).unwrap();
        let json = game.snapshot_json().unwrap();
        let back: Game = serde_json::from_str(&json).unwrap();
        assert_eq!(back, game);
    }
}
