use chess_rules::castling::CastleSide;
use chess_rules::game::{Game, GameState, Intent, MoveIntent};
use chess_rules::piece::{Color, PieceKind};
use chess_rules::square::Square;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

fn sq(s: &str) -> Square {
    s.parse().unwrap()
}

fn mv(kind: PieceKind, to: &str) -> Intent {
    Intent::Move(MoveIntent::new(kind, sq(to)))
}

/// Every stored entry is keyed by its own position and the piece count
/// never grows.
#[test]
fn random_games_keep_board_invariant() {
    for seed in 0..16 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut game = Game::new("w", "b");
        let mut count = game.board.len();

        for _ in 0..120 {
            let intents = game.available_intents();
            let Some(&intent) = intents.choose(&mut rng) else { break };
            game.play(intent)
                .unwrap_or_else(|e| panic!("seed {seed}: available intent {intent:?} refused: {e}"));

            for (key, piece) in game.board.entries() {
                assert_eq!(key, piece.position, "seed {seed}: {piece} stored under {key}");
            }
            assert!(game.board.len() <= count, "seed {seed}: pieces appeared");
            count = game.board.len();

            if game.winner().is_some() {
                break;
            }
        }
    }
}

#[test]
fn same_moves_same_result() {
    let play = |seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut game = Game::new("w", "b");
        for _ in 0..60 {
            let intents = game.available_intents();
            match intents.choose(&mut rng) {
                Some(&intent) => {
                    game.play(intent).unwrap();
                }
                None => break,
            }
        }
        game.snapshot_json().unwrap()
    };
    assert_eq!(play(7), play(7));
}

#[test]
fn captures_are_credited_to_the_mover() {
    let mut game = Game::new("w", "b");
    game.play(mv(PieceKind::Pawn, "e4")).unwrap();
    game.play(mv(PieceKind::Pawn, "d5")).unwrap();
    let out = game
        .play(Intent::Move(MoveIntent::new(PieceKind::Pawn, sq("d5")).from_file(5)))
        .unwrap();
    assert_eq!(out.captured.map(|p| (p.kind, p.color)), Some((PieceKind::Pawn, Color::Black)));
    assert_eq!(game.white.captured.len(), 1);
    assert_eq!(game.board.len(), 31);

    game.play(mv(PieceKind::Queen, "d5")).unwrap();
    assert_eq!(game.black.captured.len(), 1);
    assert_eq!(game.board.get(sq("d5")).unwrap().color, Color::Black);
}

#[test]
fn white_castles_kingside_in_one_turn() {
    let mut game = Game::new("w", "b");
    for (kind, to) in [
        (PieceKind::Pawn, "e4"),
        (PieceKind::Pawn, "e5"),
        (PieceKind::Knight, "f3"),
        (PieceKind::Knight, "c6"),
        (PieceKind::Bishop, "c4"),
        (PieceKind::Knight, "f6"),
    ] {
        game.play(mv(kind, to)).unwrap();
    }

    let out = game.play(Intent::Castle(None)).unwrap();
    assert_eq!(out.mover, Color::White);
    let king = game.board.get(sq("g1")).unwrap();
    let rook = game.board.get(sq("f1")).unwrap();
    assert_eq!((king.kind, rook.kind), (PieceKind::King, PieceKind::Rook));
    assert!(game.board.get(sq("e1")).is_none());
    assert!(game.board.get(sq("h1")).is_none());
    assert_eq!(game.turn(), Color::Black);

    // The king is off its home square now.
    game.play(mv(PieceKind::Pawn, "a6")).unwrap();
    assert!(game.play(Intent::Castle(Some(CastleSide::Kingside))).is_err());
}

/// Qxf7 is mate over the board, but the queen is defended only by the c4
/// bishop. Reachable squares never include a square held by the mover's own
/// piece, so f7 does not count as covered and the king "escapes" onto it.
#[test]
fn scholars_mate_is_not_detected() {
    let mut game = Game::new("w", "b");
    game.play(mv(PieceKind::Pawn, "e4")).unwrap();
    game.play(mv(PieceKind::Pawn, "e5")).unwrap();
    game.play(mv(PieceKind::Bishop, "c4")).unwrap();
    game.play(mv(PieceKind::Knight, "c6")).unwrap();
    game.play(mv(PieceKind::Queen, "h5")).unwrap();
    game.play(mv(PieceKind::Knight, "f6")).unwrap();
    let out = game.play(mv(PieceKind::Queen, "f7")).unwrap();

    assert_eq!(out.captured.map(|p| p.kind), Some(PieceKind::Pawn));
    let check = out.check.expect("queen gives check");
    assert_eq!(check.attacker.position, sq("f7"));
    assert!(!out.checkmate);
    assert_eq!(game.state(), GameState::AwaitingIntent);
    assert_eq!(game.turn(), Color::Black);
}
