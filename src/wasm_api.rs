use crate::castling::CastleSide;
use crate::game::{Game, Intent, MoveIntent, TurnOutcome};
use crate::piece::PieceKind;
use crate::square::Square;
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[derive(Serialize)]
struct BoardState<'a> {
    game: &'a Game,
    text: String,
    intents: Vec<Intent>,
}

#[derive(Serialize)]
struct MoveResult {
    outcome: Option<TurnOutcome>,
    error: Option<String>,
}

fn to_js<T: Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}

fn result_to_js(result: Result<TurnOutcome, String>) -> JsValue {
    match result {
        Ok(outcome) => to_js(&MoveResult { outcome: Some(outcome), error: None }),
        Err(error) => to_js(&MoveResult { outcome: None, error: Some(error) }),
    }
}

#[wasm_bindgen(js_name = Game)]
pub struct WasmGame {
    game: Game,
}

#[wasm_bindgen(js_class = Game)]
impl WasmGame {
    #[wasm_bindgen(constructor)]
    pub fn new(white: &str, black: &str) -> WasmGame {
        WasmGame { game: Game::new(white, black) }
    }

    pub fn get_board_state(&self) -> JsValue {
        to_js(&BoardState {
            game: &self.game,
            text: self.game.board.to_string(),
            intents: self.game.available_intents(),
        })
    }

    /// `piece` is a letter (`p`, `n`, `b`, `r`, `q`, `k`); squares are algebraic.
    pub fn make_move(&mut self, piece: &str, target: &str, from: Option<String>) -> JsValue {
        result_to_js(self.try_move(piece, target, from.as_deref()))
    }

    /// `side` is `"kingside"`, `"queenside"`, or empty to let the engine pick.
    pub fn castle(&mut self, side: &str) -> JsValue {
        let side = match side {
            "kingside" => Some(CastleSide::Kingside),
            "queenside" => Some(CastleSide::Queenside),
            _ => None,
        };
        result_to_js(self.game.play(Intent::Castle(side)).map_err(|e| e.to_string()))
    }
}

impl WasmGame {
    fn try_move(&mut self, piece: &str, target: &str, from: Option<&str>) -> Result<TurnOutcome, String> {
        let kind = piece
            .chars()
            .next()
            .and_then(PieceKind::from_letter)
            .ok_or_else(|| format!("unknown piece {piece:?}"))?;
        let target: Square = target.parse().map_err(|e| format!("{e}"))?;
        let mut intent = MoveIntent::new(kind, target);
        if let Some(from) = from {
            intent = intent.from_square(from.parse().map_err(|e| format!("{e}"))?);
        }
        self.game.play(Intent::Move(intent)).map_err(|e| e.to_string())
    }
}
