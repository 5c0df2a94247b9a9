pub mod board;
pub mod castling;
pub mod config;
pub mod error;
pub mod game;
pub mod moves;
pub mod piece;
pub mod rules;
pub mod square;

#[cfg(target_arch = "wasm32")]
mod wasm_api;
