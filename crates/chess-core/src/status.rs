//! The JSON status document returned for every position.
//!
//! Field order follows struct declaration order and is kept stable so clients
//! diffing responses see the same layout every time.

use serde::{Deserialize, Serialize};
use shakmaty::Color;

use crate::game::Game;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStatus {
    pub fen: String,
    pub fullmove_number: u32,
    pub result: String,
    pub is_game_over: bool,
    pub is_checkmate: bool,
    pub is_stalemate: bool,
    pub is_insufficient_material: bool,
    pub is_seventyfive_moves: bool,
    pub is_fivefold_repetition: bool,
    pub white: CastlingRights,
    pub black: CastlingRights,
    pub turn: TurnStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastlingRights {
    pub has_kingside_castling_rights: bool,
    pub has_queenside_castling_rights: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnStatus {
    pub color: String,
    pub is_in_check: bool,
    /// Engine suggestion, `null` when no engine was asked.
    pub best_move: Option<String>,
    pub legal_moves: Vec<String>,
    pub can_claim_draw: bool,
    pub can_claim_fifty_moves: bool,
    pub can_claim_threefold_repetition: bool,
}

impl GameStatus {
    pub fn from_game(game: &Game, best_move: Option<String>) -> Self {
        Self {
            fen: game.fen(),
            fullmove_number: game.fullmove_number(),
            result: game.result().to_string(),
            is_game_over: game.is_game_over(),
            is_checkmate: game.is_checkmate(),
            is_stalemate: game.is_stalemate(),
            is_insufficient_material: game.is_insufficient_material(),
            is_seventyfive_moves: game.is_seventyfive_moves(),
            is_fivefold_repetition: game.is_fivefold_repetition(),
            white: CastlingRights::of(game, Color::White),
            black: CastlingRights::of(game, Color::Black),
            turn: TurnStatus {
                color: color_name(game.turn()).to_string(),
                is_in_check: game.is_check(),
                best_move,
                legal_moves: game.legal_moves_uci(),
                can_claim_draw: game.can_claim_draw(),
                can_claim_fifty_moves: game.can_claim_fifty_moves(),
                can_claim_threefold_repetition: game.can_claim_threefold_repetition(),
            },
        }
    }
}

impl CastlingRights {
    fn of(game: &Game, color: Color) -> Self {
        Self {
            has_kingside_castling_rights: game.has_kingside_castling_rights(color),
            has_queenside_castling_rights: game.has_queenside_castling_rights(color),
        }
    }
}

pub fn color_name(color: Color) -> &'static str {
    match color {
        Color::White => "white",
        Color::Black => "black",
    }
}
