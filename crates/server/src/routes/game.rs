use std::sync::Arc;

use axum::{
    extract::Query,
    response::{IntoResponse, Response},
    Extension, Json,
};
use chess_core::{render_diagram, Game, GameError, GameStatus, STARTING_FEN};
use serde::Deserialize;

use crate::config::parse_flag;
use crate::engine::{EngineError, EngineSession};
use crate::error::AppError;

/// Sentinel `move` value asking the engine to pick the move.
const AI_MOVE: &str = "ai";

pub type Engine = Option<Arc<EngineSession>>;

#[derive(Debug, Default, Deserialize)]
pub struct GameQuery {
    pub fen: Option<String>,
    #[serde(rename = "move")]
    pub mv: Option<String>,
    pub format: Option<String>,
    pub diagram: Option<String>,
}

impl GameQuery {
    fn fen(&self) -> Option<&str> {
        self.fen.as_deref().filter(|f| !f.trim().is_empty())
    }

    fn mv(&self) -> Option<&str> {
        self.mv.as_deref().filter(|m| !m.trim().is_empty())
    }

    fn wants_diagram(&self) -> bool {
        // A bare `?diagram` counts as set
        self.format.as_deref() == Some("ascii")
            || self
                .diagram
                .as_deref()
                .is_some_and(|d| d.trim().is_empty() || parse_flag(d))
    }
}

/// GET /game?fen=...&move=...&format=json|ascii
/// Status of `fen` (start position if absent) after the optional move.
pub async fn get_game(
    Extension(engine): Extension<Engine>,
    Query(q): Query<GameQuery>,
) -> Result<Response, AppError> {
    let mut game = Game::from_fen(q.fen().unwrap_or(STARTING_FEN))?;

    if let Some(mv) = q.mv() {
        game.push_uci(mv)?;
    }

    write_game(&game, &q, engine.as_deref()).await
}

/// POST /game
/// Starts over from the standard position. The body is ignored.
pub async fn new_game(
    Extension(engine): Extension<Engine>,
    Query(q): Query<GameQuery>,
) -> Result<Response, AppError> {
    write_game(&Game::new(), &q, engine.as_deref()).await
}

/// PUT /game?fen=...&move=<uci>|ai
/// Plays the given move, or the engine's move when `move` is absent or `ai`.
pub async fn play_move(
    Extension(engine): Extension<Engine>,
    Query(q): Query<GameQuery>,
) -> Result<Response, AppError> {
    let fen = q.fen().ok_or(AppError::MissingParam("fen"))?;
    let mut game = Game::from_fen(fen)?;

    match q.mv() {
        Some(mv) if mv != AI_MOVE => {
            game.push_uci(mv)?;
        }
        _ => {
            if game.is_game_over() {
                return Err(GameError::GameOver.into());
            }
            let engine = engine.as_deref().ok_or(AppError::EngineUnavailable)?;
            let reply = engine.best_move(&game.fen()).await?;
            let best_move = reply.best_move.ok_or_else(|| {
                EngineError::Protocol("engine returned no move for a live position".into())
            })?;
            tracing::debug!(fen = %game.fen(), best_move = %best_move, "Playing engine move");
            game.push_uci(&best_move)
                .map_err(|e| EngineError::Protocol(format!("engine move rejected: {e}")))?;
        }
    }

    write_game(&game, &q, engine.as_deref()).await
}

/// Serialize the game as JSON, or as the ASCII diagram when asked for.
async fn write_game(
    game: &Game,
    q: &GameQuery,
    engine: Option<&EngineSession>,
) -> Result<Response, AppError> {
    if q.wants_diagram() {
        return Ok(render_diagram(&game.fen()).into_response());
    }

    let best_move = suggest_move(game, engine).await?;
    Ok(Json(GameStatus::from_game(game, best_move)).into_response())
}

/// Engine suggestion for the side to move. Finished games are never sent to
/// the engine.
async fn suggest_move(
    game: &Game,
    engine: Option<&EngineSession>,
) -> Result<Option<String>, AppError> {
    let Some(engine) = engine else {
        return Ok(None);
    };
    if game.is_game_over() {
        return Ok(None);
    }

    Ok(engine.best_move(&game.fen()).await?.best_move)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(format: Option<&str>, diagram: Option<&str>) -> GameQuery {
        GameQuery {
            format: format.map(String::from),
            diagram: diagram.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_wants_diagram() {
        assert!(query(Some("ascii"), None).wants_diagram());
        assert!(query(None, Some("true")).wants_diagram());
        assert!(query(None, Some("1")).wants_diagram());
        assert!(query(None, Some("")).wants_diagram());
        assert!(!query(None, Some("false")).wants_diagram());
        assert!(!query(Some("json"), None).wants_diagram());
        assert!(!query(Some("xml"), None).wants_diagram());
        assert!(!query(None, None).wants_diagram());
    }

    #[test]
    fn test_blank_params_are_absent() {
        let q = GameQuery {
            fen: Some("  ".into()),
            mv: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(q.fen(), None);
        assert_eq!(q.mv(), None);
    }
}
