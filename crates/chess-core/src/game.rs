//! A single game position with the bookkeeping shakmaty leaves to the caller:
//! repetition history and the draw-claim rules built on top of it.

use std::fmt;

use shakmaty::fen::Fen;
use shakmaty::uci::UciMove;
use shakmaty::zobrist::{Zobrist64, ZobristHash};
use shakmaty::{
    CastlingMode, CastlingSide, Chess, Color, EnPassantMode, Move, Position, PositionError,
};

use crate::error::GameError;

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Outcome string as written in PGN result tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    WhiteWins,
    BlackWins,
    Draw,
    InProgress,
}

impl GameResult {
    pub fn as_str(self) -> &'static str {
        match self {
            GameResult::WhiteWins => "1-0",
            GameResult::BlackWins => "0-1",
            GameResult::Draw => "1/2-1/2",
            GameResult::InProgress => "*",
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A position plus the keys of every position reached since it was created.
///
/// The history always holds at least one entry (the initial position), so
/// repetition counts include the position the game was parsed from.
#[derive(Debug, Clone)]
pub struct Game {
    position: Chess,
    history: Vec<Zobrist64>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Standard starting position.
    pub fn new() -> Self {
        Self::from_position(Chess::default())
    }

    pub fn from_position(position: Chess) -> Self {
        let history = vec![position_key(&position)];
        Self { position, history }
    }

    /// Parse a FEN string. Missing trailing fields fall back to their defaults.
    ///
    /// Castling rights without the matching king and rook, and en passant
    /// squares with no capture behind them, are dropped rather than rejected.
    pub fn from_fen(fen: &str) -> Result<Self, GameError> {
        let invalid = |reason: String| GameError::InvalidFen {
            fen: fen.to_string(),
            reason,
        };

        let parsed: Fen = fen.trim().parse().map_err(|e| invalid(format!("{e}")))?;
        let position: Chess = parsed
            .into_position(CastlingMode::Standard)
            .or_else(PositionError::ignore_invalid_castling_rights)
            .or_else(PositionError::ignore_invalid_ep_square)
            .map_err(|e| invalid(format!("{e}")))?;

        Ok(Self::from_position(position))
    }

    pub fn position(&self) -> &Chess {
        &self.position
    }

    /// FEN of the current position. En passant squares are only written when
    /// a capture is actually legal.
    pub fn fen(&self) -> String {
        Fen::from_position(&self.position, EnPassantMode::Legal).to_string()
    }

    /// Apply a move given in UCI notation (`e2e4`, `e7e8q`, `e1g1`).
    pub fn push_uci(&mut self, uci: &str) -> Result<Move, GameError> {
        let parsed: UciMove = uci
            .trim()
            .parse()
            .map_err(|_| GameError::InvalidMove(uci.to_string()))?;

        let mv = parsed
            .to_move(&self.position)
            .map_err(|_| GameError::IllegalMove {
                uci: uci.to_string(),
                fen: self.fen(),
            })?;

        self.position.play_unchecked(mv.clone());
        self.history.push(position_key(&self.position));
        Ok(mv)
    }

    pub fn turn(&self) -> Color {
        self.position.turn()
    }

    pub fn fullmove_number(&self) -> u32 {
        self.position.fullmoves().get()
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.position.halfmoves()
    }

    pub fn legal_moves_uci(&self) -> Vec<String> {
        self.position
            .legal_moves()
            .iter()
            .map(|m| m.to_uci(CastlingMode::Standard).to_string())
            .collect()
    }

    fn has_legal_moves(&self) -> bool {
        !self.position.legal_moves().is_empty()
    }

    pub fn is_check(&self) -> bool {
        self.position.is_check()
    }

    pub fn is_checkmate(&self) -> bool {
        self.position.is_checkmate()
    }

    pub fn is_stalemate(&self) -> bool {
        self.position.is_stalemate()
    }

    /// Neither side has enough material to deliver mate.
    pub fn is_insufficient_material(&self) -> bool {
        self.position.is_insufficient_material()
    }

    /// 150 plies without a capture or pawn move, unless the last one mated.
    pub fn is_seventyfive_moves(&self) -> bool {
        self.halfmove_clock() >= 150 && self.has_legal_moves()
    }

    pub fn is_fivefold_repetition(&self) -> bool {
        self.repetitions_of(self.current_key()) >= 5
    }

    /// Game over without anyone having to claim a draw.
    pub fn is_game_over(&self) -> bool {
        self.is_checkmate()
            || self.is_stalemate()
            || self.is_insufficient_material()
            || self.is_seventyfive_moves()
            || self.is_fivefold_repetition()
    }

    pub fn result(&self) -> GameResult {
        if self.is_checkmate() {
            match self.turn() {
                Color::White => GameResult::BlackWins,
                Color::Black => GameResult::WhiteWins,
            }
        } else if self.is_game_over() {
            GameResult::Draw
        } else {
            GameResult::InProgress
        }
    }

    /// The side to move may claim a draw under the fifty-move rule, either now
    /// or with its next (non-zeroing) move.
    pub fn can_claim_fifty_moves(&self) -> bool {
        let legal = self.position.legal_moves();
        if legal.is_empty() {
            return false;
        }

        let clock = self.halfmove_clock();
        clock >= 100 || (clock == 99 && legal.iter().any(|m| !m.is_zeroing()))
    }

    /// The current position has occurred three times, or the side to move can
    /// play into a third occurrence.
    pub fn can_claim_threefold_repetition(&self) -> bool {
        if self.repetitions_of(self.current_key()) >= 3 {
            return true;
        }

        // A move can only complete a threefold if its target was seen twice.
        if self.history.len() < 2 {
            return false;
        }

        self.position.legal_moves().iter().any(|m| {
            let mut next = self.position.clone();
            next.play_unchecked(m.clone());
            self.repetitions_of(position_key(&next)) + 1 >= 3
        })
    }

    pub fn can_claim_draw(&self) -> bool {
        self.can_claim_fifty_moves() || self.can_claim_threefold_repetition()
    }

    pub fn has_kingside_castling_rights(&self, color: Color) -> bool {
        self.position.castles().has(color, CastlingSide::KingSide)
    }

    pub fn has_queenside_castling_rights(&self, color: Color) -> bool {
        self.position.castles().has(color, CastlingSide::QueenSide)
    }

    fn current_key(&self) -> Zobrist64 {
        position_key(&self.position)
    }

    fn repetitions_of(&self, key: Zobrist64) -> usize {
        self.history.iter().filter(|k| **k == key).count()
    }
}

fn position_key(position: &Chess) -> Zobrist64 {
    position.zobrist_hash(EnPassantMode::Legal)
}
