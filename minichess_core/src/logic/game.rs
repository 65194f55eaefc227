use crate::engine::config::EngineConfig;
use crate::engine::search::MinichessAi;
use crate::engine::{Move, SearchError};
use crate::logic::board::{Board, Color};
use crate::logic::rules::MoveError;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    Checkmate { winner: Color },
    Stalemate,
}

impl GameStatus {
    #[must_use]
    pub const fn is_over(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InProgress => f.write_str("in progress"),
            Self::Checkmate { winner } => write!(f, "Checkmate! {winner} wins!"),
            Self::Stalemate => f.write_str("Stalemate! It's a draw."),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("the game is already over")]
    GameOver,
    #[error("illegal move: {0}")]
    IllegalMove(#[from] MoveError),
    #[error("no move was provided for a human player")]
    NoMoveProvided,
    #[error("there is no move to undo")]
    NothingToUndo,
    #[error(transparent)]
    Search(#[from] SearchError),
}

impl GameError {
    /// Errors after which the same turn can simply be tried again.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::IllegalMove(_) | Self::NoMoveProvided)
    }
}

/// One side of the game. An AI plays the color of the slot it is seated in.
#[derive(Debug, Clone)]
pub enum Player {
    Human,
    Ai(MinichessAi),
}

impl Player {
    #[must_use]
    pub fn ai(color: Color, config: Arc<EngineConfig>) -> Self {
        Self::Ai(MinichessAi::from_config(color, config))
    }

    #[must_use]
    pub const fn is_ai(&self) -> bool {
        matches!(self, Self::Ai(_))
    }

    fn seated(mut self, color: Color) -> Self {
        if let Self::Ai(ai) = &mut self {
            if ai.color() != color {
                debug!("AI built for {} seated as {color}", ai.color());
                ai.set_color(color);
            }
        }
        self
    }
}

/// Where moves for human players come from.
pub trait MoveSource {
    fn next_move(&mut self, board: &Board, color: Color) -> Option<Move>;
}

/// A single move, handed out once.
impl MoveSource for Option<Move> {
    fn next_move(&mut self, _board: &Board, _color: Color) -> Option<Move> {
        self.take()
    }
}

/// A scripted line of moves, consumed front to back.
impl MoveSource for VecDeque<Move> {
    fn next_move(&mut self, _board: &Board, _color: Color) -> Option<Move> {
        self.pop_front()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    Moved { mv: Move, color: Color, by_ai: bool },
    Finished(GameStatus),
}

#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    white: Player,
    black: Player,
    status: GameStatus,
}

impl Game {
    #[must_use]
    pub fn new(white: Player, black: Player) -> Self {
        Self::from_board(Board::new(), white, black)
    }

    /// Session starting from an arbitrary position.
    #[must_use]
    pub fn from_board(board: Board, white: Player, black: Player) -> Self {
        Self {
            board,
            white: white.seated(Color::White),
            black: black.seated(Color::Black),
            status: GameStatus::InProgress,
        }
    }

    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub const fn status(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub const fn current_turn(&self) -> Color {
        self.board.current_turn()
    }

    #[must_use]
    pub const fn player(&self, color: Color) -> &Player {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    #[must_use]
    pub const fn is_ai_turn(&self) -> bool {
        self.player(self.current_turn()).is_ai()
    }

    /// Re-derives the status from the side to move.
    pub fn update_status(&mut self) -> GameStatus {
        let color = self.board.current_turn();
        self.status = if self.board.is_checkmate(color) {
            GameStatus::Checkmate {
                winner: color.opposite(),
            }
        } else if self.board.is_stalemate(color) {
            GameStatus::Stalemate
        } else {
            GameStatus::InProgress
        };
        self.status
    }

    /// Plays one turn. A terminal position is reported once as
    /// `Finished`; after that every call fails with `GameOver`. Human moves are
    /// pulled from `source`, and an illegal one leaves the board untouched.
    pub fn play_turn(&mut self, source: &mut impl MoveSource) -> Result<TurnOutcome, GameError> {
        if self.status.is_over() {
            return Err(GameError::GameOver);
        }

        let status = self.update_status();
        if status.is_over() {
            info!("game over: {status}");
            return Ok(TurnOutcome::Finished(status));
        }

        let color = self.board.current_turn();
        let player = match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        };
        let (mv, by_ai) = match player {
            Player::Ai(ai) => (ai.get_best_move(&self.board)?, true),
            Player::Human => (
                source
                    .next_move(&self.board, color)
                    .ok_or(GameError::NoMoveProvided)?,
                false,
            ),
        };

        self.board.try_move_piece(mv.from, mv.to)?;
        debug!("{color} played {mv}");

        Ok(TurnOutcome::Moved { mv, color, by_ai })
    }

    /// Takes back the latest move, whoever played it.
    pub fn undo(&mut self) -> Result<Move, GameError> {
        let record = self.board.pop_move().ok_or(GameError::NothingToUndo)?;
        let mv = record.as_move();
        debug!("{} took back {mv}", record.piece.color);
        self.update_status();
        Ok(mv)
    }
}
