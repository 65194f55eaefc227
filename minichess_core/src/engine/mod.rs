use crate::logic::board::{Board, Color, Square};
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod config;
pub mod eval;
pub mod search;

#[cfg(test)]
mod mate_test;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    #[must_use]
    pub const fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    pub depth: u8,
    pub nodes: u64,
    pub time_ms: u64,
    /// Score of the chosen move from the searching side's point of view.
    pub score: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("{0} has no legal move")]
    NoLegalMoves(Color),
}

pub trait Evaluator {
    /// Static score of `board`, higher is better for `perspective`.
    fn evaluate(&self, board: &Board, perspective: Color) -> i32;
}

pub trait Searcher {
    fn search(&mut self, board: &Board) -> Result<(Move, SearchStats), SearchError>;
}
