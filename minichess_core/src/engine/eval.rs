use crate::engine::config::EngineConfig;
use crate::engine::Evaluator;
use crate::logic::board::{Board, Color};
use crate::logic::eval_constants::CENTER_SQUARES;
use std::sync::Arc;

/// Material balance plus a bonus per occupied central square.
#[derive(Debug, Clone)]
pub struct MaterialEvaluator {
    config: Arc<EngineConfig>,
}

impl MaterialEvaluator {
    #[must_use]
    pub const fn new(config: Arc<EngineConfig>) -> Self {
        Self { config }
    }
}

impl Evaluator for MaterialEvaluator {
    fn evaluate(&self, board: &Board, perspective: Color) -> i32 {
        let own: i32 = board
            .get_all_pieces(perspective)
            .iter()
            .map(|(piece, _)| self.config.piece_value(piece.kind))
            .sum();
        let theirs: i32 = board
            .get_all_pieces(perspective.opposite())
            .iter()
            .map(|(piece, _)| self.config.piece_value(piece.kind))
            .sum();

        let center: i32 = CENTER_SQUARES
            .iter()
            .filter_map(|&sq| board.get_piece(sq))
            .map(|piece| {
                if piece.color == perspective {
                    self.config.center_bonus
                } else {
                    -self.config.center_bonus
                }
            })
            .sum();

        own - theirs + center
    }
}
