use crate::engine::config::EngineConfig;
use crate::engine::eval::MaterialEvaluator;
use crate::engine::{Evaluator, Move, SearchError, SearchStats, Searcher};
use crate::logic::board::{Board, Color};
use log::{debug, trace, warn};
use std::sync::Arc;
use std::time::Instant;

/// Score bound used as the fold identity of an empty node.
pub const INFINITY: i32 = 1_000_000;

/// Fixed-depth minimax with alpha-beta pruning, playing one color.
///
/// The search runs on a single private copy of the board and walks the tree
/// with make/unmake, so the caller's board is never touched.
#[derive(Debug, Clone)]
pub struct MinichessAi {
    color: Color,
    depth: u8,
    config: Arc<EngineConfig>,
    evaluator: MaterialEvaluator,
    nodes_searched: u64,
    budget_exhausted: bool,
}

impl MinichessAi {
    /// Engine with default weights searching `depth` plies (at least one).
    #[must_use]
    pub fn new(color: Color, depth: u8) -> Self {
        Self::with_config(color, depth, Arc::new(EngineConfig::default()))
    }

    /// Engine taking both weights and depth from `config`.
    #[must_use]
    pub fn from_config(color: Color, config: Arc<EngineConfig>) -> Self {
        let depth = config.depth;
        Self::with_config(color, depth, config)
    }

    #[must_use]
    pub fn with_config(color: Color, depth: u8, config: Arc<EngineConfig>) -> Self {
        Self {
            color,
            depth: depth.max(1),
            evaluator: MaterialEvaluator::new(config.clone()),
            config,
            nodes_searched: 0,
            budget_exhausted: false,
        }
    }

    #[must_use]
    pub const fn color(&self) -> Color {
        self.color
    }

    pub const fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    #[must_use]
    pub const fn depth(&self) -> u8 {
        self.depth
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub const fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }

    /// Static score of `board`, higher is better for this engine's color no
    /// matter whose turn it is.
    #[must_use]
    pub fn evaluate_board(&self, board: &Board) -> i32 {
        self.evaluator.evaluate(board, self.color)
    }

    /// Every legal `(start, end)` pair of `color`, in row-major piece order.
    #[must_use]
    pub fn get_all_moves(&self, board: &Board, color: Color) -> Vec<Move> {
        board.legal_moves(color)
    }

    /// Minimax value of `board` searched `depth` plies deep. `maximizing`
    /// means this engine's color is on move. If the node budget runs out the
    /// static evaluation of `board` is returned instead.
    pub fn minimax(
        &mut self,
        board: &Board,
        depth: u8,
        alpha: i32,
        beta: i32,
        maximizing: bool,
    ) -> i32 {
        self.reset_counters();
        let mut scratch = board.clone();
        self.alpha_beta(&mut scratch, depth, alpha, beta, maximizing)
            .unwrap_or_else(|| self.evaluate_board(board))
    }

    /// Best move for this engine's color on `board`.
    pub fn get_best_move(&mut self, board: &Board) -> Result<Move, SearchError> {
        self.search(board).map(|(mv, _)| mv)
    }

    fn reset_counters(&mut self) {
        self.nodes_searched = 0;
        self.budget_exhausted = false;
    }

    fn out_of_budget(&mut self) -> bool {
        if let Some(limit) = self.config.node_limit {
            if self.nodes_searched > limit {
                self.budget_exhausted = true;
            }
        }
        self.budget_exhausted
    }

    // None means the node budget ran out somewhere below this node.
    fn alpha_beta(
        &mut self,
        board: &mut Board,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
    ) -> Option<i32> {
        self.nodes_searched += 1;
        if self.out_of_budget() {
            return None;
        }

        // Terminal test looks at the engine's own color on every ply.
        if depth == 0 || !board.has_legal_moves(self.color) {
            return Some(self.evaluate_board(board));
        }

        let side = if maximizing {
            self.color
        } else {
            self.color.opposite()
        };
        let moves = self.get_all_moves(board, side);

        if maximizing {
            let mut max_eval = -INFINITY;
            for mv in moves {
                board.make_move(mv);
                let eval = self.alpha_beta(board, depth - 1, alpha, beta, false);
                board.undo_last_move();
                let eval = eval?;

                max_eval = max_eval.max(eval);
                alpha = alpha.max(eval);
                if beta <= alpha {
                    break;
                }
            }
            Some(max_eval)
        } else {
            let mut min_eval = INFINITY;
            for mv in moves {
                board.make_move(mv);
                let eval = self.alpha_beta(board, depth - 1, alpha, beta, true);
                board.undo_last_move();
                let eval = eval?;

                min_eval = min_eval.min(eval);
                beta = beta.min(eval);
                if beta <= alpha {
                    break;
                }
            }
            Some(min_eval)
        }
    }
}

impl Searcher for MinichessAi {
    fn search(&mut self, board: &Board) -> Result<(Move, SearchStats), SearchError> {
        let start = Instant::now();
        self.reset_counters();

        let moves = self.get_all_moves(board, self.color);
        let Some(&first) = moves.first() else {
            return Err(SearchError::NoLegalMoves(self.color));
        };

        let mut scratch = board.clone();
        let mut best: Option<(Move, i32)> = None;

        for mv in moves {
            let alpha = best.map_or(-INFINITY, |(_, score)| score);

            scratch.make_move(mv);
            let result = self.alpha_beta(&mut scratch, self.depth - 1, alpha, INFINITY, false);
            scratch.undo_last_move();

            let Some(score) = result else {
                break;
            };
            trace!("root {mv}: {score}");

            // Strict comparison keeps the first of equally scored moves.
            let improves = match best {
                Some((_, best_score)) => score > best_score,
                None => true,
            };
            if improves {
                best = Some((mv, score));
            }
        }

        if self.budget_exhausted {
            warn!(
                "node budget of {:?} exhausted after {} nodes, playing best completed move",
                self.config.node_limit, self.nodes_searched
            );
        }

        let (best_move, score) = best.unwrap_or_else(|| (first, self.evaluate_board(board)));

        #[allow(clippy::cast_possible_truncation)]
        let time_ms = start.elapsed().as_millis() as u64;
        let stats = SearchStats {
            depth: self.depth,
            nodes: self.nodes_searched,
            time_ms,
            score,
        };
        debug!(
            "{} plays {best_move} (score {score}, depth {}, {} nodes, {time_ms} ms)",
            self.color, stats.depth, stats.nodes
        );

        Ok((best_move, stats))
    }
}
