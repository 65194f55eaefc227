use crate::engine::config::EngineConfig;
use crate::engine::search::{MinichessAi, INFINITY};
use crate::engine::{Move, Searcher};
use crate::logic::board::{Board, Color, PieceKind, Square};
use std::sync::Arc;

fn sq(name: &str) -> Square {
    name.parse().unwrap()
}

// Rook to the sixth rank mates; the black pawn keeps every other line from
// being a stalemate.
fn back_rank_mate_for_white() -> Board {
    let mut board = Board::empty();
    board.add_piece(sq("a6"), PieceKind::King, Color::Black);
    board.add_piece(sq("a5"), PieceKind::Pawn, Color::Black);
    board.add_piece(sq("c4"), PieceKind::King, Color::White);
    board.add_piece(sq("e1"), PieceKind::Rook, Color::White);
    board
}

#[test]
fn test_finds_mate_in_one() {
    for depth in [2, 3] {
        let board = back_rank_mate_for_white();
        let mut ai = MinichessAi::new(Color::White, depth);
        let (mv, stats) = ai.search(&board).unwrap();

        assert_eq!(mv, Move::new(sq("e1"), sq("e6")), "depth {depth}");
        assert_eq!(stats.score, INFINITY);

        let mut after = board.clone();
        assert!(after.move_piece(mv.from, mv.to));
        assert!(after.is_checkmate(Color::Black));
    }
}

#[test]
fn test_finds_mate_in_one_for_black() {
    let mut board = Board::empty();
    board.add_piece(sq("a1"), PieceKind::King, Color::White);
    board.add_piece(sq("a2"), PieceKind::Pawn, Color::White);
    board.add_piece(sq("c3"), PieceKind::King, Color::Black);
    board.add_piece(sq("e6"), PieceKind::Rook, Color::Black);
    board.set_turn(Color::Black);

    let mut ai = MinichessAi::new(Color::Black, 2);
    let mv = ai.get_best_move(&board).unwrap();
    assert_eq!(mv, Move::new(sq("e6"), sq("e1")));

    assert!(board.clone().move_piece(mv.from, mv.to));
}

#[test]
fn test_takes_hanging_queen() {
    let mut board = Board::empty();
    board.add_piece(sq("a1"), PieceKind::King, Color::White);
    board.add_piece(sq("a3"), PieceKind::Rook, Color::White);
    board.add_piece(sq("e3"), PieceKind::Queen, Color::Black);
    board.add_piece(sq("e6"), PieceKind::King, Color::Black);

    for depth in [1, 2] {
        let mut ai = MinichessAi::new(Color::White, depth);
        assert_eq!(
            ai.get_best_move(&board).unwrap(),
            Move::new(sq("a3"), sq("e3")),
            "depth {depth}"
        );
    }
}

#[test]
fn test_fresh_board_move_is_legal() {
    let board = Board::new();
    let mut ai = MinichessAi::new(Color::White, 2);
    let mv = ai.get_best_move(&board).unwrap();

    let mut fresh = Board::new();
    assert!(fresh.move_piece(mv.from, mv.to));
}

#[test]
fn test_custom_weights_change_choice() {
    // A knight worth less than a pawn is not worth taking over the pawn.
    let mut board = Board::empty();
    board.add_piece(sq("a1"), PieceKind::King, Color::White);
    board.add_piece(sq("c3"), PieceKind::Pawn, Color::White);
    board.add_piece(sq("b4"), PieceKind::Knight, Color::Black);
    board.add_piece(sq("d4"), PieceKind::Pawn, Color::Black);
    board.add_piece(sq("e6"), PieceKind::King, Color::Black);

    let mut ai = MinichessAi::new(Color::White, 1);
    assert_eq!(
        ai.get_best_move(&board).unwrap(),
        Move::new(sq("c3"), sq("b4"))
    );

    let config = Arc::new(EngineConfig {
        val_knight: 10,
        center_bonus: 0,
        ..EngineConfig::default()
    });
    let mut ai = MinichessAi::with_config(Color::White, 1, config);
    assert_eq!(
        ai.get_best_move(&board).unwrap(),
        Move::new(sq("c3"), sq("d4"))
    );
}

#[test]
fn test_stalemating_the_opponent_scores_as_a_win() {
    // Black has no move after Qc5, which the search rates like a mate.
    let mut board = Board::empty();
    board.add_piece(sq("a6"), PieceKind::King, Color::Black);
    board.add_piece(sq("c4"), PieceKind::Queen, Color::White);
    board.add_piece(sq("e1"), PieceKind::King, Color::White);

    let mut ai = MinichessAi::new(Color::White, 2);
    let (mv, stats) = ai.search(&board).unwrap();
    assert_eq!(mv, Move::new(sq("c4"), sq("c5")));
    assert_eq!(stats.score, INFINITY);

    let mut after = board.clone();
    assert!(after.move_piece(mv.from, mv.to));
    assert!(after.is_stalemate(Color::Black));
    assert!(!after.is_checkmate(Color::Black));
}

#[test]
fn test_opponent_without_moves_returns_fold_identity() {
    // Black to move and stalemated, White still has moves.
    let mut board = Board::empty();
    board.add_piece(sq("a6"), PieceKind::King, Color::Black);
    board.add_piece(sq("b4"), PieceKind::Queen, Color::White);
    board.add_piece(sq("e1"), PieceKind::King, Color::White);
    board.set_turn(Color::Black);

    let mut ai = MinichessAi::new(Color::White, 3);
    assert_eq!(ai.minimax(&board, 2, -INFINITY, INFINITY, false), INFINITY);
    assert_eq!(ai.nodes_searched(), 1);
}

#[test]
fn test_own_side_without_moves_is_terminal_at_any_depth() {
    // White is stalemated: the node is scored statically, not as a loss.
    let mut board = Board::empty();
    board.add_piece(sq("a1"), PieceKind::King, Color::White);
    board.add_piece(sq("b3"), PieceKind::Queen, Color::Black);
    board.add_piece(sq("e6"), PieceKind::King, Color::Black);
    assert!(board.is_stalemate(Color::White));

    let mut ai = MinichessAi::new(Color::White, 3);
    let static_score = ai.evaluate_board(&board);
    assert_eq!(static_score, -900);

    for maximizing in [true, false] {
        let score = ai.minimax(&board, 3, -INFINITY, INFINITY, maximizing);
        assert_eq!(score, static_score);
        assert_eq!(ai.nodes_searched(), 1);
    }
}
