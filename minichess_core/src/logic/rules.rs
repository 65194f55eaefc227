use crate::logic::board::{Board, Color, Grid, PieceKind, Square};
use crate::logic::pieces::raw_moves_on;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("square is off the board")]
    OutOfBounds,
    #[error("no piece on the start square")]
    NoPieceAtSource,
    #[error("that piece belongs to the side not on move")]
    NotYourTurn,
    #[error("the piece cannot move there")]
    IllegalMove,
    #[error("the move would leave the king in check")]
    SelfCheck,
}

/// Checks that `from -> to` is a legal move for the side to move.
pub fn validate_move(board: &Board, from: Square, to: Square) -> Result<(), MoveError> {
    if !from.is_on_board() || !to.is_on_board() {
        return Err(MoveError::OutOfBounds);
    }

    let piece = board.get_piece(from).ok_or(MoveError::NoPieceAtSource)?;
    if piece.color != board.current_turn() {
        return Err(MoveError::NotYourTurn);
    }

    // 1. Movement pattern and occupancy
    if !piece.generate_raw_moves(board).contains(&to) {
        return Err(MoveError::IllegalMove);
    }

    // 2. Own king safety
    if board.would_be_in_check(piece.color, from, to) {
        return Err(MoveError::SelfCheck);
    }

    Ok(())
}

/// First king of `color` in scan order.
#[must_use]
pub fn find_king(grid: &Grid, color: Color) -> Option<Square> {
    grid.iter().enumerate().find_map(|(sq, slot)| match slot {
        Some(piece) if piece.kind == PieceKind::King && piece.color == color => {
            Some(Square::from_index(sq))
        }
        _ => None,
    })
}

/// True if any opposing piece has the king of `color` among its raw moves.
/// A missing king is never in check.
#[must_use]
pub fn is_in_check(grid: &Grid, color: Color) -> bool {
    let Some(king) = find_king(grid, color) else {
        return false;
    };

    let enemy = color.opposite();
    grid.iter()
        .flatten()
        .filter(|piece| piece.color == enemy)
        .any(|piece| raw_moves_on(piece, grid).contains(&king))
}

/// Plays `start -> end` on a scratch copy of `grid` (capturing whatever stands
/// on `end`) and reports whether `color` is in check there. Off-board squares
/// or an empty start square mean no simulation: the current position is tested.
#[must_use]
pub fn would_be_in_check(grid: &Grid, color: Color, start: Square, end: Square) -> bool {
    let (Some(from), Some(to)) = (start.index(), end.index()) else {
        return is_in_check(grid, color);
    };

    let mut scratch = *grid;
    let Some(mut piece) = scratch.get_mut(from).and_then(Option::take) else {
        return is_in_check(grid, color);
    };
    piece.position = end;
    if let Some(slot) = scratch.get_mut(to) {
        *slot = Some(piece);
    }

    is_in_check(&scratch, color)
}
