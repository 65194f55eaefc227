use crate::engine::Move;
use crate::logic::rules::{self, MoveError};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const COLS: usize = 5;
pub const ROWS: usize = 6;
pub const SQUARES: usize = COLS * ROWS;

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const COLS_I8: i8 = COLS as i8;
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const ROWS_I8: i8 = ROWS as i8;

/// Row-major occupancy map, index = `row * COLS + col`.
pub type Grid = [Option<Piece>; SQUARES];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::White => 0,
            Self::Black => 1,
        }
    }

    /// Row step of a pawn of this color.
    #[must_use]
    pub const fn forward(self) -> i8 {
        match self {
            Self::White => 1,
            Self::Black => -1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::White => f.write_str("White"),
            Self::Black => f.write_str("Black"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

impl PieceKind {
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Pawn => 'P',
            Self::Rook => 'R',
            Self::Knight => 'N',
            Self::Bishop => 'B',
            Self::Queen => 'Q',
            Self::King => 'K',
        }
    }
}

/// A (column, row) pair. Squares off the 5x6 board are representable so that
/// queries stay total; every board query treats them as empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Square {
    pub col: i8,
    pub row: i8,
}

impl Square {
    #[must_use]
    pub const fn new(col: i8, row: i8) -> Self {
        Self { col, row }
    }

    #[must_use]
    pub const fn is_on_board(self) -> bool {
        self.col >= 0 && self.col < COLS_I8 && self.row >= 0 && self.row < ROWS_I8
    }

    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub const fn index(self) -> Option<usize> {
        if self.is_on_board() {
            Some(self.row as usize * COLS + self.col as usize)
        } else {
            None
        }
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub const fn from_index(sq: usize) -> Self {
        Self::new((sq % COLS) as i8, (sq / COLS) as i8)
    }

    #[must_use]
    pub const fn offset(self, dc: i8, dr: i8) -> Self {
        Self::new(self.col.saturating_add(dc), self.row.saturating_add(dr))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_on_board() {
            #[allow(clippy::cast_sign_loss)]
            let file = char::from(b'a' + self.col as u8);
            write!(f, "{}{}", file, self.row + 1)
        } else {
            write!(f, "({}, {})", self.col, self.row)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SquareParseError {
    #[error("expected a square like `e2`, got {0:?}")]
    BadLength(String),
    #[error("column must be a letter a-e, got {0:?}")]
    BadColumn(char),
    #[error("row must be a digit 1-6, got {0:?}")]
    BadRow(char),
}

impl FromStr for Square {
    type Err = SquareParseError;

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let mut chars = text.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(SquareParseError::BadLength(text.to_string()));
        };

        let file = file.to_ascii_lowercase();
        let col = match file {
            'a'..='e' => (file as u8 - b'a') as i8,
            _ => return Err(SquareParseError::BadColumn(file)),
        };
        let row = match rank {
            '1'..='6' => (rank as u8 - b'1') as i8,
            _ => return Err(SquareParseError::BadRow(rank)),
        };
        Ok(Self::new(col, row))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub position: Square,
    /// Tracked for completeness; no rule of this variant reads it.
    pub has_moved: bool,
}

impl Piece {
    #[must_use]
    pub const fn new(kind: PieceKind, color: Color, position: Square) -> Self {
        Self {
            kind,
            color,
            position,
            has_moved: false,
        }
    }

    /// Uppercase for White, lowercase for Black.
    #[must_use]
    pub const fn symbol(&self) -> char {
        let symbol = self.kind.symbol();
        match self.color {
            Color::White => symbol,
            Color::Black => symbol.to_ascii_lowercase(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// The moved piece as it stood before the move.
    pub piece: Piece,
    pub from: Square,
    pub to: Square,
    pub captured: Option<Piece>,
}

impl MoveRecord {
    #[must_use]
    pub const fn as_move(&self) -> Move {
        Move::new(self.from, self.to)
    }
}

const BACK_RANK: [PieceKind; COLS] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    grid: Grid,
    turn: Color,
    history: Vec<MoveRecord>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Starting position, White to move.
    #[must_use]
    pub fn new() -> Self {
        let mut board = Self::empty();
        board.setup_initial_position();
        board
    }

    /// A board with no pieces, White to move. Used to build test positions.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            grid: [None; SQUARES],
            turn: Color::White,
            history: Vec::new(),
        }
    }

    fn setup_initial_position(&mut self) {
        for (col, &kind) in (0i8..).zip(BACK_RANK.iter()) {
            self.add_piece(Square::new(col, 0), kind, Color::White);
            self.add_piece(Square::new(col, 1), PieceKind::Pawn, Color::White);
            self.add_piece(Square::new(col, 4), PieceKind::Pawn, Color::Black);
            self.add_piece(Square::new(col, 5), kind, Color::Black);
        }
    }

    pub fn clear(&mut self) {
        self.grid = [None; SQUARES];
        self.turn = Color::White;
        self.history.clear();
    }

    /// Places a fresh piece, replacing any occupant. Returns false off the board.
    pub fn add_piece(&mut self, at: Square, kind: PieceKind, color: Color) -> bool {
        match at.index().and_then(|sq| self.grid.get_mut(sq)) {
            Some(slot) => {
                *slot = Some(Piece::new(kind, color, at));
                true
            }
            None => false,
        }
    }

    pub fn clear_square(&mut self, at: Square) -> Option<Piece> {
        at.index()
            .and_then(|sq| self.grid.get_mut(sq))
            .and_then(Option::take)
    }

    #[must_use]
    pub fn get_piece(&self, at: Square) -> Option<Piece> {
        at.index().and_then(|sq| self.grid.get(sq).copied().flatten())
    }

    #[must_use]
    pub const fn current_turn(&self) -> Color {
        self.turn
    }

    pub const fn set_turn(&mut self, color: Color) {
        self.turn = color;
    }

    #[must_use]
    pub fn move_history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub(crate) const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Every piece of `color` with its square, in row-major scan order.
    #[must_use]
    pub fn get_all_pieces(&self, color: Color) -> Vec<(Piece, Square)> {
        self.grid
            .iter()
            .enumerate()
            .filter_map(|(sq, slot)| {
                slot.filter(|piece| piece.color == color)
                    .map(|piece| (piece, Square::from_index(sq)))
            })
            .collect()
    }

    /// Applies a legal move for the side to move, or explains why it is not one.
    /// The board is untouched on error.
    pub fn try_move_piece(&mut self, start: Square, end: Square) -> Result<(), MoveError> {
        rules::validate_move(self, start, end)?;
        self.make_move(Move::new(start, end));
        Ok(())
    }

    /// Boolean form of [`Board::try_move_piece`].
    pub fn move_piece(&mut self, start: Square, end: Square) -> bool {
        match self.try_move_piece(start, end) {
            Ok(()) => true,
            Err(err) => {
                debug!("rejected {start}-{end}: {err}");
                false
            }
        }
    }

    /// Relocates the piece without legality checks and records it in history.
    /// Callers must only pass moves taken from [`Board::legal_moves`].
    pub(crate) fn make_move(&mut self, mv: Move) {
        let (Some(from), Some(to)) = (mv.from.index(), mv.to.index()) else {
            return;
        };
        let Some(before) = self.grid.get_mut(from).and_then(Option::take) else {
            return;
        };

        let mut moved = before;
        moved.position = mv.to;
        moved.has_moved = true;
        let captured = self.grid.get_mut(to).and_then(|slot| slot.replace(moved));

        self.history.push(MoveRecord {
            piece: before,
            from: mv.from,
            to: mv.to,
            captured,
        });
        self.turn = self.turn.opposite();
    }

    /// Reverts the latest move. Returns false when there is nothing to undo.
    pub fn undo_last_move(&mut self) -> bool {
        self.pop_move().is_some()
    }

    /// Reverts the latest move and hands back its record.
    pub fn pop_move(&mut self) -> Option<MoveRecord> {
        let record = self.history.pop()?;
        if let Some(slot) = record.to.index().and_then(|sq| self.grid.get_mut(sq)) {
            *slot = record.captured;
        }
        if let Some(slot) = record.from.index().and_then(|sq| self.grid.get_mut(sq)) {
            *slot = Some(record.piece);
        }
        self.turn = self.turn.opposite();
        Some(record)
    }

    #[must_use]
    pub fn is_in_check(&self, color: Color) -> bool {
        rules::is_in_check(&self.grid, color)
    }

    /// Would `color` be in check after moving whatever stands on `start` to `end`?
    /// Works on a scratch copy of the grid; the board is never touched.
    #[must_use]
    pub fn would_be_in_check(&self, color: Color, start: Square, end: Square) -> bool {
        rules::would_be_in_check(&self.grid, color, start, end)
    }

    /// All legal moves of `color`, in row-major piece order.
    #[must_use]
    pub fn legal_moves(&self, color: Color) -> Vec<Move> {
        self.get_all_pieces(color)
            .into_iter()
            .flat_map(|(piece, from)| {
                piece
                    .possible_moves(self, false)
                    .into_iter()
                    .map(move |to| Move::new(from, to))
            })
            .collect()
    }

    #[must_use]
    pub fn has_legal_moves(&self, color: Color) -> bool {
        self.get_all_pieces(color)
            .iter()
            .any(|(piece, _)| !piece.possible_moves(self, false).is_empty())
    }

    #[must_use]
    pub fn is_checkmate(&self, color: Color) -> bool {
        self.is_in_check(color) && !self.has_legal_moves(color)
    }

    #[must_use]
    pub fn is_stalemate(&self, color: Color) -> bool {
        !self.is_in_check(color) && !self.has_legal_moves(color)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  a b c d e")?;
        writeln!(f, "  ---------")?;
        for row in (0..ROWS_I8).rev() {
            write!(f, "{}|", row + 1)?;
            for col in 0..COLS_I8 {
                let symbol = self
                    .get_piece(Square::new(col, row))
                    .map_or('.', |piece| piece.symbol());
                write!(f, " {symbol}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    #[test]
    fn test_initial_setup() {
        let board = Board::new();

        let king = board.get_piece(sq("e1")).unwrap();
        assert_eq!(king.kind, PieceKind::King);
        assert_eq!(king.color, Color::White);
        assert_eq!(king.position, sq("e1"));

        let queen = board.get_piece(sq("d6")).unwrap();
        assert_eq!(queen.kind, PieceKind::Queen);
        assert_eq!(queen.color, Color::Black);

        assert_eq!(board.get_all_pieces(Color::White).len(), 10);
        assert_eq!(board.get_all_pieces(Color::Black).len(), 10);
        assert_eq!(board.current_turn(), Color::White);
        assert!(board.move_history().is_empty());
    }

    #[test]
    fn test_square_notation() {
        assert_eq!(sq("e2"), Square::new(4, 1));
        assert_eq!(sq("A1"), Square::new(0, 0));
        assert_eq!(Square::new(2, 5).to_string(), "c6");
        assert!(matches!(
            "f2".parse::<Square>(),
            Err(SquareParseError::BadColumn('f'))
        ));
        assert!(matches!(
            "a7".parse::<Square>(),
            Err(SquareParseError::BadRow('7'))
        ));
        assert!(matches!(
            "e22".parse::<Square>(),
            Err(SquareParseError::BadLength(_))
        ));
    }

    #[test]
    fn test_off_board_queries() {
        let mut board = Board::new();
        assert!(board.get_piece(Square::new(5, 0)).is_none());
        assert!(board.get_piece(Square::new(0, -1)).is_none());
        assert!(!board.add_piece(Square::new(0, 6), PieceKind::Queen, Color::White));
        assert!(!board.move_piece(Square::new(0, 1), Square::new(0, 7)));
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_pawn_push() {
        let mut board = Board::new();
        assert!(board.move_piece(Square::new(0, 1), Square::new(0, 2)));

        assert!(board.get_piece(Square::new(0, 1)).is_none());
        let pawn = board.get_piece(Square::new(0, 2)).unwrap();
        assert_eq!(pawn.kind, PieceKind::Pawn);
        assert_eq!(pawn.color, Color::White);
        assert_eq!(pawn.position, Square::new(0, 2));
        assert!(pawn.has_moved);
        assert_eq!(board.current_turn(), Color::Black);
        assert_eq!(board.move_history().len(), 1);
    }

    #[test]
    fn test_illegal_pawn_leap_leaves_board_unchanged() {
        let mut board = Board::new();
        assert!(!board.move_piece(Square::new(0, 1), Square::new(0, 4)));
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_wrong_side_rejected() {
        let mut board = Board::new();
        assert_eq!(
            board.try_move_piece(sq("a5"), sq("a4")),
            Err(MoveError::NotYourTurn)
        );
        assert_eq!(
            board.try_move_piece(sq("c3"), sq("c4")),
            Err(MoveError::NoPieceAtSource)
        );
        assert_eq!(
            board.try_move_piece(sq("a2"), sq("b3")),
            Err(MoveError::IllegalMove)
        );
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_undo_move() {
        let mut board = Board::new();
        assert!(board.move_piece(sq("b1"), sq("c3")));
        assert!(board.undo_last_move());

        assert_eq!(board, Board::new());
        assert!(!board.undo_last_move());
    }

    #[test]
    fn test_undo_capture() {
        let mut board = Board::new();
        assert!(board.move_piece(sq("b2"), sq("b3")));
        assert!(board.move_piece(sq("c5"), sq("c4")));
        let before = board.clone();
        assert!(board.move_piece(sq("b3"), sq("c4")));

        let record = *board.move_history().last().unwrap();
        let captured = record.captured.unwrap();
        assert_eq!(captured.kind, PieceKind::Pawn);
        assert_eq!(captured.color, Color::Black);
        assert_eq!(board.get_all_pieces(Color::Black).len(), 9);

        let popped = board.pop_move().unwrap();
        assert_eq!(popped.as_move(), Move::new(sq("b3"), sq("c4")));
        assert_eq!(board, before);
        assert_eq!(board.current_turn(), Color::White);
    }

    #[test]
    fn test_display() {
        let text = Board::new().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "  a b c d e");
        assert_eq!(lines[2], "6| r n b q k");
        assert_eq!(lines[3], "5| p p p p p");
        assert_eq!(lines[4], "4| . . . . .");
        assert_eq!(lines[7], "1| R N B Q K");
    }
}
