use crate::logic::board::{Board, Grid, Piece, PieceKind, Square};

const ORTHOGONAL: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];
const KING_STEPS: [(i8, i8); 8] = [
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

impl Piece {
    /// Pseudo-legal targets: movement pattern and occupancy only, own king ignored.
    #[must_use]
    pub fn generate_raw_moves(&self, board: &Board) -> Vec<Square> {
        raw_moves_on(self, board.grid())
    }

    /// Targets of this piece. Unless `ignore_check` is set, moves that leave
    /// the own king attacked are dropped. Attack detection must pass `true`.
    #[must_use]
    pub fn possible_moves(&self, board: &Board, ignore_check: bool) -> Vec<Square> {
        let mut moves = self.generate_raw_moves(board);
        if !ignore_check {
            moves.retain(|&to| !board.would_be_in_check(self.color, self.position, to));
        }
        moves
    }

    #[must_use]
    pub fn is_valid_move(&self, board: &Board, target: Square) -> bool {
        target.is_on_board() && self.possible_moves(board, false).contains(&target)
    }
}

pub(crate) fn raw_moves_on(piece: &Piece, grid: &Grid) -> Vec<Square> {
    let mut moves = Vec::with_capacity(16);
    match piece.kind {
        PieceKind::Pawn => gen_pawn_moves(piece, grid, &mut moves),
        PieceKind::Rook => gen_sliding_moves(piece, grid, &ORTHOGONAL, &mut moves),
        PieceKind::Bishop => gen_sliding_moves(piece, grid, &DIAGONAL, &mut moves),
        PieceKind::Queen => {
            gen_sliding_moves(piece, grid, &ORTHOGONAL, &mut moves);
            gen_sliding_moves(piece, grid, &DIAGONAL, &mut moves);
        }
        PieceKind::Knight => gen_step_moves(piece, grid, &KNIGHT_JUMPS, &mut moves),
        PieceKind::King => gen_step_moves(piece, grid, &KING_STEPS, &mut moves),
    }
    moves
}

fn occupant(grid: &Grid, at: Square) -> Option<Piece> {
    at.index().and_then(|sq| grid.get(sq).copied().flatten())
}

// Single push and diagonal captures. No double step, en passant or promotion.
fn gen_pawn_moves(piece: &Piece, grid: &Grid, moves: &mut Vec<Square>) {
    let forward = piece.color.forward();

    let ahead = piece.position.offset(0, forward);
    if ahead.is_on_board() && occupant(grid, ahead).is_none() {
        moves.push(ahead);
    }

    for dc in [-1, 1] {
        let target = piece.position.offset(dc, forward);
        if matches!(occupant(grid, target), Some(other) if other.color != piece.color) {
            moves.push(target);
        }
    }
}

fn gen_sliding_moves(piece: &Piece, grid: &Grid, dirs: &[(i8, i8)], moves: &mut Vec<Square>) {
    for &(dc, dr) in dirs {
        let mut target = piece.position.offset(dc, dr);
        while target.is_on_board() {
            match occupant(grid, target) {
                None => moves.push(target),
                Some(other) => {
                    if other.color != piece.color {
                        moves.push(target);
                    }
                    break;
                }
            }
            target = target.offset(dc, dr);
        }
    }
}

fn gen_step_moves(piece: &Piece, grid: &Grid, offsets: &[(i8, i8)], moves: &mut Vec<Square>) {
    for &(dc, dr) in offsets {
        let target = piece.position.offset(dc, dr);
        if !target.is_on_board() {
            continue;
        }
        match occupant(grid, target) {
            Some(other) if other.color == piece.color => {}
            _ => moves.push(target),
        }
    }
}
