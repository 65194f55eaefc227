use crate::logic::board::Square;

// Material values
pub const VAL_PAWN: i32 = 100;
pub const VAL_KNIGHT: i32 = 320;
pub const VAL_BISHOP: i32 = 330;
pub const VAL_ROOK: i32 = 500;
pub const VAL_QUEEN: i32 = 900;
pub const VAL_KING: i32 = 20000;

// Occupying one of the four central squares
pub const BONUS_CENTER: i32 = 50;

pub const CENTER_SQUARES: [Square; 4] = [
    Square::new(2, 2),
    Square::new(2, 3),
    Square::new(3, 2),
    Square::new(3, 3),
];
