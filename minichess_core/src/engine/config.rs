use crate::logic::board::PieceKind;
use crate::logic::eval_constants::{
    BONUS_CENTER, VAL_BISHOP, VAL_KING, VAL_KNIGHT, VAL_PAWN, VAL_QUEEN, VAL_ROOK,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // Evaluation Parameters
    pub val_pawn: i32,
    pub val_knight: i32,
    pub val_bishop: i32,
    pub val_rook: i32,
    pub val_queen: i32,
    pub val_king: i32,
    pub center_bonus: i32,

    // Search Parameters
    pub depth: u8,
    pub node_limit: Option<u64>, // None: plain fixed-depth search

    // Pause before an AI move is shown, purely cosmetic
    pub move_delay_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            val_pawn: VAL_PAWN,
            val_knight: VAL_KNIGHT,
            val_bishop: VAL_BISHOP,
            val_rook: VAL_ROOK,
            val_queen: VAL_QUEEN,
            val_king: VAL_KING,
            center_bonus: BONUS_CENTER,

            depth: 3,
            node_limit: None,

            move_delay_ms: 500,
        }
    }
}

impl EngineConfig {
    /// Parses a possibly partial JSON object; absent keys keep their defaults.
    pub fn load_from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    #[must_use]
    pub const fn piece_value(&self, kind: PieceKind) -> i32 {
        match kind {
            PieceKind::Pawn => self.val_pawn,
            PieceKind::Knight => self.val_knight,
            PieceKind::Bishop => self.val_bishop,
            PieceKind::Rook => self.val_rook,
            PieceKind::Queen => self.val_queen,
            PieceKind::King => self.val_king,
        }
    }

    #[must_use]
    pub const fn move_delay(&self) -> Duration {
        Duration::from_millis(self.move_delay_ms)
    }
}
