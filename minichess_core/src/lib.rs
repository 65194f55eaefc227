//! Rules engine, adversarial search and game session for Minichess, chess on
//! a 5x6 board with one bishop per side.

pub mod engine;
pub mod logic;
