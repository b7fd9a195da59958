//! Per-game configuration.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Standard board size for the full rule set.
pub const DEFAULT_BOARD_SIZE: u8 = 20;
/// Smallest board with two distinct home corners.
pub const MIN_BOARD_SIZE: u8 = 2;
pub const MAX_BOARD_SIZE: u8 = 64;

/// Bonus points awarded at the end of the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScoringRules {
    /// Awarded to a player who placed every piece.
    pub all_pieces_bonus: i32,
    /// Awarded on top of `all_pieces_bonus` when the last piece placed was the monomino.
    pub monomino_last_bonus: i32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        ScoringRules {
            all_pieces_bonus: 15,
            monomino_last_bonus: 5,
        }
    }
}

/// Settings fixed when a session is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    pub board_size: u8,
    pub scoring: ScoringRules,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            board_size: DEFAULT_BOARD_SIZE,
            scoring: ScoringRules::default(),
        }
    }
}

impl GameConfig {
    pub fn with_board_size(board_size: u8) -> GameConfig {
        GameConfig {
            board_size,
            ..GameConfig::default()
        }
    }

    /// Reject settings the engine cannot play on.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&self.board_size) {
            return Err(EngineError::InvalidConfig {
                reason: format!(
                    "board size {} outside {}..={}",
                    self.board_size, MIN_BOARD_SIZE, MAX_BOARD_SIZE
                ),
            });
        }
        if self.scoring.all_pieces_bonus < 0 || self.scoring.monomino_last_bonus < 0 {
            return Err(EngineError::InvalidConfig {
                reason: "bonuses must not be negative".to_string(),
            });
        }
        Ok(())
    }
}
