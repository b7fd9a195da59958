//! Rules engine for a two-player Blokus-style placement game.
//!
//! # Board Encoding
//!
//! ```text
//! One byte per cell, row-major (index = y * size + x):
//!   0 = empty
//!   1 = Player One
//!   2 = Player Two
//!
//! Coordinates: x = column, y = row, (0,0) is the top-left corner.
//!
//!   (0,0) (1,0) (2,0) ...
//!   (0,1) (1,1) (2,1) ...
//!   ...
//!
//! Home corners: Player One = (0, 0), Player Two = (size-1, size-1).
//! ```
//!
//! # Layout
//!
//! - [`pieces`]: the 21 polyominoes and their precomputed orientations.
//! - [`board`]: the owned grid.
//! - [`validate`]: the pure legality checks.
//! - [`movegen`]: legal placement enumeration and the stalemate test.
//! - [`turn`]: the turn state machine.
//! - [`score`]: final scoring.
//! - [`session`]: one game, tying the above together.
//! - [`engine`]: the registry of live sessions and the public operations.
//! - [`protocol`]: JSON request/response envelopes for the engine.

pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod movegen;
pub mod pieces;
pub mod protocol;
pub mod score;
pub mod session;
pub mod turn;
pub mod validate;

#[cfg(feature = "wasm")]
pub mod wasm;

use serde::{Deserialize, Serialize};

pub use board::{Board, BoardSnapshot};
pub use config::{GameConfig, ScoringRules};
pub use engine::{Engine, MoveOutcome, MoveRequest, SessionView};
pub use error::{EngineError, MoveError};
pub use movegen::{LegalMove, MoveGenerator};
pub use pieces::{catalog, Offset, Piece, PieceCatalog, PieceId, Shape};
pub use protocol::{Request, Response};
pub use score::{GameResult, Outcome, PlayerScore};
pub use session::{GameSession, Placement, PlayerState};
pub use turn::TurnState;

/// Seat at the table.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Player {
    One = 1,
    Two = 2,
}

impl Player {
    /// Get the opponent player.
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Convert from u8 (1 or 2) to Player.
    #[inline]
    pub fn from_bits(bits: u8) -> Option<Player> {
        match bits {
            1 => Some(Player::One),
            2 => Some(Player::Two),
            _ => None,
        }
    }

    /// Zero-based index for per-seat arrays.
    #[inline]
    pub fn index(self) -> usize {
        self as usize - 1
    }

    /// Both seats in turn order.
    pub fn all() -> impl Iterator<Item = Player> {
        [Player::One, Player::Two].into_iter()
    }
}

/// Externally assigned player identifier.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "player#{}", self.0)
    }
}

/// Identifier of a live game session.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub u64);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "game#{}", self.0)
    }
}

/// A cell on the board.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub x: u8,
    pub y: u8,
}

impl Coord {
    #[inline]
    pub const fn new(x: u8, y: u8) -> Coord {
        Coord { x, y }
    }

    /// Row-major sort key (y first).
    #[inline]
    pub fn row_major(self) -> (u8, u8) {
        (self.y, self.x)
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}
