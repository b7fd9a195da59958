//! Error types.
//!
//! [`MoveError`] covers every way a submitted placement can be refused. These are
//! ordinary outcomes reported back to the caller, not failures of the engine.
//! [`EngineError`] covers requests that never reach the rules (unknown session,
//! bad configuration, ...).

use serde::Serialize;
use thiserror::Error;

use crate::{Coord, PlayerId, SessionId};

/// Why a placement was refused.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MoveError {
    #[error("game is already finished")]
    GameFinished,

    #[error("it is not this player's turn")]
    NotYourTurn,

    #[error("unknown piece id {piece}")]
    UnknownPiece { piece: u8 },

    #[error("piece {piece} has already been used")]
    PieceAlreadyUsed { piece: u8 },

    #[error("piece {piece} has no orientation {orientation}")]
    InvalidOrientation { piece: u8, orientation: usize },

    #[error("cell ({x},{y}) is outside the board")]
    OutOfBounds { x: i32, y: i32 },

    #[error("cell {cell} is already occupied")]
    CellOccupied { cell: Coord },

    #[error("first piece must cover home corner {corner}")]
    MustTouchHomeCorner { corner: Coord },

    #[error("cell {cell} would share an edge with the player's own piece")]
    EdgeAdjacentToSelf { cell: Coord },

    #[error("piece must touch one of the player's own pieces at a corner")]
    NoCornerConnection,
}

impl MoveError {
    /// Stable short name, matching the serialized `kind` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            MoveError::GameFinished => "gameFinished",
            MoveError::NotYourTurn => "notYourTurn",
            MoveError::UnknownPiece { .. } => "unknownPiece",
            MoveError::PieceAlreadyUsed { .. } => "pieceAlreadyUsed",
            MoveError::InvalidOrientation { .. } => "invalidOrientation",
            MoveError::OutOfBounds { .. } => "outOfBounds",
            MoveError::CellOccupied { .. } => "cellOccupied",
            MoveError::MustTouchHomeCorner { .. } => "mustTouchHomeCorner",
            MoveError::EdgeAdjacentToSelf { .. } => "edgeAdjacentToSelf",
            MoveError::NoCornerConnection => "noCornerConnection",
        }
    }
}

/// Failure of an engine request outside the placement rules.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EngineError {
    #[error("session {session} not found")]
    SessionNotFound { session: SessionId },

    #[error("{player} is not seated in session {session}")]
    PlayerNotInSession { session: SessionId, player: PlayerId },

    #[error("both seats were given the same player {player}")]
    DuplicatePlayer { player: PlayerId },

    #[error("session {session} is still in progress")]
    GameNotFinished { session: SessionId },

    #[error("invalid game configuration: {reason}")]
    InvalidConfig { reason: String },
}
