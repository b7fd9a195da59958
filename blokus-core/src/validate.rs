//! Move validation.
//!
//! Checks run in a fixed order and the first failure wins:
//!
//! ```text
//! 1. turn        GameFinished, NotYourTurn
//! 2. piece       UnknownPiece, PieceAlreadyUsed, InvalidOrientation
//! 3. bounds      OutOfBounds
//! 4. overlap     CellOccupied
//! 5. first move  MustTouchHomeCorner
//! 6. adjacency   EdgeAdjacentToSelf, NoCornerConnection
//! ```
//!
//! Nothing here mutates; [`validate_move`] returns the cells to fill and the session
//! applies them.

use crate::board::Board;
use crate::error::MoveError;
use crate::pieces::{PieceCatalog, PieceId, Shape};
use crate::session::{GameSession, PlayerState};
use crate::{Coord, Player};

/// A placement that passed every check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedMove {
    pub player: Player,
    pub piece: PieceId,
    pub orientation: usize,
    pub anchor: Coord,
    pub cells: Vec<Coord>,
}

/// Run checks 1 through 6 for `player` against the session.
pub fn validate_move(
    session: &GameSession,
    catalog: &PieceCatalog,
    player: Player,
    piece: PieceId,
    orientation: usize,
    anchor: (i32, i32),
) -> Result<ValidatedMove, MoveError> {
    // 1. Turn ownership
    if session.turn().is_finished() {
        return Err(MoveError::GameFinished);
    }
    if session.turn().active() != Some(player) {
        return Err(MoveError::NotYourTurn);
    }

    // 2. Piece availability
    let state = session.player(player);
    let shape = piece_shape(catalog, state, piece, orientation)?;

    // 3-6. Geometry
    let cells = check_placement(session.board(), state, shape, anchor)?;

    Ok(ValidatedMove {
        player,
        piece,
        orientation,
        anchor: anchor_coord(anchor),
        cells,
    })
}

/// Resolve a piece and orientation the player is allowed to use.
pub fn piece_shape<'c>(
    catalog: &'c PieceCatalog,
    state: &PlayerState,
    piece: PieceId,
    orientation: usize,
) -> Result<&'c Shape, MoveError> {
    let entry = catalog.piece(piece)?;
    if !state.has_piece(piece) {
        return Err(MoveError::PieceAlreadyUsed { piece: piece.0 });
    }
    entry
        .orientation(orientation)
        .ok_or(MoveError::InvalidOrientation {
            piece: piece.0,
            orientation,
        })
}

/// Checks 3 through 6: the shape fits, is empty underneath, and obeys contact rules.
pub fn check_placement(
    board: &Board,
    state: &PlayerState,
    shape: &Shape,
    anchor: (i32, i32),
) -> Result<Vec<Coord>, MoveError> {
    let cells = board.cells_for(shape, anchor)?;
    if let Some(&cell) = cells.iter().find(|&&c| !board.is_empty_cell(c)) {
        return Err(MoveError::CellOccupied { cell });
    }
    check_contact(board, state, &cells)?;
    Ok(cells)
}

/// Checks 5 and 6 on cells already known to be on the board and empty.
pub fn check_contact(board: &Board, state: &PlayerState, cells: &[Coord]) -> Result<(), MoveError> {
    let seat = state.seat();

    if !state.has_placed() {
        let corner = state.home_corner();
        return if cells.contains(&corner) {
            Ok(())
        } else {
            Err(MoveError::MustTouchHomeCorner { corner })
        };
    }

    // Opponent cells may be touched freely; only own edges are forbidden.
    for &cell in cells {
        if board.edge_neighbors(cell).any(|n| board.owner(n) == Some(seat)) {
            return Err(MoveError::EdgeAdjacentToSelf { cell });
        }
    }

    let connected = cells
        .iter()
        .any(|&cell| board.corner_neighbors(cell).any(|n| board.owner(n) == Some(seat)));
    if connected {
        Ok(())
    } else {
        Err(MoveError::NoCornerConnection)
    }
}

// Shapes are normalized, so some covered cell shares the anchor's column and another its
// row; once every cell is on the board the anchor is too.
fn anchor_coord(anchor: (i32, i32)) -> Coord {
    Coord::new(anchor.0 as u8, anchor.1 as u8)
}
