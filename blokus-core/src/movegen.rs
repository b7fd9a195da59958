//! Lazy legal-move generation.
//!
//! Every legal placement covers at least one *attachment cell*:
//!
//! - first move: the home corner (if still empty);
//! - later moves: an empty cell diagonal to one of the player's cells that does not
//!   share an edge with any of them.
//!
//! So instead of scanning every anchor on the board, the generator lines each cell of
//! each orientation up with each attachment cell and runs the full placement check on
//! the resulting anchor. The set of moves produced is exactly what an exhaustive scan
//! over (piece, orientation, anchor) would accept.

use std::collections::HashSet;

use serde::Serialize;

use crate::board::Board;
use crate::pieces::{PieceCatalog, PieceId};
use crate::session::PlayerState;
use crate::validate::check_placement;
use crate::Coord;

/// A placement known to be legal.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalMove {
    pub piece: PieceId,
    pub orientation: usize,
    pub anchor: Coord,
}

/// Cells a new piece of this player must cover one of, row-major.
pub fn attachment_cells(board: &Board, state: &PlayerState) -> Vec<Coord> {
    if !state.has_placed() {
        let corner = state.home_corner();
        return if board.is_empty_cell(corner) {
            vec![corner]
        } else {
            Vec::new()
        };
    }

    let seat = state.seat();
    let mut cells: Vec<Coord> = board
        .cells_owned_by(seat)
        .flat_map(|own| board.corner_neighbors(own).collect::<Vec<_>>())
        .filter(|&c| board.is_empty_cell(c))
        .filter(|&c| board.edge_neighbors(c).all(|n| board.owner(n) != Some(seat)))
        .collect();
    cells.sort_by_key(|c| c.row_major());
    cells.dedup();
    cells
}

/// Produces legal moves one at a time, without repeats.
///
/// Generates in order: pieces (inventory order), orientations, attachment cells, shape
/// cells.
pub struct MoveGenerator<'a> {
    board: &'a Board,
    state: &'a PlayerState,
    catalog: &'a PieceCatalog,
    targets: Vec<Coord>,
    /// Current index into the player's remaining pieces
    piece_idx: usize,
    /// Current orientation of that piece
    orientation_idx: usize,
    /// Current attachment cell
    target_idx: usize,
    /// Current shape cell lined up with the attachment cell
    cell_idx: usize,
    /// Anchors already tried for this piece and orientation
    tried: HashSet<(i32, i32)>,
}

impl<'a> MoveGenerator<'a> {
    pub fn new(board: &'a Board, state: &'a PlayerState, catalog: &'a PieceCatalog) -> Self {
        Self {
            board,
            state,
            catalog,
            targets: attachment_cells(board, state),
            piece_idx: 0,
            orientation_idx: 0,
            target_idx: 0,
            cell_idx: 0,
            tried: HashSet::new(),
        }
    }

    fn next_orientation(&mut self) {
        self.orientation_idx += 1;
        self.target_idx = 0;
        self.cell_idx = 0;
        self.tried.clear();
    }

    fn next_piece(&mut self) {
        self.piece_idx += 1;
        self.orientation_idx = 0;
        self.target_idx = 0;
        self.cell_idx = 0;
        self.tried.clear();
    }
}

impl Iterator for MoveGenerator<'_> {
    type Item = LegalMove;

    fn next(&mut self) -> Option<LegalMove> {
        if self.targets.is_empty() {
            return None;
        }
        let (board, state, catalog) = (self.board, self.state, self.catalog);
        let pieces = state.remaining_pieces();

        while let Some(&piece) = pieces.get(self.piece_idx) {
            let Some(entry) = catalog.get(piece) else {
                self.next_piece();
                continue;
            };
            let Some(shape) = entry.orientation(self.orientation_idx) else {
                self.next_piece();
                continue;
            };

            while let Some(&target) = self.targets.get(self.target_idx) {
                while let Some(offset) = shape.cells().get(self.cell_idx) {
                    self.cell_idx += 1;
                    let anchor = (
                        target.x as i32 - offset.dx as i32,
                        target.y as i32 - offset.dy as i32,
                    );
                    if !self.tried.insert(anchor) {
                        continue;
                    }
                    if let Ok(cells) = check_placement(board, state, shape, anchor) {
                        debug_assert!(cells.contains(&target));
                        return Some(LegalMove {
                            piece,
                            orientation: self.orientation_idx,
                            anchor: Coord::new(anchor.0 as u8, anchor.1 as u8),
                        });
                    }
                }
                self.cell_idx = 0;
                self.target_idx += 1;
            }
            self.next_orientation();
        }
        None
    }
}

/// True if the player can place anything at all.
pub fn has_legal_move(board: &Board, state: &PlayerState, catalog: &PieceCatalog) -> bool {
    MoveGenerator::new(board, state, catalog).next().is_some()
}

/// Every distinct legal placement for the player.
pub fn legal_moves(board: &Board, state: &PlayerState, catalog: &PieceCatalog) -> Vec<LegalMove> {
    MoveGenerator::new(board, state, catalog).collect()
}
