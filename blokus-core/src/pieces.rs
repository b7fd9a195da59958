//! Piece catalog.
//!
//! The 21 free polyominoes of sizes 1 through 5. Every piece is stored with its
//! distinct orientations (rotations and reflections) precomputed, so lookups never
//! transform shapes at request time.
//!
//! Shapes are lists of `(dx, dy)` offsets from the anchor. Every stored shape is
//! normalized (smallest dx and dy are both 0) and sorted row-major, which makes two
//! shapes covering the same cells compare equal.
//!
//! ```text
//! I1  #       V3  #.      T4  ###     X5  .#.
//!                 ##          .#.         ###
//!                                         .#.
//! ```

use std::collections::HashSet;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::MoveError;

/// Index of a piece in the catalog.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PieceId(pub u8);

impl PieceId {
    /// The single-cell piece.
    pub const MONOMINO: PieceId = PieceId(0);
}

impl std::fmt::Display for PieceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One cell of a shape relative to the anchor.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Offset {
    pub dx: i8,
    pub dy: i8,
}

impl Offset {
    #[inline]
    pub const fn new(dx: i8, dy: i8) -> Offset {
        Offset { dx, dy }
    }

    /// Quarter turn.
    #[inline]
    fn rotated(self) -> Offset {
        Offset::new(-self.dy, self.dx)
    }

    /// Mirror across the vertical axis.
    #[inline]
    fn mirrored(self) -> Offset {
        Offset::new(-self.dx, self.dy)
    }
}

/// A normalized set of cells.
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
pub struct Shape {
    cells: Vec<Offset>,
}

impl Shape {
    /// Build a normalized shape from arbitrary offsets.
    pub fn normalized(offsets: impl IntoIterator<Item = Offset>) -> Shape {
        let mut cells: Vec<Offset> = offsets.into_iter().collect();
        let min_dx = cells.iter().map(|o| o.dx).min().unwrap_or(0);
        let min_dy = cells.iter().map(|o| o.dy).min().unwrap_or(0);
        for cell in &mut cells {
            cell.dx -= min_dx;
            cell.dy -= min_dy;
        }
        cells.sort_by_key(|o| (o.dy, o.dx));
        cells.dedup();
        Shape { cells }
    }

    #[inline]
    pub fn cells(&self) -> &[Offset] {
        &self.cells
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn width(&self) -> u8 {
        self.cells.iter().map(|o| o.dx as u8 + 1).max().unwrap_or(0)
    }

    pub fn height(&self) -> u8 {
        self.cells.iter().map(|o| o.dy as u8 + 1).max().unwrap_or(0)
    }

    fn rotated(&self) -> Shape {
        Shape::normalized(self.cells.iter().map(|o| o.rotated()))
    }

    fn mirrored(&self) -> Shape {
        Shape::normalized(self.cells.iter().map(|o| o.mirrored()))
    }

    /// All distinct orientations, starting with `self`.
    ///
    /// Order: four quarter turns, then the mirror image and its four quarter turns.
    /// Repeats are dropped, keeping the first occurrence.
    pub fn orientations(&self) -> Vec<Shape> {
        let mut seen = HashSet::new();
        let mut out = Vec::with_capacity(8);
        let mut current = self.clone();
        for _ in 0..2 {
            for _ in 0..4 {
                if seen.insert(current.clone()) {
                    out.push(current.clone());
                }
                current = current.rotated();
            }
            current = current.mirrored();
        }
        out
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in 0..self.height() as i8 {
            if y > 0 {
                writeln!(f)?;
            }
            for x in 0..self.width() as i8 {
                let filled = self.cells.contains(&Offset::new(x, y));
                write!(f, "{}", if filled { '#' } else { '.' })?;
            }
        }
        Ok(())
    }
}

/// A placeable piece with its orientations.
#[derive(Clone, Debug)]
pub struct Piece {
    id: PieceId,
    name: &'static str,
    orientations: Vec<Shape>,
}

impl Piece {
    fn new(id: PieceId, name: &'static str, cells: &[(i8, i8)]) -> Piece {
        let base = Shape::normalized(cells.iter().map(|&(dx, dy)| Offset::new(dx, dy)));
        Piece {
            id,
            name,
            orientations: base.orientations(),
        }
    }

    #[inline]
    pub fn id(&self) -> PieceId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of board cells this piece covers.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.orientations[0].len()
    }

    /// Orientation 0 is the base shape.
    #[inline]
    pub fn base(&self) -> &Shape {
        &self.orientations[0]
    }

    #[inline]
    pub fn orientations(&self) -> &[Shape] {
        &self.orientations
    }

    pub fn orientation(&self, index: usize) -> Option<&Shape> {
        self.orientations.get(index)
    }
}

/// Base shapes of the standard set, in id order.
const STANDARD_PIECES: [(&str, &[(i8, i8)]); 21] = [
    ("I1", &[(0, 0)]),
    ("I2", &[(0, 0), (1, 0)]),
    ("I3", &[(0, 0), (1, 0), (2, 0)]),
    ("V3", &[(0, 0), (0, 1), (1, 1)]),
    ("I4", &[(0, 0), (1, 0), (2, 0), (3, 0)]),
    ("O4", &[(0, 0), (1, 0), (0, 1), (1, 1)]),
    ("T4", &[(0, 0), (1, 0), (2, 0), (1, 1)]),
    ("L4", &[(0, 0), (0, 1), (0, 2), (1, 2)]),
    ("Z4", &[(0, 0), (1, 0), (1, 1), (2, 1)]),
    ("F5", &[(1, 0), (2, 0), (0, 1), (1, 1), (1, 2)]),
    ("I5", &[(0, 0), (1, 0), (2, 0), (3, 0), (4, 0)]),
    ("L5", &[(0, 0), (0, 1), (0, 2), (0, 3), (1, 3)]),
    ("N5", &[(1, 0), (1, 1), (0, 2), (1, 2), (0, 3)]),
    ("P5", &[(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)]),
    ("T5", &[(0, 0), (1, 0), (2, 0), (1, 1), (1, 2)]),
    ("U5", &[(0, 0), (2, 0), (0, 1), (1, 1), (2, 1)]),
    ("V5", &[(0, 0), (0, 1), (0, 2), (1, 2), (2, 2)]),
    ("W5", &[(0, 0), (0, 1), (1, 1), (1, 2), (2, 2)]),
    ("X5", &[(1, 0), (0, 1), (1, 1), (2, 1), (1, 2)]),
    ("Y5", &[(1, 0), (0, 1), (1, 1), (1, 2), (1, 3)]),
    ("Z5", &[(0, 0), (1, 0), (1, 1), (1, 2), (2, 2)]),
];

/// The fixed set of pieces every player is dealt.
#[derive(Debug)]
pub struct PieceCatalog {
    pieces: Vec<Piece>,
}

impl PieceCatalog {
    /// Build the standard 21-piece set.
    pub fn standard() -> PieceCatalog {
        let pieces = STANDARD_PIECES
            .iter()
            .enumerate()
            .map(|(idx, &(name, cells))| Piece::new(PieceId(idx as u8), name, cells))
            .collect();
        PieceCatalog { pieces }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// All ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = PieceId> + '_ {
        self.pieces.iter().map(|p| p.id)
    }

    #[inline]
    pub fn get(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.0 as usize)
    }

    pub fn piece(&self, id: PieceId) -> Result<&Piece, MoveError> {
        self.get(id).ok_or(MoveError::UnknownPiece { piece: id.0 })
    }

    /// The ordered orientations of a piece.
    pub fn orientations(&self, id: PieceId) -> Result<&[Shape], MoveError> {
        self.piece(id).map(Piece::orientations)
    }

    pub fn cell_count(&self, id: PieceId) -> Result<usize, MoveError> {
        self.piece(id).map(Piece::cell_count)
    }

    /// Cells covered by the whole set.
    pub fn total_cells(&self) -> usize {
        self.pieces.iter().map(Piece::cell_count).sum()
    }

    pub fn by_name(&self, name: &str) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }
}

static CATALOG: OnceLock<PieceCatalog> = OnceLock::new();

/// The process-wide standard catalog, built on first use.
pub fn catalog() -> &'static PieceCatalog {
    CATALOG.get_or_init(PieceCatalog::standard)
}
