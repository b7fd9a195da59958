//! Board state.
//!
//! A square grid of owner bytes (0 = empty, 1/2 = player). Cells are only ever
//! written once: pieces are never removed, so an owner never changes.

use serde::Serialize;

use crate::config::MIN_BOARD_SIZE;
use crate::error::MoveError;
use crate::pieces::Shape;
use crate::{Coord, Player, PlayerId};

/// Edge-adjacent directions (share a side).
const EDGE_DIRS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];
/// Corner-adjacent directions (share only a vertex).
const CORNER_DIRS: [(i32, i32); 4] = [(-1, -1), (1, -1), (1, 1), (-1, 1)];

const EMPTY: u8 = 0;

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Board {
    size: u8,
    cells: Vec<u8>,
}

impl Board {
    /// Create an empty `size` x `size` board.
    ///
    /// # Panics
    ///
    /// Debug builds panic if `size` is below `MIN_BOARD_SIZE`; the home corners
    /// need two distinct cells. `GameConfig::validate` rejects such sizes first.
    pub fn new(size: u8) -> Board {
        debug_assert!(size >= MIN_BOARD_SIZE, "board size {} too small", size);
        Board {
            size,
            cells: vec![EMPTY; size as usize * size as usize],
        }
    }

    #[inline]
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Check whether signed coordinates fall on the board.
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        let size = self.size as i32;
        (0..size).contains(&x) && (0..size).contains(&y)
    }

    #[inline]
    fn index(&self, coord: Coord) -> usize {
        debug_assert!(coord.x < self.size && coord.y < self.size);
        coord.y as usize * self.size as usize + coord.x as usize
    }

    /// Convert signed coordinates, returning None off the board.
    #[inline]
    pub fn coord(&self, x: i32, y: i32) -> Option<Coord> {
        if self.contains(x, y) {
            Some(Coord::new(x as u8, y as u8))
        } else {
            None
        }
    }

    /// Owner of a cell, or None if empty.
    #[inline]
    pub fn owner(&self, coord: Coord) -> Option<Player> {
        Player::from_bits(self.cells[self.index(coord)])
    }

    #[inline]
    pub fn is_empty_cell(&self, coord: Coord) -> bool {
        self.cells[self.index(coord)] == EMPTY
    }

    /// True if every listed cell is empty.
    pub fn is_empty(&self, coords: &[Coord]) -> bool {
        coords.iter().all(|&c| self.is_empty_cell(c))
    }

    /// Absolute cells covered by `shape` anchored at `anchor`.
    ///
    /// Fails with `OutOfBounds` naming the first cell that falls off the board.
    /// Sums past `i32::MAX` saturate, which is always off the board.
    pub fn cells_for(&self, shape: &Shape, anchor: (i32, i32)) -> Result<Vec<Coord>, MoveError> {
        shape
            .cells()
            .iter()
            .map(|o| {
                let x = anchor.0.saturating_add(o.dx as i32);
                let y = anchor.1.saturating_add(o.dy as i32);
                self.coord(x, y).ok_or(MoveError::OutOfBounds { x, y })
            })
            .collect()
    }

    /// Mark cells as owned by `player`.
    ///
    /// Does NOT validate - caller must ensure the placement is legal.
    ///
    /// # Panics
    ///
    /// Panics if any cell is already owned; owners are permanent.
    pub fn place(&mut self, coords: &[Coord], player: Player) {
        for &coord in coords {
            let idx = self.index(coord);
            assert_eq!(
                self.cells[idx], EMPTY,
                "cell {coord} is already owned; placement was not validated"
            );
            self.cells[idx] = player as u8;
        }
    }

    fn offsets<'a>(
        &'a self,
        coord: Coord,
        dirs: &'a [(i32, i32)],
    ) -> impl Iterator<Item = Coord> + 'a {
        dirs.iter()
            .filter_map(move |&(dx, dy)| self.coord(coord.x as i32 + dx, coord.y as i32 + dy))
    }

    /// The side-sharing neighbors of a cell, clipped to the board.
    pub fn edge_neighbors(&self, coord: Coord) -> impl Iterator<Item = Coord> + '_ {
        self.offsets(coord, &EDGE_DIRS)
    }

    /// The diagonal neighbors of a cell, clipped to the board.
    pub fn corner_neighbors(&self, coord: Coord) -> impl Iterator<Item = Coord> + '_ {
        self.offsets(coord, &CORNER_DIRS)
    }

    /// All eight neighbors: edges first, then corners.
    pub fn neighbors_of(&self, coord: Coord) -> impl Iterator<Item = Coord> + '_ {
        self.edge_neighbors(coord).chain(self.corner_neighbors(coord))
    }

    /// Home corner of a seat.
    #[inline]
    pub fn home_corner(&self, player: Player) -> Coord {
        match player {
            Player::One => Coord::new(0, 0),
            Player::Two => Coord::new(self.size - 1, self.size - 1),
        }
    }

    /// All coordinates in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        let size = self.size;
        (0..size).flat_map(move |y| (0..size).map(move |x| Coord::new(x, y)))
    }

    /// Cells owned by `player`, row-major.
    pub fn cells_owned_by(&self, player: Player) -> impl Iterator<Item = Coord> + '_ {
        self.coords().filter(move |&c| self.owner(c) == Some(player))
    }

    pub fn count_owned(&self, player: Player) -> usize {
        self.cells.iter().filter(|&&b| b == player as u8).count()
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&b| b != EMPTY).count()
    }

    /// Rows of owners, top to bottom.
    pub fn rows(&self) -> Vec<Vec<Option<Player>>> {
        self.cells
            .chunks(self.size as usize)
            .map(|row| row.iter().map(|&b| Player::from_bits(b)).collect())
            .collect()
    }

    /// Snapshot with seats replaced by their external ids.
    pub fn snapshot(&self, ids: [PlayerId; 2]) -> BoardSnapshot {
        let cells = self
            .rows()
            .into_iter()
            .map(|row| row.into_iter().map(|p| p.map(|p| ids[p.index()])).collect())
            .collect();
        BoardSnapshot {
            size: self.size,
            cells,
        }
    }

    /// Parse the text form produced by `Display` (`.`, `1`, `2`, one row per line).
    ///
    /// Leading and trailing whitespace on each row is ignored; blank lines are skipped.
    pub fn from_rows(rows: &[&str]) -> Result<Board, String> {
        let rows: Vec<&str> = rows
            .iter()
            .map(|r| r.trim())
            .filter(|r| !r.is_empty())
            .collect();
        let size = rows.len();
        if size < MIN_BOARD_SIZE as usize || size > u8::MAX as usize {
            return Err(format!("invalid board height {}", size));
        }
        let mut board = Board::new(size as u8);
        for (y, row) in rows.iter().enumerate() {
            let width = row.chars().count();
            if width != size {
                return Err(format!("row {} has width {}, expected {}", y, width, size));
            }
            for (x, ch) in row.chars().enumerate() {
                let value = match ch {
                    '.' => EMPTY,
                    '1' => Player::One as u8,
                    '2' => Player::Two as u8,
                    other => return Err(format!("invalid cell '{}' at ({},{})", other, x, y)),
                };
                let idx = board.index(Coord::new(x as u8, y as u8));
                board.cells[idx] = value;
            }
        }
        Ok(board)
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (y, row) in self.cells.chunks(self.size as usize).enumerate() {
            if y > 0 {
                writeln!(f)?;
            }
            for &b in row {
                let ch = match b {
                    1 => '1',
                    2 => '2',
                    _ => '.',
                };
                write!(f, "{}", ch)?;
            }
        }
        Ok(())
    }
}

/// Per-cell owners for the rendering layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BoardSnapshot {
    pub size: u8,
    /// `cells[y][x]`
    pub cells: Vec<Vec<Option<PlayerId>>>,
}

impl BoardSnapshot {
    pub fn owner(&self, coord: Coord) -> Option<PlayerId> {
        self.cells
            .get(coord.y as usize)
            .and_then(|row| row.get(coord.x as usize))
            .copied()
            .flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::catalog;

    #[test]
    fn test_board_new_is_empty() {
        let board = Board::new(5);
        assert_eq!(board.size(), 5);
        assert_eq!(board.occupied_count(), 0);
        assert!(board.coords().all(|c| board.is_empty_cell(c)));
        assert_eq!(board.coords().count(), 25);
    }

    #[test]
    fn test_cells_for_in_bounds() {
        let board = Board::new(5);
        let v3 = catalog().by_name("V3").unwrap().base();
        let cells = board.cells_for(v3, (2, 3)).unwrap();
        assert_eq!(cells, vec![Coord::new(2, 3), Coord::new(2, 4), Coord::new(3, 4)]);
    }

    #[test]
    fn test_cells_for_out_of_bounds() {
        let board = Board::new(5);
        let i3 = catalog().by_name("I3").unwrap().base();
        assert_eq!(
            board.cells_for(i3, (3, 0)),
            Err(MoveError::OutOfBounds { x: 5, y: 0 })
        );
        assert_eq!(
            board.cells_for(i3, (-1, 2)),
            Err(MoveError::OutOfBounds { x: -1, y: 2 })
        );
    }

    #[test]
    fn test_cells_for_huge_anchor() {
        let board = Board::new(5);
        // F5's first cell is at dx = 1, so the sum leaves i32 range.
        let f5 = catalog().by_name("F5").unwrap().base();
        assert_eq!(
            board.cells_for(f5, (i32::MAX, 0)),
            Err(MoveError::OutOfBounds { x: i32::MAX, y: 0 })
        );
        let y5 = catalog().by_name("Y5").unwrap().base();
        assert!(matches!(
            board.cells_for(y5, (0, i32::MAX)),
            Err(MoveError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_place_sets_owner() {
        let mut board = Board::new(4);
        let cells = [Coord::new(0, 0), Coord::new(1, 0)];
        board.place(&cells, Player::One);
        assert_eq!(board.owner(Coord::new(0, 0)), Some(Player::One));
        assert_eq!(board.owner(Coord::new(1, 0)), Some(Player::One));
        assert_eq!(board.owner(Coord::new(2, 0)), None);
        assert!(!board.is_empty(&cells));
        assert_eq!(board.count_owned(Player::One), 2);
        assert_eq!(board.count_owned(Player::Two), 0);
    }

    #[test]
    #[should_panic(expected = "already owned")]
    fn test_place_twice_panics() {
        let mut board = Board::new(4);
        board.place(&[Coord::new(2, 2)], Player::One);
        board.place(&[Coord::new(2, 2)], Player::Two);
    }

    #[test]
    fn test_neighbors_clipped_at_corner() {
        let board = Board::new(4);
        let edges: Vec<Coord> = board.edge_neighbors(Coord::new(0, 0)).collect();
        assert_eq!(edges, vec![Coord::new(1, 0), Coord::new(0, 1)]);
        let corners: Vec<Coord> = board.corner_neighbors(Coord::new(0, 0)).collect();
        assert_eq!(corners, vec![Coord::new(1, 1)]);
        assert_eq!(board.neighbors_of(Coord::new(0, 0)).count(), 3);
    }

    #[test]
    fn test_neighbors_in_middle() {
        let board = Board::new(4);
        assert_eq!(board.neighbors_of(Coord::new(1, 2)).count(), 8);
        assert_eq!(board.edge_neighbors(Coord::new(3, 1)).count(), 3);
    }

    #[test]
    fn test_home_corners() {
        let board = Board::new(20);
        assert_eq!(board.home_corner(Player::One), Coord::new(0, 0));
        assert_eq!(board.home_corner(Player::Two), Coord::new(19, 19));
    }

    #[test]
    fn test_text_roundtrip() {
        let rows = ["1..", ".12", "..2"];
        let board = Board::from_rows(&rows).unwrap();
        assert_eq!(board.owner(Coord::new(0, 0)), Some(Player::One));
        assert_eq!(board.owner(Coord::new(2, 1)), Some(Player::Two));
        assert_eq!(board.to_string(), rows.join("\n"));
        assert_eq!(board.cells_owned_by(Player::Two).count(), 2);
    }

    #[test]
    fn test_from_rows_rejects_bad_input() {
        assert!(Board::from_rows(&[]).is_err());
        assert!(Board::from_rows(&["..", "."]).is_err());
        assert!(Board::from_rows(&[".x", ".."]).is_err());
        assert!(Board::from_rows(&["."]).is_err());
    }

    #[test]
    fn test_from_rows_width_counts_chars() {
        assert_eq!(
            Board::from_rows(&["ééé", ".."]).unwrap_err(),
            "row 0 has width 3, expected 2"
        );
    }

    #[test]
    #[should_panic(expected = "too small")]
    #[cfg(debug_assertions)]
    fn test_new_rejects_tiny_board() {
        Board::new(1);
    }

    #[test]
    fn test_snapshot_maps_ids() {
        let board = Board::from_rows(&["1.", ".2"]).unwrap();
        let snapshot = board.snapshot([PlayerId(10), PlayerId(20)]);
        assert_eq!(snapshot.size, 2);
        assert_eq!(snapshot.cells[0], vec![Some(PlayerId(10)), None]);
        assert_eq!(snapshot.owner(Coord::new(1, 1)), Some(PlayerId(20)));
        assert_eq!(snapshot.owner(Coord::new(5, 5)), None);
    }
}
