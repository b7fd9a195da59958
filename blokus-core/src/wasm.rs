//! WASM bindings for blokus-core
//!
//! A single local game for in-browser play. Seats are addressed as 1 and 2.

use wasm_bindgen::prelude::*;

use crate::{GameConfig, GameSession, PieceId, Player, PlayerId, SessionId};

fn seat(player: u8) -> Option<Player> {
    Player::from_bits(player)
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(JsValue::from)
}

/// WASM-friendly wrapper around GameSession
#[wasm_bindgen]
pub struct WasmGame {
    inner: GameSession,
}

#[wasm_bindgen]
impl WasmGame {
    /// Start a game on a `size` x `size` board
    #[wasm_bindgen(constructor)]
    pub fn new(size: u8) -> Result<WasmGame, JsError> {
        let inner = GameSession::new(
            SessionId(1),
            PlayerId(1),
            PlayerId(2),
            GameConfig::with_board_size(size),
        )?;
        Ok(WasmGame { inner })
    }

    #[wasm_bindgen(js_name = boardSize)]
    pub fn board_size(&self) -> u8 {
        self.inner.board().size()
    }

    /// Seat to move: 0 (game over), 1 or 2
    #[wasm_bindgen(js_name = currentPlayer)]
    pub fn current_player(&self) -> u8 {
        self.inner.turn().active().map_or(0, |p| p as u8)
    }

    #[wasm_bindgen(js_name = isGameOver)]
    pub fn is_game_over(&self) -> bool {
        self.inner.is_finished()
    }

    /// Owner of each cell, row-major: 0 empty, 1 or 2
    pub fn cells(&self) -> Vec<u8> {
        let board = self.inner.board();
        board
            .coords()
            .map(|c| board.owner(c).map_or(0, |p| p as u8))
            .collect()
    }

    /// Unused piece ids for a seat
    #[wasm_bindgen(js_name = availablePieces)]
    pub fn available_pieces(&self, player: u8) -> Vec<u8> {
        seat(player)
            .map(|p| self.inner.available_pieces(p).into_iter().map(|id| id.0).collect())
            .unwrap_or_default()
    }

    /// Legal moves for the seat as [{ piece, orientation, anchor: {x, y} }]
    #[wasm_bindgen(js_name = legalMoves)]
    pub fn legal_moves(&self, player: u8) -> Result<JsValue, JsValue> {
        let moves = match seat(player) {
            Some(p) if !self.inner.is_finished() => self.inner.legal_moves(p),
            _ => Vec::new(),
        };
        to_js(&moves)
    }

    /// Place a piece. Returns null on success or the refusal as { kind, ... }.
    #[wasm_bindgen(js_name = applyMove)]
    pub fn apply_move(&mut self, player: u8, piece: u8, orientation: usize, x: i32, y: i32) -> Result<JsValue, JsValue> {
        let Some(p) = seat(player) else {
            return Err(JsValue::from_str("player must be 1 or 2"));
        };
        match self.inner.submit(p, PieceId(piece), orientation, (x, y)) {
            Ok(_) => Ok(JsValue::NULL),
            Err(err) => to_js(&err),
        }
    }

    /// Final scores, or null while the game is running
    pub fn result(&self) -> Result<JsValue, JsValue> {
        match self.inner.result() {
            Some(result) => to_js(&result),
            None => Ok(JsValue::NULL),
        }
    }

    /// Move history as [{ number, player, piece, orientation, anchor, cells }]
    pub fn history(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.history())
    }

    /// Clone the game
    #[wasm_bindgen(js_name = clone)]
    pub fn clone_game(&self) -> WasmGame {
        WasmGame {
            inner: self.inner.clone(),
        }
    }
}

/// Piece shapes for rendering: [{ id, name, orientations: [[dx, dy, ...], ...] }]
#[wasm_bindgen(js_name = pieceCatalog)]
pub fn piece_catalog() -> Result<JsValue, JsValue> {
    #[derive(serde::Serialize)]
    struct WasmPiece {
        id: u8,
        name: &'static str,
        orientations: Vec<Vec<i8>>,
    }

    let pieces: Vec<WasmPiece> = crate::catalog()
        .pieces()
        .iter()
        .map(|piece| WasmPiece {
            id: piece.id().0,
            name: piece.name(),
            orientations: piece
                .orientations()
                .iter()
                .map(|shape| shape.cells().iter().flat_map(|o| [o.dx, o.dy]).collect())
                .collect(),
        })
        .collect();
    to_js(&pieces)
}
