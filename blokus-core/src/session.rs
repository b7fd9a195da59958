//! A single game.
//!
//! `GameSession` owns the board, both players and the turn state. It is the only
//! place game state changes, and it changes only through [`GameSession::submit`],
//! which validates first and mutates only once every check passed.

use serde::Serialize;
use tracing::{debug, info};

use crate::board::{Board, BoardSnapshot};
use crate::config::GameConfig;
use crate::error::{EngineError, MoveError};
use crate::movegen::{self, LegalMove};
use crate::pieces::{catalog, PieceCatalog, PieceId};
use crate::score::{self, GameResult};
use crate::turn::{Availability, TurnState};
use crate::validate::{self, ValidatedMove};
use crate::{Coord, Player, PlayerId, SessionId};

/// One seat's inventory and progress.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerState {
    id: PlayerId,
    seat: Player,
    home_corner: Coord,
    /// Unused pieces, ascending id
    remaining: Vec<PieceId>,
    /// Pieces in the order they were placed
    placed: Vec<PieceId>,
    passed: bool,
}

impl PlayerState {
    /// A player holding the full catalog.
    pub fn new(id: PlayerId, seat: Player, home_corner: Coord, catalog: &PieceCatalog) -> Self {
        Self {
            id,
            seat,
            home_corner,
            remaining: catalog.ids().collect(),
            placed: Vec::new(),
            passed: false,
        }
    }

    #[inline]
    pub fn id(&self) -> PlayerId {
        self.id
    }

    #[inline]
    pub fn seat(&self) -> Player {
        self.seat
    }

    #[inline]
    pub fn home_corner(&self) -> Coord {
        self.home_corner
    }

    #[inline]
    pub fn remaining_pieces(&self) -> &[PieceId] {
        &self.remaining
    }

    #[inline]
    pub fn placed_pieces(&self) -> &[PieceId] {
        &self.placed
    }

    #[inline]
    pub fn has_piece(&self, piece: PieceId) -> bool {
        self.remaining.binary_search(&piece).is_ok()
    }

    /// True once the first piece is down.
    #[inline]
    pub fn has_placed(&self) -> bool {
        !self.placed.is_empty()
    }

    #[inline]
    pub fn last_placed(&self) -> Option<PieceId> {
        self.placed.last().copied()
    }

    /// Set when the player had no legal move at the last turn change.
    #[inline]
    pub fn passed(&self) -> bool {
        self.passed
    }

    /// Move a piece from the inventory to the placed list.
    /// Returns false if the piece was not in the inventory.
    pub fn take_piece(&mut self, piece: PieceId) -> bool {
        match self.remaining.binary_search(&piece) {
            Ok(idx) => {
                self.remaining.remove(idx);
                self.placed.push(piece);
                true
            }
            Err(_) => false,
        }
    }
}

/// An accepted move as recorded in the history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    /// 1-based move number
    pub number: u32,
    pub player: Player,
    pub piece: PieceId,
    pub orientation: usize,
    pub anchor: Coord,
    pub cells: Vec<Coord>,
}

#[derive(Clone, Debug)]
pub struct GameSession {
    id: SessionId,
    config: GameConfig,
    board: Board,
    players: [PlayerState; 2],
    turn: TurnState,
    move_count: u32,
    history: Vec<Placement>,
}

impl GameSession {
    /// Start a game: empty board, full inventories, Player One to open.
    pub fn new(
        id: SessionId,
        player1: PlayerId,
        player2: PlayerId,
        config: GameConfig,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        if player1 == player2 {
            return Err(EngineError::DuplicatePlayer { player: player1 });
        }

        let catalog = catalog();
        let board = Board::new(config.board_size);
        let players = [
            PlayerState::new(player1, Player::One, board.home_corner(Player::One), catalog),
            PlayerState::new(player2, Player::Two, board.home_corner(Player::Two), catalog),
        ];
        let mut session = Self {
            id,
            config,
            board,
            players,
            turn: TurnState::Finished,
            move_count: 0,
            history: Vec::new(),
        };
        let avail = session.availability();
        session.turn = TurnState::opening(&avail);
        session.set_passed(&avail);

        info!(session = %id, %player1, %player2, size = config.board_size, "session created");
        Ok(session)
    }

    #[inline]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[inline]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn turn(&self) -> TurnState {
        self.turn
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.turn.is_finished()
    }

    #[inline]
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn history(&self) -> &[Placement] {
        &self.history
    }

    #[inline]
    pub fn player(&self, seat: Player) -> &PlayerState {
        &self.players[seat.index()]
    }

    pub fn players(&self) -> &[PlayerState; 2] {
        &self.players
    }

    pub fn player_ids(&self) -> [PlayerId; 2] {
        [self.players[0].id, self.players[1].id]
    }

    /// Seat of an external player id.
    pub fn seat_of(&self, id: PlayerId) -> Option<Player> {
        self.players.iter().find(|p| p.id == id).map(|p| p.seat)
    }

    /// External id of the player to move.
    pub fn active_player(&self) -> Option<PlayerId> {
        self.turn.active().map(|seat| self.player(seat).id)
    }

    pub fn available_pieces(&self, seat: Player) -> Vec<PieceId> {
        self.player(seat).remaining.clone()
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        self.board.snapshot(self.player_ids())
    }

    pub fn has_legal_move(&self, seat: Player) -> bool {
        movegen::has_legal_move(&self.board, self.player(seat), catalog())
    }

    pub fn legal_moves(&self, seat: Player) -> Vec<LegalMove> {
        movegen::legal_moves(&self.board, self.player(seat), catalog())
    }

    /// Final scores, once the game is over.
    pub fn result(&self) -> Option<GameResult> {
        if self.is_finished() {
            Some(score::score_game(&self.players, catalog(), &self.config.scoring))
        } else {
            None
        }
    }

    /// Validate and, if legal, apply a placement.
    ///
    /// On error the session is untouched.
    pub fn submit(
        &mut self,
        seat: Player,
        piece: PieceId,
        orientation: usize,
        anchor: (i32, i32),
    ) -> Result<&Placement, MoveError> {
        match validate::validate_move(self, catalog(), seat, piece, orientation, anchor) {
            Ok(mv) => Ok(self.apply(mv)),
            Err(err) => {
                debug!(session = %self.id, ?seat, piece = piece.0, orientation, ?anchor, %err, "move rejected");
                Err(err)
            }
        }
    }

    fn apply(&mut self, mv: ValidatedMove) -> &Placement {
        let seat = mv.player;
        let taken = self.players[seat.index()].take_piece(mv.piece);
        debug_assert!(taken, "validated piece missing from inventory");
        self.board.place(&mv.cells, seat);
        self.move_count += 1;
        self.history.push(Placement {
            number: self.move_count,
            player: seat,
            piece: mv.piece,
            orientation: mv.orientation,
            anchor: mv.anchor,
            cells: mv.cells,
        });

        let avail = self.availability();
        self.turn = TurnState::after_move(seat, &avail);
        self.set_passed(&avail);

        debug!(
            session = %self.id,
            ?seat,
            piece = mv.piece.0,
            move_number = self.move_count,
            turn = %self.turn,
            "move accepted"
        );
        if self.turn.is_finished() {
            info!(session = %self.id, moves = self.move_count, "game finished");
        }

        let last = self.history.len() - 1;
        &self.history[last]
    }

    fn availability(&self) -> Availability {
        Availability {
            can_move: [
                self.has_legal_move(Player::One),
                self.has_legal_move(Player::Two),
            ],
            has_placed: [self.players[0].has_placed(), self.players[1].has_placed()],
        }
    }

    fn set_passed(&mut self, avail: &Availability) {
        let passed = avail.passed();
        for player in &mut self.players {
            player.passed = passed[player.seat.index()];
        }
    }
}
