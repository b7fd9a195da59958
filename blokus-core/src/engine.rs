//! Registry of live sessions and the public game operations.
//!
//! ```text
//! Engine
//!   sessions: RwLock<HashMap<SessionId, Arc<Mutex<GameSession>>>>
//!               |                            |
//!               |  held only to find/insert   |  held for one whole request
//! ```
//!
//! Moves on different sessions run in parallel; moves on one session are serialized
//! by its mutex, so each sees the state left by the previous one.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::board::BoardSnapshot;
use crate::config::GameConfig;
use crate::error::{EngineError, MoveError};
use crate::movegen::LegalMove;
use crate::pieces::PieceId;
use crate::score::GameResult;
use crate::session::GameSession;
use crate::turn::TurnState;
use crate::{Player, PlayerId, SessionId};

/// A placement submitted by a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    pub session: SessionId,
    pub player: PlayerId,
    pub piece: PieceId,
    #[serde(default)]
    pub orientation: usize,
    pub x: i32,
    pub y: i32,
}

/// What happened to a submitted move, plus the state the caller needs to redraw.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveOutcome {
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<MoveError>,
    pub board: BoardSnapshot,
    pub next_player: Option<PlayerId>,
    pub game_finished: bool,
}

/// Read-only summary of a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: SessionId,
    /// Seat One first
    pub players: [PlayerId; 2],
    pub turn: TurnState,
    pub active_player: Option<PlayerId>,
    pub move_count: u32,
    pub board_size: u8,
    /// Seats with no legal move at the last turn change
    pub passed: [bool; 2],
}

type SessionHandle = Arc<Mutex<GameSession>>;

/// Owns every live session.
pub struct Engine {
    sessions: RwLock<HashMap<SessionId, SessionHandle>>,
    next_id: AtomicU64,
    default_config: GameConfig,
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}

impl Engine {
    /// An engine creating standard 20x20 games.
    pub fn new() -> Engine {
        Engine {
            sessions: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            default_config: GameConfig::default(),
        }
    }

    /// An engine whose `create_session` uses `config`.
    pub fn with_config(config: GameConfig) -> Result<Engine, EngineError> {
        config.validate()?;
        Ok(Engine {
            default_config: config,
            ..Engine::new()
        })
    }

    #[inline]
    pub fn default_config(&self) -> &GameConfig {
        &self.default_config
    }

    // ========================================================================
    // Session lifecycle
    // ========================================================================

    /// Start a game between two players with the engine's default config.
    pub fn create_session(&self, player1: PlayerId, player2: PlayerId) -> Result<SessionId, EngineError> {
        self.create_session_with(player1, player2, self.default_config)
    }

    #[instrument(skip(self, config), fields(size = config.board_size))]
    pub fn create_session_with(
        &self,
        player1: PlayerId,
        player2: PlayerId,
        config: GameConfig,
    ) -> Result<SessionId, EngineError> {
        let id = SessionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let session = GameSession::new(id, player1, player2, config)?;
        self.write_sessions()
            .insert(id, Arc::new(Mutex::new(session)));
        Ok(id)
    }

    /// Drop a session. Returns false if it did not exist.
    #[instrument(skip(self))]
    pub fn close_session(&self, session: SessionId) -> bool {
        let removed = self.write_sessions().remove(&session).is_some();
        if removed {
            info!(%session, "session closed");
        }
        removed
    }

    pub fn session_count(&self) -> usize {
        self.read_sessions().len()
    }

    // ========================================================================
    // Game operations
    // ========================================================================

    /// Validate and apply a move.
    ///
    /// Rule violations come back as `accepted: false` with the reason; the error
    /// path is only for a missing session or a player not seated in it.
    #[instrument(skip(self, request), fields(session = %request.session, player = %request.player))]
    pub fn submit_move(&self, request: MoveRequest) -> Result<MoveOutcome, EngineError> {
        self.with_session(request.session, |session| {
            let seat = seat_of(session, request.player)?;
            let error = session
                .submit(seat, request.piece, request.orientation, (request.x, request.y))
                .err();
            if let Some(err) = &error {
                debug!(kind = err.kind(), "move refused");
            }
            Ok(MoveOutcome {
                accepted: error.is_none(),
                error,
                board: session.snapshot(),
                next_player: session.active_player(),
                game_finished: session.is_finished(),
            })
        })
    }

    /// Unused pieces of a player, ascending id.
    pub fn available_pieces(&self, session: SessionId, player: PlayerId) -> Result<Vec<PieceId>, EngineError> {
        self.with_session(session, |s| {
            let seat = seat_of(s, player)?;
            Ok(s.available_pieces(seat))
        })
    }

    pub fn board_snapshot(&self, session: SessionId) -> Result<BoardSnapshot, EngineError> {
        self.with_session(session, |s| Ok(s.snapshot()))
    }

    /// Final scores. Fails with `GameNotFinished` while moves remain.
    pub fn result(&self, session: SessionId) -> Result<GameResult, EngineError> {
        self.with_session(session, |s| {
            s.result().ok_or(EngineError::GameNotFinished { session })
        })
    }

    pub fn session_view(&self, session: SessionId) -> Result<SessionView, EngineError> {
        self.with_session(session, |s| {
            Ok(SessionView {
                id: s.id(),
                players: s.player_ids(),
                turn: s.turn(),
                active_player: s.active_player(),
                move_count: s.move_count(),
                board_size: s.board().size(),
                passed: [s.player(Player::One).passed(), s.player(Player::Two).passed()],
            })
        })
    }

    /// Every legal placement open to `player` on the current board.
    ///
    /// Empty when the game is over. A player waiting for the opponent still gets
    /// the moves they could make on their next turn.
    pub fn legal_moves(&self, session: SessionId, player: PlayerId) -> Result<Vec<LegalMove>, EngineError> {
        self.with_session(session, |s| {
            let seat = seat_of(s, player)?;
            if s.is_finished() {
                return Ok(Vec::new());
            }
            Ok(s.legal_moves(seat))
        })
    }

    // ========================================================================
    // Locking
    // ========================================================================

    fn read_sessions(&self) -> std::sync::RwLockReadGuard<'_, HashMap<SessionId, SessionHandle>> {
        self.sessions.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_sessions(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<SessionId, SessionHandle>> {
        self.sessions.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn handle(&self, session: SessionId) -> Result<SessionHandle, EngineError> {
        self.read_sessions()
            .get(&session)
            .cloned()
            .ok_or(EngineError::SessionNotFound { session })
    }

    /// Run `f` with the session locked. The map lock is released first.
    fn with_session<T>(
        &self,
        session: SessionId,
        f: impl FnOnce(&mut GameSession) -> Result<T, EngineError>,
    ) -> Result<T, EngineError> {
        let handle = self.handle(session)?;
        let mut guard = lock(&handle);
        f(&mut guard)
    }
}

// A session is only mutated after validation passes, so a poisoned lock still
// guards a consistent game.
fn lock(handle: &Mutex<GameSession>) -> MutexGuard<'_, GameSession> {
    handle.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn seat_of(session: &GameSession, player: PlayerId) -> Result<Player, EngineError> {
    session.seat_of(player).ok_or(EngineError::PlayerNotInSession {
        session: session.id(),
        player,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::catalog;

    const ALICE: PlayerId = PlayerId(11);
    const BOB: PlayerId = PlayerId(22);

    fn id(name: &str) -> PieceId {
        catalog().by_name(name).unwrap().id()
    }

    fn mv(session: SessionId, player: PlayerId, piece: &str, orientation: usize, x: i32, y: i32) -> MoveRequest {
        MoveRequest {
            session,
            player,
            piece: id(piece),
            orientation,
            x,
            y,
        }
    }

    #[test]
    fn test_session_ids_are_unique() {
        let engine = Engine::new();
        let a = engine.create_session(ALICE, BOB).unwrap();
        let b = engine.create_session(ALICE, BOB).unwrap();
        assert_ne!(a, b);
        assert_eq!(engine.session_count(), 2);
    }

    #[test]
    fn test_create_rejects_bad_input() {
        let engine = Engine::new();
        assert_eq!(
            engine.create_session(ALICE, ALICE),
            Err(EngineError::DuplicatePlayer { player: ALICE })
        );
        assert!(matches!(
            engine.create_session_with(ALICE, BOB, GameConfig::with_board_size(0)),
            Err(EngineError::InvalidConfig { .. })
        ));
        assert!(Engine::with_config(GameConfig::with_board_size(99)).is_err());
        assert_eq!(engine.session_count(), 0);
    }

    #[test]
    fn test_unknown_session_and_player() {
        let engine = Engine::new();
        let missing = SessionId(404);
        assert_eq!(
            engine.board_snapshot(missing),
            Err(EngineError::SessionNotFound { session: missing })
        );
        let game = engine.create_session(ALICE, BOB).unwrap();
        let stranger = PlayerId(99);
        assert_eq!(
            engine.submit_move(mv(game, stranger, "I1", 0, 0, 0)),
            Err(EngineError::PlayerNotInSession {
                session: game,
                player: stranger
            })
        );
    }

    #[test]
    fn test_rejected_move_is_reported_not_raised() {
        let engine = Engine::new();
        let game = engine.create_session(ALICE, BOB).unwrap();
        let outcome = engine.submit_move(mv(game, BOB, "I1", 0, 19, 19)).unwrap();
        assert!(!outcome.accepted);
        assert_eq!(outcome.error, Some(MoveError::NotYourTurn));
        assert_eq!(outcome.next_player, Some(ALICE));
        assert!(!outcome.game_finished);
        assert_eq!(outcome.board.owner(crate::Coord::new(19, 19)), None);
    }

    #[test]
    fn test_accepted_move_updates_state() {
        let engine = Engine::new();
        let game = engine.create_session(ALICE, BOB).unwrap();
        let outcome = engine.submit_move(mv(game, ALICE, "I2", 0, 0, 0)).unwrap();
        assert!(outcome.accepted);
        assert_eq!(outcome.error, None);
        assert_eq!(outcome.next_player, Some(BOB));
        assert_eq!(outcome.board.owner(crate::Coord::new(1, 0)), Some(ALICE));

        let pieces = engine.available_pieces(game, ALICE).unwrap();
        assert_eq!(pieces.len(), 20);
        assert!(!pieces.contains(&id("I2")));
        assert!(pieces.windows(2).all(|w| w[0] < w[1]));

        let view = engine.session_view(game).unwrap();
        assert_eq!(view.move_count, 1);
        assert_eq!(view.turn, TurnState::AwaitingPlayer2First);
        assert_eq!(view.players, [ALICE, BOB]);
    }

    #[test]
    fn test_result_requires_finished_game() {
        let engine = Engine::new();
        let game = engine.create_session(ALICE, BOB).unwrap();
        assert_eq!(
            engine.result(game),
            Err(EngineError::GameNotFinished { session: game })
        );
    }

    #[test]
    fn test_tiny_board_plays_out() {
        let engine = Engine::new();
        let game = engine
            .create_session_with(ALICE, BOB, GameConfig::with_board_size(2))
            .unwrap();
        let outcome = engine.submit_move(mv(game, ALICE, "O4", 0, 0, 0)).unwrap();
        assert!(outcome.accepted);
        assert!(outcome.game_finished);
        assert_eq!(outcome.next_player, None);
        assert!(engine.legal_moves(game, BOB).unwrap().is_empty());

        let result = engine.result(game).unwrap();
        assert_eq!(result.outcome, crate::Outcome::Winner(ALICE));
        assert_eq!(result.score_of(BOB).unwrap().remaining_cells, 89);

        let again = engine.submit_move(mv(game, ALICE, "I1", 0, 1, 1)).unwrap();
        assert_eq!(again.error, Some(MoveError::GameFinished));
    }

    #[test]
    fn test_close_session() {
        let engine = Engine::new();
        let game = engine.create_session(ALICE, BOB).unwrap();
        assert!(engine.close_session(game));
        assert!(!engine.close_session(game));
        assert_eq!(engine.session_count(), 0);
        assert!(engine.session_view(game).is_err());
    }

    #[test]
    fn test_sessions_are_independent_across_threads() {
        let engine = Arc::new(Engine::with_config(GameConfig::with_board_size(8)).unwrap());
        let games: Vec<SessionId> = (0..4)
            .map(|i| engine.create_session(PlayerId(i * 2), PlayerId(i * 2 + 1)).unwrap())
            .collect();

        let threads: Vec<_> = games
            .iter()
            .enumerate()
            .map(|(i, &game)| {
                let engine = Arc::clone(&engine);
                std::thread::spawn(move || {
                    let p1 = PlayerId(i as u64 * 2);
                    engine.submit_move(MoveRequest {
                        session: game,
                        player: p1,
                        piece: PieceId(4),
                        orientation: 0,
                        x: 0,
                        y: 0,
                    })
                })
            })
            .collect();

        for handle in threads {
            assert!(handle.join().unwrap().unwrap().accepted);
        }
        for game in games {
            assert_eq!(engine.session_view(game).unwrap().move_count, 1);
        }
    }
}
