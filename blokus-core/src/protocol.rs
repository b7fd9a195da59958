//! JSON request/response envelopes.
//!
//! An outer transport forwards request bodies here unchanged:
//!
//! ```text
//! {"method": "createGame", "player1Id": 1, "player2Id": 2}
//! {"method": "makeMove", "gameId": 1, "playerId": 1, "pieceId": 4, "orientation": 0, "startX": 0, "startY": 0}
//! {"method": "availablePieces", "gameId": 1, "playerId": 2}
//!
//! -> {"success": true, "message": "...", "data": {...}}
//! ```
//!
//! Every request gets a response; malformed input and engine errors come back with
//! `success: false` and a message.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

use crate::config::GameConfig;
use crate::engine::{Engine, MoveRequest};
use crate::error::EngineError;
use crate::pieces::PieceId;
use crate::{PlayerId, SessionId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Request {
    CreateGame {
        player1_id: PlayerId,
        player2_id: PlayerId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        config: Option<GameConfig>,
    },
    MakeMove {
        game_id: SessionId,
        player_id: PlayerId,
        piece_id: PieceId,
        #[serde(default)]
        orientation: usize,
        start_x: i32,
        start_y: i32,
    },
    AvailablePieces {
        game_id: SessionId,
        player_id: PlayerId,
    },
    BoardSnapshot {
        game_id: SessionId,
    },
    #[serde(rename = "result")]
    GameResult {
        game_id: SessionId,
    },
    LegalMoves {
        game_id: SessionId,
        player_id: PlayerId,
    },
    CloseGame {
        game_id: SessionId,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Response {
    pub fn ok(message: impl Into<String>, data: impl Serialize) -> Response {
        match serde_json::to_value(data) {
            Ok(data) => Response {
                success: true,
                message: Some(message.into()),
                data: Some(data),
            },
            Err(err) => Response::failure(format!("failed to encode response: {err}")),
        }
    }

    pub fn failure(message: impl Into<String>) -> Response {
        Response {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }

    fn from_engine<T: Serialize>(message: &str, result: Result<T, EngineError>) -> Response {
        match result {
            Ok(data) => Response::ok(message, data),
            Err(err) => Response::failure(err.to_string()),
        }
    }
}

impl Engine {
    /// Run one request.
    pub fn dispatch(&self, request: Request) -> Response {
        match request {
            Request::CreateGame {
                player1_id,
                player2_id,
                config,
            } => {
                let created = match config {
                    Some(config) => self.create_session_with(player1_id, player2_id, config),
                    None => self.create_session(player1_id, player2_id),
                };
                Response::from_engine(
                    "Game initialized",
                    created.map(|id| json!({ "gameId": id })),
                )
            }

            Request::MakeMove {
                game_id,
                player_id,
                piece_id,
                orientation,
                start_x,
                start_y,
            } => {
                let request = MoveRequest {
                    session: game_id,
                    player: player_id,
                    piece: piece_id,
                    orientation,
                    x: start_x,
                    y: start_y,
                };
                match self.submit_move(request) {
                    Ok(outcome) => {
                        let message = match &outcome.error {
                            None => "Move successful".to_string(),
                            Some(err) => err.to_string(),
                        };
                        let mut response = Response::ok(message, &outcome);
                        response.success = response.success && outcome.accepted;
                        response
                    }
                    Err(err) => Response::failure(err.to_string()),
                }
            }

            Request::AvailablePieces { game_id, player_id } => Response::from_engine(
                "Available pieces",
                self.available_pieces(game_id, player_id),
            ),

            Request::BoardSnapshot { game_id } => {
                Response::from_engine("Board state", self.board_snapshot(game_id))
            }

            Request::GameResult { game_id } => Response::from_engine("Game over", self.result(game_id)),

            Request::LegalMoves { game_id, player_id } => {
                Response::from_engine("Legal moves", self.legal_moves(game_id, player_id))
            }

            Request::CloseGame { game_id } => {
                if self.close_session(game_id) {
                    Response::ok("Game closed", json!({ "gameId": game_id }))
                } else {
                    Response::failure(EngineError::SessionNotFound { session: game_id }.to_string())
                }
            }
        }
    }

    /// Parse, run, and encode one JSON request.
    pub fn dispatch_json(&self, body: &str) -> String {
        let response = match serde_json::from_str::<Request>(body) {
            Ok(request) => self.dispatch(request),
            Err(err) => {
                warn!(%err, "malformed request");
                Response::failure(format!("Invalid request: {err}"))
            }
        };
        serde_json::to_string(&response)
            .unwrap_or_else(|_| r#"{"success":false,"message":"failed to encode response"}"#.to_string())
    }
}
