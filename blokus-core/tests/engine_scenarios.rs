//! Whole-game scenarios through the public engine API.
//!
//! Covers:
//! - The opening sequence and the first-move corner rule
//! - Contact rules against own and opposing pieces
//! - Reuse of a placed piece
//! - Permanent occupancy over random games
//! - Scores derived from what is left in each inventory
//! - The JSON protocol end to end

use blokus_core::{
    catalog, BoardSnapshot, Coord, Engine, GameConfig, MoveError, MoveOutcome, MoveRequest, Outcome, PieceId,
    PlayerId, SessionId, TurnState,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{json, Value};

const P1: PlayerId = PlayerId(1001);
const P2: PlayerId = PlayerId(2002);

fn piece(name: &str) -> PieceId {
    catalog().by_name(name).unwrap().id()
}

fn play(engine: &Engine, session: SessionId, player: PlayerId, name: &str, orientation: usize, x: i32, y: i32) -> MoveOutcome {
    engine
        .submit_move(MoveRequest {
            session,
            player,
            piece: piece(name),
            orientation,
            x,
            y,
        })
        .unwrap()
}

/// Both players open with the monomino in their home corners.
fn opened(engine: &Engine) -> SessionId {
    let game = engine.create_session(P1, P2).unwrap();
    assert!(play(engine, game, P1, "I1", 0, 0, 0).accepted);
    assert!(play(engine, game, P2, "I1", 0, 19, 19).accepted);
    game
}

fn owned(snapshot: &BoardSnapshot) -> Vec<(Coord, PlayerId)> {
    let mut cells = Vec::new();
    for (y, row) in snapshot.cells.iter().enumerate() {
        for (x, owner) in row.iter().enumerate() {
            if let Some(owner) = owner {
                cells.push((Coord::new(x as u8, y as u8), *owner));
            }
        }
    }
    cells
}

/// Play random legal moves until the game ends. Returns the number of moves made.
fn play_out(engine: &Engine, game: SessionId, rng: &mut StdRng) -> u32 {
    let mut before = owned(&engine.board_snapshot(game).unwrap());
    let mut moves = 0;
    while let Some(player) = engine.session_view(game).unwrap().active_player {
        let legal = engine.legal_moves(game, player).unwrap();
        assert!(!legal.is_empty(), "active player must have a move");
        let choice = legal[rng.random_range(0..legal.len())];
        let outcome = engine
            .submit_move(MoveRequest {
                session: game,
                player,
                piece: choice.piece,
                orientation: choice.orientation,
                x: choice.anchor.x as i32,
                y: choice.anchor.y as i32,
            })
            .unwrap();
        assert!(outcome.accepted, "{:?}", outcome.error);
        moves += 1;

        let after = owned(&outcome.board);
        for &(cell, owner) in &before {
            assert_eq!(outcome.board.owner(cell), Some(owner), "cell {cell} changed hands");
        }
        let added = after.len() - before.len();
        assert_eq!(added, catalog().get(choice.piece).unwrap().cell_count());
        before = after;
    }
    moves
}

#[test]
fn test_end_to_end_scenario() {
    let engine = Engine::new();
    let game = engine.create_session(P1, P2).unwrap();
    assert_eq!(engine.session_view(game).unwrap().turn, TurnState::AwaitingPlayer1First);

    let outcome = play(&engine, game, P1, "I1", 0, 0, 0);
    assert!(outcome.accepted);
    assert_eq!(outcome.next_player, Some(P2));
    assert_eq!(outcome.board.owner(Coord::new(0, 0)), Some(P1));

    let outcome = play(&engine, game, P2, "I1", 0, 0, 19);
    assert!(!outcome.accepted);
    assert_eq!(
        outcome.error,
        Some(MoveError::MustTouchHomeCorner {
            corner: Coord::new(19, 19)
        })
    );
    assert_eq!(outcome.next_player, Some(P2));

    let outcome = play(&engine, game, P2, "I1", 0, 19, 19);
    assert!(outcome.accepted);
    assert_eq!(outcome.next_player, Some(P1));
    assert_eq!(engine.session_view(game).unwrap().turn, TurnState::InProgress(blokus_core::Player::One));

    let mut rng = StdRng::seed_from_u64(2024);
    play_out(&engine, game, &mut rng);

    let view = engine.session_view(game).unwrap();
    assert_eq!(view.turn, TurnState::Finished);
    assert_eq!(view.passed, [true, true]);

    let result = engine.result(game).unwrap();
    for player in [P1, P2] {
        let remaining: u32 = engine
            .available_pieces(game, player)
            .unwrap()
            .iter()
            .map(|&id| catalog().cell_count(id).unwrap() as u32)
            .sum();
        let score = result.score_of(player).unwrap();
        assert_eq!(score.remaining_cells, remaining);
        assert_eq!(score.score, score.bonus - remaining as i32);
    }
    let [a, b] = &result.scores;
    let expected = match a.score.cmp(&b.score) {
        std::cmp::Ordering::Greater => Outcome::Winner(P1),
        std::cmp::Ordering::Less => Outcome::Winner(P2),
        std::cmp::Ordering::Equal => Outcome::Tie,
    };
    assert_eq!(result.outcome, expected);
    // Same state, same answer.
    assert_eq!(engine.result(game).unwrap(), result);
}

#[test]
fn test_first_move_away_from_corner() {
    let engine = Engine::new();
    let game = engine.create_session(P1, P2).unwrap();
    let outcome = play(&engine, game, P1, "O4", 0, 5, 5);
    assert_eq!(
        outcome.error,
        Some(MoveError::MustTouchHomeCorner {
            corner: Coord::new(0, 0)
        })
    );
    assert!(owned(&outcome.board).is_empty());
}

#[test]
fn test_self_edge_rejected_despite_corner_contact() {
    let engine = Engine::new();
    let game = opened(&engine);
    // Vertical domino on (1,0)-(1,1): (1,1) is diagonal to (0,0) but (1,0) shares its edge.
    let outcome = play(&engine, game, P1, "I2", 1, 1, 0);
    assert_eq!(
        outcome.error,
        Some(MoveError::EdgeAdjacentToSelf {
            cell: Coord::new(1, 0)
        })
    );
    assert!(play(&engine, game, P1, "I2", 1, 1, 1).accepted);
}

#[test]
fn test_opponent_edges_alone_do_not_connect() {
    let engine = Engine::new();
    let game = opened(&engine);
    let outcome = play(&engine, game, P1, "I2", 0, 17, 19);
    assert_eq!(outcome.error, Some(MoveError::NoCornerConnection));
}

#[test]
fn test_reusing_a_piece() {
    let engine = Engine::new();
    let game = opened(&engine);
    let outcome = play(&engine, game, P1, "I1", 0, 1, 1);
    assert!(!outcome.accepted);
    assert_eq!(outcome.error, Some(MoveError::PieceAlreadyUsed { piece: 0 }));
    assert_eq!(outcome.next_player, Some(P1));
}

#[test]
fn test_available_pieces_is_stable() {
    let engine = Engine::new();
    let game = opened(&engine);
    let first = engine.available_pieces(game, P1).unwrap();
    let second = engine.available_pieces(game, P1).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 20);
    assert!(!first.contains(&PieceId::MONOMINO));
}

#[test]
fn test_out_of_turn_and_out_of_bounds() {
    let engine = Engine::new();
    let game = opened(&engine);
    assert_eq!(
        play(&engine, game, P2, "I2", 0, 17, 17).error,
        Some(MoveError::NotYourTurn)
    );
    assert_eq!(
        play(&engine, game, P1, "I5", 0, 17, 1).error,
        Some(MoveError::OutOfBounds { x: 20, y: 1 })
    );
    assert_eq!(
        play(&engine, game, P1, "I2", 0, -1, 1).error,
        Some(MoveError::OutOfBounds { x: -1, y: 1 })
    );
}

#[test]
fn test_extreme_anchors_are_out_of_bounds() {
    let engine = Engine::new();
    let game = engine.create_session(P1, P2).unwrap();
    assert_eq!(
        play(&engine, game, P1, "F5", 0, i32::MAX, 0).error,
        Some(MoveError::OutOfBounds { x: i32::MAX, y: 0 })
    );
    assert!(matches!(
        play(&engine, game, P1, "L5", 0, 0, i32::MAX).error,
        Some(MoveError::OutOfBounds { .. })
    ));
    assert!(matches!(
        play(&engine, game, P1, "F5", 0, i32::MIN, i32::MIN).error,
        Some(MoveError::OutOfBounds { .. })
    ));

    // The session is still usable and the JSON path answers too.
    let body = json!({
        "method": "makeMove", "gameId": game, "playerId": P1,
        "pieceId": piece("F5"), "startX": i32::MAX, "startY": i32::MAX
    });
    let out: Value = serde_json::from_str(&engine.dispatch_json(&body.to_string())).unwrap();
    assert_eq!(out["data"]["error"]["kind"], "outOfBounds");
    assert!(play(&engine, game, P1, "I1", 0, 0, 0).accepted);
}

#[test]
fn test_random_games_terminate_with_consistent_scores() {
    let mut rng = StdRng::seed_from_u64(0x5EED);
    for size in [5u8, 7, 9, 12] {
        let engine = Engine::with_config(GameConfig::with_board_size(size)).unwrap();
        let game = engine.create_session(P1, P2).unwrap();
        let moves = play_out(&engine, game, &mut rng);
        assert!(moves <= 42);

        let view = engine.session_view(game).unwrap();
        assert_eq!(view.move_count, moves);
        let result = engine.result(game).unwrap();
        let snapshot = engine.board_snapshot(game).unwrap();
        for score in &result.scores {
            let on_board = owned(&snapshot).iter().filter(|(_, o)| *o == score.player).count() as u32;
            assert_eq!(score.placed_cells, on_board);
            assert_eq!(score.placed_cells + score.remaining_cells, 89);
        }
    }
}

#[test]
fn test_protocol_scenario() {
    let engine = Engine::new();
    let call = |body: Value| -> Value { serde_json::from_str(&engine.dispatch_json(&body.to_string())).unwrap() };

    let created = call(json!({"method": "createGame", "player1Id": 1, "player2Id": 2}));
    assert_eq!(created["success"], true);
    let game = created["data"]["gameId"].clone();

    let moved = call(json!({
        "method": "makeMove", "gameId": game, "playerId": 1,
        "pieceId": 0, "startX": 0, "startY": 0
    }));
    assert_eq!(moved["success"], true);
    assert_eq!(moved["message"], "Move successful");
    assert_eq!(moved["data"]["nextPlayer"], 2);
    assert_eq!(moved["data"]["board"]["cells"][0][0], 1);

    let refused = call(json!({
        "method": "makeMove", "gameId": game, "playerId": 2,
        "pieceId": 0, "startX": 0, "startY": 19
    }));
    assert_eq!(refused["success"], false);
    assert_eq!(refused["data"]["error"]["kind"], "mustTouchHomeCorner");

    let pieces = call(json!({"method": "availablePieces", "gameId": game, "playerId": 1}));
    assert_eq!(pieces["data"].as_array().unwrap().len(), 20);

    let result = call(json!({"method": "result", "gameId": game}));
    assert_eq!(result["success"], false);

    let legal = call(json!({"method": "legalMoves", "gameId": game, "playerId": 2}));
    assert!(!legal["data"].as_array().unwrap().is_empty());

    let closed = call(json!({"method": "closeGame", "gameId": game}));
    assert_eq!(closed["success"], true);
    assert_eq!(engine.session_count(), 0);
}
