//! Plays one game through the engine with a uniformly random legal-move policy.

use anyhow::{bail, Result};
use rand::rngs::StdRng;
use rand::Rng;
use tracing::debug;

use blokus_core::{BoardSnapshot, Engine, GameResult, MoveRequest, PlayerId, SessionId};

/// Everything recorded about one finished game.
#[derive(Debug)]
pub struct GameSummary {
    pub session: SessionId,
    pub players: [PlayerId; 2],
    pub moves: u32,
    /// Turns where the mover went again because the opponent was stuck
    pub skips: u32,
    pub result: GameResult,
    pub board: BoardSnapshot,
}

/// Play a full game between `players` and close the session.
pub fn play_game(engine: &Engine, players: [PlayerId; 2], rng: &mut StdRng) -> Result<GameSummary> {
    let session = engine.create_session(players[0], players[1])?;
    let mut moves = 0;
    let mut skips = 0;

    while let Some(player) = engine.session_view(session)?.active_player {
        let legal = engine.legal_moves(session, player)?;
        if legal.is_empty() {
            bail!("{session}: {player} is to move but has no legal move");
        }
        let choice = legal[rng.random_range(0..legal.len())];

        let outcome = engine.submit_move(MoveRequest {
            session,
            player,
            piece: choice.piece,
            orientation: choice.orientation,
            x: choice.anchor.x as i32,
            y: choice.anchor.y as i32,
        })?;
        if let Some(err) = outcome.error {
            bail!("{session}: generated move {choice:?} was refused: {err}");
        }

        moves += 1;
        if outcome.next_player == Some(player) {
            skips += 1;
        }
        debug!(%session, %player, piece = %choice.piece, options = legal.len(), "played");
    }

    let result = engine.result(session)?;
    let board = engine.board_snapshot(session)?;
    engine.close_session(session);

    Ok(GameSummary {
        session,
        players,
        moves,
        skips,
        result,
        board,
    })
}

/// Text grid: `.` empty, `1`/`2` by seat.
pub fn render(board: &BoardSnapshot, players: [PlayerId; 2]) -> String {
    board
        .cells
        .iter()
        .map(|row| {
            row.iter()
                .map(|owner| match owner {
                    Some(id) if *id == players[0] => '1',
                    Some(_) => '2',
                    None => '.',
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
