//! End-of-game scoring.
//!
//! Each player loses one point per cell left in their inventory. A player who placed
//! every piece gains `all_pieces_bonus`, plus `monomino_last_bonus` if the monomino
//! went down last. The higher score wins; equal scores tie.

use serde::Serialize;

use crate::config::ScoringRules;
use crate::pieces::{PieceCatalog, PieceId};
use crate::session::PlayerState;
use crate::{Player, PlayerId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "player", rename_all = "camelCase")]
pub enum Outcome {
    Winner(PlayerId),
    Tie,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerScore {
    pub player: PlayerId,
    pub seat: Player,
    pub placed_cells: u32,
    pub remaining_cells: u32,
    pub pieces_left: u32,
    pub bonus: i32,
    pub score: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    pub outcome: Outcome,
    /// Indexed by seat
    pub scores: [PlayerScore; 2],
}

impl GameResult {
    pub fn score_of(&self, player: PlayerId) -> Option<&PlayerScore> {
        self.scores.iter().find(|s| s.player == player)
    }
}

fn cells_of(pieces: &[PieceId], catalog: &PieceCatalog) -> u32 {
    pieces
        .iter()
        .filter_map(|&id| catalog.get(id))
        .map(|p| p.cell_count() as u32)
        .sum()
}

pub fn score_player(state: &PlayerState, catalog: &PieceCatalog, rules: &ScoringRules) -> PlayerScore {
    let remaining_cells = cells_of(state.remaining_pieces(), catalog);
    let placed_cells = cells_of(state.placed_pieces(), catalog);

    let mut bonus = 0;
    if state.remaining_pieces().is_empty() {
        bonus += rules.all_pieces_bonus;
        if state.last_placed() == Some(PieceId::MONOMINO) {
            bonus += rules.monomino_last_bonus;
        }
    }

    PlayerScore {
        player: state.id(),
        seat: state.seat(),
        placed_cells,
        remaining_cells,
        pieces_left: state.remaining_pieces().len() as u32,
        bonus,
        score: bonus - remaining_cells as i32,
    }
}

pub fn score_game(players: &[PlayerState; 2], catalog: &PieceCatalog, rules: &ScoringRules) -> GameResult {
    let scores = [
        score_player(&players[0], catalog, rules),
        score_player(&players[1], catalog, rules),
    ];
    let outcome = match scores[0].score.cmp(&scores[1].score) {
        std::cmp::Ordering::Greater => Outcome::Winner(scores[0].player),
        std::cmp::Ordering::Less => Outcome::Winner(scores[1].player),
        std::cmp::Ordering::Equal => Outcome::Tie,
    };
    GameResult { outcome, scores }
}
