//! Self-play statistics tracking.

use std::time::Instant;

use blokus_core::Outcome;

use crate::runner::GameSummary;

/// Aggregates over every finished game.
#[derive(Debug, Default)]
pub struct SimStats {
    pub games: u64,

    /// Outcomes by seat
    pub p1_wins: u64,
    pub p2_wins: u64,
    pub ties: u64,

    pub total_moves: u64,
    pub min_moves: Option<u32>,
    pub max_moves: u32,

    /// Turns handed back to the mover because the opponent was stuck
    pub total_skips: u64,

    /// Sum of final scores by seat, for averages
    pub score_sum: [i64; 2],

    /// Games where a seat placed all 21 pieces
    pub clean_sweeps: u64,

    start_time: Option<Instant>,
}

impl SimStats {
    pub fn new() -> Self {
        Self {
            start_time: Some(Instant::now()),
            ..Default::default()
        }
    }

    /// Fold one finished game into the totals
    pub fn record(&mut self, game: &GameSummary) {
        self.games += 1;
        match game.result.outcome {
            Outcome::Winner(id) if id == game.players[0] => self.p1_wins += 1,
            Outcome::Winner(_) => self.p2_wins += 1,
            Outcome::Tie => self.ties += 1,
        }

        self.total_moves += game.moves as u64;
        self.min_moves = Some(self.min_moves.map_or(game.moves, |m| m.min(game.moves)));
        self.max_moves = self.max_moves.max(game.moves);
        self.total_skips += game.skips as u64;

        for (sum, score) in self.score_sum.iter_mut().zip(&game.result.scores) {
            *sum += score.score as i64;
            if score.pieces_left == 0 {
                self.clean_sweeps += 1;
            }
        }
    }

    pub fn average_moves(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.total_moves as f64 / self.games as f64
    }

    pub fn average_score(&self, seat: usize) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.score_sum[seat] as f64 / self.games as f64
    }

    fn pct(&self, count: u64) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            100.0 * count as f64 / self.games as f64
        }
    }

    /// Print final summary
    pub fn print_summary(&self) {
        println!("Games played: {}", self.games);
        println!("  - P1 wins: {} ({:.1}%)", self.p1_wins, self.pct(self.p1_wins));
        println!("  - P2 wins: {} ({:.1}%)", self.p2_wins, self.pct(self.p2_wins));
        println!("  - Ties: {} ({:.1}%)", self.ties, self.pct(self.ties));
        println!(
            "Moves per game: avg {:.1}, min {}, max {}",
            self.average_moves(),
            self.min_moves.unwrap_or(0),
            self.max_moves
        );
        println!("Skipped turns: {}", self.total_skips);
        println!(
            "Average score: P1 {:.1}, P2 {:.1}",
            self.average_score(0),
            self.average_score(1)
        );
        println!("All pieces placed: {}", self.clean_sweeps);

        if let Some(start) = self.start_time {
            let elapsed = start.elapsed().as_secs_f64();
            if elapsed > 0.0 {
                println!("Average rate: {:.1} games/sec", self.games as f64 / elapsed);
            }
        }
    }
}
