//! Turn state machine.
//!
//! ```text
//!   AwaitingPlayer1First --P1 moves--> AwaitingPlayer2First --P2 moves--> InProgress(P1)
//!                                                                             |    ^
//!                                                                             v    |
//!                                                                         InProgress(P2)
//!   any state --neither seat can move--> Finished
//! ```
//!
//! The machine itself is pure: callers pass in which seats can still move and which
//! have placed a piece, and get back the next state plus the `passed` flags.

use serde::{Deserialize, Serialize};

use crate::Player;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(tag = "state", content = "player", rename_all = "camelCase")]
pub enum TurnState {
    AwaitingPlayer1First,
    AwaitingPlayer2First,
    InProgress(Player),
    Finished,
}

/// Facts about both seats that drive a transition, indexed by `Player::index`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Availability {
    pub can_move: [bool; 2],
    pub has_placed: [bool; 2],
}

impl Availability {
    #[inline]
    pub fn can_move(&self, player: Player) -> bool {
        self.can_move[player.index()]
    }

    #[inline]
    pub fn has_placed(&self, player: Player) -> bool {
        self.has_placed[player.index()]
    }

    /// Seats without a legal move are marked passed.
    #[inline]
    pub fn passed(&self) -> [bool; 2] {
        [!self.can_move[0], !self.can_move[1]]
    }
}

impl TurnState {
    /// Seat expected to move, if any.
    #[inline]
    pub fn active(self) -> Option<Player> {
        match self {
            TurnState::AwaitingPlayer1First => Some(Player::One),
            TurnState::AwaitingPlayer2First => Some(Player::Two),
            TurnState::InProgress(player) => Some(player),
            TurnState::Finished => None,
        }
    }

    #[inline]
    pub fn is_finished(self) -> bool {
        self == TurnState::Finished
    }

    /// State in which `player` is to move.
    fn to_move(player: Player, avail: &Availability) -> TurnState {
        match (player, avail.has_placed(player)) {
            (Player::One, false) => TurnState::AwaitingPlayer1First,
            (Player::Two, false) => TurnState::AwaitingPlayer2First,
            (player, true) => TurnState::InProgress(player),
        }
    }

    /// State at game creation. Player One opens whenever it can.
    pub fn opening(avail: &Availability) -> TurnState {
        Player::all()
            .find(|&p| avail.can_move(p))
            .map(|p| TurnState::to_move(p, avail))
            .unwrap_or(TurnState::Finished)
    }

    /// State after `mover` had a placement accepted.
    ///
    /// The opponent moves next if it can. Otherwise it is skipped and the mover goes
    /// again; a skipped seat is looked at afresh after every later move. When neither
    /// seat can move the game is over.
    pub fn after_move(mover: Player, avail: &Availability) -> TurnState {
        let other = mover.opponent();
        if avail.can_move(other) {
            TurnState::to_move(other, avail)
        } else if avail.can_move(mover) {
            TurnState::to_move(mover, avail)
        } else {
            TurnState::Finished
        }
    }
}

impl std::fmt::Display for TurnState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TurnState::AwaitingPlayer1First => write!(f, "awaiting player 1 first move"),
            TurnState::AwaitingPlayer2First => write!(f, "awaiting player 2 first move"),
            TurnState::InProgress(p) => write!(f, "player {} to move", *p as u8),
            TurnState::Finished => write!(f, "finished"),
        }
    }
}
