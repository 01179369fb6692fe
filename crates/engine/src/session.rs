//! Per-level session state

use serde::{Deserialize, Serialize};

use crate::types::Outcome;

/// Resolver phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    #[default]
    Idle,
    Swapping,
    Resolving,
    Terminal,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Swapping => "swapping",
            Phase::Resolving => "resolving",
            Phase::Terminal => "terminal",
        }
    }

    /// A swap is mid-flight
    pub fn is_busy(&self) -> bool {
        matches!(self, Phase::Swapping | Phase::Resolving)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub moves_left: i32,
    pub score: u32,
    pub phase: Phase,
    pub terminal: Option<Outcome>,
    /// Win signal received, applied once the current step stabilizes
    pub win_pending: bool,
    /// Accepted swaps this level
    pub moves_made: u32,
    /// Monotonic episode id (increments on restart).
    pub episode_id: u32,
}

impl Session {
    pub fn new(moves_left: i32, episode_id: u32) -> Self {
        Self {
            moves_left,
            score: 0,
            phase: Phase::Idle,
            terminal: None,
            win_pending: false,
            moves_made: 0,
            episode_id,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal.is_some()
    }

    /// Spend one move
    pub fn consume_move(&mut self) -> i32 {
        self.moves_left -= 1;
        self.moves_made += 1;
        self.moves_left
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consume_move() {
        let mut session = Session::new(2, 0);
        assert_eq!(session.consume_move(), 1);
        assert_eq!(session.consume_move(), 0);
        assert_eq!(session.moves_made, 2);
    }

    #[test]
    fn test_busy_phases() {
        assert!(!Phase::Idle.is_busy());
        assert!(Phase::Swapping.is_busy());
        assert!(Phase::Resolving.is_busy());
        assert!(!Phase::Terminal.is_busy());
    }
}
