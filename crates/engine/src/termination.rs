//! Termination policy
//!
//! Consulted only once a step has stabilized. Win (boss signal or target score) preempts a
//! lose on the same step; a session that is already terminal never fires again.

use crate::core::LevelConfig;
use crate::session::Session;
use crate::types::Outcome;

pub fn evaluate(session: &Session, level: &LevelConfig) -> Option<Outcome> {
    if session.is_terminal() {
        return None;
    }
    if session.win_pending || target_reached(session, level) {
        return Some(Outcome::Win);
    }
    if session.moves_left <= 0 {
        return Some(Outcome::Lose);
    }
    None
}

fn target_reached(session: &Session, level: &LevelConfig) -> bool {
    level
        .target_score
        .is_some_and(|target| session.score >= target)
}
