//! Animation timeline - command/acknowledgement queue
//!
//! The engine pushes one command per resolved step after the grid for that step is final.
//! A scheduler pops commands at its own pace and acknowledges them by id. Nothing here feeds
//! back into grid state.

use std::collections::{BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::TileMove;
use crate::types::{Pos, SpecialType, Tile};

pub type CommandId = u64;

/// Queued commands kept for a scheduler; the oldest is dropped once the queue is full.
/// One swap pushes far fewer than this, so a scheduler that keeps up never loses one.
pub const MAX_QUEUED_COMMANDS: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "camelCase")]
pub enum TimelineStep {
    Swap { a: Pos, b: Pos },
    /// Fruitless swap played back
    RevertSwap { a: Pos, b: Pos },
    /// Manually activated specials and the cells their effect covers
    Activate {
        origins: Vec<(Pos, SpecialType)>,
        cells: Vec<Pos>,
    },
    Clear {
        cells: Vec<Pos>,
        spawned: Vec<(Pos, SpecialType)>,
    },
    Collapse { moves: Vec<TileMove> },
    Refill { tiles: Vec<Tile> },
}

impl TimelineStep {
    pub fn name(&self) -> &'static str {
        match self {
            TimelineStep::Swap { .. } => "swap",
            TimelineStep::RevertSwap { .. } => "revertSwap",
            TimelineStep::Activate { .. } => "activate",
            TimelineStep::Clear { .. } => "clear",
            TimelineStep::Collapse { .. } => "collapse",
            TimelineStep::Refill { .. } => "refill",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub id: CommandId,
    pub step: TimelineStep,
}

#[derive(Debug, Clone, Default)]
pub struct Timeline {
    next_id: CommandId,
    queued: VecDeque<Command>,
    in_flight: BTreeSet<CommandId>,
    dropped: u64,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a step; ids increase monotonically for the timeline's lifetime
    pub fn push(&mut self, step: TimelineStep) -> CommandId {
        let id = self.next_id;
        self.next_id += 1;
        if self.queued.len() >= MAX_QUEUED_COMMANDS {
            if self.dropped == 0 {
                warn!(limit = MAX_QUEUED_COMMANDS, "timeline not consumed, dropping oldest commands");
            }
            self.queued.pop_front();
            self.dropped += 1;
        }
        self.queued.push_back(Command { id, step });
        id
    }

    /// Hand the oldest queued command to the scheduler
    pub fn pop(&mut self) -> Option<Command> {
        let command = self.queued.pop_front()?;
        self.in_flight.insert(command.id);
        Some(command)
    }

    pub fn peek(&self) -> Option<&Command> {
        self.queued.front()
    }

    /// Mark a popped command as played. Unknown ids return false.
    pub fn acknowledge(&mut self, id: CommandId) -> bool {
        self.in_flight.remove(&id)
    }

    /// Pop and acknowledge everything (headless consumers)
    pub fn drain(&mut self) -> Vec<Command> {
        self.in_flight.clear();
        self.queued.drain(..).collect()
    }

    /// Nothing queued and nothing awaiting acknowledgement
    pub fn is_settled(&self) -> bool {
        self.queued.is_empty() && self.in_flight.is_empty()
    }

    pub fn queued_len(&self) -> usize {
        self.queued.len()
    }

    pub fn in_flight_len(&self) -> usize {
        self.in_flight.len()
    }

    /// Commands discarded unplayed because the queue was full
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Drop all pending commands; ids keep counting
    pub fn reset(&mut self) {
        self.queued.clear();
        self.in_flight.clear();
    }
}
