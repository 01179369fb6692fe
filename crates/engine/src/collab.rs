//! Reference collaborators

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::events::{Collaborator, Signal};
use crate::types::{GameEvent, DEFAULT_DAMAGE_PER_TILE, SCORE_PER_TILE};

/// Default boss health
pub const DEFAULT_BOSS_HP: u32 = 200;

/// Score tally rebuilt purely from `TilesCleared` events, zeroed on `LevelStarted`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreKeeper {
    score: u32,
    tiles: u32,
}

impl ScoreKeeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn tiles(&self) -> u32 {
        self.tiles
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Collaborator for ScoreKeeper {
    fn on_event(&mut self, event: &GameEvent) -> Option<Signal> {
        match event {
            GameEvent::TilesCleared { count, .. } => {
                self.tiles += count;
                self.score += count * SCORE_PER_TILE;
            }
            GameEvent::LevelStarted { .. } => self.reset(),
            _ => {}
        }
        None
    }
}

/// Boss that takes `count x damage_per_tile` per clear and reports its defeat once per level
///
/// Health is restored whenever a level starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BossHealth {
    name: String,
    max_hp: u32,
    hp: u32,
    damage_per_tile: u32,
    defeated: bool,
}

impl BossHealth {
    /// `max_hp` is raised to at least 1
    pub fn new(name: impl Into<String>, max_hp: u32, damage_per_tile: u32) -> Self {
        let max_hp = max_hp.max(1);
        Self {
            name: name.into(),
            max_hp,
            hp: max_hp,
            damage_per_tile,
            defeated: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn max_hp(&self) -> u32 {
        self.max_hp
    }

    pub fn is_defeated(&self) -> bool {
        self.defeated
    }

    /// Apply raw damage; returns true only on the hit that defeats the boss
    pub fn apply_damage(&mut self, amount: u32) -> bool {
        if self.defeated || amount == 0 {
            return false;
        }
        self.hp = self.hp.saturating_sub(amount);
        if self.hp == 0 {
            self.defeated = true;
            info!(boss = %self.name, "boss defeated");
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        self.hp = self.max_hp;
        self.defeated = false;
    }
}

impl Default for BossHealth {
    fn default() -> Self {
        Self::new("boss", DEFAULT_BOSS_HP, DEFAULT_DAMAGE_PER_TILE)
    }
}

impl Collaborator for BossHealth {
    fn on_event(&mut self, event: &GameEvent) -> Option<Signal> {
        match event {
            GameEvent::TilesCleared { count, .. } => {
                let damage = count.saturating_mul(self.damage_per_tile);
                self.apply_damage(damage).then_some(Signal::BossDefeated)
            }
            GameEvent::LevelStarted { .. } => {
                self.reset();
                None
            }
            _ => None,
        }
    }
}
