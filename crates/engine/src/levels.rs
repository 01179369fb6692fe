//! Level queue - ordered levels with wrap-around progression

use serde::{Deserialize, Serialize};

use crate::core::{ConfigError, LevelConfig};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelQueue {
    levels: Vec<LevelConfig>,
    index: usize,
}

impl LevelQueue {
    pub fn new(levels: Vec<LevelConfig>) -> Result<Self, ConfigError> {
        if levels.is_empty() {
            return Err(ConfigError::EmptyLevelQueue);
        }
        Ok(Self { levels, index: 0 })
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> &LevelConfig {
        &self.levels[self.index]
    }

    /// Select a level; out-of-range indices clamp to the last level
    pub fn select(&mut self, index: usize) -> &LevelConfig {
        self.index = index.min(self.levels.len() - 1);
        self.current()
    }

    /// Move to the next level, wrapping to the first after the last
    pub fn advance(&mut self) -> &LevelConfig {
        self.index = (self.index + 1) % self.levels.len();
        self.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue() -> LevelQueue {
        LevelQueue::new(vec![
            LevelConfig::plain(6, 6, 4, 10),
            LevelConfig::plain(7, 7, 5, 20),
            LevelConfig::plain(8, 8, 6, 30),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_queue_rejected() {
        assert_eq!(LevelQueue::new(Vec::new()), Err(ConfigError::EmptyLevelQueue));
    }

    #[test]
    fn test_advance_wraps() {
        let mut q = queue();
        assert_eq!(q.advance().rows, 7);
        assert_eq!(q.advance().rows, 8);
        assert_eq!(q.advance().rows, 6);
        assert_eq!(q.index(), 0);
    }

    #[test]
    fn test_select_clamps() {
        let mut q = queue();
        assert_eq!(q.select(99).move_limit, 30);
        assert_eq!(q.index(), 2);
    }
}
