//! Cascade resolver - the swap state machine
//!
//! `Idle -> Swapping -> Resolving -> Idle`, or `-> Terminal` once the termination policy
//! fires. A swap is processed to full stability inside [`Engine::try_swap`]; the grid is
//! final before any event or timeline command for a step goes out.

use std::collections::{BTreeMap, BTreeSet};

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::core::{
    activation_area, apply_clear, collapse, expand, fill_empty, find_matches, populate,
    swap_activations, Board, ConfigError, LevelConfig, SpawnContext, TileFactory, TileSource,
};
use crate::events::{Collaborator, EventBus, Signal};
use crate::session::{Phase, Session};
use crate::snapshot::{board_hash, cells_of, EngineSnapshot};
use crate::termination;
use crate::timeline::{Timeline, TimelineStep};
use crate::types::{GameEvent, InvalidReason, Outcome, Pos, SpecialType, SwapRequest, SCORE_PER_TILE};

/// Upper bound on clear steps for a single swap
pub const MAX_CASCADE_STEPS: u32 = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineOptions {
    /// Reject swaps as `Busy` until every timeline command has been acknowledged
    pub hold_input_until_settled: bool,
    /// Push timeline commands; headless runs can turn this off
    pub record_timeline: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            hold_input_until_settled: false,
            record_timeline: true,
        }
    }
}

/// Summary of one accepted swap
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwapReport {
    /// Tiles destroyed across every step
    pub cleared_total: u32,
    pub score_delta: u32,
    /// Clear steps run, the first one included
    pub steps: u32,
    /// Specials activated directly by the swap
    pub activated: ArrayVec<(Pos, SpecialType), 2>,
    pub spawned: Vec<(Pos, SpecialType)>,
    pub moves_left: i32,
    pub outcome: Option<Outcome>,
}

pub struct EngineBuilder {
    config: LevelConfig,
    source: Option<Box<dyn TileSource>>,
    board: Option<Board>,
    options: EngineOptions,
    collaborators: Vec<Box<dyn Collaborator>>,
}

impl EngineBuilder {
    pub fn tile_source<S: TileSource + 'static>(mut self, source: S) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Use the seeded [`TileFactory`]
    pub fn seed(self, seed: u32) -> Self {
        self.tile_source(TileFactory::new(seed))
    }

    /// Start from this board instead of a random fill. Empty playable cells are filled and
    /// any match is stripped before play.
    pub fn board(mut self, board: Board) -> Self {
        self.board = Some(board);
        self
    }

    pub fn options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn subscribe<C: Collaborator + 'static>(mut self, collaborator: C) -> Self {
        self.collaborators.push(Box::new(collaborator));
        self
    }

    pub fn build(self) -> Result<Engine, ConfigError> {
        let config = self.config.normalized();
        let source = self.source.ok_or(ConfigError::MissingTileSource)?;
        if let Some(board) = &self.board {
            config.check_board(board)?;
        }

        let mut bus = EventBus::new();
        for collaborator in self.collaborators {
            bus.subscribe(collaborator);
        }

        let mut engine = Engine {
            board: config.empty_board(),
            session: Session::new(config.move_limit, 0),
            config,
            source,
            bus,
            timeline: Timeline::new(),
            options: self.options,
        };
        engine.start_level(self.board, 0);
        Ok(engine)
    }
}

pub struct Engine {
    config: LevelConfig,
    board: Board,
    source: Box<dyn TileSource>,
    session: Session,
    bus: EventBus,
    timeline: Timeline,
    options: EngineOptions,
}

impl Engine {
    /// Engine with the seeded tile factory
    pub fn new(config: LevelConfig, seed: u32) -> Result<Self, ConfigError> {
        Self::builder(config).seed(seed).build()
    }

    pub fn builder(config: LevelConfig) -> EngineBuilder {
        EngineBuilder {
            config,
            source: None,
            board: None,
            options: EngineOptions::default(),
            collaborators: Vec::new(),
        }
    }

    fn start_level(&mut self, supplied: Option<Board>, episode_id: u32) {
        let mut board = supplied.unwrap_or_else(|| self.config.empty_board());
        let settled = populate(&mut board, self.source.as_mut(), &self.config);

        self.board = board;
        self.session = Session::new(self.config.move_limit, episode_id);
        self.timeline.reset();

        info!(
            rows = self.config.rows,
            cols = self.config.cols,
            moves = self.config.move_limit,
            episode_id,
            settle_passes = settled.passes,
            "level started"
        );
        self.bus.publish(GameEvent::LevelStarted { episode_id });
        self.bus.publish(GameEvent::MovesChanged {
            moves_left: self.session.moves_left,
        });
        // Collaborators resetting on level start must not end the new level
        self.bus.take_signals();
    }

    /// Discard the grid and session and start the level again. The tile stream continues.
    pub fn restart(&mut self) {
        let next_episode = self.session.episode_id.wrapping_add(1);
        self.start_level(None, next_episode);
    }

    /// Switch to another level and start it
    pub fn load_level(&mut self, config: LevelConfig) {
        self.config = config.normalized();
        self.restart();
    }

    pub fn subscribe<C: Collaborator + 'static>(&mut self, collaborator: C) {
        self.bus.subscribe(Box::new(collaborator));
    }

    /// Attempt a player swap and resolve it to stability
    #[instrument(skip(self), fields(a = %request.a, b = %request.b))]
    pub fn try_swap(&mut self, request: SwapRequest) -> Result<SwapReport, InvalidReason> {
        let SwapRequest { a, b } = request;
        if let Err(reason) = self.check_swap(a, b) {
            return Err(self.reject(request, reason));
        }

        self.set_phase(Phase::Swapping);
        self.board.swap(a, b);
        self.record(TimelineStep::Swap { a, b });

        let activated = swap_activations(&self.board, a, b);
        let (first_cells, first_spawns) = if activated.is_empty() {
            let matches = find_matches(&self.board);
            if matches.is_empty() {
                self.board.swap(a, b);
                self.record(TimelineStep::RevertSwap { a, b });
                self.set_phase(Phase::Idle);
                return Err(self.reject(request, InvalidReason::NoMatch));
            }
            let expansion = expand(&self.board, &matches.cleared_cells);
            (expansion.cells, matches.special_spawns)
        } else {
            let expansion = activation_area(&self.board, &activated);
            debug!(specials = activated.len(), cells = expansion.cells.len(), "manual activation");
            self.record(TimelineStep::Activate {
                origins: activated.to_vec(),
                cells: expansion.cells.iter().copied().collect(),
            });
            (expansion.cells, BTreeMap::new())
        };

        let moves_left = self.session.consume_move();
        self.bus.publish(GameEvent::MovesChanged { moves_left });
        self.set_phase(Phase::Resolving);

        let mut report = SwapReport {
            activated,
            ..SwapReport::default()
        };
        self.resolve_step(&first_cells, &first_spawns, &mut report);

        loop {
            let matches = find_matches(&self.board);
            if matches.is_empty() {
                break;
            }
            if report.steps >= MAX_CASCADE_STEPS {
                warn!(steps = report.steps, "cascade did not settle");
                break;
            }
            let expansion = expand(&self.board, &matches.cleared_cells);
            self.resolve_step(&expansion.cells, &matches.special_spawns, &mut report);
        }

        report.moves_left = self.session.moves_left;
        report.outcome = self.apply_termination();
        if report.outcome.is_none() {
            self.set_phase(Phase::Idle);
        }
        Ok(report)
    }

    /// External win signal (boss health depleted) delivered between swaps
    pub fn signal_boss_defeated(&mut self) -> Option<Outcome> {
        if self.session.is_terminal() {
            return None;
        }
        self.session.win_pending = true;
        self.apply_termination()
    }

    fn check_swap(&self, a: Pos, b: Pos) -> Result<(), InvalidReason> {
        // try_swap always returns to Idle or Terminal
        debug_assert!(!self.session.phase.is_busy(), "swap while resolving");
        if self.options.hold_input_until_settled && !self.timeline.is_settled() {
            return Err(InvalidReason::Busy);
        }
        if self.session.is_terminal() {
            return Err(InvalidReason::LevelEnded);
        }
        if self.session.moves_left <= 0 {
            return Err(InvalidReason::NoMovesLeft);
        }
        self.board.validate_swap(a, b)
    }

    fn reject(&mut self, request: SwapRequest, reason: InvalidReason) -> InvalidReason {
        debug!(reason = reason.code(), "swap rejected");
        self.bus.publish(GameEvent::InvalidMove {
            a: request.a,
            b: request.b,
            reason,
        });
        self.absorb_signals();
        reason
    }

    /// Clear -> score -> collapse -> refill for one finalized clear set
    fn resolve_step(
        &mut self,
        cells: &BTreeSet<Pos>,
        spawns: &BTreeMap<Pos, SpecialType>,
        report: &mut SwapReport,
    ) {
        let cleared = apply_clear(&mut self.board, cells, spawns, true);
        let count = cleared.cleared_count();
        report.steps += 1;
        debug!(step = report.steps, cleared = count, spawned = cleared.spawned.len(), "clear step");

        if count > 0 {
            self.bus.publish(GameEvent::TilesCleared {
                count,
                cells: cleared.destroyed.clone(),
            });
            let delta = count * SCORE_PER_TILE;
            self.session.score += delta;
            self.bus.publish(GameEvent::ScoreAwarded {
                delta,
                total: self.session.score,
            });
            report.cleared_total += count;
            report.score_delta += delta;
        }
        for &(cell, special_type) in &cleared.spawned {
            self.bus.publish(GameEvent::SpecialSpawned { cell, special_type });
        }
        report.spawned.extend(cleared.spawned.iter().copied());
        self.record(TimelineStep::Clear {
            cells: cleared.destroyed,
            spawned: cleared.spawned,
        });

        let fall = collapse(&mut self.board);
        self.record(TimelineStep::Collapse { moves: fall.moves });
        let tiles = fill_empty(
            &mut self.board,
            self.source.as_mut(),
            &self.config,
            SpawnContext::Refill,
        );
        for tile in tiles.iter().filter(|t| t.special_type.is_special()) {
            self.bus.publish(GameEvent::SpecialSpawned {
                cell: tile.pos(),
                special_type: tile.special_type,
            });
        }
        self.record(TimelineStep::Refill { tiles });

        self.absorb_signals();
    }

    fn absorb_signals(&mut self) {
        for signal in self.bus.take_signals() {
            match signal {
                Signal::BossDefeated if !self.session.is_terminal() => {
                    self.session.win_pending = true;
                }
                Signal::BossDefeated => {}
            }
        }
    }

    fn apply_termination(&mut self) -> Option<Outcome> {
        let outcome = termination::evaluate(&self.session, &self.config)?;
        self.session.terminal = Some(outcome);
        self.session.win_pending = false;
        self.set_phase(Phase::Terminal);

        info!(
            outcome = outcome.as_str(),
            score = self.session.score,
            moves_left = self.session.moves_left,
            "level ended"
        );
        self.bus.publish(GameEvent::Terminal { outcome });
        // Signals raised after the end carry no meaning
        self.bus.take_signals();
        Some(outcome)
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.session.phase != phase {
            debug!(from = self.session.phase.as_str(), to = phase.as_str(), "phase");
            self.session.phase = phase;
        }
    }

    fn record(&mut self, step: TimelineStep) {
        if self.options.record_timeline {
            self.timeline.push(step);
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    pub fn options(&self) -> EngineOptions {
        self.options
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn score(&self) -> u32 {
        self.session.score
    }

    pub fn moves_left(&self) -> i32 {
        self.session.moves_left
    }

    pub fn phase(&self) -> Phase {
        self.session.phase
    }

    pub fn is_busy(&self) -> bool {
        self.session.phase.is_busy()
    }

    pub fn terminal(&self) -> Option<Outcome> {
        self.session.terminal
    }

    pub fn episode_id(&self) -> u32 {
        self.session.episode_id
    }

    pub fn board_hash(&self) -> u64 {
        board_hash(&self.board)
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn timeline_mut(&mut self) -> &mut Timeline {
        &mut self.timeline
    }

    /// Drain every event published since the last call, up to
    /// [`MAX_PENDING_EVENTS`](crate::events::MAX_PENDING_EVENTS)
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        self.bus.take_events()
    }

    /// Events waiting in the outbox
    pub fn pending_event_count(&self) -> usize {
        self.bus.pending_len()
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            rows: self.board.rows(),
            cols: self.board.cols(),
            cells: cells_of(&self.board),
            board_hash: board_hash(&self.board),
            moves_left: self.session.moves_left,
            moves_made: self.session.moves_made,
            score: self.session.score,
            phase: self.session.phase,
            terminal: self.session.terminal,
            episode_id: self.session.episode_id,
        }
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("session", &self.session)
            .field("board_hash", &self.board_hash())
            .field("bus", &self.bus)
            .field("options", &self.options)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Tile;

    /// Hands out colors from a fixed list, then repeats the last one
    struct Script(Vec<u8>);

    impl TileSource for Script {
        fn spawn(&mut self, _level: &LevelConfig, _context: SpawnContext) -> Tile {
            let color = if self.0.len() > 1 {
                self.0.remove(0)
            } else {
                self.0.first().copied().unwrap_or(0)
            };
            Tile::new(color)
        }
    }

    fn small_board() -> Board {
        // (0,2) <-> (1,2) completes a row of 3s
        Board::from_color_rows(&[
            "33044", //
            "23302", //
            "40123", //
        ])
    }

    fn engine(moves: i32) -> Engine {
        Engine::builder(LevelConfig::plain(3, 5, 5, moves))
            .tile_source(Script(vec![0, 1, 2, 4]))
            .board(small_board())
            .build()
            .unwrap()
    }

    #[test]
    fn test_missing_tile_source() {
        let err = Engine::builder(LevelConfig::default()).build().unwrap_err();
        assert_eq!(err, ConfigError::MissingTileSource);
    }

    #[test]
    fn test_board_shape_mismatch() {
        let err = Engine::builder(LevelConfig::plain(4, 5, 5, 10))
            .tile_source(Script(vec![0]))
            .board(small_board())
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::BoardShapeMismatch { .. }));
    }

    #[test]
    fn test_accepted_swap_consumes_one_move() {
        let mut engine = engine(10);
        let report = engine
            .try_swap(SwapRequest::new((0, 2), (1, 2)))
            .unwrap();

        assert_eq!(report.cleared_total, 3);
        assert_eq!(report.score_delta, 60);
        assert_eq!(report.steps, 1);
        assert_eq!(engine.moves_left(), 9);
        assert_eq!(engine.phase(), Phase::Idle);
        assert!(engine.board().is_full());
    }

    #[test]
    fn test_fruitless_swap_reverts() {
        let mut engine = engine(10);
        let before = engine.board().layout();
        let err = engine
            .try_swap(SwapRequest::new((2, 0), (2, 1)))
            .unwrap_err();

        assert_eq!(err, InvalidReason::NoMatch);
        assert_eq!(engine.board().layout(), before);
        assert_eq!(engine.moves_left(), 10);
    }

    #[test]
    fn test_last_move_loses() {
        let mut engine = engine(1);
        let report = engine
            .try_swap(SwapRequest::new((0, 2), (1, 2)))
            .unwrap();
        assert_eq!(report.outcome, Some(Outcome::Lose));
        assert_eq!(engine.phase(), Phase::Terminal);

        let err = engine
            .try_swap(SwapRequest::new((0, 0), (0, 1)))
            .unwrap_err();
        assert_eq!(err, InvalidReason::LevelEnded);
    }

    #[test]
    fn test_busy_only_while_holding_input() {
        let mut engine = engine(10);
        assert_eq!(
            engine.try_swap(SwapRequest::new((2, 0), (2, 1))),
            Err(InvalidReason::NoMatch)
        );
        assert!(!engine.is_busy());

        engine.try_swap(SwapRequest::new((0, 2), (1, 2))).unwrap();
        assert!(!engine.is_busy());
        assert!(!engine.timeline().is_settled());
        // Unplayed commands do not block input unless asked to
        assert_eq!(
            engine.try_swap(SwapRequest::new((2, 0), (2, 1))),
            Err(InvalidReason::NoMatch)
        );
    }

    #[test]
    fn test_level_start_events() {
        let mut engine = Engine::new(LevelConfig::plain(3, 5, 5, 10), 1).unwrap();
        assert_eq!(
            engine.take_events(),
            vec![
                GameEvent::LevelStarted { episode_id: 0 },
                GameEvent::MovesChanged { moves_left: 10 },
            ]
        );
        engine.restart();
        assert_eq!(
            engine.take_events()[0],
            GameEvent::LevelStarted { episode_id: 1 }
        );
    }

    #[test]
    fn test_hold_input_until_settled() {
        let mut engine = Engine::builder(LevelConfig::plain(3, 5, 5, 10))
            .tile_source(Script(vec![0, 1, 2, 4]))
            .board(small_board())
            .options(EngineOptions {
                hold_input_until_settled: true,
                ..EngineOptions::default()
            })
            .build()
            .unwrap();

        engine.try_swap(SwapRequest::new((0, 2), (1, 2))).unwrap();
        assert!(!engine.timeline().is_settled());
        assert_eq!(
            engine.try_swap(SwapRequest::new((2, 0), (2, 1))),
            Err(InvalidReason::Busy)
        );

        while let Some(cmd) = engine.timeline_mut().pop() {
            engine.timeline_mut().acknowledge(cmd.id);
        }
        assert_eq!(
            engine.try_swap(SwapRequest::new((2, 0), (2, 1))),
            Err(InvalidReason::NoMatch)
        );
    }
}
