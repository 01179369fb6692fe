//! Cascade engine - swap resolution, events and session lifecycle
//!
//! Builds on the pure rules in `tile-cascade-core`:
//!
//! - [`resolver`]: the `Idle -> Swapping -> Resolving -> Idle/Terminal` state machine
//! - [`events`]: event bus, collaborator trait and channel sink
//! - [`collab`]: reference score keeper and boss health collaborators
//! - [`timeline`]: command/acknowledgement queue for animation schedulers
//! - [`termination`]: win/lose policy
//! - [`levels`]: ordered level queue
//! - [`snapshot`]: serializable engine state with a board hash
//!
//! # Example
//!
//! ```
//! use tile_cascade_engine::{Engine, ScoreKeeper};
//! use tile_cascade_engine::core::LevelConfig;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let keeper = Rc::new(RefCell::new(ScoreKeeper::new()));
//! let mut engine = Engine::new(LevelConfig::default(), 7).unwrap();
//! engine.subscribe(keeper.clone());
//!
//! assert_eq!(engine.moves_left(), 25);
//! assert!(engine.board().is_full());
//! assert_eq!(keeper.borrow().score(), engine.score());
//! ```

pub mod collab;
pub mod events;
pub mod levels;
pub mod resolver;
pub mod session;
pub mod snapshot;
pub mod termination;
pub mod timeline;

pub use tile_cascade_core as core;
pub use tile_cascade_types as types;

pub use collab::{BossHealth, ScoreKeeper, DEFAULT_BOSS_HP};
pub use events::{ChannelSink, Collaborator, EventBus, Signal, MAX_PENDING_EVENTS};
pub use levels::LevelQueue;
pub use resolver::{Engine, EngineBuilder, EngineOptions, SwapReport, MAX_CASCADE_STEPS};
pub use session::{Phase, Session};
pub use snapshot::{board_hash, CellSnapshot, EngineSnapshot};
pub use timeline::{Command, CommandId, Timeline, TimelineStep, MAX_QUEUED_COMMANDS};
