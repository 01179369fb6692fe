//! Tile Cascade (workspace facade crate).
//!
//! Re-exports the workspace crates as `tile_cascade::{types, core, engine}` while the
//! implementation lives in dedicated crates under `crates/`.

pub use tile_cascade_core as core;
pub use tile_cascade_engine as engine;
pub use tile_cascade_types as types;
