//! Level configuration: JSON parsing, normalization and mask handling inside the engine

use tile_cascade::core::{Board, ConfigError, LevelConfig, SpawnChances};
use tile_cascade::engine::{Engine, LevelQueue};
use tile_cascade::types::{Pos, SpecialType};

const LEVEL_JSON: &str = r#"{
    "rows": 6,
    "cols": 7,
    "colorCount": 4,
    "moveLimit": 18,
    "targetScore": 1200,
    "playableMask": ["x11111x", "1111111", "11.1.11"],
    "spawnChances": { "bomb": 0.0, "rocket": 0.0, "disco": 0.0 },
    "allowSpecialOnInitialFill": false,
    "allowSpecialOnRefill": true,
    "damagePerTile": 3
}"#;

#[test]
fn test_parse_full_level_json() {
    let level: LevelConfig = serde_json::from_str(LEVEL_JSON).unwrap();

    assert_eq!((level.rows, level.cols), (6, 7));
    assert_eq!(level.color_count, 4);
    assert_eq!(level.move_limit, 18);
    assert_eq!(level.target_score, Some(1200));
    assert_eq!(level.spawn_chances, SpawnChances::NONE);
    assert!(!level.allow_special_on_initial_fill);
    assert!(level.allow_special_on_refill);
    assert_eq!(level.damage_per_tile, 3);

    assert!(!level.is_cell_playable(0, 0));
    assert!(!level.is_cell_playable(2, 2));
    assert!(level.is_cell_playable(2, 3));
    // Rows past the mask are open
    assert!(level.is_cell_playable(5, 0));
}

#[test]
fn test_level_round_trips_through_json() {
    let level: LevelConfig = serde_json::from_str(LEVEL_JSON).unwrap();
    let text = serde_json::to_string(&level).unwrap();
    assert!(text.contains("\"playableMask\""));
    let back: LevelConfig = serde_json::from_str(&text).unwrap();
    assert_eq!(back, level);
}

#[test]
fn test_empty_json_is_default_level() {
    let level: LevelConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(level, LevelConfig::default());
}

#[test]
fn test_engine_normalizes_config() {
    let level = LevelConfig {
        color_count: 12,
        move_limit: 0,
        ..LevelConfig::plain(5, 5, 5, 10)
    };
    let engine = Engine::new(level, 17).unwrap();

    assert_eq!(engine.config().color_count, 8);
    assert_eq!(engine.moves_left(), 1);
    assert!(engine.board().tiles().all(|t| t.color_id < 8));
}

#[test]
fn test_low_color_count_clamps_to_three() {
    let level = LevelConfig {
        color_count: 1,
        ..LevelConfig::plain(6, 6, 5, 10)
    };
    let engine = Engine::new(level, 9).unwrap();

    assert_eq!(engine.config().color_count, 3);
    assert!(engine.board().tiles().all(|t| t.color_id < 3));
    assert!(engine.board().is_full());
}

#[test]
fn test_holes_stay_empty_in_engine() {
    let level: LevelConfig = serde_json::from_str(LEVEL_JSON).unwrap();
    let engine = Engine::new(level, 3).unwrap();
    let board = engine.board();

    for hole in [Pos::new(0, 0), Pos::new(0, 6), Pos::new(2, 2), Pos::new(2, 4)] {
        assert!(board.tile(hole).is_none(), "hole {} holds a tile", hole);
    }
    assert_eq!(board.playable_count(), 6 * 7 - 4);
    assert!(board.is_full());
}

#[test]
fn test_special_flags_off_give_plain_board() {
    let level = LevelConfig {
        spawn_chances: SpawnChances {
            bomb: 1.0,
            rocket: 1.0,
            disco: 1.0,
        },
        allow_special_on_initial_fill: false,
        // Settle passes refill with the refill flag
        allow_special_on_refill: false,
        ..LevelConfig::default()
    };
    let engine = Engine::new(level, 21).unwrap();
    assert!(engine
        .board()
        .tiles()
        .all(|t| t.special_type == SpecialType::None));
}

#[test]
fn test_builder_without_source_fails() {
    let err = Engine::builder(LevelConfig::default()).build().unwrap_err();
    assert_eq!(err, ConfigError::MissingTileSource);
}

#[test]
fn test_builder_rejects_wrong_board_shape() {
    let err = Engine::builder(LevelConfig::plain(8, 8, 5, 25))
        .seed(1)
        .board(Board::open(4, 4))
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        ConfigError::BoardShapeMismatch {
            rows: 4,
            cols: 4,
            expected_rows: 8,
            expected_cols: 8,
        }
    );
}

#[test]
fn test_empty_level_queue_is_an_error() {
    assert_eq!(
        LevelQueue::new(Vec::new()).unwrap_err(),
        ConfigError::EmptyLevelQueue
    );
}
