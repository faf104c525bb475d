//! Vocabulary Invaders - a terminal arcade game for drilling vocabulary
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, collisions, matching)
//! - `game`: Per-frame driver that orders simulation and drawing
//! - `renderer`: Drawing surface abstraction and the terminal surface
//! - `platform`: Host input mapping
//! - `vocab`: Vocabulary ingestion (tab-delimited term/definition pairs)
//! - `settings`: Player-facing configuration and gameplay tuning

pub mod game;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod vocab;

pub use game::Game;
pub use settings::{Settings, Tuning};
pub use vocab::{VocabError, Vocabulary};

/// Game configuration constants
pub mod consts {
    /// Player hit points at session start
    pub const PLAYER_HP: u32 = 3;
    /// Horizontal player speed (units per frame)
    pub const PLAYER_SPEED: f32 = 7.0;
    /// Gap between the player sprite and the bottom edge
    pub const PLAYER_BOTTOM_MARGIN: f32 = 20.0;

    /// Invader hit points at spawn
    pub const INVADER_HP: u32 = 3;
    /// Invader fall speed (units per frame)
    pub const INVADER_SPEED: f32 = 1.0;
    /// Spawn X is drawn from [0, width - SPAWN_MARGIN]
    pub const SPAWN_MARGIN: f32 = 150.0;
    /// Wall-clock interval between spawner ticks
    pub const SPAWN_INTERVAL_MS: u64 = 1700;

    /// Projectile defaults
    pub const PROJECTILE_RADIUS: f32 = 4.0;
    pub const DAMAGE_PROJECTILE_SPEED: f32 = 10.0;
    pub const MARK_PROJECTILE_SPEED: f32 = 8.0;
    /// Hard cap on mark projectiles in flight
    pub const MAX_MARK_PROJECTILES: usize = 2;

    /// Delay before a rejected pair reverts to unmarked
    pub const REJECT_DELAY_MS: u64 = 500;

    /// Score awarded for destroying an invader with damage shots
    pub const SCORE_DESTROY: u64 = 10;
    /// Score awarded for a matched pair
    pub const SCORE_MATCH: u64 = 50;
}
