//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One step per frame, timers driven by host-supplied elapsed time
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod matching;
pub mod projectile;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{DamageReport, despawn_fallen, first_hit, point_in_text_box, resolve_damage};
pub use entity::{Body, Player, Playfield, TextMetrics};
pub use matching::{MarkState, Matcher, PairOutcome, REJECT_COLOR, Rgb};
pub use projectile::{Projectile, ProjectileKind, ProjectilePool};
pub use spawner::{SpawnRequest, Spawner};
pub use state::{GameEvent, GamePhase, GameSession, Invader};
pub use tick::{Control, InputEvent, advance_timers, handle_input, tick};
