//! Game session state
//!
//! `GameSession` owns every entity collection plus the vocabulary, spawn
//! cursor and matching state. Nothing here is global.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Body, Player, Playfield, TextMetrics};
use super::matching::{MarkState, Matcher, Rgb};
use super::projectile::ProjectilePool;
use super::spawner::{SpawnRequest, Spawner};
use crate::consts::SPAWN_MARGIN;
use crate::settings::Tuning;
use crate::vocab::Vocabulary;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for confirm
    Title,
    /// Active gameplay
    Playing,
    /// Every pair matched; frozen
    Victory,
}

/// A falling term or definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invader {
    pub id: u32,
    pub text: String,
    /// Definition invaders are drawn outlined; terms are filled
    pub is_definition: bool,
    pub hp: u32,
    /// Position is the left end of the text baseline
    pub body: Body,
    /// Rendered text extent
    pub size: Vec2,
    pub mark: MarkState,
}

impl Invader {
    pub fn is_term(&self) -> bool {
        !self.is_definition
    }
}

/// Things that happened during a frame, drained by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    Started,
    InvaderSpawned { id: u32, text: String },
    InvaderDestroyed { id: u32, text: String },
    InvaderEscaped { id: u32, text: String },
    Marked { id: u32 },
    PairMatched { a: String, b: String },
    PairRejected { a: u32, b: u32 },
    Reverted { id: u32 },
    Victory { score: u64 },
}

#[derive(Debug, Clone)]
pub struct GameSession {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub playfield: Playfield,
    pub vocab: Vocabulary,
    pub phase: GamePhase,
    pub player: Player,
    /// Live invaders in spawn order
    pub invaders: Vec<Invader>,
    pub projectiles: ProjectilePool,
    pub spawner: Spawner,
    pub matcher: Matcher,
    pub score: u64,
    /// Session clock in ms, advanced by the host between frames
    pub clock_ms: u64,
    /// Clock time not yet consumed by spawn ticks
    pub(crate) spawn_accum_ms: u64,
    /// Frames simulated while playing
    pub time_ticks: u64,
    pub(crate) events: Vec<GameEvent>,
    rng: Pcg32,
    next_id: u32,
}

impl GameSession {
    /// Create a session on the title screen
    pub fn new(vocab: Vocabulary, playfield: Playfield, tuning: Tuning, seed: u64) -> Self {
        log::info!(
            "Session created with seed {} ({} pairs, playfield {}x{})",
            seed,
            vocab.len(),
            playfield.width,
            playfield.height
        );
        Self {
            seed,
            player: Player::new(tuning.player_hp),
            projectiles: ProjectilePool::new(tuning.projectile_radius),
            tuning,
            playfield,
            vocab,
            phase: GamePhase::Title,
            invaders: Vec::new(),
            spawner: Spawner::default(),
            matcher: Matcher::default(),
            score: 0,
            clock_ms: 0,
            spawn_accum_ms: 0,
            time_ticks: 0,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_started(&self) -> bool {
        self.phase != GamePhase::Title
    }

    /// Every term and its definition have been matched
    pub fn is_won(&self) -> bool {
        self.matcher.is_won(&self.vocab)
    }

    pub fn remaining_pairs(&self) -> usize {
        self.matcher.remaining_pairs(&self.vocab)
    }

    pub fn invader(&self, id: u32) -> Option<&Invader> {
        self.invaders.iter().find(|i| i.id == id)
    }

    /// Take the events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Freshly generated, reasonably bright mark color
    pub(crate) fn random_mark_color(&mut self) -> Rgb {
        Rgb::new(
            self.rng.random_range(64..=255),
            self.rng.random_range(64..=255),
            self.rng.random_range(64..=255),
        )
    }

    /// Run one spawner tick, adding an invader above the top edge
    pub fn spawn_step(&mut self, metrics: &impl TextMetrics) -> Option<u32> {
        let SpawnRequest {
            text,
            is_definition,
        } = self.spawner.step(&self.vocab, self.matcher.removed())?;

        let max_x = (self.playfield.width - SPAWN_MARGIN).max(0.0);
        let x = if max_x > 0.0 {
            self.rng.random_range(0.0..=max_x)
        } else {
            0.0
        };
        let id = self.next_entity_id();
        let size = metrics.measure_text(&text);
        log::debug!("Spawned invader {} {:?} at x={:.1}", id, text, x);
        self.push_event(GameEvent::InvaderSpawned {
            id,
            text: text.clone(),
        });
        self.invaders.push(Invader {
            id,
            text,
            is_definition,
            hp: self.tuning.invader_hp,
            body: Body::new(Vec2::new(x, 0.0), Vec2::new(0.0, self.tuning.invader_speed)),
            size,
            mark: MarkState::Unmarked,
        });
        Some(id)
    }
}
