//! Kinematic entities
//!
//! Movement is plain Euler integration with one step per frame: speed is
//! expressed in playfield units per frame, so it scales with frame rate.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::PLAYER_BOTTOM_MARGIN;

/// Playfield extent in playfield units (origin top-left, +y down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }
}

/// Text measurement supplied by the drawing surface.
///
/// Invader hit boxes are derived from the rendered size of their text.
pub trait TextMetrics {
    /// Width and height of `text` as drawn
    fn measure_text(&self, text: &str) -> Vec2;
}

/// Position + velocity shared by every movable actor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Body {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self { pos, vel }
    }

    /// Advance one frame
    #[inline]
    pub fn step(&mut self) {
        self.pos += self.vel;
    }
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    /// Sprite extent; `None` until the surface reports the sprite as loaded
    pub size: Option<Vec2>,
    pub hp: u32,
}

impl Player {
    pub fn new(hp: u32) -> Self {
        Self {
            body: Body::new(Vec2::ZERO, Vec2::ZERO),
            size: None,
            hp,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.size.is_some()
    }

    /// Place the player bottom-centre once its sprite is available.
    ///
    /// Later calls are ignored so a resolved sprite never teleports the ship.
    pub fn attach_sprite(&mut self, size: Vec2, playfield: Playfield) {
        if self.size.is_some() {
            return;
        }
        self.size = Some(size);
        self.body.pos = Vec2::new(
            (playfield.width - size.x) / 2.0,
            playfield.height - size.y - PLAYER_BOTTOM_MARGIN,
        );
        log::debug!("Player sprite attached at {:?}", self.body.pos);
    }

    /// Integrate and clamp to the horizontal bounds; no-op until ready
    pub fn update(&mut self, playfield: Playfield) {
        let Some(size) = self.size else {
            return;
        };
        self.body.step();
        let max_x = (playfield.width - size.x).max(0.0);
        self.body.pos.x = self.body.pos.x.clamp(0.0, max_x);
    }

    /// Where projectiles leave the ship (top centre)
    pub fn muzzle(&self) -> Option<Vec2> {
        self.size
            .map(|size| Vec2::new(self.body.pos.x + size.x / 2.0, self.body.pos.y))
    }
}
