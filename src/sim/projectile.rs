//! Damage and mark projectiles

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::Body;
use crate::consts::MAX_MARK_PROJECTILES;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Costs an invader one hit point
    Damage,
    /// Flags an invader as a pairing candidate
    Mark,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub body: Body,
    pub radius: f32,
    pub kind: ProjectileKind,
}

impl Projectile {
    /// Fully past the top edge
    #[inline]
    pub fn is_offscreen(&self) -> bool {
        self.body.pos.y + self.radius <= 0.0
    }
}

/// The two projectile collections, managed independently
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectilePool {
    radius: f32,
    damage: Vec<Projectile>,
    mark: Vec<Projectile>,
}

impl ProjectilePool {
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            damage: Vec::new(),
            mark: Vec::new(),
        }
    }

    /// Fire a damage shot straight up; unlimited
    pub fn fire_damage(&mut self, origin: Vec2, speed: f32) {
        self.damage.push(Projectile {
            body: Body::new(origin, Vec2::new(0.0, -speed)),
            radius: self.radius,
            kind: ProjectileKind::Damage,
        });
    }

    /// Fire a mark shot; refused while the in-flight cap is reached
    pub fn fire_mark(&mut self, origin: Vec2, speed: f32) -> bool {
        if self.mark.len() >= MAX_MARK_PROJECTILES {
            return false;
        }
        self.mark.push(Projectile {
            body: Body::new(origin, Vec2::new(0.0, -speed)),
            radius: self.radius,
            kind: ProjectileKind::Mark,
        });
        true
    }

    /// Integrate every projectile and drop those past the top edge
    pub fn advance(&mut self) {
        for shots in [&mut self.damage, &mut self.mark] {
            shots.retain_mut(|p| {
                p.body.step();
                !p.is_offscreen()
            });
        }
    }

    pub fn damage(&self) -> &[Projectile] {
        &self.damage
    }

    pub fn mark(&self) -> &[Projectile] {
        &self.mark
    }

    pub(crate) fn damage_mut(&mut self) -> &mut Vec<Projectile> {
        &mut self.damage
    }

    pub(crate) fn mark_mut(&mut self) -> &mut Vec<Projectile> {
        &mut self.mark
    }

    pub fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.damage.iter().chain(self.mark.iter())
    }
}
