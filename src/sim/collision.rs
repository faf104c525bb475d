//! Hit testing and damage resolution
//!
//! Invader hit boxes are the rendered text box with the position at the
//! text baseline: `[x, x + width] x [y - height, y]`.

use glam::Vec2;

use super::projectile::Projectile;
use super::state::Invader;

/// Point containment in an invader's text box (edges inclusive)
#[inline]
pub fn point_in_text_box(point: Vec2, invader: &Invader) -> bool {
    let pos = invader.body.pos;
    point.x >= pos.x
        && point.x <= pos.x + invader.size.x
        && point.y >= pos.y - invader.size.y
        && point.y <= pos.y
}

/// Index of the first invader containing `point`
pub fn first_hit(point: Vec2, invaders: &[Invader]) -> Option<usize> {
    invaders.iter().position(|inv| point_in_text_box(point, inv))
}

/// Outcome of a damage pass
#[derive(Debug, Default)]
pub struct DamageReport {
    /// Hits landed (one per consumed projectile)
    pub hits: usize,
    /// Invaders whose hit points reached zero
    pub destroyed: Vec<Invader>,
}

/// Resolve damage projectiles against invaders.
///
/// Projectiles are visited back to front so removal never skips one. A
/// projectile damages the first invader it overlaps and is consumed; it
/// never passes through to a second target.
pub fn resolve_damage(projectiles: &mut Vec<Projectile>, invaders: &mut Vec<Invader>) -> DamageReport {
    let mut report = DamageReport::default();
    for pi in (0..projectiles.len()).rev() {
        let Some(ii) = first_hit(projectiles[pi].body.pos, invaders) else {
            continue;
        };
        projectiles.remove(pi);
        report.hits += 1;

        let invader = &mut invaders[ii];
        invader.hp = invader.hp.saturating_sub(1);
        if invader.hp == 0 {
            report.destroyed.push(invaders.remove(ii));
        }
    }
    report
}

/// Remove invaders that fell past the bottom edge
pub fn despawn_fallen(invaders: &mut Vec<Invader>, height: f32) -> Vec<Invader> {
    let mut fallen = Vec::new();
    for idx in (0..invaders.len()).rev() {
        if invaders[idx].body.pos.y > height {
            fallen.push(invaders.remove(idx));
        }
    }
    fallen
}
