//! Drawing
//!
//! The simulation never draws. This module turns a `GameSession` into the
//! handful of primitive requests a `Surface` understands: clear, sprite,
//! filled circle, filled/outlined text. Text metrics come from the same
//! surface so hit boxes match what is on screen.

pub mod terminal;

use glam::Vec2;

use crate::sim::{GameSession, Invader, MarkState, ProjectileKind, REJECT_COLOR, Rgb, TextMetrics};

pub use terminal::TerminalSurface;

/// Images a surface may provide
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sprite {
    Player,
}

/// A 2D drawing target in playfield units (origin top-left, +y down)
pub trait Surface: TextMetrics {
    /// Drawable extent
    fn size(&self) -> Vec2;
    fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: Rgb);
    /// Natural size of a sprite, or `None` while it is still loading
    fn sprite_size(&self, sprite: Sprite) -> Option<Vec2>;
    fn draw_image(&mut self, sprite: Sprite, pos: Vec2, size: Vec2);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgb);
    /// Text with `pos` at the left end of its baseline
    fn fill_text(&mut self, text: &str, pos: Vec2, color: Rgb);
    /// Outlined text, same anchoring as `fill_text`
    fn stroke_text(&mut self, text: &str, pos: Vec2, color: Rgb);
}

// ── Colour palette ────────────────────────────────────────────────────────────

pub const C_BACKGROUND: Rgb = Rgb::new(0, 0, 0);
pub const C_TERM: Rgb = Rgb::new(235, 235, 235);
pub const C_DEFINITION: Rgb = Rgb::new(90, 200, 255);
pub const C_DAMAGE_SHOT: Rgb = Rgb::new(255, 210, 60);
pub const C_MARK_SHOT: Rgb = Rgb::new(200, 90, 255);
pub const C_HUD: Rgb = Rgb::new(255, 210, 60);
pub const C_TITLE: Rgb = Rgb::new(90, 200, 255);
pub const C_HINT: Rgb = Rgb::new(128, 128, 128);
pub const C_VICTORY: Rgb = Rgb::new(80, 230, 120);

/// Fill the whole surface with the background
pub fn clear<S: Surface>(surface: &mut S) {
    let size = surface.size();
    surface.fill_rect(Vec2::ZERO, size, C_BACKGROUND);
}

/// Draw `lines` centred horizontally, starting at `top`
fn centred_lines<S: Surface>(surface: &mut S, top: f32, lines: &[(&str, Rgb)]) {
    let width = surface.size().x;
    let mut y = top;
    for (text, color) in lines {
        let extent = surface.measure_text(text);
        y += extent.y;
        let x = ((width - extent.x) / 2.0).max(0.0);
        surface.fill_text(text, Vec2::new(x, y), *color);
    }
}

/// Title screen with the start prompt
pub fn draw_title<S: Surface>(surface: &mut S, session: &GameSession) {
    let pairs = format!("{} pairs loaded", session.vocab.len());
    let top = surface.size().y / 3.0;
    centred_lines(
        surface,
        top,
        &[
            ("V O C A B   I N V A D E R S", C_TITLE),
            ("", C_HINT),
            (&pairs, C_HUD),
            ("", C_HINT),
            ("Press ENTER to start", C_TERM),
            ("", C_HINT),
            ("<- -> / A D : move   Z : shoot   X : mark   Q : quit", C_HINT),
            ("Mark a term and its definition to clear them both", C_HINT),
        ],
    );
}

/// Terminal victory screen
pub fn draw_victory<S: Surface>(surface: &mut S, session: &GameSession) {
    let score = format!("Final score: {}", session.score);
    let top = surface.size().y / 3.0;
    centred_lines(
        surface,
        top,
        &[
            ("ALL PAIRS MATCHED", C_VICTORY),
            ("", C_HINT),
            (&score, C_HUD),
            ("", C_HINT),
            ("Press Q to quit", C_HINT),
        ],
    );
}

fn invader_color(invader: &Invader) -> Rgb {
    match invader.mark {
        MarkState::Marked(color) => color,
        MarkState::Rejected => REJECT_COLOR,
        MarkState::Unmarked if invader.is_definition => C_DEFINITION,
        MarkState::Unmarked => C_TERM,
    }
}

/// Every live entity plus the HUD
pub fn draw_playfield<S: Surface>(surface: &mut S, session: &GameSession) {
    if let Some(size) = session.player.size {
        surface.draw_image(Sprite::Player, session.player.body.pos, size);
    }

    for shot in session.projectiles.iter() {
        let color = match shot.kind {
            ProjectileKind::Damage => C_DAMAGE_SHOT,
            ProjectileKind::Mark => C_MARK_SHOT,
        };
        surface.fill_circle(shot.body.pos, shot.radius, color);
    }

    for invader in &session.invaders {
        let color = invader_color(invader);
        // Definitions are outlined unless a mark color takes over
        if invader.is_definition && !invader.mark.is_marked() {
            surface.stroke_text(&invader.text, invader.body.pos, color);
        } else {
            surface.fill_text(&invader.text, invader.body.pos, color);
        }
    }

    let hud = format!(
        "Score:{:>6}   Pairs left:{:>3}   HP:{}",
        session.score,
        session.remaining_pairs(),
        session.player.hp
    );
    let line = surface.measure_text(&hud);
    surface.fill_text(&hud, Vec2::new(0.0, line.y), C_HUD);
}
