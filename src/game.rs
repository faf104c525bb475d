//! Per-frame driver
//!
//! The host calls `Game::frame` once per display frame. The driver never
//! schedules itself; it runs one frame to completion and returns.

use crate::renderer::{self, Sprite, Surface};
use crate::sim::{GameEvent, GamePhase, GameSession, InputEvent, advance_timers, handle_input, tick};

pub struct Game {
    session: GameSession,
}

impl Game {
    pub fn new(session: GameSession) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        handle_input(&mut self.session, event);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.session.drain_events()
    }

    /// Run one frame: timers, clear, then title / victory / gameplay
    pub fn frame<S: Surface>(&mut self, surface: &mut S, elapsed_ms: u64) {
        if !self.session.player.is_ready() {
            if let Some(size) = surface.sprite_size(Sprite::Player) {
                self.session.player.attach_sprite(size, self.session.playfield);
            }
        }

        // Timer-driven writes land between frames, before this frame's passes
        advance_timers(&mut self.session, elapsed_ms, &*surface);

        renderer::clear(surface);

        if self.session.phase == GamePhase::Title {
            renderer::draw_title(surface, &self.session);
            return;
        }

        tick(&mut self.session);

        if self.session.phase == GamePhase::Victory {
            renderer::draw_victory(surface, &self.session);
            return;
        }

        renderer::draw_playfield(surface, &self.session);
    }
}
