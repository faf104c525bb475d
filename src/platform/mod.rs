//! Platform abstraction layer
//!
//! Maps terminal key events onto game key edges. Terminals that report key
//! releases get true press/release edges; classic terminals only send
//! presses (OS key-repeat shows up as repeated presses), so a held movement
//! key is released once no press has been seen for `HOLD_WINDOW` frames.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::sim::{Control, InputEvent};

/// Frames a movement key stays held without a fresh press/repeat.
/// OS key-repeat runs at 15 Hz or faster, so 4 frames at 30 FPS (~133 ms)
/// is refreshed before it expires.
pub const HOLD_WINDOW: u64 = 4;

/// What the host should do with a key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    Game(InputEvent),
    Quit,
}

/// Map a key to a control
pub fn control_for(code: KeyCode) -> Option<Control> {
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Control::MoveLeft),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Control::MoveRight),
        KeyCode::Char('z') | KeyCode::Char('Z') => Some(Control::FireDamage),
        KeyCode::Char('x') | KeyCode::Char('X') => Some(Control::FireMark),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Control::Confirm),
        _ => None,
    }
}

/// Check if key should quit the game
pub fn should_quit(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

fn is_movement(control: Control) -> bool {
    matches!(control, Control::MoveLeft | Control::MoveRight)
}

/// Turns raw key events into press/release edges
#[derive(Debug, Default)]
pub struct KeyTracker {
    /// Held movement control -> frame it was last pressed/repeated
    held: HashMap<Control, u64>,
    /// The terminal reports releases itself
    releases_reported: bool,
}

impl KeyTracker {
    pub fn new(releases_reported: bool) -> Self {
        Self {
            held: HashMap::new(),
            releases_reported,
        }
    }

    /// Translate one key event seen during `frame`
    pub fn on_key(&mut self, key: KeyEvent, frame: u64) -> Option<HostCommand> {
        if key.kind != KeyEventKind::Release && should_quit(&key) {
            return Some(HostCommand::Quit);
        }
        let control = control_for(key.code)?;

        match key.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                if is_movement(control) {
                    let was_held = self.held.insert(control, frame).is_some();
                    // Repeats refresh the hold without a new edge
                    if was_held {
                        return None;
                    }
                } else if key.kind == KeyEventKind::Repeat {
                    return None;
                }
                Some(HostCommand::Game(InputEvent::Press(control)))
            }
            KeyEventKind::Release => {
                if is_movement(control) {
                    if self.held.remove(&control).is_none() {
                        return None;
                    }
                    // A release zeroes velocity; the key still down takes over
                    if let Some(other) = self.latest_held() {
                        return Some(HostCommand::Game(InputEvent::Press(other)));
                    }
                }
                Some(HostCommand::Game(InputEvent::Release(control)))
            }
        }
    }

    /// Releases for movement keys not refreshed within the hold window
    pub fn expire(&mut self, frame: u64) -> Vec<InputEvent> {
        if self.releases_reported {
            return Vec::new();
        }
        let mut expired: Vec<Control> = self
            .held
            .iter()
            .filter(|&(_, &last)| frame.saturating_sub(last) > HOLD_WINDOW)
            .map(|(&control, _)| control)
            .collect();
        // HashMap order is unspecified; keep the edge order stable
        expired.sort_by_key(|c| *c as u8);
        for control in &expired {
            self.held.remove(control);
        }
        let mut edges: Vec<InputEvent> = expired.into_iter().map(InputEvent::Release).collect();
        if !edges.is_empty() {
            if let Some(other) = self.latest_held() {
                edges.push(InputEvent::Press(other));
            }
        }
        edges
    }

    /// Most recently pressed movement key still held
    fn latest_held(&self) -> Option<Control> {
        self.held
            .iter()
            .max_by_key(|&(c, &last)| (last, *c as u8))
            .map(|(&control, _)| control)
    }
}
