//! Per-frame simulation
//!
//! The host drives three entry points:
//! - `handle_input` for key edges, whenever they arrive
//! - `advance_timers` with the wall-clock time elapsed since the last frame
//! - `tick` exactly once per frame
//!
//! Timer work (spawns, reject reverts) happens in `advance_timers`, never
//! inside `tick`, so invader liveness is stable during a collision pass.

use super::collision::{despawn_fallen, first_hit, resolve_damage};
use super::entity::TextMetrics;
use super::matching::PairOutcome;
use super::state::{GameEvent, GamePhase, GameSession};
use crate::consts::{SCORE_DESTROY, SCORE_MATCH};

/// Discrete controls of the input surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    MoveLeft,
    MoveRight,
    FireDamage,
    FireMark,
    Confirm,
}

/// A key edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Press(Control),
    Release(Control),
}

/// Apply a key edge. Effects are observed by the next `tick`.
pub fn handle_input(session: &mut GameSession, event: InputEvent) {
    match session.phase {
        GamePhase::Title => {
            if event == InputEvent::Press(Control::Confirm) {
                session.phase = GamePhase::Playing;
                session.push_event(GameEvent::Started);
                log::info!("Game started ({} pairs)", session.vocab.len());
            }
        }
        GamePhase::Victory => {}
        GamePhase::Playing => match event {
            InputEvent::Press(Control::MoveLeft) => {
                session.player.body.vel.x = -session.tuning.player_speed;
            }
            InputEvent::Press(Control::MoveRight) => {
                session.player.body.vel.x = session.tuning.player_speed;
            }
            InputEvent::Release(Control::MoveLeft | Control::MoveRight) => {
                session.player.body.vel.x = 0.0;
            }
            InputEvent::Press(Control::FireDamage) => {
                if let Some(origin) = session.player.muzzle() {
                    let speed = session.tuning.damage_projectile_speed;
                    session.projectiles.fire_damage(origin, speed);
                }
            }
            InputEvent::Press(Control::FireMark) => {
                if let Some(origin) = session.player.muzzle() {
                    let speed = session.tuning.mark_projectile_speed;
                    if !session.projectiles.fire_mark(origin, speed) {
                        log::debug!("Mark shot refused: two already in flight");
                    }
                }
            }
            _ => {}
        },
    }
}

/// Advance the session clock, firing due reverts and spawn ticks
pub fn advance_timers(session: &mut GameSession, elapsed_ms: u64, metrics: &impl TextMetrics) {
    if session.phase != GamePhase::Playing {
        return;
    }
    session.clock_ms += elapsed_ms;

    let now = session.clock_ms;
    for id in session.matcher.apply_due_reverts(now, &mut session.invaders) {
        log::debug!("Invader {} unmarked after rejection", id);
        session.push_event(GameEvent::Reverted { id });
    }

    let interval = session.tuning.spawn_interval_ms.max(1);
    // A stalled host gets one spawn, not a stack of them at y = 0
    session.spawn_accum_ms = (session.spawn_accum_ms + elapsed_ms).min(interval);
    if session.spawn_accum_ms >= interval {
        session.spawn_accum_ms = 0;
        session.spawn_step(metrics);
    }
}

/// Advance the game state by one frame
pub fn tick(session: &mut GameSession) {
    if session.phase != GamePhase::Playing {
        return;
    }

    // Win check comes before any gameplay update
    if session.is_won() {
        session.phase = GamePhase::Victory;
        let score = session.score;
        session.push_event(GameEvent::Victory { score });
        log::info!("Victory! Final score {}", score);
        return;
    }

    session.time_ticks += 1;
    session.player.update(session.playfield);

    for invader in &mut session.invaders {
        invader.body.step();
    }
    for invader in despawn_fallen(&mut session.invaders, session.playfield.height) {
        log::debug!("Invader {} {:?} fell off screen", invader.id, invader.text);
        session.matcher.forget(invader.id);
        session.push_event(GameEvent::InvaderEscaped {
            id: invader.id,
            text: invader.text,
        });
    }

    session.projectiles.advance();
    resolve_damage_pass(session);
    resolve_mark_pass(session);
}

fn resolve_damage_pass(session: &mut GameSession) {
    let report = resolve_damage(session.projectiles.damage_mut(), &mut session.invaders);
    for invader in report.destroyed {
        session.matcher.forget(invader.id);
        if !session.matcher.is_removed(&invader.text) {
            session.score += SCORE_DESTROY;
        }
        log::debug!("Invader {} {:?} destroyed", invader.id, invader.text);
        session.push_event(GameEvent::InvaderDestroyed {
            id: invader.id,
            text: invader.text,
        });
    }
}

fn resolve_mark_pass(session: &mut GameSession) {
    let mut idx = session.projectiles.mark().len();
    while idx > 0 {
        idx -= 1;
        let pos = session.projectiles.mark()[idx].body.pos;
        let Some(hit) = first_hit(pos, &session.invaders) else {
            continue;
        };
        session.projectiles.mark_mut().remove(idx);

        let color = session.random_mark_color();
        let invader = &mut session.invaders[hit];
        if !session.matcher.mark(invader, color) {
            continue;
        }
        let id = invader.id;
        session.push_event(GameEvent::Marked { id });

        if session.matcher.is_pair_ready() {
            evaluate_pair(session);
        }
    }
}

fn evaluate_pair(session: &mut GameSession) {
    let now = session.clock_ms;
    let delay = session.tuning.reject_delay_ms;
    let Some((outcome, _gone)) =
        session
            .matcher
            .evaluate(&session.vocab, &mut session.invaders, now, delay)
    else {
        return;
    };
    match outcome {
        PairOutcome::Matched { a, b } => {
            session.score += SCORE_MATCH;
            log::info!("Matched {:?} <-> {:?}", a, b);
            session.push_event(GameEvent::PairMatched { a, b });
        }
        PairOutcome::Rejected { a, b } => {
            log::debug!("Rejected pair {} / {}", a, b);
            session.push_event(GameEvent::PairRejected { a, b });
        }
    }
}
