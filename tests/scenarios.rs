use glam::Vec2;

use vocab_invaders::Game;
use vocab_invaders::renderer::{Sprite, Surface};
use vocab_invaders::settings::Tuning;
use vocab_invaders::sim::{
    Control, GameEvent, GamePhase, GameSession, InputEvent, MarkState, Playfield, REJECT_COLOR,
    Rgb, TextMetrics,
};
use vocab_invaders::vocab::Vocabulary;

const FRAME_MS: u64 = 16;

#[derive(Debug, Clone, PartialEq)]
enum DrawCall {
    Rect,
    Image(Vec2),
    Circle(Vec2, Rgb),
    Text {
        text: String,
        color: Rgb,
        outlined: bool,
    },
}

/// Headless surface recording the primitives of the last frame
struct Recorder {
    size: Vec2,
    sprite_loaded: bool,
    calls: Vec<DrawCall>,
}

impl Recorder {
    fn new() -> Self {
        Self {
            size: Vec2::new(800.0, 600.0),
            sprite_loaded: true,
            calls: Vec::new(),
        }
    }

    fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn text_color(&self, wanted: &str) -> Option<Rgb> {
        self.calls.iter().find_map(|c| match c {
            DrawCall::Text { text, color, .. } if text == wanted => Some(*color),
            _ => None,
        })
    }
}

impl TextMetrics for Recorder {
    fn measure_text(&self, text: &str) -> Vec2 {
        Vec2::new(text.chars().count() as f32 * 8.0, 16.0)
    }
}

impl Surface for Recorder {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn fill_rect(&mut self, _pos: Vec2, _size: Vec2, _color: Rgb) {
        // A clear starts a new frame
        self.calls.clear();
        self.calls.push(DrawCall::Rect);
    }

    fn sprite_size(&self, sprite: Sprite) -> Option<Vec2> {
        match sprite {
            Sprite::Player if self.sprite_loaded => Some(Vec2::new(24.0, 16.0)),
            Sprite::Player => None,
        }
    }

    fn draw_image(&mut self, _sprite: Sprite, pos: Vec2, _size: Vec2) {
        self.calls.push(DrawCall::Image(pos));
    }

    fn fill_circle(&mut self, center: Vec2, _radius: f32, color: Rgb) {
        self.calls.push(DrawCall::Circle(center, color));
    }

    fn fill_text(&mut self, text: &str, _pos: Vec2, color: Rgb) {
        self.calls.push(DrawCall::Text {
            text: text.to_string(),
            color,
            outlined: false,
        });
    }

    fn stroke_text(&mut self, text: &str, _pos: Vec2, color: Rgb) {
        self.calls.push(DrawCall::Text {
            text: text.to_string(),
            color,
            outlined: true,
        });
    }
}

fn new_game(vocab: &str) -> (Game, Recorder) {
    let vocab = Vocabulary::parse(vocab).unwrap();
    let session = GameSession::new(vocab, Playfield::new(800.0, 600.0), Tuning::default(), 2024);
    (Game::new(session), Recorder::new())
}

fn start(game: &mut Game, surface: &mut Recorder) {
    game.frame(surface, FRAME_MS);
    game.handle_input(InputEvent::Press(Control::Confirm));
}

/// Spawn the next invader and park it at a known spot
fn spawn_at(game: &mut Game, surface: &Recorder, x: f32, y: f32) -> u32 {
    let session = game.session_mut();
    let id = session.spawn_step(surface).expect("spawn tick emits an invader");
    let invader = session.invaders.iter_mut().find(|i| i.id == id).unwrap();
    invader.body.pos = Vec2::new(x, y);
    id
}

/// Put the muzzle under `x` and fire
fn fire_at(game: &mut Game, x: f32, control: Control) {
    let session = game.session_mut();
    let width = session.player.size.unwrap().x;
    session.player.body.pos.x = x - width / 2.0;
    game.handle_input(InputEvent::Press(control));
}

fn run_until(game: &mut Game, surface: &mut Recorder, max_frames: usize, done: impl Fn(&Game) -> bool) -> bool {
    for _ in 0..max_frames {
        game.frame(surface, FRAME_MS);
        if done(game) {
            return true;
        }
    }
    false
}

#[test]
fn title_screen_blocks_updates_until_confirm() {
    let (mut game, mut surface) = new_game("cat\tgato\n");
    for _ in 0..300 {
        game.frame(&mut surface, 100);
    }
    assert_eq!(game.phase(), GamePhase::Title);
    assert!(game.session().invaders.is_empty());
    assert!(surface.texts().contains(&"Press ENTER to start"));
    assert!(surface.texts().contains(&"1 pairs loaded"));

    game.handle_input(InputEvent::Press(Control::Confirm));
    game.frame(&mut surface, FRAME_MS);
    assert_eq!(game.phase(), GamePhase::Playing);
    assert!(surface.texts().iter().any(|t| t.starts_with("Score:")));
}

#[test]
fn spawns_term_then_definition_on_successive_ticks() {
    let (mut game, mut surface) = new_game("cat\tgato\n");
    start(&mut game, &mut surface);

    game.frame(&mut surface, 1700);
    game.frame(&mut surface, 1700);
    let spawned: Vec<String> = game
        .drain_events()
        .into_iter()
        .filter_map(|e| match e {
            GameEvent::InvaderSpawned { text, .. } => Some(text),
            _ => None,
        })
        .collect();
    assert_eq!(spawned, vec!["cat".to_string(), "gato".to_string()]);
    let session = game.session();
    assert!(session.invaders[0].is_term());
    assert!(session.invaders[1].is_definition);
}

#[test]
fn matching_the_only_pair_wins() {
    let (mut game, mut surface) = new_game("cat\tgato\n");
    start(&mut game, &mut surface);
    game.frame(&mut surface, FRAME_MS);

    spawn_at(&mut game, &surface, 100.0, 300.0);
    spawn_at(&mut game, &surface, 400.0, 300.0);
    fire_at(&mut game, 110.0, Control::FireMark);
    fire_at(&mut game, 410.0, Control::FireMark);

    let won = run_until(&mut game, &mut surface, 100, |g| g.phase() == GamePhase::Victory);
    assert!(won);

    let session = game.session();
    assert!(session.matcher.is_removed("cat"));
    assert!(session.matcher.is_removed("gato"));
    assert!(session.invaders.is_empty());
    assert!(session.is_won());
    assert!(surface.texts().contains(&"ALL PAIRS MATCHED"));

    let events = game.drain_events();
    // Pair order follows marking order, matching is directionless
    assert!(events.iter().any(|e| match e {
        GameEvent::PairMatched { a, b } => {
            let mut pair = [a.as_str(), b.as_str()];
            pair.sort();
            pair == ["cat", "gato"]
        }
        _ => false,
    }));
    assert!(events.iter().any(|e| matches!(e, GameEvent::Victory { .. })));
}

#[test]
fn victory_freezes_the_session() {
    let (mut game, mut surface) = new_game("cat\tgato\n");
    start(&mut game, &mut surface);
    spawn_at(&mut game, &surface, 100.0, 300.0);
    spawn_at(&mut game, &surface, 400.0, 300.0);
    fire_at(&mut game, 110.0, Control::FireMark);
    fire_at(&mut game, 410.0, Control::FireMark);
    assert!(run_until(&mut game, &mut surface, 100, |g| g.phase() == GamePhase::Victory));

    let ticks = game.session().time_ticks;
    let clock = game.session().clock_ms;
    game.handle_input(InputEvent::Press(Control::FireDamage));
    for _ in 0..200 {
        game.frame(&mut surface, 100);
        assert_eq!(game.phase(), GamePhase::Victory);
    }
    assert_eq!(game.session().time_ticks, ticks);
    assert_eq!(game.session().clock_ms, clock);
    assert!(game.session().projectiles.damage().is_empty());
    assert!(game.session().invaders.is_empty());
}

#[test]
fn mismatched_pair_rejects_then_reverts() {
    let (mut game, mut surface) = new_game("cat\tgato\ndog\tperro\n");
    start(&mut game, &mut surface);

    let cat = spawn_at(&mut game, &surface, 100.0, 300.0);
    let gato = spawn_at(&mut game, &surface, 250.0, 100.0);
    let dog = spawn_at(&mut game, &surface, 550.0, 100.0);
    let perro = spawn_at(&mut game, &surface, 400.0, 300.0);
    fire_at(&mut game, 110.0, Control::FireMark);
    fire_at(&mut game, 410.0, Control::FireMark);

    let rejected = run_until(&mut game, &mut surface, 100, |g| {
        g.session()
            .invader(cat)
            .is_some_and(|i| i.mark == MarkState::Rejected)
    });
    assert!(rejected);
    let session = game.session();
    assert_eq!(session.invader(perro).unwrap().mark, MarkState::Rejected);
    assert_eq!(surface.text_color("cat"), Some(REJECT_COLOR));
    assert_eq!(surface.text_color("perro"), Some(REJECT_COLOR));
    assert!(session.matcher.removed().is_empty());
    assert_eq!(session.invader(gato).unwrap().mark, MarkState::Unmarked);
    assert_eq!(session.invader(dog).unwrap().mark, MarkState::Unmarked);

    // Still rejected just before the delay runs out
    let rejected_at = session.clock_ms;
    while game.session().clock_ms + FRAME_MS < rejected_at + 500 {
        game.frame(&mut surface, FRAME_MS);
        assert_eq!(game.session().invader(cat).unwrap().mark, MarkState::Rejected);
    }
    game.frame(&mut surface, FRAME_MS);
    game.frame(&mut surface, FRAME_MS);

    let session = game.session();
    for id in [cat, perro] {
        let invader = session.invader(id).unwrap();
        assert_eq!(invader.mark, MarkState::Unmarked);
        assert_eq!(invader.hp, vocab_invaders::consts::INVADER_HP);
    }
    assert!(session.matcher.marked().is_empty());
}

#[test]
fn three_damage_hits_destroy_a_three_hp_invader() {
    let (mut game, mut surface) = new_game("cat\tgato\n");
    start(&mut game, &mut surface);
    let cat = spawn_at(&mut game, &surface, 100.0, 300.0);
    assert_eq!(game.session().invader(cat).unwrap().hp, 3);

    for remaining in [2, 1] {
        fire_at(&mut game, 110.0, Control::FireDamage);
        let hit = run_until(&mut game, &mut surface, 100, |g| {
            g.session().projectiles.damage().is_empty()
        });
        assert!(hit);
        assert_eq!(game.session().invader(cat).unwrap().hp, remaining);
    }

    fire_at(&mut game, 110.0, Control::FireDamage);
    assert!(run_until(&mut game, &mut surface, 100, |g| g.session().invader(cat).is_none()));
    assert!(game.session().projectiles.damage().is_empty());
    assert_eq!(game.session().score, vocab_invaders::consts::SCORE_DESTROY);
    assert!(game
        .drain_events()
        .iter()
        .any(|e| matches!(e, GameEvent::InvaderDestroyed { id, .. } if *id == cat)));
}

#[test]
fn third_mark_shot_is_a_noop() {
    let (mut game, mut surface) = new_game("cat\tgato\n");
    start(&mut game, &mut surface);
    game.frame(&mut surface, FRAME_MS);

    for _ in 0..3 {
        game.handle_input(InputEvent::Press(Control::FireMark));
    }
    assert_eq!(game.session().projectiles.mark().len(), 2);

    // Slots free up once the shots leave the top edge
    assert!(run_until(&mut game, &mut surface, 200, |g| g
        .session()
        .projectiles
        .mark()
        .is_empty()));
    game.handle_input(InputEvent::Press(Control::FireMark));
    assert_eq!(game.session().projectiles.mark().len(), 1);
}

#[test]
fn player_waits_for_sprite() {
    let (mut game, mut surface) = new_game("cat\tgato\n");
    surface.sprite_loaded = false;
    start(&mut game, &mut surface);
    game.handle_input(InputEvent::Press(Control::MoveLeft));
    game.handle_input(InputEvent::Press(Control::FireDamage));
    game.frame(&mut surface, FRAME_MS);

    assert!(!game.session().player.is_ready());
    assert!(game.session().projectiles.damage().is_empty());
    assert!(!surface.calls.iter().any(|c| matches!(c, DrawCall::Image(_))));

    surface.sprite_loaded = true;
    game.frame(&mut surface, FRAME_MS);
    assert!(game.session().player.is_ready());
    assert!(surface.calls.iter().any(|c| matches!(c, DrawCall::Image(_))));
}

#[test]
fn invaders_escaping_the_bottom_are_removed_without_penalty() {
    let (mut game, mut surface) = new_game("cat\tgato\n");
    start(&mut game, &mut surface);
    let cat = spawn_at(&mut game, &surface, 100.0, 590.0);
    assert!(run_until(&mut game, &mut surface, 20, |g| g.session().invader(cat).is_none()));
    let session = game.session();
    assert_eq!(session.player.hp, vocab_invaders::consts::PLAYER_HP);
    assert_eq!(session.score, 0);
}

#[test]
fn definitions_are_outlined_terms_filled() {
    let (mut game, mut surface) = new_game("cat\tgato\n");
    start(&mut game, &mut surface);
    spawn_at(&mut game, &surface, 100.0, 300.0);
    spawn_at(&mut game, &surface, 400.0, 300.0);
    game.frame(&mut surface, FRAME_MS);

    let outlined = |wanted: &str| {
        surface.calls.iter().find_map(|c| match c {
            DrawCall::Text { text, outlined, .. } if text == wanted => Some(*outlined),
            _ => None,
        })
    };
    assert_eq!(outlined("cat"), Some(false));
    assert_eq!(outlined("gato"), Some(true));
}
