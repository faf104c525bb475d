//! Vocab Invaders entry point
//!
//! Loads settings and vocabulary, then runs the game in the terminal.

use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    ExecutableCommand, cursor,
    event::{self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    terminal,
};

use vocab_invaders::platform::{HostCommand, KeyTracker};
use vocab_invaders::renderer::TerminalSurface;
use vocab_invaders::sim::GameSession;
use vocab_invaders::{Game, Settings, Vocabulary};

#[derive(Debug, Parser)]
#[command(name = "vocab-invaders", version, about = "Shoot falling terms and pair them with their definitions")]
struct Args {
    /// Tab-delimited vocabulary file, one `term<TAB>definition` per line (`-` reads stdin)
    vocabulary: PathBuf,
    /// Settings file (defaults to ~/.vocab_invaders.json)
    #[arg(long)]
    config: Option<PathBuf>,
    /// RNG seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
    /// Print the parsed vocabulary and exit
    #[arg(long)]
    preview: bool,
    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(log_file: Option<&Path>) -> anyhow::Result<()> {
    let mut builder = env_logger::Builder::from_default_env();
    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("creating log file {}", path.display()))?;
        builder
            .filter_level(log::LevelFilter::Info)
            .parse_default_env()
            .target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn load_vocabulary(path: &Path) -> anyhow::Result<Vocabulary> {
    let vocab = if path == Path::new("-") {
        Vocabulary::from_reader(std::io::stdin().lock())
    } else {
        Vocabulary::from_file(path)
    };
    vocab.context("cannot start the game without a vocabulary")
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;
    log::info!("Vocab Invaders starting...");

    let settings_path = args.config.clone().unwrap_or_else(Settings::default_path);
    let settings = Settings::load(&settings_path)?;
    let vocab = load_vocabulary(&args.vocabulary)?;

    if args.preview {
        print!("{}", vocab.preview());
        println!("{} pairs", vocab.len());
        return Ok(());
    }

    let seed = args.seed.or(settings.seed).unwrap_or_else(time_seed);
    log::info!("Game initialized with seed: {}", seed);
    run(vocab, &settings, seed)
}

/// Set up the terminal, play, and always restore the terminal
fn run(vocab: Vocabulary, settings: &Settings, seed: u64) -> anyhow::Result<()> {
    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Ask for release events; terminals without the keyboard protocol fall
    // back to hold-window expiry
    let releases_reported = terminal::supports_keyboard_enhancement().unwrap_or(false)
        && out
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))
            .is_ok();
    log::info!("Key release events reported: {}", releases_reported);

    // A dedicated thread does the blocking reads so the loop never waits on input
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = play(&mut out, &rx, vocab, settings, seed, releases_reported);

    if releases_reported {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn play<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    vocab: Vocabulary,
    settings: &Settings,
    seed: u64,
    releases_reported: bool,
) -> anyhow::Result<()> {
    let (cols, rows) = terminal::size()?;
    let mut surface = TerminalSurface::new(cols, rows, settings.cell_width, settings.cell_height);
    let session = GameSession::new(vocab, surface.playfield(), settings.tuning.clone(), seed);
    let mut game = Game::new(session);
    let mut keys = KeyTracker::new(releases_reported);

    let frame_time = Duration::from_millis(settings.frame_ms());
    let mut last = Instant::now();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // Drain pending input; effects show up in this frame's tick
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(key) => match keys.on_key(key, frame) {
                    Some(HostCommand::Quit) => {
                        log::info!("Quit requested");
                        return Ok(());
                    }
                    Some(HostCommand::Game(input)) => game.handle_input(input),
                    None => {}
                },
                Event::Resize(cols, rows) => {
                    surface.resize(cols, rows);
                    game.session_mut().playfield = surface.playfield();
                    log::debug!("Resized to {}x{}", cols, rows);
                }
                _ => {}
            }
        }
        for input in keys.expire(frame) {
            game.handle_input(input);
        }

        let elapsed = u64::try_from(frame_start.duration_since(last).as_millis()).unwrap_or(u64::MAX);
        last = frame_start;

        game.frame(&mut surface, elapsed);
        for event in game.drain_events() {
            log::trace!("{:?}", event);
        }
        surface.present(out)?;

        let spent = frame_start.elapsed();
        if spent < frame_time {
            thread::sleep(frame_time - spent);
        }
    }
}
