//! Bucket Boom entry point
//!
//! Sets up the terminal, then runs the fixed-tick loop:
//! poll input, tick the simulation, sync the scene, draw, sleep.
//!
//! Usage:
//!   bucket-boom [--config settings.json] [--seed N] [--start-level L] [--two-player]
//!   RUST_LOG=debug bucket-boom 2> game.log

use std::io::{BufWriter, Stdout, Write, stdout};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use crossterm::{ExecutableCommand, cursor, event, terminal};

use bucket_boom::audio::TerminalBell;
use bucket_boom::platform::{ChannelInput, InputSource, KeyAction, TickClock};
use bucket_boom::renderer::{Renderer, Scene, TerminalRenderer};
use bucket_boom::sim::{GameMode, GameState, TickInput, tick};
use bucket_boom::{AudioManager, Settings};

#[derive(Parser)]
#[command(name = "bucket-boom")]
#[command(about = "Catch the falling bombs before they hit the floor")]
struct Args {
    /// JSON settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// RNG seed (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Level each new game starts at (1-8)
    #[arg(long)]
    start_level: Option<u32>,

    /// Start in two-player mode on a plain confirm
    #[arg(long)]
    two_player: bool,

    /// Disable sound
    #[arg(long)]
    mute: bool,

    /// Tick period in milliseconds
    #[arg(long)]
    tick_ms: Option<u64>,
}

impl Args {
    /// File settings with command-line overrides applied
    fn settings(&self) -> Settings {
        let mut settings = match &self.config {
            Some(path) => Settings::load_or_default(path),
            None => Settings::default(),
        };
        if let Some(seed) = self.seed {
            settings.seed = Some(seed);
        }
        if let Some(level) = self.start_level {
            settings.start_level = level;
        }
        if let Some(tick_ms) = self.tick_ms {
            settings.tick_ms = tick_ms;
        }
        settings.two_player |= self.two_player;
        settings.muted |= self.mute;
        settings.sanitized()
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let settings = args.settings();

    let seed = settings.seed.unwrap_or_else(rand::random);
    log::info!("Bucket Boom starting (seed {seed}, level {})", settings.start_level);

    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode().context("failed to enable raw mode")?;
    out.execute(terminal::EnterAlternateScreen)
        .context("failed to enter the alternate screen")?;
    out.execute(cursor::Hide)?;

    let (cols, rows) = terminal::size().unwrap_or((0, 0));
    let (need_cols, need_rows) = TerminalRenderer::<Stdout>::required_size();
    if cols < need_cols || rows < need_rows {
        log::warn!("Terminal is {cols}x{rows}, the playfield needs {need_cols}x{need_rows}");
    }

    // Blocking key reads live on their own thread so the tick loop never waits on I/O
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = run(&mut out, ChannelInput::new(rx), &settings, seed);

    // Always restore the terminal
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write, I: InputSource>(out: &mut W, mut input: I, settings: &Settings, seed: u64) -> anyhow::Result<()> {
    let mut state = GameState::new(seed, settings.start_level);
    if settings.two_player {
        state.default_mode = GameMode::TwoPlayer;
    }

    let mut audio = AudioManager::new(Some(Box::new(TerminalBell::new(stdout()))));
    audio.set_master_volume(settings.master_volume);
    audio.set_sfx_volume(settings.sfx_volume);
    audio.set_muted(settings.muted);

    let mut renderer = TerminalRenderer::new(out);
    let mut scene = Scene::new(&mut renderer);
    let mut clock = TickClock::new(Duration::from_millis(settings.tick_ms));

    loop {
        let mut events = Vec::new();
        for action in input.poll() {
            match action {
                KeyAction::Quit => {
                    log::info!("Quit at tick {} (score {})", state.time_ticks, state.score);
                    return Ok(());
                }
                KeyAction::Game(event) => events.push(event),
            }
        }

        tick(&mut state, &TickInput { events }, &mut audio);
        scene.sync(&state, &mut renderer);
        renderer.refresh();
        clock.wait();
    }
}
