//! Terminal Tetris 2048 runner (default binary).
//!
//! Crossterm for input and the framebuffer-based renderer from the `term`
//! crate. Gravity runs on a fixed 16ms tick.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};

use tetris_2048::core::{GameConfig, Session};
use tetris_2048::input::{handle_key_event, should_quit};
use tetris_2048::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use tetris_2048::types::{
    Speed, DEFAULT_GRID_HEIGHT, DEFAULT_GRID_WIDTH, DEFAULT_WIN_THRESHOLD, TICK_MS,
};

/// Tetris where every block is a 2048 tile.
#[derive(Debug, Parser)]
#[command(name = "tetris-2048", version, about, long_about = None)]
struct Args {
    /// Number of rows on the board.
    #[arg(long, value_name = "ROWS", default_value_t = DEFAULT_GRID_HEIGHT)]
    height: usize,
    /// Number of columns on the board.
    #[arg(long, value_name = "COLUMNS", default_value_t = DEFAULT_GRID_WIDTH)]
    width: usize,
    /// Tile value that wins the game (a power of two).
    #[arg(long, value_name = "VALUE", default_value_t = DEFAULT_WIN_THRESHOLD)]
    win_threshold: u32,
    /// Gravity speed: slow, medium or fast.
    #[arg(long, default_value = Speed::default().as_str(), value_parser = parse_speed)]
    speed: Speed,
    /// Seed for shapes and tile values; defaults to the clock.
    #[arg(long)]
    seed: Option<u32>,
}

fn parse_speed(s: &str) -> std::result::Result<Speed, String> {
    Speed::from_str(s).ok_or_else(|| format!("unknown speed '{s}' (expected slow, medium or fast)"))
}

fn clock_seed() -> u32 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = GameConfig {
        height: args.height,
        width: args.width,
        win_threshold: args.win_threshold,
        gravity_ms: args.speed.gravity_ms(),
    };
    let seed = args.seed.unwrap_or_else(clock_seed);

    // Validate before touching the terminal so errors print normally.
    let session = Session::new(config, seed).context("invalid game settings")?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, session);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn run(term: &mut TerminalRenderer, mut session: Session) -> Result<()> {
    session.start();

    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut snap = session.snapshot();

    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(TICK_MS as u64);

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        session.snapshot_into(&mut snap);
        view.render_into(&snap, Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(action) = handle_key_event(key) {
                        session.apply_action(action);
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            session.tick(TICK_MS);
        }
    }
}
