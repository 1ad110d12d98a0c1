//! Brick Breaker entry point
//!
//! Parses arguments, loads settings, takes over the terminal and runs the
//! game loop until quit.

use std::env;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use brick_breaker::audio::LogSink;
use brick_breaker::platform::TerminalInput;
use brick_breaker::renderer::{TerminalGuard, TerminalRenderer};
use brick_breaker::{FileStore, Game, Preset, Settings};

struct Args {
    settings_path: Option<PathBuf>,
    preset: Option<Preset>,
}

fn print_usage() {
    eprintln!("Usage: brick-breaker [SETTINGS.json] [--preset classic|extended]");
    eprintln!();
    eprintln!("Mouse or arrow keys move the paddle, click / Space / Enter to start and launch,");
    eprintln!("q or Esc to quit. Logs go to stderr (RUST_LOG=info brick-breaker 2>log.txt).");
}

/// Parse command line arguments, or None if help was requested
fn parse_args() -> Result<Option<Args>> {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut parsed = Args {
        settings_path: None,
        preset: None,
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--preset" => {
                let name = iter.next().context("--preset needs a value")?;
                let Some(preset) = Preset::from_str(name) else {
                    bail!("unknown preset {name:?} (expected classic or extended)");
                };
                parsed.preset = Some(preset);
            }
            "--help" | "-h" => {
                print_usage();
                return Ok(None);
            }
            other if other.starts_with('-') => bail!("unknown option {other}"),
            path => {
                if parsed.settings_path.is_some() {
                    bail!("more than one settings file given");
                }
                parsed.settings_path = Some(PathBuf::from(path));
            }
        }
    }

    Ok(Some(parsed))
}

fn load_settings(args: &Args) -> Result<Settings> {
    let mut settings = match &args.settings_path {
        Some(path) => Settings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };
    if let Some(preset) = args.preset {
        settings.apply_preset(preset);
    }
    settings.validate().context("settings rejected")?;
    Ok(settings)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let Some(args) = parse_args()? else {
        return Ok(());
    };
    let settings = load_settings(&args)?;

    let store_path = settings
        .high_score_path
        .clone()
        .unwrap_or_else(FileStore::default_path);
    log::info!("High score file: {}", store_path.display());
    let store = FileStore::new(store_path);

    let (world_width, world_height) = (settings.screen_width, settings.screen_height);

    // Restores the terminal on every exit path, including errors
    let guard = TerminalGuard::enter().context("terminal setup failed")?;

    let renderer = TerminalRenderer::new(BufWriter::new(io::stdout()), world_width, world_height)
        .context("querying terminal size")?;
    let input = TerminalInput::new(renderer.viewport());

    let mut game = Game::new(settings, input, renderer, LogSink, store)?;
    let result = game.run();

    drop(guard);
    result.context("game loop failed")?;

    let state = game.state();
    println!(
        "Final score: {}  (level {}, high score {})",
        state.score, state.level, state.high_score
    );
    Ok(())
}
