#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a Snaze session in the terminal.

mod args;

use std::{
    fs,
    io::{self, BufRead},
    thread,
    time::Duration,
};

use anyhow::{Context, Result};
use args::Args;
use clap::Parser;
use rand::Rng;
use snaze_rendering::{FrameSink, Palette, TerminalRenderer};
use snaze_system_session::Session;
use snaze_world::parse_levels;
use tracing_subscriber::EnvFilter;

/// Entry point for the Snaze command-line interface.
fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    let config = args.resolve_config()?;

    let path = &args.level_file;
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read level file {}", path.display()))?;
    let levels = parse_levels(&source)
        .with_context(|| format!("failed to load levels from {}", path.display()))?;

    let seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
    tracing::info!(seed, levels = levels.len(), "starting session");
    let mut session = Session::seeded(levels, &config, seed).context("failed to start session")?;

    let palette = if args.ascii {
        Palette::ASCII
    } else {
        Palette::UNICODE
    };
    let stdout = io::stdout();
    let mut renderer = TerminalRenderer::new(stdout.lock(), palette).with_prompts(!args.autoplay);

    play(
        &mut session,
        &mut renderer,
        config.frame_interval(),
        args.autoplay,
    )
}

/// Drives the session to completion, pausing for <ENTER> where the state asks for it.
fn play<R, S>(
    session: &mut Session<R>,
    sink: &mut S,
    interval: Duration,
    autoplay: bool,
) -> Result<()>
where
    R: Rng,
    S: FrameSink,
{
    let stdin = io::stdin();
    let mut line = String::new();

    present(session, sink, interval)?;
    while !session.is_over() {
        if !autoplay && session.state().awaits_acknowledgement() {
            line.clear();
            let _ = stdin
                .lock()
                .read_line(&mut line)
                .context("failed to read acknowledgement")?;
        }

        if session.tick().is_drawn() {
            present(session, sink, interval)?;
        }
    }

    let frame = session.frame();
    tracing::info!(
        score = frame.score,
        lives = frame.lives,
        won = frame.is_won(),
        "session finished"
    );
    Ok(())
}

fn present<R, S>(session: &Session<R>, sink: &mut S, interval: Duration) -> Result<()>
where
    R: Rng,
    S: FrameSink,
{
    thread::sleep(interval);
    sink.present(&session.frame())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}
