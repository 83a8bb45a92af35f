#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(coverage_nightly, coverage(off))]

use std::env;
use std::time::Instant;

use anyhow::Context;
use jujutsu_pacman::constants::LOOP_TIME;
use jujutsu_pacman::error::{GameError, GameResult};
use jujutsu_pacman::formatter::TickFormatter;
use jujutsu_pacman::ghost::CollisionOutcome;
use jujutsu_pacman::map::Maze;
use jujutsu_pacman::session::Session;
use rand::Rng;
use tracing::{info, warn};
use tracing_error::ErrorLayer;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

/// Command line options for the headless demo.
struct Options {
    ticks: u64,
    seed: Option<u64>,
    realtime: bool,
}

impl Options {
    fn parse(args: impl Iterator<Item = String>) -> GameResult<Self> {
        let mut options = Options {
            ticks: 3600,
            seed: None,
            realtime: false,
        };

        let mut args = args.skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--realtime" | "-r" => options.realtime = true,
                "--ticks" | "--seed" => {
                    let value = args
                        .next()
                        .ok_or_else(|| GameError::InvalidArgument(format!("{} needs a value", arg)))?;
                    let value: u64 = value
                        .parse()
                        .map_err(|_| GameError::InvalidArgument(format!("{} expects a number, got {:?}", arg, value)))?;
                    if arg == "--ticks" {
                        options.ticks = value;
                    } else {
                        options.seed = Some(value);
                    }
                }
                other => return Err(GameError::InvalidArgument(format!("unknown argument {:?}", other))),
            }
        }

        Ok(options)
    }
}

fn init_logging() -> GameResult<()> {
    let subscriber = tracing_subscriber::registry()
        .with(fmt::layer().event_format(TickFormatter::default()))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(ErrorLayer::default());

    tracing::subscriber::set_global_default(subscriber).map_err(|e| GameError::Logging(e.to_string()))
}

/// Runs a scripted session on the built-in maze, with the player on autopilot.
pub fn main() -> anyhow::Result<()> {
    init_logging()?;
    let options = Options::parse(env::args())?;

    let maze = Maze::default_maze().context("Built-in maze failed to load")?;
    let seed = options.seed.unwrap_or_else(|| rand::rng().random());
    let mut session = Session::new(maze, seed);

    info!(ticks = options.ticks, seed, realtime = options.realtime, loop_time = ?LOOP_TIME, "Starting demo");

    let started = Instant::now();
    for _ in 0..options.ticks {
        let frame_start = Instant::now();

        let direction = session.autopilot();
        let report = session.tick(direction);
        if report.collision == CollisionOutcome::GhostEaten {
            info!(score = session.score(), "Ghost eaten");
        }
        if report.level_cleared {
            info!(level = session.level(), "Advanced to next level");
        }
        if report.game_over {
            warn!(score = session.score(), level = session.level(), "Game over");
            break;
        }

        if options.realtime {
            if let Some(remaining) = LOOP_TIME.checked_sub(frame_start.elapsed()) {
                spin_sleep::sleep(remaining);
            }
        }
    }

    for ghost in session.manager().ghosts() {
        info!(
            ghost = %ghost.personality(),
            mode = %ghost.mode(),
            tile = ?ghost.tile(),
            visible = ghost.visible(),
            "Final ghost state"
        );
    }
    info!(
        ticks = session.ticks(),
        score = session.score(),
        lives = session.lives(),
        level = session.level(),
        elapsed = ?started.elapsed(),
        "Demo finished"
    );

    Ok(())
}
