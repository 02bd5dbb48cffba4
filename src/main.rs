#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(coverage_nightly, coverage(off))]

use std::env;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use pacman_engine::config::GameConfig;
use pacman_engine::events::{GameCommand, GameEvent};
use pacman_engine::formatter::TickFormatter;
use pacman_engine::game::Game;
use pacman_engine::systems::state::GameStage;
use pacman_engine::systems::steering::{Autopilot, Steering};
use pacman_engine::variant::GameVariant;
use rand::Rng;
use thousands::Separable;
use tracing::{debug, info};
use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Options of the headless runner.
#[derive(Debug)]
struct Options {
    variant: GameVariant,
    /// `None` runs the demo level.
    level: Option<u32>,
    ticks: u64,
    seed: Option<u64>,
}

impl Options {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Options> {
        let mut options = Options {
            variant: GameVariant::PacMan,
            level: Some(1),
            ticks: 3600,
            seed: None,
        };
        while let Some(arg) = args.next() {
            let mut value = || args.next().with_context(|| format!("missing value for {arg}"));
            match arg.as_str() {
                "--variant" => {
                    let name = value()?;
                    options.variant = GameVariant::from_str(&name).with_context(|| format!("unknown variant {name:?}"))?;
                }
                "--level" => options.level = Some(value()?.parse().context("--level expects a number")?),
                "--demo" => options.level = None,
                "--ticks" => options.ticks = value()?.parse().context("--ticks expects a number")?,
                "--seed" => options.seed = Some(value()?.parse().context("--seed expects a number")?),
                other => bail!("unknown argument {other:?} (expected --variant, --level, --demo, --ticks or --seed)"),
            }
        }
        Ok(options)
    }
}

fn init_tracing() -> Result<()> {
    let subscriber = tracing_subscriber::registry()
        .with(fmt::layer().event_format(TickFormatter))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(ErrorLayer::default());
    tracing::subscriber::set_global_default(subscriber).context("could not set the tracing subscriber")
}

fn main() -> Result<()> {
    init_tracing()?;
    let options = Options::parse(env::args().skip(1))?;
    let seed = options.seed.unwrap_or_else(|| rand::rng().random());
    info!(?options, seed, "Starting headless run");

    let config = GameConfig {
        variant: options.variant,
        seed,
        pac_immune: true,
        ..Default::default()
    };
    let mut game = Game::new(config)?;

    let mut events = match options.level {
        Some(level) => {
            let mut events = game.execute(GameCommand::SetPacSteering(Some(Steering::Autopilot(Autopilot::default()))))?;
            events.extend(game.execute(GameCommand::BuildLevel(level))?);
            events
        }
        None => game.execute(GameCommand::BuildDemoLevel)?,
    };
    events.extend(game.execute(GameCommand::ContinueGame)?);
    log_events(&events);

    for _ in 0..options.ticks {
        let events = game.tick();
        log_events(&events);
        match game.stage() {
            GameStage::LevelComplete | GameStage::Idle => log_events(&game.execute(GameCommand::ContinueGame)?),
            GameStage::GameOver => break,
            _ => {}
        }
    }

    let snapshot = game.snapshot();
    info!(
        ticks = game.tick_count(),
        level = snapshot.level_number,
        score = %snapshot.score.separate_with_commas(),
        lives = snapshot.lives,
        food_left = snapshot.food_uneaten,
        stage = ?snapshot.stage,
        "Run finished"
    );
    Ok(())
}

fn log_events(events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::PacFoundFood { .. } => debug!(?event),
            _ => info!(?event),
        }
    }
}
