mod bot_controller;
mod game_runner;

use std::time::Duration;

use clap::Parser;
use snake_engine::config::ConfigManager;
use snake_engine::snake::{GameSettings, Simulation};
use snake_engine::{SessionRng, log, logger};

use bot_controller::{BotController, BotKind};
use game_runner::RunResult;

#[derive(Parser)]
#[command(name = "snake_runner", about = "Plays snake headlessly with an autopilot")]
struct Args {
    /// YAML game settings; defaults are used when the file does not exist.
    #[arg(long)]
    config: Option<String>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value_t = 1)]
    games: u32,
    /// Period of the frame timer that feeds timestamps to the game.
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
    #[arg(long, value_enum, default_value_t = BotKind::Efficient)]
    bot: BotKind,
    #[arg(long)]
    use_log_prefix: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Runner".to_string())
    } else {
        None
    };
    logger::init_logger(prefix);

    let settings: GameSettings = match &args.config {
        Some(path) => ConfigManager::from_yaml_file(path).get_config()?,
        None => GameSettings::default(),
    };

    let rng = match args.seed {
        Some(seed) => SessionRng::new(seed),
        None => SessionRng::from_random(),
    };
    let seed = rng.seed();
    log!("Seed {}", seed);

    let mut simulation = Simulation::new(settings, rng)?;
    let mut bot = BotController::new(args.bot, SessionRng::new(seed.wrapping_add(1)));
    let frame = Duration::from_millis(args.frame_ms.max(1));

    for game in 1..=args.games {
        if game == 1 {
            simulation.start();
        } else {
            simulation.restart();
        }

        let result = game_runner::run_game(&mut simulation, &mut bot, frame).await;
        let snapshot = simulation.snapshot();
        log!(
            "Game {}/{} ended after {} steps: {}\n{}",
            game,
            args.games,
            simulation.steps(),
            snapshot.status,
            snapshot
        );

        if result == RunResult::Interrupted {
            log!("Interrupted, stopping");
            break;
        }
    }

    log!("Best score this session: {}", simulation.high_score());
    Ok(())
}
