use std::time::Duration;

use snake_engine::log;
use snake_engine::snake::{Simulation, TickOutcome};
use tokio::time::{Instant, MissedTickBehavior, interval};

use crate::bot_controller::BotController;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunResult {
    Finished,
    Interrupted,
}

/// Drives one game from a frame timer until it ends or Ctrl+C arrives.
/// Every frame the bot may turn, then the game receives the elapsed time.
pub async fn run_game(
    simulation: &mut Simulation,
    bot: &mut BotController,
    frame: Duration,
) -> RunResult {
    let started = Instant::now();
    let mut frame_timer = interval(frame);
    frame_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    while simulation.wants_tick() {
        tokio::select! {
            _ = frame_timer.tick() => {}
            _ = &mut shutdown => {
                simulation.toggle_pause();
                return RunResult::Interrupted;
            }
        }

        let now_ms = started.elapsed().as_millis() as u64;

        if let Some(direction) = bot.calculate_move(simulation)
            && direction != simulation.snake().direction()
            && Some(direction) != simulation.snake().pending_direction()
        {
            // Throttled or reversed turns are simply retried next frame.
            let _ = simulation.set_direction(direction, now_ms);
        }

        // Food, loss and win are logged by the engine.
        if let TickOutcome::AteFood { .. } = simulation.tick(now_ms) {
            log!("Tick interval now {}ms", simulation.tick_interval_ms());
        }
    }

    RunResult::Finished
}
