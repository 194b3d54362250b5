use crate::config::Validate;
use crate::{SessionRng, log};
use super::entity::Snake;
use super::food::{Food, FoodSpawner};
use super::grid::Grid;
use super::settings::GameSettings;
use super::snapshot::GameSnapshot;
use super::types::{DeathReason, Direction, GameStatus, Point, TurnRejection};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing advanced: not running, or the interval has not elapsed yet.
    Idle,
    Moved { head: Point },
    AteFood { head: Point, score: u32 },
    Lost(DeathReason),
    Won,
}

/// One single-player game: owns the field, the snake, the food and the
/// clock that paces them.
///
/// The caller owns the frame loop. It feeds timestamps into [`Simulation::tick`]
/// and keeps calling while [`Simulation::wants_tick`] is true; the simulation
/// never reads a clock itself.
pub struct Simulation {
    settings: GameSettings,
    grid: Grid,
    spawner: FoodSpawner,
    rng: SessionRng,
    snake: Snake,
    food: Option<Food>,
    status: GameStatus,
    score: u32,
    high_score: u32,
    tick_interval_ms: u64,
    last_step_at: Option<u64>,
    steps: u64,
}

impl Simulation {
    pub fn new(settings: GameSettings, rng: SessionRng) -> Result<Self, String> {
        settings.validate()?;
        let grid = Grid::new(
            settings.field_width,
            settings.field_height,
            settings.wall_collision_mode,
        )?;
        let spawner = FoodSpawner::new(settings.food_spawn_strategy);
        let snake = Snake::new(grid.center(), Direction::Right, settings.turn_delay_ms);
        let tick_interval_ms = settings.initial_tick_interval_ms;

        let mut simulation = Self {
            settings,
            grid,
            spawner,
            rng,
            snake,
            food: None,
            status: GameStatus::NotStarted,
            score: 0,
            high_score: 0,
            tick_interval_ms,
            last_step_at: None,
            steps: 0,
        };

        if !simulation.respawn_food() {
            return Err("Field has no room for food next to the snake".to_string());
        }
        Ok(simulation)
    }

    /// Seeds the in-session high score, e.g. from a stored record.
    pub fn with_high_score(mut self, high_score: u32) -> Self {
        self.high_score = high_score;
        self
    }

    pub fn start(&mut self) -> bool {
        if self.status != GameStatus::NotStarted {
            return false;
        }
        self.status = GameStatus::Running;
        self.last_step_at = None;
        log!("Game started on {}x{} field", self.grid.width(), self.grid.height());
        true
    }

    /// Throws away the current round and starts a fresh one. The high score
    /// and the random stream carry over.
    pub fn restart(&mut self) {
        self.snake = Snake::new(self.grid.center(), Direction::Right, self.settings.turn_delay_ms);
        self.score = 0;
        self.tick_interval_ms = self.settings.initial_tick_interval_ms;
        self.last_step_at = None;
        self.steps = 0;
        self.status = GameStatus::Running;
        if !self.respawn_food() {
            self.finish(GameStatus::Won);
        }
        log!("Game restarted");
    }

    pub fn toggle_pause(&mut self) -> GameStatus {
        match self.status {
            GameStatus::Running => {
                self.status = GameStatus::Paused;
                log!("Game paused at score {}", self.score);
            }
            GameStatus::Paused => {
                self.status = GameStatus::Running;
                self.last_step_at = None;
                log!("Game resumed");
            }
            _ => {}
        }
        self.status
    }

    pub fn set_direction(
        &mut self,
        direction: Direction,
        now_ms: u64,
    ) -> Result<(), TurnRejection> {
        if self.status != GameStatus::Running {
            return Err(TurnRejection::NotRunning);
        }
        self.snake.set_direction(direction, now_ms)
    }

    /// Frame entry point. Steps once when more than the current interval
    /// has passed since the previous step. The first call after a start or
    /// resume only records the baseline.
    pub fn tick(&mut self, now_ms: u64) -> TickOutcome {
        if self.status != GameStatus::Running {
            return TickOutcome::Idle;
        }

        let Some(last_step_at) = self.last_step_at else {
            self.last_step_at = Some(now_ms);
            return TickOutcome::Idle;
        };

        if now_ms.saturating_sub(last_step_at) <= self.tick_interval_ms {
            return TickOutcome::Idle;
        }

        self.last_step_at = Some(now_ms);
        self.step()
    }

    /// Advances exactly one cell, ignoring the clock.
    pub fn step(&mut self) -> TickOutcome {
        if self.status != GameStatus::Running {
            return TickOutcome::Idle;
        }
        self.steps += 1;

        let head = match self.snake.advance(&self.grid) {
            Ok(head) => head,
            Err(reason) => {
                self.finish(GameStatus::Lost(reason));
                log!(
                    "Snake {} at {}. Final score: {}",
                    reason,
                    self.snake.head(),
                    self.score
                );
                return TickOutcome::Lost(reason);
            }
        };

        let Some(food) = self.food.filter(|food| food.position == head) else {
            return TickOutcome::Moved { head };
        };

        self.score = self.score.saturating_add(food.value);
        self.snake.grow();
        log!("Ate food at {}. Score: {}", head, self.score);

        if !self.respawn_food() {
            self.finish(GameStatus::Won);
            log!("Field is full, game won with score {}", self.score);
            return TickOutcome::Won;
        }

        self.tick_interval_ms = self
            .tick_interval_ms
            .saturating_sub(self.settings.tick_interval_step_ms)
            .max(self.settings.min_tick_interval_ms);

        TickOutcome::AteFood {
            head,
            score: self.score,
        }
    }

    pub fn wants_tick(&self) -> bool {
        self.status == GameStatus::Running
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            segments: self.snake.segments().iter().copied().collect(),
            food: self.food.map(|food| food.position),
            score: self.score,
            high_score: self.high_score,
            status: self.status,
            direction: self.snake.direction(),
            tick_interval_ms: self.tick_interval_ms,
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Option<Food> {
        self.food
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    fn respawn_food(&mut self) -> bool {
        self.food = self
            .spawner
            .spawn(&self.grid, self.snake.occupied(), &mut self.rng)
            .map(|position| Food {
                position,
                value: self.settings.food_value,
            });
        self.food.is_some()
    }

    fn finish(&mut self, status: GameStatus) {
        self.status = status;
        self.high_score = self.high_score.max(self.score);
    }

    #[cfg(test)]
    fn place_food(&mut self, position: Point) {
        self.food = Some(Food {
            position,
            value: self.settings.food_value,
        });
    }

    #[cfg(test)]
    fn place_snake(&mut self, snake: Snake) {
        self.snake = snake;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snake::WallCollisionMode;

    fn settings() -> GameSettings {
        GameSettings {
            turn_delay_ms: None,
            ..GameSettings::default()
        }
    }

    fn create_simulation(settings: GameSettings) -> Simulation {
        let mut simulation = Simulation::new(settings, SessionRng::new(42)).unwrap();
        simulation.start();
        simulation
    }

    fn segments(simulation: &Simulation) -> Vec<Point> {
        simulation.snapshot().segments
    }

    #[test]
    fn test_new_game_layout() {
        let simulation = Simulation::new(settings(), SessionRng::new(1)).unwrap();
        assert_eq!(simulation.status(), GameStatus::NotStarted);
        assert_eq!(segments(&simulation), vec![Point::new(10, 10)]);
        assert_eq!(simulation.snake().direction(), Direction::Right);
        let food = simulation.food().unwrap();
        assert_ne!(food.position, Point::new(10, 10));
        assert_eq!(food.value, 10);
        assert_eq!(simulation.tick_interval_ms(), 150);
    }

    #[test]
    fn test_invalid_settings_refuse_to_build() {
        let result = Simulation::new(
            GameSettings { field_width: 0, ..settings() },
            SessionRng::new(1),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_step_without_food() {
        let mut simulation = create_simulation(settings());
        simulation.place_food(Point::new(0, 0));
        assert_eq!(simulation.step(), TickOutcome::Moved { head: Point::new(11, 10) });
        assert_eq!(segments(&simulation), vec![Point::new(11, 10)]);
        assert_eq!(simulation.score(), 0);
    }

    #[test]
    fn test_eating_food_scores_and_grows() {
        let mut simulation = create_simulation(settings());
        simulation.place_food(Point::new(11, 10));
        assert_eq!(
            simulation.step(),
            TickOutcome::AteFood { head: Point::new(11, 10), score: 10 }
        );
        assert_eq!(simulation.score(), 10);
        assert_eq!(simulation.tick_interval_ms(), 148);
        let food = simulation.food().unwrap();
        assert!(!simulation.snake().contains(food.position));

        simulation.place_food(Point::new(0, 0));
        simulation.step();
        assert_eq!(segments(&simulation), vec![Point::new(12, 10), Point::new(11, 10)]);
    }

    #[test]
    fn test_interval_floors_at_minimum() {
        let mut simulation = create_simulation(GameSettings {
            initial_tick_interval_ms: 55,
            min_tick_interval_ms: 50,
            tick_interval_step_ms: 4,
            ..settings()
        });
        for x in 11..15 {
            simulation.place_food(Point::new(x, 10));
            simulation.step();
        }
        assert_eq!(simulation.tick_interval_ms(), 50);
        assert_eq!(simulation.score(), 40);
    }

    #[test]
    fn test_wall_hit_loses_in_death_mode() {
        let mut simulation = create_simulation(GameSettings {
            wall_collision_mode: WallCollisionMode::Death,
            ..settings()
        });
        simulation.place_food(Point::new(0, 0));
        for _ in 0..9 {
            assert!(matches!(simulation.step(), TickOutcome::Moved { .. }));
        }
        assert_eq!(simulation.snake().head(), Point::new(19, 10));
        assert_eq!(simulation.step(), TickOutcome::Lost(DeathReason::WallCollision));
        assert_eq!(simulation.status(), GameStatus::Lost(DeathReason::WallCollision));
        assert!(!simulation.wants_tick());
        assert_eq!(simulation.step(), TickOutcome::Idle);
        assert_eq!(simulation.snake().head(), Point::new(19, 10));
    }

    #[test]
    fn test_wraps_in_wrap_mode() {
        let mut simulation = create_simulation(settings());
        simulation.place_food(Point::new(5, 5));
        for _ in 0..10 {
            simulation.step();
        }
        assert_eq!(simulation.snake().head(), Point::new(0, 10));
        assert!(simulation.wants_tick());
    }

    #[test]
    fn test_self_collision_loses_and_records_high_score() {
        let mut simulation = create_simulation(settings());
        let snake = Snake::from_segments(
            &[
                Point::new(5, 5),
                Point::new(5, 6),
                Point::new(6, 6),
                Point::new(6, 5),
                Point::new(7, 5),
            ],
            Direction::Up,
            None,
        )
        .unwrap();
        simulation.place_snake(snake);
        simulation.place_food(Point::new(5, 4));
        simulation.step();
        assert_eq!(simulation.score(), 10);

        simulation.place_food(Point::new(0, 0));
        simulation.set_direction(Direction::Right, 0).unwrap();
        assert!(matches!(simulation.step(), TickOutcome::Moved { .. }));
        assert_eq!(simulation.snake().len(), 6);
        simulation.set_direction(Direction::Down, 1).unwrap();
        assert_eq!(simulation.step(), TickOutcome::Moved { head: Point::new(6, 5) });
        simulation.set_direction(Direction::Left, 2).unwrap();
        assert_eq!(simulation.step(), TickOutcome::Lost(DeathReason::SelfCollision));
        assert_eq!(simulation.high_score(), 10);
    }

    #[test]
    fn test_filling_the_field_wins() {
        let mut simulation = create_simulation(GameSettings {
            field_width: 2,
            field_height: 2,
            wall_collision_mode: WallCollisionMode::WrapAround,
            ..settings()
        });
        // Head starts at (1, 1); walk the 2x2 loop eating everything.
        simulation.place_food(Point::new(0, 1));
        assert!(matches!(simulation.step(), TickOutcome::AteFood { .. }));
        simulation.place_food(Point::new(0, 0));
        simulation.set_direction(Direction::Up, 0).unwrap();
        assert!(matches!(simulation.step(), TickOutcome::AteFood { .. }));
        simulation.place_food(Point::new(1, 0));
        simulation.set_direction(Direction::Right, 1).unwrap();
        assert!(matches!(simulation.step(), TickOutcome::AteFood { .. }));
        simulation.place_food(Point::new(1, 1));
        simulation.set_direction(Direction::Down, 2).unwrap();
        assert_eq!(simulation.step(), TickOutcome::Won);
        assert_eq!(simulation.status(), GameStatus::Won);
        assert_eq!(simulation.food(), None);
        assert_eq!(simulation.snake().len(), 4);
        assert_eq!(simulation.score(), 40);
        assert_eq!(simulation.high_score(), 40);
        assert!(!simulation.wants_tick());
    }

    #[test]
    fn test_tick_waits_for_interval() {
        let mut simulation = create_simulation(settings());
        simulation.place_food(Point::new(0, 0));
        assert_eq!(simulation.tick(1000), TickOutcome::Idle);
        assert_eq!(simulation.tick(1100), TickOutcome::Idle);
        assert_eq!(simulation.tick(1150), TickOutcome::Idle);
        assert_eq!(simulation.tick(1151), TickOutcome::Moved { head: Point::new(11, 10) });
        assert_eq!(simulation.tick(1200), TickOutcome::Idle);
        assert_eq!(simulation.tick(1302), TickOutcome::Moved { head: Point::new(12, 10) });
        assert_eq!(simulation.steps(), 2);
    }

    #[test]
    fn test_default_turn_delay_throttles_changes() {
        let mut simulation = create_simulation(GameSettings::default());
        assert_eq!(simulation.settings().turn_delay_ms, Some(150));

        assert_eq!(simulation.set_direction(Direction::Up, 0), Ok(()));
        assert_eq!(
            simulation.set_direction(Direction::Left, 100),
            Err(TurnRejection::Throttled)
        );
        assert_eq!(simulation.snake().pending_direction(), Some(Direction::Up));
        assert_eq!(simulation.set_direction(Direction::Down, 150), Ok(()));
        assert_eq!(simulation.snake().pending_direction(), Some(Direction::Down));
    }

    #[test]
    fn test_not_started_ignores_ticks_and_input() {
        let mut simulation = Simulation::new(settings(), SessionRng::new(1)).unwrap();
        assert_eq!(simulation.tick(0), TickOutcome::Idle);
        assert_eq!(simulation.tick(10_000), TickOutcome::Idle);
        assert_eq!(
            simulation.set_direction(Direction::Up, 0),
            Err(TurnRejection::NotRunning)
        );
        assert_eq!(simulation.toggle_pause(), GameStatus::NotStarted);
        assert!(simulation.start());
        assert!(!simulation.start());
    }

    #[test]
    fn test_pause_stops_ticks_and_resume_skips_catch_up() {
        let mut simulation = create_simulation(settings());
        simulation.place_food(Point::new(0, 0));
        simulation.tick(0);
        assert_eq!(simulation.toggle_pause(), GameStatus::Paused);
        assert_eq!(simulation.tick(10_000), TickOutcome::Idle);
        assert_eq!(simulation.step(), TickOutcome::Idle);
        assert_eq!(
            simulation.set_direction(Direction::Up, 10_000),
            Err(TurnRejection::NotRunning)
        );

        assert_eq!(simulation.toggle_pause(), GameStatus::Running);
        assert_eq!(simulation.tick(20_000), TickOutcome::Idle);
        assert!(matches!(simulation.tick(20_151), TickOutcome::Moved { .. }));
        assert_eq!(simulation.steps(), 1);
    }

    #[test]
    fn test_double_toggle_restores_snapshot() {
        let mut simulation = create_simulation(settings());
        simulation.step();
        simulation.set_direction(Direction::Down, 5).unwrap();
        let before = simulation.snapshot();
        let pending = simulation.snake().pending_direction();
        simulation.toggle_pause();
        simulation.toggle_pause();
        assert_eq!(simulation.snapshot(), before);
        assert_eq!(simulation.snake().pending_direction(), pending);
    }

    #[test]
    fn test_toggle_pause_ignored_after_game_over() {
        let mut simulation = create_simulation(GameSettings {
            field_width: 2,
            wall_collision_mode: WallCollisionMode::Death,
            ..settings()
        });
        simulation.place_food(Point::new(0, 0));
        assert_eq!(simulation.step(), TickOutcome::Lost(DeathReason::WallCollision));
        assert_eq!(
            simulation.toggle_pause(),
            GameStatus::Lost(DeathReason::WallCollision)
        );
    }

    #[test]
    fn test_restart_resets_round_but_keeps_high_score() {
        let mut simulation = create_simulation(settings()).with_high_score(5);
        simulation.place_food(Point::new(11, 10));
        simulation.step();
        simulation.toggle_pause();
        simulation.restart();

        assert_eq!(simulation.status(), GameStatus::Running);
        assert_eq!(simulation.score(), 0);
        assert_eq!(simulation.tick_interval_ms(), 150);
        assert_eq!(segments(&simulation), vec![Point::new(10, 10)]);
        assert_eq!(simulation.high_score(), 5);
        assert!(simulation.food().is_some());
    }

    #[test]
    fn test_same_seed_replays_same_game() {
        let run = |seed: u64| {
            let mut simulation = Simulation::new(settings(), SessionRng::new(seed)).unwrap();
            simulation.start();
            let mut foods = vec![simulation.food().unwrap().position];
            for _ in 0..200 {
                if let TickOutcome::AteFood { .. } = simulation.step() {
                    foods.push(simulation.food().unwrap().position);
                }
                if !simulation.wants_tick() {
                    break;
                }
            }
            (foods, simulation.snapshot())
        };
        assert_eq!(run(99), run(99));
    }
}
