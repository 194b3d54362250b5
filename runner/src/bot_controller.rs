use clap::ValueEnum;
use snake_engine::SessionRng;
use snake_engine::snake::{Direction, Grid, Point, Simulation, Snake, WallCollisionMode};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum BotKind {
    /// Greedy step towards the food, avoiding immediate death.
    Efficient,
    /// Any direction that does not die on the next step.
    Random,
}

pub struct BotController {
    kind: BotKind,
    rng: SessionRng,
}

impl BotController {
    pub fn new(kind: BotKind, rng: SessionRng) -> Self {
        Self { kind, rng }
    }

    pub fn calculate_move(&mut self, simulation: &Simulation) -> Option<Direction> {
        if !simulation.wants_tick() {
            return None;
        }
        match self.kind {
            BotKind::Efficient => Self::efficient_pathfinding(simulation)
                .or_else(|| self.random_valid_move(simulation)),
            BotKind::Random => self.random_valid_move(simulation),
        }
    }

    fn efficient_pathfinding(simulation: &Simulation) -> Option<Direction> {
        let snake = simulation.snake();
        let grid = simulation.grid();
        let food = simulation.food()?.position;
        let head = snake.head();

        Self::get_valid_directions(snake.direction())
            .into_iter()
            .filter_map(|dir| {
                let next = grid.step(head, dir)?;
                Self::is_safe_position(next, snake).then(|| (dir, Self::distance(next, food, grid)))
            })
            .min_by_key(|&(_, distance)| distance)
            .map(|(dir, _)| dir)
    }

    fn random_valid_move(&mut self, simulation: &Simulation) -> Option<Direction> {
        let snake = simulation.snake();
        let grid = simulation.grid();
        let head = snake.head();

        let safe_directions: Vec<Direction> = Self::get_valid_directions(snake.direction())
            .into_iter()
            .filter(|&dir| {
                grid.step(head, dir)
                    .is_some_and(|next| Self::is_safe_position(next, snake))
            })
            .collect();

        match self.rng.random_index(safe_directions.len()) {
            Some(index) => Some(safe_directions[index]),
            None => Some(snake.direction()),
        }
    }

    fn get_valid_directions(current: Direction) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|d| !d.is_opposite(&current))
            .collect()
    }

    fn is_safe_position(pos: Point, snake: &Snake) -> bool {
        !snake.contains(pos) || (pos == snake.tail() && !snake.is_growing())
    }

    fn distance(a: Point, b: Point, grid: &Grid) -> i32 {
        let dx = (a.x - b.x).abs();
        let dy = (a.y - b.y).abs();

        match grid.wall_collision_mode() {
            WallCollisionMode::Death => dx + dy,
            WallCollisionMode::WrapAround => {
                dx.min(grid.width() - dx) + dy.min(grid.height() - dy)
            }
        }
    }
}
