mod entity;
mod food;
mod grid;
mod input;
mod settings;
mod simulation;
mod snapshot;
mod types;

pub use entity::Snake;
pub use food::{Food, FoodSpawnStrategy, FoodSpawner};
pub use grid::Grid;
pub use input::InputArbiter;
pub use settings::GameSettings;
pub use simulation::{Simulation, TickOutcome};
pub use snapshot::GameSnapshot;
pub use types::{DeathReason, Direction, GameStatus, Point, TurnRejection, WallCollisionMode};
