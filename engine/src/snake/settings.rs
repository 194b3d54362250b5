use serde::{Deserialize, Serialize};

use crate::config::Validate;
use super::food::FoodSpawnStrategy;
use super::types::WallCollisionMode;

/// Tunables for one game. Keys missing from a settings file take their
/// default; `turn_delay_ms: null` disables turn throttling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub field_width: u32,
    pub field_height: u32,
    pub wall_collision_mode: WallCollisionMode,
    pub initial_tick_interval_ms: u64,
    pub min_tick_interval_ms: u64,
    pub tick_interval_step_ms: u64,
    pub food_value: u32,
    pub turn_delay_ms: Option<u64>,
    pub food_spawn_strategy: FoodSpawnStrategy,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            field_width: 20,
            field_height: 20,
            wall_collision_mode: WallCollisionMode::WrapAround,
            initial_tick_interval_ms: 150,
            min_tick_interval_ms: 50,
            tick_interval_step_ms: 2,
            food_value: 10,
            turn_delay_ms: Some(150),
            food_spawn_strategy: FoodSpawnStrategy::Exhaustive,
        }
    }
}

impl Validate for GameSettings {
    fn validate(&self) -> Result<(), String> {
        if !(2..=200).contains(&self.field_width) {
            return Err(format!(
                "field_width must be between 2 and 200, got {}",
                self.field_width
            ));
        }
        if !(2..=200).contains(&self.field_height) {
            return Err(format!(
                "field_height must be between 2 and 200, got {}",
                self.field_height
            ));
        }
        if self.min_tick_interval_ms == 0 {
            return Err("min_tick_interval_ms must be at least 1".to_string());
        }
        if self.initial_tick_interval_ms < self.min_tick_interval_ms {
            return Err(format!(
                "initial_tick_interval_ms ({}) must not be below min_tick_interval_ms ({})",
                self.initial_tick_interval_ms, self.min_tick_interval_ms
            ));
        }
        if self.initial_tick_interval_ms > 5000 {
            return Err("initial_tick_interval_ms must not exceed 5000".to_string());
        }
        if self.food_value == 0 {
            return Err("food_value must be at least 1".to_string());
        }
        if let FoodSpawnStrategy::Rejection { max_attempts: 0 } = self.food_spawn_strategy {
            return Err("Rejection spawning needs max_attempts of at least 1".to_string());
        }
        Ok(())
    }
}
