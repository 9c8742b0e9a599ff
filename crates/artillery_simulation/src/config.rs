//! Data-driven настройки бомб и pickup spawner
//!
//! Загружаются из JSON (`SimulationConfig::from_json_str`), отсутствующие
//! поля берутся из Default. Радиус detonation query сюда НЕ входит -
//! это константа `DETONATION_QUERY_RADIUS`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ошибки загрузки конфигурации
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse simulation config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid simulation config: {0}")]
    Invalid(String),
}

/// Параметры бомбы (спавнятся в Ordnance при укладке)
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[reflect(Resource)]
#[serde(default)]
pub struct BombConfig {
    /// Задержка между укладкой и взрывом (секунды)
    pub fuse_time: f32,
    /// Радиус взрыва из настроек уровня. Detonation query его не использует.
    pub bomb_radius: f32,
    /// Сила отбрасывания combatant
    pub bomb_force: f32,
    /// Радиус кратера в пикселях текстуры
    pub carve_radius: i32,
}

impl Default for BombConfig {
    fn default() -> Self {
        Self {
            fuse_time: 1.5,
            bomb_radius: 10.0,
            bomb_force: 100.0,
            carve_radius: 30,
        }
    }
}

/// Параметры доставки pickup'ов
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[reflect(Resource)]
#[serde(default)]
pub struct PickupConfig {
    /// Задержка между запросом доставки и появлением pickup (секунды)
    pub delivery_time: f32,
    pub drop_range_left: f32,
    pub drop_range_right: f32,
    pub drop_height: f32,
    /// Здоровье игрока >= порога → всегда бомба
    pub high_health_threshold: u32,
    /// Здоровье игрока <= порога → всегда аптечка
    pub low_health_threshold: u32,
    /// Сколько HP восстанавливает аптечка
    pub health_bonus: u32,
}

impl Default for PickupConfig {
    fn default() -> Self {
        Self {
            delivery_time: 5.0,
            drop_range_left: -15.0,
            drop_range_right: 15.0,
            drop_height: 15.0,
            high_health_threshold: 75,
            low_health_threshold: 25,
            health_bonus: 25,
        }
    }
}

/// Полная конфигурация симуляции
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub bomb: BombConfig,
    pub pickups: PickupConfig,
}

impl SimulationConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let bomb = &self.bomb;
        if !(bomb.fuse_time.is_finite() && bomb.fuse_time >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "bomb.fuse_time must be a non-negative number, got {}",
                bomb.fuse_time
            )));
        }
        if !bomb.bomb_force.is_finite() {
            return Err(ConfigError::Invalid("bomb.bomb_force must be finite".into()));
        }
        if bomb.carve_radius < 0 {
            return Err(ConfigError::Invalid(format!(
                "bomb.carve_radius must be >= 0, got {}",
                bomb.carve_radius
            )));
        }

        let pickups = &self.pickups;
        if !(pickups.delivery_time.is_finite() && pickups.delivery_time >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "pickups.delivery_time must be a non-negative number, got {}",
                pickups.delivery_time
            )));
        }
        if !(pickups.drop_range_left < pickups.drop_range_right) {
            return Err(ConfigError::Invalid(format!(
                "pickups.drop_range_left ({}) must be < drop_range_right ({})",
                pickups.drop_range_left, pickups.drop_range_right
            )));
        }
        if pickups.low_health_threshold > pickups.high_health_threshold {
            return Err(ConfigError::Invalid(
                "pickups.low_health_threshold must not exceed high_health_threshold".into(),
            ));
        }

        Ok(())
    }
}
