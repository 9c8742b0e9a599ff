//! Artillery Simulation Core
//!
//! ECS-симуляция на Bevy 0.16 (headless): бомбы, детонация, кратеры, pickups.
//!
//! HYBRID ARCHITECTURE:
//! - ECS = правила (фитиль, выбор целей, урон, arm state, доставка pickup)
//! - Presentation/terrain layer = звук, частицы, пиксельный кратер (через events)

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod components;
pub mod config;
pub mod logger;
pub mod ordnance;
pub mod pickups;
pub mod spatial;

// Re-export базовых типов для удобства
pub use components::*;
pub use config::{BombConfig, ConfigError, PickupConfig, SimulationConfig};
pub use logger::*;
pub use ordnance::{
    DetonateOrdnance, DetonationOutcome, ExplosionFx, LayBombIntent, Ordnance, OrdnanceDetonated,
    OrdnancePlugin, OrdnanceState, PooledExplosionFx, DETONATION_QUERY_RADIUS,
};
pub use pickups::{PickupPlugin, PickupSpawner};
pub use spatial::{OverlapCircle, OverlapHit, SpatialQuery};

/// Главный plugin симуляции (объединяет все подсистемы)
#[derive(Default)]
pub struct SimulationPlugin {
    pub config: SimulationConfig,
}

impl SimulationPlugin {
    pub fn with_config(config: SimulationConfig) -> Self {
        Self { config }
    }
}

impl SimulationPlugin {
    /// Конфиг, прошедший `validate()`; невалидный заменяется defaults
    pub fn validated_config(&self) -> SimulationConfig {
        match self.config.validate() {
            Ok(()) => self.config.clone(),
            Err(error) => {
                log_error(&format!("{}, falling back to defaults", error));
                SimulationConfig::default()
            }
        }
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let config = self.validated_config();

        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            .insert_resource(config.bomb)
            .insert_resource(config.pickups);

        // Детерминистичный RNG (seed по умолчанию, если app не задал свой)
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app.add_plugins((OrdnancePlugin, PickupPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)); // 60Hz FixedUpdate

    app
}

/// Spawn pooled explosion fx и зарегистрировать его как `ExplosionFx`
pub fn spawn_explosion_fx(world: &mut World) -> Entity {
    let pooled = world
        .spawn((PooledExplosionFx, Transform::default()))
        .id();
    world.insert_resource(ExplosionFx::new(pooled));
    pooled
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
