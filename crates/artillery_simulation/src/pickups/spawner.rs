//! Pickup spawner - доставка ящиков с бомбами и аптечек
//!
//! Каждая детонация просит одну доставку. Доставка приходит через
//! `delivery_time` секунд в случайной точке над уровнем.

use bevy::prelude::*;
use bevy_rapier2d::prelude::Sensor;
use rand::Rng;

use super::events::PickupDelivered;
use crate::components::{Footprint, Health, Player, SceneTag};
use crate::config::PickupConfig;
use crate::DeterministicRng;

/// Радиус коллайдера pickup
const PICKUP_RADIUS: f32 = 0.5;

/// Что лежит в ящике
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum PickupKind {
    BombCrate,
    HealthPack,
}

impl PickupKind {
    pub fn scene_tag(self) -> SceneTag {
        match self {
            PickupKind::BombCrate => SceneTag::BombPickup,
            PickupKind::HealthPack => SceneTag::HealthPickup,
        }
    }
}

/// Pickup на поле
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Pickup {
    pub kind: PickupKind,
}

/// Pickup service: очередь доставок
///
/// Несколько доставок могут идти параллельно (по одной на детонацию).
#[derive(Resource, Debug)]
pub struct PickupSpawner {
    delivery_time: f32,
    pending: Vec<Timer>,
    requested: u32,
}

impl PickupSpawner {
    pub fn new(delivery_time: f32) -> Self {
        Self {
            delivery_time,
            pending: Vec::new(),
            requested: 0,
        }
    }

    /// Начать доставку следующего pickup
    pub fn begin_next_delivery(&mut self) {
        self.pending
            .push(Timer::from_seconds(self.delivery_time, TimerMode::Once));
        self.requested += 1;
    }

    pub fn pending_deliveries(&self) -> usize {
        self.pending.len()
    }

    /// Сколько доставок запрошено за всё время
    pub fn requested_deliveries(&self) -> u32 {
        self.requested
    }

    /// Продвинуть таймеры, вернуть число доставок, готовых к спавну
    pub fn tick(&mut self, delta: std::time::Duration) -> usize {
        for timer in self.pending.iter_mut() {
            timer.tick(delta);
        }

        let before = self.pending.len();
        self.pending.retain(|timer| !timer.finished());
        before - self.pending.len()
    }
}

/// Выбор содержимого по здоровью игрока
///
/// - health >= high → бомбы (игроку лечиться не нужно)
/// - health <= low → аптечка
/// - иначе / игрока нет → монетка
pub fn choose_pickup_kind(
    player_health: Option<u32>,
    config: &PickupConfig,
    rng: &mut impl Rng,
) -> PickupKind {
    match player_health {
        Some(health) if health >= config.high_health_threshold => PickupKind::BombCrate,
        Some(health) if health <= config.low_health_threshold => PickupKind::HealthPack,
        _ => {
            if rng.gen_bool(0.5) {
                PickupKind::BombCrate
            } else {
                PickupKind::HealthPack
            }
        }
    }
}

/// Точка падения: x ∈ [left, right), y = drop_height
///
/// Пустой диапазон (left >= right) → x = left.
pub fn choose_drop_position(config: &PickupConfig, rng: &mut impl Rng) -> Vec2 {
    let x = if config.drop_range_left < config.drop_range_right {
        rng.gen_range(config.drop_range_left..config.drop_range_right)
    } else {
        config.drop_range_left
    };
    Vec2::new(x, config.drop_height)
}

/// Система: доставка pickup'ов по истечении таймеров
///
/// Без `PickupSpawner` (сервис снят с уровня) ничего не делает.
pub fn deliver_pickups(
    mut commands: Commands,
    spawner: Option<ResMut<PickupSpawner>>,
    config: Res<PickupConfig>,
    mut rng: ResMut<DeterministicRng>,
    players: Query<&Health, With<Player>>,
    time: Res<Time<Fixed>>,
    mut delivered: EventWriter<PickupDelivered>,
) {
    let Some(mut spawner) = spawner else {
        return;
    };

    let ready = spawner.tick(time.delta());
    if ready == 0 {
        return;
    }

    let player_health = players.single().ok().map(|health| health.current);

    for _ in 0..ready {
        let kind = choose_pickup_kind(player_health, &config, &mut rng.rng);
        let position = choose_drop_position(&config, &mut rng.rng);

        let pickup = commands
            .spawn((
                Pickup { kind },
                kind.scene_tag(),
                Transform::from_translation(position.extend(0.0)),
                Footprint::circle(PICKUP_RADIUS),
                Sensor,
            ))
            .id();

        delivered.write(PickupDelivered {
            pickup,
            kind,
            position,
        });

        crate::log_info(&format!("📦 Delivered {:?} {:?} at {:?}", kind, pickup, position));
    }
}
