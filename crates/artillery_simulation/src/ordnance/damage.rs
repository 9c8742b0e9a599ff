//! Blast damage: мгновенная смерть + knockback
//!
//! Частичного урона на этом уровне нет - `Health::kill()`.
//! Импульс пишется в `ExternalImpulse` (Rapier применит его на следующем шаге).

use bevy::prelude::*;
use bevy_rapier2d::prelude::ExternalImpulse;

use crate::components::Health;

/// Направление, если combatant стоит ровно в точке взрыва (вверх)
pub const FALLBACK_KNOCKBACK_DIRECTION: Vec2 = Vec2::Y;

/// Импульс от бомбы к combatant: normalize(body − origin) × force
///
/// Совпадающие позиции дают `FALLBACK_KNOCKBACK_DIRECTION`, никогда NaN.
pub fn knockback_impulse(origin: Vec2, body: Vec2, force: f32) -> Vec2 {
    let direction = (body - origin)
        .try_normalize()
        .unwrap_or(FALLBACK_KNOCKBACK_DIRECTION);
    direction * force
}

/// Убить combatant и толкнуть его физическое тело
///
/// Возвращает применённый импульс. Без `Health` урон пропускается,
/// без `ExternalImpulse` импульс только считается.
pub fn apply_blast_damage(
    health: Option<&mut Health>,
    impulse: Option<&mut ExternalImpulse>,
    origin: Vec2,
    body: Vec2,
    force: f32,
) -> Vec2 {
    if let Some(health) = health {
        health.kill();
    }

    let knockback = knockback_impulse(origin, body, force);
    if let Some(external) = impulse {
        // Накапливаем - за кадр могут прилететь импульсы от нескольких бомб
        external.impulse += knockback;
    }

    knockback
}
