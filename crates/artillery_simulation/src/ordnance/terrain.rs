//! Terrain carve delegation
//!
//! Сам алгоритм кратера (alpha = 0 в пикселях текстуры) живёт в terrain
//! layer. Бомба только отправляет запрос и не ждёт результата.

use bevy::prelude::*;

/// Тип оружия-источника (terrain layer подбирает форму кратера)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum WeaponKind {
    Rocket,
    Bomb,
}

/// Event: вырезать кратер в destructible surface (fire-and-forget)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct TerrainCarveRequested {
    /// Точка взрыва (world space)
    pub origin: Vec2,
    /// Entity препятствия, владеющий разрушаемой поверхностью
    pub surface: Entity,
    /// Радиус кратера в пикселях
    pub radius: i32,
    pub source: WeaponKind,
}

impl TerrainCarveRequested {
    pub fn bomb(origin: Vec2, surface: Entity, radius: i32) -> Self {
        Self {
            origin,
            surface,
            radius,
            source: WeaponKind::Bomb,
        }
    }
}
