//! Scene-объекты мира: SceneTag, Footprint, PrefabPath

use bevy::prelude::*;

/// Тег scene-объекта (замкнутый набор, matching через pattern)
///
/// Trigger/solid - свойство коллайдера, не тега: trigger-коллайдеры
/// помечаются `bevy_rapier2d::prelude::Sensor`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
#[reflect(Component)]
pub enum SceneTag {
    #[default]
    Untagged,
    Player,
    Enemy,
    Bullet,
    BombPickup,
    HealthPickup,
    PlatformEnd,
    Ground,
    Wall,
}

impl SceneTag {
    /// Может ли объект быть целью урона от взрыва
    pub fn is_combatant(self) -> bool {
        matches!(self, SceneTag::Enemy)
    }

    /// Теги, которые никогда не становятся препятствием для кратера
    pub fn is_excluded_from_obstacles(self) -> bool {
        matches!(
            self,
            SceneTag::Bullet | SceneTag::Player | SceneTag::BombPickup | SceneTag::PlatformEnd
        )
    }
}

/// Форма коллайдера для overlap query (2D, в локальных координатах entity)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub enum Footprint {
    Circle { radius: f32 },
    /// Axis-aligned box
    Rect { half_extents: Vec2 },
}

impl Default for Footprint {
    fn default() -> Self {
        Footprint::Circle { radius: 0.5 }
    }
}

impl Footprint {
    pub fn circle(radius: f32) -> Self {
        Footprint::Circle { radius }
    }

    pub fn rect(width: f32, height: f32) -> Self {
        Footprint::Rect {
            half_extents: Vec2::new(width * 0.5, height * 0.5),
        }
    }

    /// Пересекается ли форма (центр в `center`) с кругом `origin`/`radius`
    ///
    /// Касание считается пересечением.
    pub fn overlaps_circle(&self, center: Vec2, origin: Vec2, radius: f32) -> bool {
        match *self {
            Footprint::Circle { radius: own } => {
                let reach = own + radius;
                center.distance_squared(origin) <= reach * reach
            }
            Footprint::Rect { half_extents } => {
                let closest = origin.clamp(center - half_extents, center + half_extents);
                closest.distance_squared(origin) <= radius * radius
            }
        }
    }
}

/// Prefab path для визуального представления (data-driven)
///
/// Presentation layer сам решает, как грузить prefab.
#[derive(Component, Debug, Clone, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct PrefabPath {
    pub path: String,
}

impl Default for PrefabPath {
    fn default() -> Self {
        Self {
            path: "prefabs/explosion".to_string(),
        }
    }
}

impl PrefabPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}
