//! Spatial overlap query (2D)
//!
//! Простая circle-vs-footprint проверка по `Transform` + `Footprint`,
//! без Rapier query pipeline. Физический backend может подставить свою
//! реализацию `OverlapCircle`.
//!
//! Порядок результата детерминирован: по `Entity::index()` (порядок спавна),
//! классификатор целей полагается на «первый в перечислении».
//!
//! Все позиции world-space: `Transform` складывается по цепочке `ChildOf`
//! прямо в момент запроса. `GlobalTransform` не используется - в FixedUpdate
//! он ещё не пропагирован для entity, заспавненных в этом кадре.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_rapier2d::prelude::Sensor;

use crate::components::{Footprint, SceneTag};
use crate::ordnance::Ordnance;

/// Scene-объект, попавший в круг запроса
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlapHit {
    pub entity: Entity,
    pub tag: SceneTag,
    /// Trigger (non-solid) коллайдер
    pub is_trigger: bool,
}

impl OverlapHit {
    pub fn solid(entity: Entity, tag: SceneTag) -> Self {
        Self {
            entity,
            tag,
            is_trigger: false,
        }
    }

    pub fn trigger(entity: Entity, tag: SceneTag) -> Self {
        Self {
            entity,
            tag,
            is_trigger: true,
        }
    }
}

/// Spatial query: все объекты, чей коллайдер пересекает круг
pub trait OverlapCircle {
    fn overlap_circle(&self, origin: Vec2, radius: f32) -> Vec<OverlapHit>;
}

/// Иерархия transform'ов для перевода local → world
pub type TransformHierarchy<'w, 's> =
    Query<'w, 's, (&'static Transform, Option<&'static ChildOf>)>;

/// World transform entity: local `Transform`, умноженный на всех предков
///
/// None если у entity нет `Transform`. Предок без `Transform` обрывает цепочку.
pub fn world_transform(entity: Entity, hierarchy: &TransformHierarchy) -> Option<Transform> {
    let (transform, mut parent) = hierarchy.get(entity).ok()?;
    let mut world = *transform;

    while let Some(child_of) = parent {
        let Ok((parent_transform, next)) = hierarchy.get(child_of.0) else {
            break;
        };
        world = parent_transform.mul_transform(world);
        parent = next;
    }

    Some(world)
}

/// SystemParam над scene-объектами мира
///
/// Бомбы не видят ни себя, ни другие бомбы.
#[derive(SystemParam)]
pub struct SpatialQuery<'w, 's> {
    objects: Query<
        'w,
        's,
        (
            Entity,
            &'static Transform,
            &'static Footprint,
            Option<&'static SceneTag>,
            Has<Sensor>,
        ),
        Without<Ordnance>,
    >,
    hierarchy: TransformHierarchy<'w, 's>,
}

impl SpatialQuery<'_, '_> {
    /// World-space позиция любого entity с `Transform` (включая бомбы)
    pub fn world_position(&self, entity: Entity) -> Option<Vec2> {
        world_transform(entity, &self.hierarchy).map(|world| world.translation.truncate())
    }
}

impl OverlapCircle for SpatialQuery<'_, '_> {
    fn overlap_circle(&self, origin: Vec2, radius: f32) -> Vec<OverlapHit> {
        let mut hits: Vec<OverlapHit> = self
            .objects
            .iter()
            .filter(|(entity, transform, footprint, _, _)| {
                let center = self
                    .world_position(*entity)
                    .unwrap_or_else(|| transform.translation.truncate());
                footprint.overlaps_circle(center, origin, radius)
            })
            .map(|(entity, _, _, tag, is_trigger)| OverlapHit {
                entity,
                tag: tag.copied().unwrap_or_default(),
                is_trigger,
            })
            .collect();

        // Сортируем по Entity ID для детерминизма
        hits.sort_by_key(|hit| hit.entity.index());
        hits
    }
}
