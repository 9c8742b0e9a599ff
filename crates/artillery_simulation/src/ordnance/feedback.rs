//! Audiovisual feedback бомбы (ECS → presentation layer)
//!
//! ECS не играет звук и не рисует частицы. Он пишет events, presentation
//! layer их исполняет:
//! - `PlayOneShot` - звук в точке (фитиль, взрыв, "bombs away")
//! - `ParticleTriggered` - pooled particle effect перемещён и запущен
//! - `SpawnVisual` - одноразовый prefab взрыва

use bevy::prelude::*;

use crate::components::PrefabPath;

/// Звуковые клипы бомбы
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum AudioCue {
    BombsAway,
    Fuse,
    Boom,
}

/// Pooled particle effect взрыва (один на сцену)
///
/// Вставляется сценой при setup. Бомбы без него не инициализируются.
#[derive(Resource, Debug, Clone)]
pub struct ExplosionFx {
    /// Entity particle system (переиспользуется всеми бомбами)
    pub pooled: Entity,
    /// Prefab одноразового визуального взрыва
    pub prefab: PrefabPath,
}

impl ExplosionFx {
    pub fn new(pooled: Entity) -> Self {
        Self {
            pooled,
            prefab: PrefabPath::default(),
        }
    }
}

/// Marker: entity pooled particle effect
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct PooledExplosionFx;

/// Event: проиграть клип один раз в точке
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PlayOneShot {
    pub cue: AudioCue,
    pub position: Vec2,
}

/// Event: pooled particle effect запущен в точке
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ParticleTriggered {
    pub effect: Entity,
    pub position: Vec2,
}

/// Event: заспавнить одноразовый визуальный prefab
#[derive(Event, Debug, Clone, PartialEq)]
pub struct SpawnVisual {
    pub prefab: PrefabPath,
    pub position: Vec2,
}

/// Event: бомба взорвалась в воздухе - нужен полный feedback
///
/// Пишется детонацией только для взрыва в пустоте (ничего solid в радиусе).
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ExplosionFeedback {
    pub ordnance: Entity,
    pub origin: Vec2,
}

/// Система: feedback sequence (particle → visual → boom)
///
/// Pooled effect переезжает в точку взрыва (z сохраняется).
pub fn sequence_explosion_feedback(
    mut requests: EventReader<ExplosionFeedback>,
    fx: Option<Res<ExplosionFx>>,
    mut fx_transforms: Query<&mut Transform, With<PooledExplosionFx>>,
    mut particles: EventWriter<ParticleTriggered>,
    mut visuals: EventWriter<SpawnVisual>,
    mut audio: EventWriter<PlayOneShot>,
) {
    for request in requests.read() {
        if let Some(fx) = fx.as_deref() {
            match fx_transforms.get_mut(fx.pooled) {
                Ok(mut transform) => {
                    transform.translation.x = request.origin.x;
                    transform.translation.y = request.origin.y;
                }
                Err(_) => {
                    crate::log_warning(&format!(
                        "Pooled explosion fx {:?} has no Transform, playing in place",
                        fx.pooled
                    ));
                }
            }

            particles.write(ParticleTriggered {
                effect: fx.pooled,
                position: request.origin,
            });

            visuals.write(SpawnVisual {
                prefab: fx.prefab.clone(),
                position: request.origin,
            });
        } else {
            crate::log_error(&format!(
                "ExplosionFx resource missing, ordnance {:?} explodes without particles",
                request.ordnance
            ));
        }

        audio.write(PlayOneShot {
            cue: AudioCue::Boom,
            position: request.origin,
        });

        crate::log(&format!(
            "💥 Explosion feedback for {:?} at {:?}",
            request.ordnance, request.origin
        ));
    }
}
