//! Ordnance module - бомбы: фитиль, детонация, кратеры
//!
//! ECS ответственность:
//! - Lifecycle: Idle → Fusing → Resolving → Disposed
//! - Target classification в фиксированном радиусе
//! - Урон/импульс combatant, запрос кратера, arm state, pickup respawn
//!
//! Presentation/terrain ответственность (через events):
//! - Звук, частицы, prefab взрыва
//! - Пиксельный алгоритм кратера

use bevy::prelude::*;

pub mod classify;
pub mod components;
pub mod damage;
pub mod error;
pub mod events;
pub mod feedback;
pub mod systems;
pub mod terrain;

#[cfg(test)]
mod systems_tests;

// Re-exports
pub use classify::{classify_targets, BlastTargets};
pub use components::{Fuse, Ordnance, OrdnanceLinks, OrdnanceState, DETONATION_QUERY_RADIUS};
pub use damage::{knockback_impulse, FALLBACK_KNOCKBACK_DIRECTION};
pub use error::{Collaborator, OrdnanceError};
pub use events::*;
pub use feedback::{
    AudioCue, ExplosionFeedback, ExplosionFx, ParticleTriggered, PlayOneShot, PooledExplosionFx,
    SpawnVisual,
};
pub use systems::*;
pub use terrain::{TerrainCarveRequested, WeaponKind};

/// Set всех систем бомб (pickup системы идут после него)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrdnanceSet;

/// Ordnance Plugin
///
/// Регистрирует ordnance системы в FixedUpdate.
///
/// Порядок выполнения:
/// 1. lay_bombs - укладка по LayBombIntent
/// 2. tick_fuses - истёкший фитиль → DetonateOrdnance
/// 3. arm_spawned_ordnance - collaborators + фитиль (тикает со следующего шага)
/// 4. resolve_detonations - детонация в том же шаге
/// 5. sequence_explosion_feedback - частицы/визуал/звук
pub struct OrdnancePlugin;

impl Plugin for OrdnancePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<crate::config::BombConfig>();

        // Регистрация событий
        app.add_event::<LayBombIntent>()
            .add_event::<DetonateOrdnance>()
            .add_event::<OrdnanceDetonated>()
            .add_event::<CombatantKilled>()
            .add_event::<OrdnanceRejected>()
            .add_event::<TerrainCarveRequested>()
            .add_event::<ExplosionFeedback>()
            .add_event::<PlayOneShot>()
            .add_event::<ParticleTriggered>()
            .add_event::<SpawnVisual>();

        app.add_systems(
            FixedUpdate,
            (
                lay_bombs,
                tick_fuses,
                arm_spawned_ordnance,
                resolve_detonations,
                feedback::sequence_explosion_feedback,
            )
                .chain() // Последовательное выполнение
                .in_set(OrdnanceSet),
        );
    }
}
