//! Ordnance events
//!
//! # Architecture
//!
//! **Input (gameplay → ECS):**
//! - `LayBombIntent` - игрок хочет положить бомбу
//! - `DetonateOrdnance` - entry point детонации (фитиль или внешний триггер)
//!
//! **Output (ECS → presentation/terrain):**
//! - `TerrainCarveRequested` (terrain.rs), `PlayOneShot` / `ParticleTriggered` /
//!   `SpawnVisual` (feedback.rs)
//! - `OrdnanceDetonated`, `CombatantKilled`, `OrdnanceRejected` - итог для UI/логов

use bevy::prelude::*;

use super::error::OrdnanceError;

/// Игрок хочет положить бомбу в своей позиции
#[derive(Event, Debug, Clone)]
pub struct LayBombIntent {
    pub layer: Entity,
}

/// Детонировать бомбу сейчас
///
/// Пишется системой фитиля в кадре, когда таймер истёк, либо снаружи для
/// бомб без собственного фитиля. Повторная детонация - no-op.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetonateOrdnance {
    pub ordnance: Entity,
}

/// Чем закончилась детонация
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetonationOutcome {
    /// Кратер делегирован terrain layer, feedback не проигрывался
    Carved,
    /// Взрыв пришёлся в тело врага: ни кратера, ни feedback
    Struck,
    /// Целей-препятствий нет: частицы + звук взрыва
    Feedback,
}

/// Event: бомба взорвалась (ровно один на бомбу)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct OrdnanceDetonated {
    pub ordnance: Entity,
    pub origin: Vec2,
    pub combatant: Option<Entity>,
    pub obstacle: Option<Entity>,
    pub outcome: DetonationOutcome,
}

/// Event: combatant убит взрывом
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct CombatantKilled {
    pub combatant: Entity,
    pub ordnance: Entity,
    pub impulse: Vec2,
}

/// Event: бомба не смогла инициализироваться и удалена
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct OrdnanceRejected {
    pub ordnance: Entity,
    pub error: OrdnanceError,
}
