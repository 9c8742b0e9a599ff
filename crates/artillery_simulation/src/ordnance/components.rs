//! Ordnance (бомба) - компоненты и state machine

use bevy::prelude::*;

use crate::config::BombConfig;

/// Фиксированный радиус detonation query (world units)
///
/// Не зависит от `Ordnance::blast_radius`: настроенный радиус уровня в
/// запрос не попадает, эффективный радиус взрыва - эта константа.
pub const DETONATION_QUERY_RADIUS: f32 = 2.0;

/// Жизненный цикл бомбы
///
/// Idle → Fusing → Resolving → Disposed. Disposed - поглощающее состояние.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum OrdnanceState {
    #[default]
    Idle,
    Fusing,
    Resolving,
    Disposed,
}

/// Бомба на поле
///
/// Позиция - `Transform` entity (фиксирована при укладке).
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
#[require(Transform)]
pub struct Ordnance {
    pub fuse_duration: f32,
    /// Радиус из настроек. В detonation query НЕ используется.
    pub blast_radius: f32,
    pub blast_force: f32,
    pub carve_radius: i32,
    /// Кто положил (None → единственный Player)
    pub laid_by: Option<Entity>,
    state: OrdnanceState,
    root_placement: bool,
    #[reflect(ignore)]
    links: Option<OrdnanceLinks>,
}

/// Collaborators, найденные при спавне
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrdnanceLinks {
    /// Entity с `BombLayer` (arm state)
    pub arm_state: Entity,
    /// Pooled particle effect
    pub explosion_fx: Entity,
}

impl Default for Ordnance {
    fn default() -> Self {
        Self::from_config(&BombConfig::default())
    }
}

impl Ordnance {
    pub fn from_config(config: &BombConfig) -> Self {
        Self {
            fuse_duration: config.fuse_time,
            blast_radius: config.bomb_radius,
            blast_force: config.bomb_force,
            carve_radius: config.carve_radius,
            laid_by: None,
            state: OrdnanceState::Idle,
            root_placement: false,
            links: None,
        }
    }

    pub fn laid_by(mut self, layer: Entity) -> Self {
        self.laid_by = Some(layer);
        self
    }

    pub fn state(&self) -> OrdnanceState {
        self.state
    }

    /// true если бомба положена напрямую (без parent) и взводится сама
    pub fn is_root_placement(&self) -> bool {
        self.root_placement
    }

    pub fn links(&self) -> Option<OrdnanceLinks> {
        self.links
    }

    pub fn is_disposed(&self) -> bool {
        self.state == OrdnanceState::Disposed
    }

    /// Зафиксировать collaborators (один раз, при спавне)
    pub fn attach(&mut self, links: OrdnanceLinks, root_placement: bool) {
        self.links = Some(links);
        self.root_placement = root_placement;
    }

    /// Idle → Fusing. Только для root placement.
    pub fn begin_fusing(&mut self) -> bool {
        if self.state != OrdnanceState::Idle || !self.root_placement {
            return false;
        }
        self.state = OrdnanceState::Fusing;
        true
    }

    /// Idle | Fusing → Resolving
    ///
    /// false для Resolving/Disposed: повторная детонация - no-op.
    pub fn begin_resolving(&mut self) -> bool {
        match self.state {
            OrdnanceState::Idle | OrdnanceState::Fusing => {
                self.state = OrdnanceState::Resolving;
                true
            }
            OrdnanceState::Resolving | OrdnanceState::Disposed => false,
        }
    }

    /// Resolving → Disposed
    pub fn dispose(&mut self) {
        self.state = OrdnanceState::Disposed;
    }
}

/// Одноразовый таймер фитиля (есть только у Fusing бомб)
///
/// Отменяется только вместе с entity.
#[derive(Component, Debug, Clone)]
pub struct Fuse {
    pub timer: Timer,
}

impl Fuse {
    /// Отрицательная или NaN длительность → фитиль на 0 секунд
    pub fn new(seconds: f32) -> Self {
        let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
        Self {
            timer: Timer::from_seconds(seconds, TimerMode::Once),
        }
    }
}
