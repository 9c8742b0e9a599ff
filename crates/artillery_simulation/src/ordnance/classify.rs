//! Target classification для взрыва
//!
//! Два независимых прохода по одному overlap set:
//! 1. первый Enemy → combatant
//! 2. первый solid объект, не исключённый по тегу и не combatant → obstacle
//!
//! Оба прохода могут найти цель в одной детонации (combatant убит И кратер).
//!
//! Solid тело врага кратер не получает, но глушит "взрыв в воздухе":
//! feedback играет только если в радиусе не оказалось ничего твёрдого.

use bevy::prelude::*;

use crate::spatial::OverlapHit;

/// Результат классификации (не более одной цели каждого вида)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlastTargets {
    pub combatant: Option<Entity>,
    pub obstacle: Option<Entity>,
    /// Есть solid объект не из исключённых тегов (obstacle или тело врага)
    pub solid_hit: bool,
}

impl BlastTargets {
    pub fn is_empty(&self) -> bool {
        self.combatant.is_none() && self.obstacle.is_none()
    }

    /// Взрыв в пустоте → полный feedback
    pub fn is_empty_air(&self) -> bool {
        !self.solid_hit
    }
}

fn is_solid_hit(hit: &OverlapHit) -> bool {
    !hit.is_trigger && !hit.tag.is_excluded_from_obstacles()
}

/// Может ли объект стать препятствием для кратера
pub fn is_obstacle_candidate(hit: &OverlapHit) -> bool {
    is_solid_hit(hit) && !hit.tag.is_combatant()
}

pub fn classify_targets(hits: &[OverlapHit]) -> BlastTargets {
    let combatant = hits
        .iter()
        .find(|hit| hit.tag.is_combatant())
        .map(|hit| hit.entity);

    let obstacle = hits
        .iter()
        .find(|hit| is_obstacle_candidate(hit))
        .map(|hit| hit.entity);

    BlastTargets {
        combatant,
        obstacle,
        solid_hit: hits.iter().any(is_solid_hit),
    }
}
