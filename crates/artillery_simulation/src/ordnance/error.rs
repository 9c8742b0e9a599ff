//! Ordnance errors

use bevy::prelude::Entity;
use thiserror::Error;

/// Внешний collaborator, без которого бомба не может работать
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Collaborator {
    /// Player с `BombLayer`
    #[error("player arm state (Player + BombLayer)")]
    ArmState,
    /// `PickupSpawner` resource
    #[error("pickup spawner")]
    PickupService,
    /// `ExplosionFx` resource
    #[error("pooled explosion fx")]
    ExplosionFx,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrdnanceError {
    #[error("ordnance {ordnance:?} cannot find {collaborator}")]
    MissingReference {
        ordnance: Entity,
        collaborator: Collaborator,
    },

    #[error("ordnance {0:?} already detonated")]
    AlreadyDisposed(Entity),

    #[error("ordnance {0:?} was never armed")]
    NotArmed(Entity),

    #[error("entity {0:?} is not a live ordnance")]
    UnknownOrdnance(Entity),
}
