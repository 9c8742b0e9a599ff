//! Pickup events

use bevy::prelude::*;

use super::spawner::PickupKind;

/// Event: pickup появился на поле
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PickupDelivered {
    pub pickup: Entity,
    pub kind: PickupKind,
    pub position: Vec2,
}

/// Event: коллизия collector ↔ pickup (от physics/collision layer)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickupCollected {
    pub collector: Entity,
    pub pickup: Entity,
}
