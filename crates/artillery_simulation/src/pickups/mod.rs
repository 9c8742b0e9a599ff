//! Pickups module - доставка и подбор ящиков
//!
//! **Flow:**
//! - Детонация бомбы → `PickupSpawner::begin_next_delivery()`
//! - Через `delivery_time` → pickup спавнится сверху (`PickupDelivered`)
//! - Collision layer → `PickupCollected` → бомба в запас / лечение

use bevy::prelude::*;

pub mod collect;
pub mod events;
pub mod spawner;

// Re-exports
pub use collect::*;
pub use events::*;
pub use spawner::*;

use crate::config::PickupConfig;
use crate::ordnance::OrdnanceSet;
use crate::DeterministicRng;

/// Pickup plugin
pub struct PickupPlugin;

impl Plugin for PickupPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PickupConfig>();

        if !app.world().contains_resource::<PickupSpawner>() {
            let delivery_time = app.world().resource::<PickupConfig>().delivery_time;
            app.insert_resource(PickupSpawner::new(delivery_time));
        }

        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app.add_event::<PickupDelivered>()
            .add_event::<PickupCollected>()
            .add_systems(
                FixedUpdate,
                (deliver_pickups, collect_pickups)
                    .chain()
                    .after(OrdnanceSet),
            );
    }
}
