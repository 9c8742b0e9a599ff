//! Подбор pickup'ов

use std::collections::HashSet;

use bevy::prelude::*;

use super::events::PickupCollected;
use super::spawner::{Pickup, PickupKind};
use crate::components::{BombLayer, Health};
use crate::config::PickupConfig;

/// Система: подбор pickup'ов
///
/// - BombCrate → +1 бомба в BombLayer
/// - HealthPack → heal(health_bonus), clamp по max
///
/// Pickup despawn'ится. Повторный подбор того же pickup в кадре игнорируется.
pub fn collect_pickups(
    mut commands: Commands,
    mut events: EventReader<PickupCollected>,
    pickups: Query<&Pickup>,
    mut collectors: Query<(Option<&mut BombLayer>, Option<&mut Health>)>,
    config: Res<PickupConfig>,
) {
    let mut consumed: HashSet<Entity> = HashSet::new();

    for event in events.read() {
        if consumed.contains(&event.pickup) {
            crate::log_warning(&format!("Pickup {:?} already collected", event.pickup));
            continue;
        }

        let Ok(pickup) = pickups.get(event.pickup) else {
            crate::log_warning(&format!("PickupCollected: {:?} is not a pickup", event.pickup));
            continue;
        };

        let Ok((layer, health)) = collectors.get_mut(event.collector) else {
            crate::log_warning(&format!("PickupCollected: collector {:?} not found", event.collector));
            continue;
        };

        match pickup.kind {
            PickupKind::BombCrate => {
                let Some(mut layer) = layer else {
                    crate::log(&format!("{:?} cannot carry bombs, crate left in place", event.collector));
                    continue;
                };
                layer.bomb_count += 1;
            }
            PickupKind::HealthPack => {
                let Some(mut health) = health else {
                    crate::log(&format!("{:?} has no Health, pack left in place", event.collector));
                    continue;
                };
                health.heal(config.health_bonus);
            }
        }

        consumed.insert(event.pickup);
        commands.entity(event.pickup).despawn();

        crate::log_info(&format!("{:?} collected {:?}", event.collector, pickup.kind));
    }
}
