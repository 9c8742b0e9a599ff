//! Ordnance lifecycle systems
//!
//! # Systems (FixedUpdate, chain)
//!
//! 1. `lay_bombs` - LayBombIntent → спавн root бомбы
//! 2. `tick_fuses` - таймер фитиля → DetonateOrdnance
//! 3. `arm_spawned_ordnance` - поиск collaborators, Idle → Fusing
//! 4. `resolve_detonations` - Resolving: цели, урон, кратер, Disposed
//! 5. `sequence_explosion_feedback` (feedback.rs)

use bevy::prelude::*;
use bevy_rapier2d::prelude::ExternalImpulse;

use super::classify::classify_targets;
use super::components::{Fuse, Ordnance, OrdnanceLinks, DETONATION_QUERY_RADIUS};
use super::damage::apply_blast_damage;
use super::error::{Collaborator, OrdnanceError};
use super::events::*;
use super::feedback::{AudioCue, ExplosionFeedback, ExplosionFx, PlayOneShot};
use super::terrain::TerrainCarveRequested;
use crate::components::{BombLayer, Health, Player};
use crate::config::BombConfig;
use crate::pickups::PickupSpawner;
use crate::spatial::{world_transform, OverlapCircle, SpatialQuery, TransformHierarchy};
use crate::{log, log_error, log_info, log_warning};

// ============================================================================
// Laying
// ============================================================================

/// Система: укладка бомб игроком
///
/// Бомба появляется в world позиции игрока без parent → взведётся сама.
pub fn lay_bombs(
    mut commands: Commands,
    mut intents: EventReader<LayBombIntent>,
    mut layers: Query<&mut BombLayer>,
    hierarchy: TransformHierarchy,
    config: Res<BombConfig>,
    mut audio: EventWriter<PlayOneShot>,
) {
    for intent in intents.read() {
        let Ok(mut layer) = layers.get_mut(intent.layer) else {
            log_warning(&format!("LayBombIntent: {:?} has no BombLayer", intent.layer));
            continue;
        };
        let Some(world) = world_transform(intent.layer, &hierarchy) else {
            log_warning(&format!("LayBombIntent: {:?} has no Transform", intent.layer));
            continue;
        };

        if !layer.take_bomb() {
            log(&format!(
                "LayBombIntent ignored for {:?} (bomb_laid: {}, bombs: {})",
                intent.layer, layer.bomb_laid, layer.bomb_count
            ));
            continue;
        }

        let position = world.translation;
        audio.write(PlayOneShot {
            cue: AudioCue::BombsAway,
            position: position.truncate(),
        });

        let bomb = commands
            .spawn((
                Ordnance::from_config(&config).laid_by(intent.layer),
                Transform::from_translation(position),
            ))
            .id();

        log_info(&format!(
            "💣 {:?} laid bomb {:?} at {:?} ({} left)",
            intent.layer,
            bomb,
            position.truncate(),
            layer.bomb_count
        ));
    }
}

// ============================================================================
// Arming
// ============================================================================

/// Collaborators, доступные в момент спавна
struct SetupRefs<'a> {
    player: Option<Entity>,
    has_pickups: bool,
    fx: Option<&'a ExplosionFx>,
}

fn resolve_links(
    entity: Entity,
    ordnance: &Ordnance,
    refs: &SetupRefs,
    layers: &Query<&mut BombLayer>,
) -> Result<OrdnanceLinks, OrdnanceError> {
    let missing = |collaborator| OrdnanceError::MissingReference {
        ordnance: entity,
        collaborator,
    };

    let arm_state = ordnance
        .laid_by
        .or(refs.player)
        .filter(|layer| layers.contains(*layer))
        .ok_or_else(|| missing(Collaborator::ArmState))?;

    if !refs.has_pickups {
        return Err(missing(Collaborator::PickupService));
    }

    let explosion_fx = refs
        .fx
        .map(|fx| fx.pooled)
        .ok_or_else(|| missing(Collaborator::ExplosionFx))?;

    Ok(OrdnanceLinks {
        arm_state,
        explosion_fx,
    })
}

/// Система: инициализация новых бомб
///
/// Без arm state / pickup spawner / explosion fx бомба отклоняется сразу
/// (OrdnanceRejected + despawn), а не ломается в момент взрыва. Если
/// игрок найден, ему возвращается право укладки.
///
/// Root placement (нет `ChildOf`) поджигает фитиль: Idle → Fusing.
pub fn arm_spawned_ordnance(
    mut commands: Commands,
    mut spawned: Query<(Entity, &mut Ordnance, &Transform, Has<ChildOf>), Added<Ordnance>>,
    players: Query<Entity, (With<Player>, With<BombLayer>)>,
    mut layers: Query<&mut BombLayer>,
    pickups: Option<Res<PickupSpawner>>,
    fx: Option<Res<ExplosionFx>>,
    mut rejected: EventWriter<OrdnanceRejected>,
    mut audio: EventWriter<PlayOneShot>,
) {
    let refs = SetupRefs {
        player: players.single().ok(),
        has_pickups: pickups.is_some(),
        fx: fx.as_deref(),
    };

    for (entity, mut ordnance, transform, has_parent) in spawned.iter_mut() {
        let links = match resolve_links(entity, &ordnance, &refs, &layers) {
            Ok(links) => links,
            Err(error) => {
                log_error(&format!("❌ Ordnance rejected: {}", error));

                if let Some(layer) = ordnance.laid_by.or(refs.player) {
                    if let Ok(mut layer) = layers.get_mut(layer) {
                        layer.set_armed(false);
                    }
                }

                ordnance.dispose();
                commands.entity(entity).despawn();
                rejected.write(OrdnanceRejected {
                    ordnance: entity,
                    error,
                });
                continue;
            }
        };

        ordnance.attach(links, !has_parent);

        if ordnance.begin_fusing() {
            commands.entity(entity).insert(Fuse::new(ordnance.fuse_duration));
            audio.write(PlayOneShot {
                cue: AudioCue::Fuse,
                position: transform.translation.truncate(),
            });
            log(&format!(
                "🧨 Ordnance {:?} fuse lit ({}s)",
                entity, ordnance.fuse_duration
            ));
        } else {
            log(&format!(
                "Ordnance {:?} is nested, waiting for external detonation",
                entity
            ));
        }
    }
}

// ============================================================================
// Fuse
// ============================================================================

/// Система: tick фитилей
///
/// В шаге, где таймер истёк, пишет DetonateOrdnance (один раз).
/// Идёт раньше `arm_spawned_ordnance`: фитиль, подожжённый в этом шаге,
/// начинает отсчёт со следующего - взрыв не раньше `fuse_duration` после спавна.
pub fn tick_fuses(
    mut fuses: Query<(Entity, &Ordnance, &mut Fuse)>,
    time: Res<Time<Fixed>>,
    mut detonate: EventWriter<DetonateOrdnance>,
) {
    let delta = time.delta();

    for (entity, ordnance, mut fuse) in fuses.iter_mut() {
        if ordnance.is_disposed() {
            continue;
        }

        fuse.timer.tick(delta);
        if fuse.timer.just_finished() {
            detonate.write(DetonateOrdnance { ordnance: entity });
        }
    }
}

// ============================================================================
// Detonation
// ============================================================================

/// Система: детонация (entry point - DetonateOrdnance)
///
/// Порядок:
/// 1. Resolving: arm state = false, pickup spawner начинает доставку
/// 2. Классификация целей в фиксированном радиусе
/// 3. Combatant → смерть + импульс
/// 4. Obstacle → кратер (без feedback); solid враг → ничего; пустота → feedback
/// 5. Disposed + despawn
pub fn resolve_detonations(
    mut commands: Commands,
    mut requests: EventReader<DetonateOrdnance>,
    mut bombs: Query<&mut Ordnance>,
    spatial: SpatialQuery,
    mut combatants: Query<(Option<&mut Health>, Option<&mut ExternalImpulse>)>,
    mut layers: Query<&mut BombLayer>,
    mut pickups: Option<ResMut<PickupSpawner>>,
    mut carves: EventWriter<TerrainCarveRequested>,
    mut feedback: EventWriter<ExplosionFeedback>,
    mut killed: EventWriter<CombatantKilled>,
    mut detonated: EventWriter<OrdnanceDetonated>,
) {
    for request in requests.read() {
        let entity = request.ordnance;

        let Ok(mut ordnance) = bombs.get_mut(entity) else {
            log_warning(&format!("Detonation ignored: {}", OrdnanceError::UnknownOrdnance(entity)));
            continue;
        };

        let Some(links) = ordnance.links() else {
            log_warning(&format!("Detonation ignored: {}", OrdnanceError::NotArmed(entity)));
            continue;
        };

        // World-space: вложенная бомба взрывается там, где стоит её носитель
        let Some(origin) = spatial.world_position(entity) else {
            log_warning(&format!("Ordnance {:?} has no Transform, detonation ignored", entity));
            continue;
        };

        if !ordnance.begin_resolving() {
            log(&format!("Detonation ignored: {}", OrdnanceError::AlreadyDisposed(entity)));
            continue;
        }

        // 1. Безусловные side effects (до классификации)
        match layers.get_mut(links.arm_state) {
            Ok(mut layer) => layer.set_armed(false),
            Err(_) => log_warning(&format!(
                "Arm state {:?} disappeared before ordnance {:?} detonated",
                links.arm_state, entity
            )),
        }

        match pickups.as_deref_mut() {
            Some(spawner) => spawner.begin_next_delivery(),
            None => log_error(&format!(
                "PickupSpawner removed before ordnance {:?} detonated",
                entity
            )),
        }

        // 2. Цели (эффективный радиус - DETONATION_QUERY_RADIUS, не blast_radius)
        let hits = spatial.overlap_circle(origin, DETONATION_QUERY_RADIUS);
        let targets = classify_targets(&hits);

        // 3. Combatant
        if let Some(combatant) = targets.combatant {
            match (combatants.get_mut(combatant), spatial.world_position(combatant)) {
                (Ok((health, impulse)), Some(body)) => {
                    let impulse = apply_blast_damage(
                        health.map(|health| health.into_inner()),
                        impulse.map(|impulse| impulse.into_inner()),
                        origin,
                        body,
                        ordnance.blast_force,
                    );
                    killed.write(CombatantKilled {
                        combatant,
                        ordnance: entity,
                        impulse,
                    });
                    log_info(&format!("☠️ Ordnance {:?} killed {:?}", entity, combatant));
                }
                _ => log_warning(&format!(
                    "Combatant {:?} has no Transform, blast damage skipped",
                    combatant
                )),
            }
        }

        // 4. Obstacle → кратер, пустота → feedback
        let outcome = match targets.obstacle {
            Some(surface) => {
                carves.write(TerrainCarveRequested::bomb(origin, surface, ordnance.carve_radius));
                log_info(&format!(
                    "🕳️ Ordnance {:?} carving {:?} (radius {})",
                    entity, surface, ordnance.carve_radius
                ));
                DetonationOutcome::Carved
            }
            None if !targets.is_empty_air() => DetonationOutcome::Struck,
            None => {
                feedback.write(ExplosionFeedback {
                    ordnance: entity,
                    origin,
                });
                DetonationOutcome::Feedback
            }
        };

        // 5. Disposed
        ordnance.dispose();
        commands.entity(entity).despawn();

        detonated.write(OrdnanceDetonated {
            ordnance: entity,
            origin,
            combatant: targets.combatant,
            obstacle: targets.obstacle,
            outcome,
        });
    }
}
