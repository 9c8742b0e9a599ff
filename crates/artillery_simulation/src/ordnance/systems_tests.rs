//! Tests for ordnance lifecycle systems (headless App).

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bevy::prelude::*;
    use bevy::time::TimeUpdateStrategy;
    use bevy_rapier2d::prelude::ExternalImpulse;

    use crate::components::{BombLayer, Footprint, Health, Player, SceneTag};
    use crate::ordnance::{
        AudioCue, Collaborator, CombatantKilled, DetonateOrdnance, DetonationOutcome,
        ExplosionFeedback, Fuse, LayBombIntent, Ordnance, OrdnanceDetonated, OrdnanceError,
        OrdnanceRejected, OrdnanceState, ParticleTriggered, PlayOneShot, TerrainCarveRequested,
    };
    use crate::pickups::PickupSpawner;
    use crate::{create_headless_app, spawn_explosion_fx, SimulationPlugin};

    #[derive(Resource)]
    struct Recorded<E: Event>(Vec<E>);

    impl<E: Event> Default for Recorded<E> {
        fn default() -> Self {
            Self(Vec::new())
        }
    }

    fn record<E: Event + Clone>(mut reader: EventReader<E>, mut recorded: ResMut<Recorded<E>>) {
        recorded.0.extend(reader.read().cloned());
    }

    fn track<E: Event + Clone>(app: &mut App) {
        app.init_resource::<Recorded<E>>()
            .add_systems(Last, record::<E>);
    }

    fn recorded<E: Event + Clone>(app: &App) -> &[E] {
        &app.world().resource::<Recorded<E>>().0
    }

    /// App: 60Hz fixed step, одна fixed итерация на update (кроме первого)
    fn ordnance_app() -> App {
        let mut app = create_headless_app(42);
        app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / 60.0,
        )))
        .add_plugins(SimulationPlugin::default());

        track::<OrdnanceDetonated>(&mut app);
        track::<OrdnanceRejected>(&mut app);
        track::<ExplosionFeedback>(&mut app);
        track::<PlayOneShot>(&mut app);
        track::<CombatantKilled>(&mut app);
        track::<TerrainCarveRequested>(&mut app);
        track::<ParticleTriggered>(&mut app);

        app
    }

    fn run(app: &mut App, updates: usize) {
        for _ in 0..updates {
            app.update();
        }
    }

    fn spawn_player(app: &mut App, position: Vec3) -> Entity {
        app.world_mut()
            .spawn((
                Player,
                BombLayer {
                    bomb_laid: true,
                    bomb_count: 0,
                },
                Health::new(100),
                SceneTag::Player,
                Transform::from_translation(position),
            ))
            .id()
    }

    fn spawn_bomb(app: &mut App, position: Vec3) -> Entity {
        app.world_mut()
            .spawn((Ordnance::default(), Transform::from_translation(position)))
            .id()
    }

    fn state(app: &App, bomb: Entity) -> Option<OrdnanceState> {
        app.world().get::<Ordnance>(bomb).map(|ordnance| ordnance.state())
    }

    // ========================================================================
    // Arming
    // ========================================================================

    #[test]
    fn test_root_ordnance_lights_fuse() {
        let mut app = ordnance_app();
        spawn_explosion_fx(app.world_mut());
        let player = spawn_player(&mut app, Vec3::new(50.0, 0.0, 0.0));
        let bomb = spawn_bomb(&mut app, Vec3::ZERO);

        run(&mut app, 2);

        let ordnance = app.world().get::<Ordnance>(bomb).unwrap();
        assert_eq!(ordnance.state(), OrdnanceState::Fusing);
        assert!(ordnance.is_root_placement());
        assert_eq!(ordnance.links().unwrap().arm_state, player);
        assert!(app.world().get::<Fuse>(bomb).is_some());

        let cues: Vec<_> = recorded::<PlayOneShot>(&app).iter().map(|e| e.cue).collect();
        assert_eq!(cues, vec![AudioCue::Fuse]);
    }

    #[test]
    fn test_nested_ordnance_never_self_detonates() {
        let mut app = ordnance_app();
        spawn_explosion_fx(app.world_mut());
        spawn_player(&mut app, Vec3::new(50.0, 0.0, 0.0));

        let carrier = app.world_mut().spawn(Transform::default()).id();
        let bomb = app
            .world_mut()
            .spawn((Ordnance::default(), Transform::default(), ChildOf(carrier)))
            .id();

        // 5 секунд - втрое дольше фитиля
        run(&mut app, 300);

        assert_eq!(state(&app, bomb), Some(OrdnanceState::Idle));
        assert!(app.world().get::<Fuse>(bomb).is_none());
        assert!(!app.world().get::<Ordnance>(bomb).unwrap().is_root_placement());
        assert!(recorded::<OrdnanceDetonated>(&app).is_empty());
    }

    #[test]
    fn test_nested_ordnance_detonates_on_request() {
        let mut app = ordnance_app();
        spawn_explosion_fx(app.world_mut());
        let player = spawn_player(&mut app, Vec3::new(50.0, 0.0, 0.0));

        let carrier = app.world_mut().spawn(Transform::default()).id();
        let bomb = app
            .world_mut()
            .spawn((Ordnance::default(), Transform::default(), ChildOf(carrier)))
            .id();

        run(&mut app, 2);
        app.world_mut().send_event(DetonateOrdnance { ordnance: bomb });
        run(&mut app, 1);

        assert_eq!(recorded::<OrdnanceDetonated>(&app).len(), 1);
        assert_eq!(recorded::<ExplosionFeedback>(&app).len(), 1);
        assert!(app.world().get::<Ordnance>(bomb).is_none());
        assert!(!app.world().get::<BombLayer>(player).unwrap().bomb_laid);
    }

    fn spawn_enemy(app: &mut App, transform: Transform) -> Entity {
        app.world_mut()
            .spawn((
                SceneTag::Enemy,
                Health::new(10),
                ExternalImpulse::default(),
                Footprint::circle(0.5),
                transform,
            ))
            .id()
    }

    /// Бомба на носителе в (10, 0), `local` - смещение относительно носителя
    fn spawn_carried_bomb(app: &mut App, local: Vec3) -> Entity {
        let carrier = app.world_mut().spawn(Transform::from_xyz(10.0, 0.0, 0.0)).id();
        app.world_mut()
            .spawn((Ordnance::default(), Transform::from_translation(local), ChildOf(carrier)))
            .id()
    }

    #[test]
    fn test_nested_ordnance_blasts_at_carrier_world_position() {
        let mut app = ordnance_app();
        spawn_explosion_fx(app.world_mut());
        spawn_player(&mut app, Vec3::new(50.0, 0.0, 0.0));

        let near = spawn_enemy(&mut app, Transform::from_xyz(10.5, 0.0, 0.0));
        // Рядом с local позицией бомбы, но в 9.5 от неё в world
        let far = spawn_enemy(&mut app, Transform::from_xyz(0.5, 0.0, 0.0));
        let near_wall = app
            .world_mut()
            .spawn((SceneTag::Wall, Footprint::rect(1.0, 8.0), Transform::from_xyz(11.5, 0.0, 0.0)))
            .id();
        app.world_mut()
            .spawn((SceneTag::Wall, Footprint::rect(1.0, 8.0), Transform::from_xyz(-1.0, 0.0, 0.0)));

        let bomb = spawn_carried_bomb(&mut app, Vec3::ZERO);

        run(&mut app, 2);
        app.world_mut().send_event(DetonateOrdnance { ordnance: bomb });
        run(&mut app, 1);

        let origin = Vec2::new(10.0, 0.0);

        assert_eq!(app.world().get::<Health>(near).unwrap().current, 0);
        assert_eq!(app.world().get::<Health>(far).unwrap().current, 10);
        assert_eq!(
            app.world().get::<ExternalImpulse>(near).unwrap().impulse,
            Vec2::new(100.0, 0.0)
        );
        assert_eq!(
            app.world().get::<ExternalImpulse>(far).unwrap().impulse,
            Vec2::ZERO
        );

        let killed = recorded::<CombatantKilled>(&app);
        assert_eq!(killed.len(), 1);
        assert_eq!(killed[0].combatant, near);

        let carves = recorded::<TerrainCarveRequested>(&app);
        assert_eq!(carves.len(), 1);
        assert_eq!(carves[0].surface, near_wall);
        assert_eq!(carves[0].origin, origin);

        let detonated = recorded::<OrdnanceDetonated>(&app);
        assert_eq!(detonated.len(), 1);
        assert_eq!(detonated[0].origin, origin);
        assert_eq!(detonated[0].outcome, DetonationOutcome::Carved);
    }

    #[test]
    fn test_nested_ordnance_feedback_at_world_position() {
        let mut app = ordnance_app();
        let fx = spawn_explosion_fx(app.world_mut());
        spawn_player(&mut app, Vec3::new(50.0, 0.0, 0.0));

        // Стена у local позиции бомбы: в world взрыв в пустоте
        app.world_mut()
            .spawn((SceneTag::Wall, Footprint::rect(1.0, 1.0), Transform::from_xyz(0.0, 0.0, 0.0)));

        let bomb = spawn_carried_bomb(&mut app, Vec3::new(0.0, 2.0, 0.0));

        run(&mut app, 2);
        app.world_mut().send_event(DetonateOrdnance { ordnance: bomb });
        run(&mut app, 1);

        let origin = Vec2::new(10.0, 2.0);

        assert!(recorded::<TerrainCarveRequested>(&app).is_empty());

        let feedback = recorded::<ExplosionFeedback>(&app);
        assert_eq!(feedback.len(), 1);
        assert_eq!(feedback[0].origin, origin);

        let particles = recorded::<ParticleTriggered>(&app);
        assert_eq!(particles.len(), 1);
        assert_eq!(particles[0].position, origin);

        let fx_position = app.world().get::<Transform>(fx).unwrap().translation;
        assert_eq!(fx_position.truncate(), origin);
    }

    #[test]
    fn test_nested_combatant_struck_at_world_position() {
        let mut app = ordnance_app();
        spawn_explosion_fx(app.world_mut());
        spawn_player(&mut app, Vec3::new(50.0, 0.0, 0.0));

        // Враг - child носителя в (30, 0): world (10.5, 0)
        let enemy_carrier = app.world_mut().spawn(Transform::from_xyz(30.0, 0.0, 0.0)).id();
        let enemy = app
            .world_mut()
            .spawn((
                SceneTag::Enemy,
                Health::new(10),
                ExternalImpulse::default(),
                Footprint::circle(0.5),
                Transform::from_xyz(-19.5, 0.0, 0.0),
                ChildOf(enemy_carrier),
            ))
            .id();

        let bomb = spawn_carried_bomb(&mut app, Vec3::ZERO);

        run(&mut app, 2);
        app.world_mut().send_event(DetonateOrdnance { ordnance: bomb });
        run(&mut app, 1);

        assert_eq!(app.world().get::<Health>(enemy).unwrap().current, 0);
        // Направление считается от world позиций: +x
        assert_eq!(
            app.world().get::<ExternalImpulse>(enemy).unwrap().impulse,
            Vec2::new(100.0, 0.0)
        );
    }

    // ========================================================================
    // Rejection (MissingReference)
    // ========================================================================

    fn assert_rejected(app: &App, bomb: Entity, collaborator: Collaborator) {
        let rejected = recorded::<OrdnanceRejected>(app);
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].ordnance, bomb);
        assert_eq!(
            rejected[0].error,
            OrdnanceError::MissingReference {
                ordnance: bomb,
                collaborator,
            }
        );
        assert!(app.world().get::<Ordnance>(bomb).is_none(), "rejected bomb must be despawned");
        assert!(recorded::<OrdnanceDetonated>(app).is_empty());
    }

    #[test]
    fn test_missing_arm_state_rejects_ordnance() {
        let mut app = ordnance_app();
        spawn_explosion_fx(app.world_mut());
        let bomb = spawn_bomb(&mut app, Vec3::ZERO);

        run(&mut app, 2);

        assert_rejected(&app, bomb, Collaborator::ArmState);
    }

    #[test]
    fn test_missing_pickup_service_rejects_ordnance() {
        let mut app = ordnance_app();
        app.world_mut().remove_resource::<PickupSpawner>();
        spawn_explosion_fx(app.world_mut());
        let player = spawn_player(&mut app, Vec3::new(50.0, 0.0, 0.0));
        let bomb = spawn_bomb(&mut app, Vec3::ZERO);

        run(&mut app, 2);

        assert_rejected(&app, bomb, Collaborator::PickupService);
        // Игрок может положить следующую бомбу
        assert!(!app.world().get::<BombLayer>(player).unwrap().bomb_laid);
    }

    #[test]
    fn test_missing_explosion_fx_rejects_ordnance() {
        let mut app = ordnance_app();
        let player = spawn_player(&mut app, Vec3::new(50.0, 0.0, 0.0));
        let bomb = spawn_bomb(&mut app, Vec3::ZERO);

        run(&mut app, 2);

        assert_rejected(&app, bomb, Collaborator::ExplosionFx);
        assert!(!app.world().get::<BombLayer>(player).unwrap().bomb_laid);
    }

    #[test]
    fn test_laid_by_without_bomb_layer_rejects_ordnance() {
        let mut app = ordnance_app();
        spawn_explosion_fx(app.world_mut());
        let stranger = app.world_mut().spawn(Transform::default()).id();
        let bomb = app
            .world_mut()
            .spawn((Ordnance::default().laid_by(stranger), Transform::default()))
            .id();

        run(&mut app, 2);

        assert_rejected(&app, bomb, Collaborator::ArmState);
    }

    // ========================================================================
    // Detonation requests
    // ========================================================================

    #[test]
    fn test_double_detonation_is_noop() {
        let mut app = ordnance_app();
        spawn_explosion_fx(app.world_mut());
        spawn_player(&mut app, Vec3::new(50.0, 0.0, 0.0));
        let bomb = spawn_bomb(&mut app, Vec3::ZERO);

        run(&mut app, 2);

        // Два запроса в одном шаге + ещё один в следующем
        app.world_mut().send_event(DetonateOrdnance { ordnance: bomb });
        app.world_mut().send_event(DetonateOrdnance { ordnance: bomb });
        run(&mut app, 1);
        app.world_mut().send_event(DetonateOrdnance { ordnance: bomb });
        run(&mut app, 1);

        assert_eq!(recorded::<OrdnanceDetonated>(&app).len(), 1);
        assert_eq!(recorded::<ExplosionFeedback>(&app).len(), 1);
        assert_eq!(
            app.world().resource::<PickupSpawner>().requested_deliveries(),
            1
        );
    }

    #[test]
    fn test_fuse_does_not_fire_after_manual_detonation() {
        let mut app = ordnance_app();
        spawn_explosion_fx(app.world_mut());
        spawn_player(&mut app, Vec3::new(50.0, 0.0, 0.0));
        let bomb = spawn_bomb(&mut app, Vec3::ZERO);

        run(&mut app, 2);
        app.world_mut().send_event(DetonateOrdnance { ordnance: bomb });
        run(&mut app, 150);

        assert_eq!(recorded::<OrdnanceDetonated>(&app).len(), 1);
    }

    #[test]
    fn test_detonate_unknown_entity_is_ignored() {
        let mut app = ordnance_app();
        spawn_explosion_fx(app.world_mut());
        spawn_player(&mut app, Vec3::new(50.0, 0.0, 0.0));
        let not_a_bomb = app.world_mut().spawn(Transform::default()).id();

        run(&mut app, 2);
        app.world_mut().send_event(DetonateOrdnance {
            ordnance: not_a_bomb,
        });
        run(&mut app, 1);

        assert!(recorded::<OrdnanceDetonated>(&app).is_empty());
        assert_eq!(
            app.world().resource::<PickupSpawner>().requested_deliveries(),
            0
        );
    }

    // ========================================================================
    // Laying
    // ========================================================================

    #[test]
    fn test_lay_bomb_spawns_armed_ordnance_at_layer() {
        let mut app = ordnance_app();
        spawn_explosion_fx(app.world_mut());
        let player = app
            .world_mut()
            .spawn((
                Player,
                BombLayer::with_bombs(2),
                Transform::from_xyz(3.0, 4.0, 0.0),
            ))
            .id();

        run(&mut app, 1);
        app.world_mut().send_event(LayBombIntent { layer: player });
        run(&mut app, 1);

        let mut bombs = app.world_mut().query::<(&Ordnance, &Transform)>();
        let laid: Vec<_> = bombs
            .iter(app.world())
            .map(|(ordnance, transform)| (ordnance.laid_by, ordnance.state(), transform.translation))
            .collect();
        assert_eq!(
            laid,
            vec![(Some(player), OrdnanceState::Fusing, Vec3::new(3.0, 4.0, 0.0))]
        );

        let layer = app.world().get::<BombLayer>(player).unwrap();
        assert!(layer.bomb_laid);
        assert_eq!(layer.bomb_count, 1);

        let cues: Vec<_> = recorded::<PlayOneShot>(&app).iter().map(|e| e.cue).collect();
        assert_eq!(cues, vec![AudioCue::BombsAway, AudioCue::Fuse]);
    }

    #[test]
    fn test_second_lay_ignored_while_bomb_armed() {
        let mut app = ordnance_app();
        spawn_explosion_fx(app.world_mut());
        let player = app
            .world_mut()
            .spawn((Player, BombLayer::with_bombs(3), Transform::default()))
            .id();

        run(&mut app, 1);
        app.world_mut().send_event(LayBombIntent { layer: player });
        run(&mut app, 1);
        app.world_mut().send_event(LayBombIntent { layer: player });
        run(&mut app, 1);

        let mut bombs = app.world_mut().query::<&Ordnance>();
        assert_eq!(bombs.iter(app.world()).count(), 1);
        assert_eq!(app.world().get::<BombLayer>(player).unwrap().bomb_count, 2);
    }
}
