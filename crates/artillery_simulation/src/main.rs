//! Headless симуляция бомб
//!
//! Игрок кладёт бомбу между врагом и стеной, симуляция крутится без рендера.
//! Опционально: путь к JSON конфигу первым аргументом.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy_rapier2d::prelude::ExternalImpulse;

use artillery_simulation::*;

fn load_config() -> SimulationConfig {
    let Some(path) = std::env::args().nth(1) else {
        return SimulationConfig::default();
    };

    let loaded = std::fs::read_to_string(&path)
        .map_err(|error| ConfigError::Invalid(format!("{}: {}", path, error)))
        .and_then(|json| SimulationConfig::from_json_str(&json));

    match loaded {
        Ok(config) => config,
        Err(error) => {
            log_error(&format!("{}, falling back to defaults", error));
            SimulationConfig::default()
        }
    }
}

fn main() {
    let seed = 42;
    println!("Starting artillery headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(1.0 / 60.0)))
        .add_plugins(SimulationPlugin::with_config(load_config()));

    let world = app.world_mut();
    spawn_explosion_fx(world);

    let player = world
        .spawn((
            Player,
            BombLayer::with_bombs(3),
            Health::new(100),
            SceneTag::Player,
            Footprint::rect(1.0, 2.0),
            Transform::from_xyz(0.0, 0.0, 0.0),
        ))
        .id();

    let enemy = world
        .spawn((
            SceneTag::Enemy,
            Health::new(10),
            ExternalImpulse::default(),
            Footprint::circle(0.5),
            Transform::from_xyz(1.0, 0.0, 0.0),
        ))
        .id();

    world.spawn((
        SceneTag::Wall,
        Footprint::rect(1.0, 8.0),
        Transform::from_xyz(-2.0, 0.0, 0.0),
    ));

    world.send_event(LayBombIntent { layer: player });

    // 10 секунд при 60Hz
    for tick in 0..600 {
        app.update();

        if tick % 60 == 0 {
            let entity_count = app.world().entities().len();
            println!("Tick {}: {} entities", tick, entity_count);
        }
    }

    if let Some(health) = app.world().get::<Health>(enemy) {
        println!("Enemy health: {}/{}", health.current, health.max);
    }
    if let Some(layer) = app.world().get::<BombLayer>(player) {
        println!("Player bombs left: {} (laid: {})", layer.bomb_count, layer.bomb_laid);
    }

    if let Some(spawner) = app.world().get_resource::<PickupSpawner>() {
        println!(
            "Pickup deliveries requested: {}",
            spawner.requested_deliveries()
        );
    }

    println!("Simulation complete!");
}
