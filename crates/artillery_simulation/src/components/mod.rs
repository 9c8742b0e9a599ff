//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: здоровье живых существ (Health)
//! - player: player marker и arm state (Player, BombLayer)
//! - world: scene-объекты (SceneTag, Footprint, PrefabPath)

pub mod actor;
pub mod player;
pub mod world;

// Re-exports для удобного импорта
pub use actor::*;
pub use player::*;
pub use world::*;
