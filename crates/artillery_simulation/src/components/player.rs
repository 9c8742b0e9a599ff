//! Player marker и состояние укладки бомб

use bevy::prelude::*;

/// Marker component для player-controlled entity
///
/// В single-player режиме ровно один entity имеет этот компонент.
/// Бомбы ищут его при спавне, чтобы знать кому вернуть право укладки.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Player;

/// Способность игрока укладывать бомбы
///
/// `bomb_laid` - arm state: пока бомба на поле, следующую положить нельзя.
/// Бомба сбрасывает флаг в момент начала детонации.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct BombLayer {
    pub bomb_laid: bool,
    pub bomb_count: u32,
}

impl BombLayer {
    pub fn with_bombs(bomb_count: u32) -> Self {
        Self {
            bomb_laid: false,
            bomb_count,
        }
    }

    pub fn can_lay(&self) -> bool {
        !self.bomb_laid && self.bomb_count > 0
    }

    /// Забрать бомбу из запаса. false если класть нечего или бомба уже лежит.
    pub fn take_bomb(&mut self) -> bool {
        if !self.can_lay() {
            return false;
        }
        self.bomb_count -= 1;
        self.bomb_laid = true;
        true
    }

    pub fn set_armed(&mut self, armed: bool) {
        self.bomb_laid = armed;
    }
}
