//! Ports — контракты внешних коллабораторов AI
//!
//! AI ничего не знает о физике/навмеше/анимации хоста. Всё, что ему нужно,
//! проходит через эти trait'ы; headless реализации живут в `physics`,
//! `navigation` и `components`.

use bevy::prelude::*;

use crate::navigation::NavigationError;

/// Spatial queries поверх мира (sphere overlap + raycast по target tag).
///
/// Чистая функция от состояния мира, своего состояния нет.
pub trait SpatialQuery {
    /// Есть ли хоть одно target-tagged тело в сфере `radius` вокруг `origin`.
    fn any_tagged_within(&self, origin: Vec3, radius: f32) -> bool;

    /// Первое тело на луче `origin → direction` — target-tagged?
    fn raycast_hits_tagged(&self, origin: Vec3, direction: Vec3) -> bool;
}

/// Pathfinding agent. Путь резолвится асинхронно (`path_pending`).
pub trait NavigationAgent {
    fn set_destination(&mut self, point: Vec3) -> Result<(), NavigationError>;
    fn remaining_distance(&self) -> f32;
    fn path_pending(&self) -> bool;
    fn velocity(&self) -> Vec3;
    fn stopping_distance(&self) -> f32;
    fn set_speed(&mut self, speed: f32);

    /// Проекция точки на navigable surface (не дальше `max_distance`).
    fn sample_position(&self, point: Vec3, max_distance: f32) -> Option<Vec3>;
}

/// Где сейчас цель (pivot для LOS и destination для погони).
pub trait TargetLocator {
    fn position(&self) -> Option<Vec3>;
}

/// Получатель forward-скорости для locomotion анимации.
pub trait AnimationSink {
    fn set_speed(&mut self, speed: f32);
}
