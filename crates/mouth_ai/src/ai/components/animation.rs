//! Locomotion animation components.

use bevy::prelude::*;

use crate::ai::ports::AnimationSink;

/// Forward-скорость для locomotion blend (host читает каждый frame)
///
/// Положительная — идём вперёд, отрицательная — пятимся.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct AnimationSpeed {
    pub speed: f32,
}

impl AnimationSink for AnimationSpeed {
    fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }
}
