//! AI movement presentation systems (heading, locomotion animation speed).

use bevy::prelude::*;

use crate::ai::behaviors::yaw_towards;
use crate::ai::components::{AnimationSpeed, Heading};
use crate::ai::config::AgentConfig;
use crate::ai::ports::{AnimationSink, NavigationAgent};
use crate::navigation::NavAgent;

/// Система: плавный поворот к heading
///
/// - `Heading::look_at` задан (Hostile) → смотрим на цель
/// - иначе → по направлению навигационной velocity
/// - стоим на месте без look_at → rotation не трогаем
///
/// Slerp коэффициент `turn_speed * dt` (клэмп до 1). Только yaw.
pub fn turn_towards_heading(
    mut agents: Query<(&mut Transform, &Heading, &NavAgent, &AgentConfig)>,
    time: Res<Time>,
) {
    let delta = time.delta_secs();
    if delta <= 0.0 {
        return;
    }

    for (mut transform, heading, nav, config) in agents.iter_mut() {
        let direction = heading.look_at.unwrap_or_else(|| nav.velocity());
        let Some(look) = yaw_towards(direction) else {
            continue;
        };

        let factor = (config.turn_speed * delta).min(1.0);
        let rotation = transform.rotation.slerp(look, factor);
        if transform.rotation != rotation {
            transform.rotation = rotation;
        }
    }
}

/// Система: forward-скорость → AnimationSpeed
///
/// Скорость = проекция navigation velocity на forward агента (local Z).
pub fn update_movement_animation(mut agents: Query<(&Transform, &NavAgent, &mut AnimationSpeed)>) {
    for (transform, nav, mut animation) in agents.iter_mut() {
        let forward = transform.rotation * Vec3::NEG_Z;
        let speed = nav.velocity().dot(forward);

        if animation.speed != speed {
            animation.set_speed(speed);
        }
    }
}
