//! Perception — range + angle + line-of-sight → PerceptionSnapshot
//!
//! Чистая функция от SpatialQuery. Видимость считается только когда цель
//! в радиусе детекции (иначе raycast не нужен).

use bevy::prelude::*;

use crate::ai::components::PerceptionSnapshot;
use crate::ai::config::{AgentConfig, VisibilityPolicy};
use crate::ai::ports::SpatialQuery;

/// Вход perception для одного агента
#[derive(Debug, Clone, Copy)]
pub struct PerceptionInput {
    /// Pivot агента (центр range сфер)
    pub origin: Vec3,
    /// Origin LOS луча
    pub eye: Vec3,
    /// Forward агента (world space)
    pub forward: Vec3,
    /// Pivot цели (None — цели нет)
    pub target: Option<Vec3>,
    pub hostile_range: f32,
    pub suspicion_range: f32,
    pub policy: VisibilityPolicy,
}

impl PerceptionInput {
    pub fn from_agent(transform: &Transform, config: &AgentConfig, target: Option<Vec3>) -> Self {
        Self {
            origin: transform.translation,
            eye: transform.translation + Vec3::Y * config.eye_height,
            forward: transform.rotation * Vec3::NEG_Z,
            target,
            hostile_range: config.hostile_detection_range,
            suspicion_range: config.suspicion_detection_range,
            policy: config.visibility,
        }
    }
}

/// Perception evaluation (один probe на каждый range + один raycast)
pub fn evaluate(query: &dyn SpatialQuery, input: &PerceptionInput) -> PerceptionSnapshot {
    let in_hostile_range = query.any_tagged_within(input.origin, input.hostile_range);
    let in_suspicion_range = query.any_tagged_within(input.origin, input.suspicion_range);

    let is_visible = (in_hostile_range || in_suspicion_range)
        && input
            .target
            .is_some_and(|target| is_target_visible(query, input.eye, input.forward, target, input.policy));

    PerceptionSnapshot {
        in_hostile_range,
        in_suspicion_range,
        is_visible,
    }
}

/// Angle gate + raycast. Цель за спиной никогда не видна.
pub fn is_target_visible(
    query: &dyn SpatialQuery,
    eye: Vec3,
    forward: Vec3,
    target: Vec3,
    policy: VisibilityPolicy,
) -> bool {
    let direction = (target - eye).normalize_or_zero();
    if direction == Vec3::ZERO {
        return false;
    }

    let forward = forward.normalize_or_zero();
    let in_view = match policy {
        VisibilityPolicy::Hemisphere => forward.dot(direction) >= 0.0,
        VisibilityPolicy::FieldOfView { half_angle_degrees } => {
            let cos_half = half_angle_degrees.to_radians().cos();
            forward.dot(direction) >= cos_half
        }
    };

    in_view && query.raycast_hits_tagged(eye, direction)
}
