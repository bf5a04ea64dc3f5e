//! Perception system (collision world snapshot → PerceptionSnapshot).

use bevy::prelude::*;

use crate::ai::components::{HuntTarget, PerceptionSnapshot};
use crate::ai::config::AgentConfig;
use crate::ai::perception::{evaluate, PerceptionInput};
use crate::ai::ports::TargetLocator;
use crate::physics::{Collider, CollisionWorld, TargetTag};

/// Система: perception evaluation раз в fixed тик
///
/// CollisionWorld собирается один раз на тик из всех Collider entities,
/// затем каждый агент делает свои probe + raycast.
pub fn evaluate_perception(
    mut agents: Query<(&Transform, &AgentConfig, Option<&HuntTarget>, &mut PerceptionSnapshot)>,
    bodies: Query<(&Transform, &Collider, Has<TargetTag>)>,
    transforms: Query<&Transform>,
) {
    let mut world = CollisionWorld::new();
    for (transform, collider, tagged) in bodies.iter() {
        world.insert(transform.translation, *collider, tagged);
    }

    for (transform, config, hunt, mut snapshot) in agents.iter_mut() {
        let target = hunt
            .map(|hunt| hunt.locate(&transforms))
            .unwrap_or_default();

        let input = PerceptionInput::from_agent(transform, config, target.position());
        let next = evaluate(&world, &input);

        // Не дёргаем change detection без реального изменения
        if *snapshot != next {
            *snapshot = next;
        }
    }
}

