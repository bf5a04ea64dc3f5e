//! Navigation — headless pathfinding agent
//!
//! Содержит:
//! - NavAgent (реализация NavigationAgent port: destination, path latency, arrival)
//! - NavigationError (unreachable / non-finite destination)
//! - системы sync + integration в FixedUpdate
//!
//! Хост с настоящим навмешем подменяет NavAgent своей реализацией порта,
//! AI от этого не меняется.

use bevy::prelude::*;

pub mod agent;
pub mod systems;

pub use agent::{NavAgent, NavBounds};
pub use systems::{drive_nav_agents, sync_nav_agent_positions};

/// Ошибки навигации. Никогда не фатальны: behavior логирует и продолжает polling.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NavigationError {
    #[error("destination {point} is outside the navigable area")]
    Unreachable { point: Vec3 },

    #[error("destination is not a finite point")]
    NonFinite,
}

/// Navigation Plugin
///
/// Порядок в FixedUpdate:
/// 1. sync_nav_agent_positions — до AI (агент знает актуальную позицию)
/// 2. drive_nav_agents — после behaviors (двигаем к свежему destination)
pub struct NavigationPlugin;

impl Plugin for NavigationPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<NavAgent>().add_systems(
            FixedUpdate,
            (
                sync_nav_agent_positions.before(crate::ai::systems::initialize_agents),
                drive_nav_agents.after(crate::ai::systems::step_active_behaviors),
            ),
        );
    }
}
