//! AI decision-making module
//!
//! Enemy FSM: Patrol ⇄ Suspicion ⇄ Hostility.
//! Perception (range + angle + LOS) → transition table → single dispatcher →
//! один активный behavior (patrol / wander / hostile) → NavigationAgent.

use bevy::prelude::*;

pub mod behaviors;
pub mod components;
pub mod config;
pub mod events;
pub mod patrol_path;
pub mod perception;
pub mod ports;
pub mod systems;
pub mod transitions;

// Re-export основных типов
pub use behaviors::{ActiveBehavior, Behavior, BehaviorKind, BehaviorStatus};
pub use components::{
    AgentState, AnimationSpeed, Heading, HuntTarget, PendingTransition, PerceptionSnapshot, StruckFlag,
};
pub use config::{AgentConfig, ConfigError, VisibilityPolicy};
pub use events::{AgentStateChanged, StruckByTarget};
pub use patrol_path::PatrolPath;

/// AI Plugin
///
/// Регистрирует AI системы в FixedUpdate для детерминизма.
/// Порядок выполнения:
/// 1. initialize_agents — Default → Patrol запрос, клэмп wander_range
/// 2. evaluate_perception — PerceptionSnapshot
/// 3. react_to_struck — StruckByTarget → Hostility запрос
/// 4. perception_transitions — таблица переходов
/// 5. step_active_behaviors — dispatch + step активного routine
///
/// Update (каждый frame): turn_towards_heading, update_movement_animation.
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<AgentState>()
            .register_type::<AgentConfig>()
            .register_type::<PerceptionSnapshot>()
            .register_type::<PendingTransition>()
            .register_type::<StruckFlag>()
            .register_type::<Heading>()
            .register_type::<HuntTarget>()
            .register_type::<PatrolPath>()
            .register_type::<AnimationSpeed>()
            .add_event::<StruckByTarget>()
            .add_event::<AgentStateChanged>()
            .add_systems(
                FixedUpdate,
                (
                    systems::initialize_agents,
                    systems::evaluate_perception,
                    systems::react_to_struck,
                    systems::perception_transitions,
                    systems::step_active_behaviors,
                )
                    .chain(), // Последовательное выполнение для детерминизма
            )
            .add_systems(
                Update,
                (systems::turn_towards_heading, systems::update_movement_animation).chain(),
            );
    }
}

/// Bundle врага (всё, что нужно FSM + навигации)
#[derive(Bundle)]
pub struct AgentBundle {
    pub transform: Transform,
    pub state: AgentState,
    pub config: AgentConfig,
    pub perception: PerceptionSnapshot,
    pub pending: PendingTransition,
    pub active: ActiveBehavior,
    pub struck: StruckFlag,
    pub heading: Heading,
    pub target: HuntTarget,
    pub path: PatrolPath,
    pub nav: crate::navigation::NavAgent,
    pub animation: AnimationSpeed,
}

impl AgentBundle {
    pub fn new(position: Vec3, target: Entity, path: PatrolPath) -> Self {
        let config = AgentConfig::default();
        let mut nav = crate::navigation::NavAgent::default();
        nav.speed = config.normal_speed;

        Self {
            transform: Transform::from_translation(position),
            state: AgentState::Default,
            config,
            perception: PerceptionSnapshot::default(),
            pending: PendingTransition::default(),
            active: ActiveBehavior::default(),
            struck: StruckFlag::default(),
            heading: Heading::default(),
            target: HuntTarget::new(target),
            path,
            nav,
            animation: AnimationSpeed::default(),
        }
    }

    pub fn with_config(mut self, config: AgentConfig) -> Self {
        self.nav.speed = config.normal_speed;
        self.config = config;
        self
    }

    pub fn with_nav(mut self, nav: crate::navigation::NavAgent) -> Self {
        self.nav = nav;
        self
    }
}
