//! FSM AI systems (initialisation, perception transitions, dispatch, behavior step).

use bevy::prelude::*;

use crate::ai::behaviors::{ActiveBehavior, Behavior, BehaviorContext, BehaviorStatus};
use crate::ai::components::{
    AgentState, Heading, HuntTarget, PendingTransition, PerceptionSnapshot, StruckFlag,
};
use crate::ai::config::AgentConfig;
use crate::ai::events::AgentStateChanged;
use crate::ai::patrol_path::PatrolPath;
use crate::ai::ports::NavigationAgent;
use crate::ai::transitions::{perception_transition, plan_transition, BehaviorCommand};
use crate::navigation::NavAgent;
use crate::DeterministicRng;

/// Система: первичная инициализация агента (Default → Patrol)
///
/// Прогоняет AgentConfig через `sanitized` и клэмпит wander_range до
/// stopping_distance * wander_checkpoint_step, чтобы wander sampling всегда
/// имел допустимую точку.
pub fn initialize_agents(
    mut agents: Query<(Entity, &AgentState, &mut AgentConfig, &NavAgent, &mut PendingTransition)>,
) {
    for (entity, state, mut config, nav, mut pending) in agents.iter_mut() {
        if *state != AgentState::Default {
            continue;
        }

        // Конфиг мог прийти литералом в обход загрузки
        let sanitized = config.clone().sanitized();
        if sanitized != *config {
            *config = sanitized;
        }

        let stopping_distance = nav.stopping_distance();
        if config.wander_range < config.wander_min_distance(stopping_distance) {
            config.clamp_wander_range(stopping_distance);
            crate::logger::log_warning(&format!(
                "AI: {:?} wander_range raised to {:.2} (stopping distance {:.2})",
                entity, config.wander_range, stopping_distance
            ));
        }

        // Hostility от StruckByTarget в этом же тике не перетирается
        pending.request(AgentState::Patrol);
    }
}

/// Система: perception-driven переходы (Patrol/Suspicion → Hostility)
pub fn perception_transitions(
    mut agents: Query<(&AgentState, &PerceptionSnapshot, &mut PendingTransition)>,
) {
    for (state, perception, mut pending) in agents.iter_mut() {
        if let Some(next) = perception_transition(*state, perception) {
            pending.request(next);
        }
    }
}

/// Единственная точка смены state: выполняет TransitionPlan (Cancel → Start)
///
/// Возвращает None для no-op переходов (тот же state, Default).
pub fn dispatch_transition(
    agent: Entity,
    state: &mut AgentState,
    active: &mut ActiveBehavior,
    requested: AgentState,
    ctx: &mut BehaviorContext,
) -> Option<AgentStateChanged> {
    let plan = plan_transition(*state, requested, active.is_active())?;

    for command in &plan.commands {
        match command {
            BehaviorCommand::Cancel => {
                if let Some(previous) = active.take() {
                    previous.cancel(ctx.heading);
                }
            }
            BehaviorCommand::Start(kind) => {
                active.install(Behavior::start(*kind, ctx));
            }
        }
    }

    *state = plan.to;
    crate::logger::log_info(&format!("AI: {:?} {:?} → {:?}", agent, plan.from, plan.to));

    Some(AgentStateChanged {
        agent,
        previous: plan.from,
        next: plan.to,
    })
}

/// Система: dispatch pending перехода + step активного behavior
///
/// Порядок на агента:
/// 1. PendingTransition (init / perception / struck) → dispatch
/// 2. step активного routine
/// 3. BehaviorStatus::Request (wander → Patrol, lost → Suspicion) → dispatch
pub fn step_active_behaviors(
    mut agents: Query<(
        Entity,
        &Transform,
        &AgentConfig,
        &PerceptionSnapshot,
        Option<&PatrolPath>,
        Option<&HuntTarget>,
        &mut AgentState,
        &mut PendingTransition,
        &mut ActiveBehavior,
        &mut NavAgent,
        &mut Heading,
        &mut StruckFlag,
    )>,
    transforms: Query<&Transform>,
    mut random: ResMut<DeterministicRng>,
    time: Res<Time<Fixed>>,
    mut state_changes: EventWriter<AgentStateChanged>,
) {
    let delta = time.delta_secs();

    for (
        entity,
        transform,
        config,
        perception,
        path,
        hunt,
        mut state,
        mut pending,
        mut active,
        mut nav,
        mut heading,
        mut struck,
    ) in agents.iter_mut()
    {
        let target = hunt.map(|hunt| hunt.locate(&transforms)).unwrap_or_default();

        let mut ctx = BehaviorContext {
            nav: &mut *nav,
            config,
            perception: *perception,
            path,
            target: &target,
            position: transform.translation,
            rotation: transform.rotation,
            heading: &mut *heading,
            struck: &mut *struck,
            rng: &mut random.rng,
            delta,
        };

        if let Some(requested) = pending.take() {
            if let Some(change) = dispatch_transition(entity, &mut state, &mut active, requested, &mut ctx) {
                state_changes.write(change);
            }
        }

        if let BehaviorStatus::Request(requested) = active.step(&mut ctx) {
            if let Some(change) = dispatch_transition(entity, &mut state, &mut active, requested, &mut ctx) {
                state_changes.write(change);
            }
        }
    }
}
