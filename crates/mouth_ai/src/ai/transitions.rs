//! Transition policy — чистые функции FSM
//!
//! Patrol ⇄ Suspicion ⇄ Hostility:
//! | From      | Condition                          | To        |
//! |-----------|------------------------------------|-----------|
//! | Patrol    | in_hostile_range ∧ is_visible      | Hostility |
//! | Suspicion | in_suspicion_range ∧ is_visible    | Hostility |
//! | Hostility | цель потеряна ≥ lost_timeout       | Suspicion | (HostileRoutine)
//! | Suspicion | wander checkpoints исчерпаны       | Patrol    | (WanderRoutine)
//! | any       | StruckByTarget                     | Hostility |
//!
//! Переход = новый state + список команд для dispatcher'а.

use crate::ai::behaviors::BehaviorKind;
use crate::ai::components::{AgentState, PerceptionSnapshot};

/// Perception-driven переходы (проверяются каждый fixed тик)
pub fn perception_transition(state: AgentState, perception: &PerceptionSnapshot) -> Option<AgentState> {
    match state {
        AgentState::Patrol if perception.in_hostile_range && perception.is_visible => {
            Some(AgentState::Hostility)
        }
        AgentState::Suspicion if perception.in_suspicion_range && perception.is_visible => {
            Some(AgentState::Hostility)
        }
        _ => None,
    }
}

/// Команда dispatcher'у
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BehaviorCommand {
    /// Остановить активный behavior (без rollback навигации)
    Cancel,
    /// Запустить behavior нового state
    Start(BehaviorKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionPlan {
    pub from: AgentState,
    pub to: AgentState,
    pub commands: Vec<BehaviorCommand>,
}

/// План перехода `current → requested`.
///
/// None — no-op: тот же state (повторный запрос не перезапускает behavior)
/// или попытка вернуться в Default.
pub fn plan_transition(current: AgentState, requested: AgentState, has_active: bool) -> Option<TransitionPlan> {
    if requested == current || requested == AgentState::Default {
        return None;
    }

    let mut commands = Vec::with_capacity(2);
    if has_active {
        commands.push(BehaviorCommand::Cancel);
    }
    if let Some(kind) = BehaviorKind::for_state(requested) {
        commands.push(BehaviorCommand::Start(kind));
    }

    Some(TransitionPlan {
        from: current,
        to: requested,
        commands,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seen(in_hostile_range: bool, in_suspicion_range: bool, is_visible: bool) -> PerceptionSnapshot {
        PerceptionSnapshot {
            in_hostile_range,
            in_suspicion_range,
            is_visible,
        }
    }

    #[test]
    fn test_patrol_needs_hostile_range_and_visibility() {
        assert_eq!(
            perception_transition(AgentState::Patrol, &seen(true, true, true)),
            Some(AgentState::Hostility)
        );
        assert_eq!(perception_transition(AgentState::Patrol, &seen(false, true, true)), None);
        assert_eq!(perception_transition(AgentState::Patrol, &seen(true, true, false)), None);
    }

    #[test]
    fn test_suspicion_uses_wider_range() {
        assert_eq!(
            perception_transition(AgentState::Suspicion, &seen(false, true, true)),
            Some(AgentState::Hostility)
        );
        assert_eq!(perception_transition(AgentState::Suspicion, &seen(false, true, false)), None);
    }

    #[test]
    fn test_hostility_and_default_ignore_perception() {
        assert_eq!(perception_transition(AgentState::Hostility, &seen(true, true, false)), None);
        assert_eq!(perception_transition(AgentState::Default, &seen(true, true, true)), None);
    }

    #[test]
    fn test_same_state_is_noop() {
        assert_eq!(plan_transition(AgentState::Hostility, AgentState::Hostility, true), None);
    }

    #[test]
    fn test_default_never_reentered() {
        assert_eq!(plan_transition(AgentState::Patrol, AgentState::Default, true), None);
    }

    #[test]
    fn test_plan_cancels_before_start() {
        let plan = plan_transition(AgentState::Patrol, AgentState::Hostility, true).unwrap();

        assert_eq!(
            plan.commands,
            vec![
                BehaviorCommand::Cancel,
                BehaviorCommand::Start(BehaviorKind::Hostile)
            ]
        );
    }

    #[test]
    fn test_initial_plan_has_nothing_to_cancel() {
        let plan = plan_transition(AgentState::Default, AgentState::Patrol, false).unwrap();

        assert_eq!(plan.commands, vec![BehaviorCommand::Start(BehaviorKind::Patrol)]);
    }
}
