//! Tests for FSM AI components.

#[cfg(test)]
mod tests {
    use super::super::fsm::{AgentState, PendingTransition, StruckFlag};

    #[test]
    fn test_agent_state_default() {
        let state = AgentState::default();
        assert_eq!(state, AgentState::Default);
        assert!(!state.is_patrolling());
        assert!(AgentState::Patrol.is_patrolling());
    }

    #[test]
    fn test_pending_transition_last_request_wins() {
        let mut pending = PendingTransition::default();
        pending.request(AgentState::Suspicion);
        pending.request(AgentState::Patrol);

        assert_eq!(pending.take(), Some(AgentState::Patrol));
        assert_eq!(pending.take(), None);
    }

    #[test]
    fn test_pending_transition_hostility_not_overwritten() {
        let mut pending = PendingTransition::default();
        pending.request(AgentState::Hostility);
        pending.request(AgentState::Suspicion);

        assert_eq!(pending.peek(), Some(AgentState::Hostility));
    }

    #[test]
    fn test_struck_flag_consumed_once() {
        let mut flag = StruckFlag::default();
        flag.arm();

        assert!(flag.consume());
        assert!(!flag.consume());
        assert_eq!(flag.consumed, 1);
        assert!(!flag.armed);
    }
}
