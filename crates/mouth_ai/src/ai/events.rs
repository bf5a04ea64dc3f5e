//! AI Events — входящие стимулы и исходящие уведомления FSM
//!
//! Host (combat, trigger volumes) → StruckByTarget → немедленная Hostility.
//! FSM dispatcher → AgentStateChanged (внешняя логика: двери, UI, звук).

use bevy::prelude::*;

use crate::ai::components::AgentState;

/// Агента ударила цель (единственный non-perception стимул)
///
/// Любой state → Hostility, затем one-shot поворот к атакующему.
#[derive(Event, Debug, Clone, Copy)]
pub struct StruckByTarget {
    /// Entity агента, которого ударили
    pub agent: Entity,
}

/// FSM перешла в новый state (пишет dispatcher после выполнения плана)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentStateChanged {
    pub agent: Entity,
    pub previous: AgentState,
    pub next: AgentState,
}
