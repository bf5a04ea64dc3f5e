//! AI reaction systems (struck by target).

use bevy::prelude::*;

use crate::ai::components::{AgentState, PendingTransition, StruckFlag};
use crate::ai::events::StruckByTarget;

/// System: AI реакция на удар цели
///
/// Если агента ударили, он:
/// - взводит StruckFlag (Hostile behavior развернётся к атакующему)
/// - запрашивает Hostility (из любого state, dispatcher применит в этом же тике)
///
/// Уже в Hostility: behavior не перезапускается, но поворот к атакующему
/// всё равно срабатывает.
pub fn react_to_struck(
    mut struck_events: EventReader<StruckByTarget>,
    mut agents: Query<(&AgentState, &mut StruckFlag, &mut PendingTransition)>,
) {
    for event in struck_events.read() {
        let Ok((state, mut struck, mut pending)) = agents.get_mut(event.agent) else {
            continue;
        };

        struck.arm();
        pending.request(AgentState::Hostility);

        crate::logger::log(&format!(
            "AI: {:?} struck by target in {:?} → Hostility",
            event.agent, state
        ));
    }
}
