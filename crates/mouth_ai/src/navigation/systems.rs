//! Navigation systems (position sync, velocity integration).

use bevy::prelude::*;

use super::NavAgent;

/// Система: Transform → NavAgent (до AI decisions)
pub fn sync_nav_agent_positions(mut agents: Query<(&Transform, &mut NavAgent)>) {
    for (transform, mut agent) in agents.iter_mut() {
        agent.sync_position(transform.translation);
    }
}

/// Система: интеграция NavAgent → Transform
///
/// Двигаем агента к destination (straight line), пока не окажемся в пределах
/// stopping_distance. Rotation не трогаем: heading пишет только
/// `turn_towards_heading`.
pub fn drive_nav_agents(
    mut agents: Query<(&mut Transform, &mut NavAgent)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (mut transform, mut agent) in agents.iter_mut() {
        let position = agent.advance(delta);
        if transform.translation != position {
            transform.translation = position;
        }
    }
}
